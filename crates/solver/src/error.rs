use core::fmt;
use core::fmt::Display;

/// Errors that can occur while configuring or driving a solve.
#[derive(Debug)]
pub enum Error {
    /// A `SolveOptions::heuristic_name` did not name a known heuristic.
    UnknownHeuristic(String),
    /// Reading a DIMACS file failed.
    Io(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnknownHeuristic(name) => {
                write!(f, "unknown decision heuristic: {:?}", name)
            }
            Self::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownHeuristic(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

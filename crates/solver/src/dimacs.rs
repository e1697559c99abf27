use crate::{
    clause::Clause,
    literal::{
        Literal,
        Sign,
        VariableTable,
    },
};
use std::{
    fmt::Write as _,
    path::Path,
};

/// Parses DIMACS CNF text into an ordered clause list and a populated variable
/// table.
///
/// This parser is deliberately permissive: `c` comment lines, `p` problem lines,
/// and blank lines are skipped; clauses may span multiple lines; a missing
/// trailing `0` terminator on the final clause is tolerated rather than
/// rejected. Variable names are whatever string follows an optional leading `-`,
/// interned as-is — there is no requirement that they be decimal integers, even
/// though that is what DIMACS normally carries.
pub fn parse_dimacs(text: &str) -> (Vec<Clause>, VariableTable) {
    let mut table = VariableTable::new();
    let mut clauses = Vec::new();
    let mut current: Vec<Literal> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') || line.starts_with('p') {
            continue
        }
        for token in line.split_whitespace() {
            if token == "0" {
                if !current.is_empty() {
                    clauses.push(Clause::new(current.drain(..)));
                }
                continue
            }
            let (name, sign) = match token.strip_prefix('-') {
                Some(rest) => (rest, Sign::NEG),
                None => (token, Sign::POS),
            };
            if name.is_empty() {
                continue
            }
            let variable = table.intern(name);
            current.push(Literal::new(variable, sign));
        }
    }
    if !current.is_empty() {
        clauses.push(Clause::new(current));
    }
    (clauses, table)
}

/// Reads and parses a DIMACS CNF file.
pub fn parse_dimacs_file(path: impl AsRef<Path>) -> std::io::Result<(Vec<Clause>, VariableTable)> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_dimacs(&text))
}

/// Serializes `clauses` back to DIMACS text, using `table` to recover variable
/// names.
///
/// Not required by the solving path; provided for round-trip testing and the
/// driver's `--dump` convenience.
pub fn write_dimacs(clauses: &[Clause], table: &VariableTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "p cnf {} {}", table.len(), clauses.len());
    for clause in clauses {
        for literal in clause.iter() {
            if literal.sign().is_neg() {
                out.push('-');
            }
            out.push_str(table.name(literal.variable()));
            out.push(' ');
        }
        out.push_str("0\n");
    }
    out
}

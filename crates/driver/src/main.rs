use solver::{
    dimacs,
    heuristics::VsidsParams,
    search::{
        solve_dimacs,
        SolveOptions,
        SolveResult,
        Status,
    },
};
use std::{
    fs,
    fs::File,
    io::Write,
    path::{
        Path,
        PathBuf,
    },
    time::Instant,
};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "cdcl-driver")]
struct Opt {
    /// A single `.cnf` file, or a directory to walk for `*.cnf` files.
    #[structopt(parse(from_os_str))]
    path: PathBuf,

    /// Where to write the benchmark results as CSV.
    #[structopt(long, parse(from_os_str), default_value = "results.csv")]
    out: PathBuf,

    /// Wall-clock budget per solve, in seconds.
    #[structopt(long, default_value = "10.0")]
    timeout: f64,

    /// Seed for the heuristics' internal PRNG.
    #[structopt(long, default_value = "0")]
    seed: u64,

    /// Skip the random-baseline heuristic run.
    #[structopt(long)]
    no_baseline: bool,

    /// Skip the VSIDS heuristic run.
    #[structopt(long)]
    no_vsids: bool,

    /// VSIDS activity bump applied per learned clause.
    #[structopt(long, default_value = "1.0")]
    vsids_bump: f64,

    /// VSIDS activity decay factor.
    #[structopt(long, default_value = "0.95")]
    vsids_decay_factor: f64,

    /// Conflicts between VSIDS decay passes; `0` disables decay.
    #[structopt(long, default_value = "50")]
    vsids_decay_period: u32,

    /// Enable debug logging of decisions, conflicts, and backjumps.
    #[structopt(long)]
    debug: bool,

    /// Re-serialize each parsed file's clauses to `<file>.dump.cnf` before
    /// solving it, as a round-trip sanity check of the parser.
    #[structopt(long)]
    dump: bool,
}

fn dump_path(file: &Path) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    file.with_file_name(format!("{}.dump.cnf", stem))
}

fn find_cnf_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()]
    }
    let mut files = fs::read_dir(path)
        .unwrap_or_else(|err| panic!("couldn't read directory {}: {}", path.display(), err))
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().map(|ext| ext == "cnf").unwrap_or(false))
        .collect::<Vec<_>>();
    files.sort();
    files
}

fn status_str(status: Status) -> &'static str {
    match status {
        Status::Sat => "SAT",
        Status::Unsat => "UNSAT",
        Status::Timeout => "TIMEOUT",
    }
}

fn result_to_row(file: &Path, heuristic: &str, result: &SolveResult) -> String {
    format!(
        "{},{},{},{},{:.6},{},{},{},{}\n",
        file.file_name().unwrap_or_default().to_string_lossy(),
        file.display(),
        heuristic,
        status_str(result.status),
        result.runtime_sec,
        result.stats.decisions,
        result.stats.conflicts,
        result.stats.learned_clauses,
        result.stats.propagations,
    )
}

fn main() {
    let opt = Opt::from_args();
    if opt.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let files = find_cnf_files(&opt.path);
    if files.is_empty() {
        eprintln!("no .cnf files found under {}", opt.path.display());
        std::process::exit(1);
    }

    let vsids = VsidsParams {
        bump: opt.vsids_bump,
        decay_factor: opt.vsids_decay_factor,
        decay_period: opt.vsids_decay_period,
    };
    let mut heuristics = Vec::new();
    if !opt.no_baseline {
        heuristics.push("baseline");
    }
    if !opt.no_vsids {
        heuristics.push("vsids");
    }

    let mut out = File::create(&opt.out)
        .unwrap_or_else(|err| panic!("couldn't create {}: {}", opt.out.display(), err));
    out.write_all(b"file,path,heuristic,status,runtime_sec,decisions,conflicts,learned_clauses,propagations\n")
        .expect("couldn't write CSV header");

    for file in &files {
        if opt.dump {
            match dimacs::parse_dimacs_file(file) {
                Ok((clauses, variables)) => {
                    let text = dimacs::write_dimacs(&clauses, &variables);
                    let path = dump_path(file);
                    if let Err(err) = fs::write(&path, text) {
                        eprintln!("couldn't write dump {}: {}", path.display(), err);
                    }
                }
                Err(err) => eprintln!("couldn't parse {} for --dump: {}", file.display(), err),
            }
        }

        for &heuristic in &heuristics {
            let options = SolveOptions {
                heuristic_name: heuristic.to_string(),
                timeout_sec: opt.timeout,
                seed: opt.seed,
                vsids,
                debug: opt.debug,
            };
            let started = Instant::now();
            match solve_dimacs(file, &options) {
                Ok(result) => {
                    println!(
                        "[{}] {} -> {} ({:.3}s, decisions={}, conflicts={})",
                        heuristic,
                        file.display(),
                        status_str(result.status),
                        result.runtime_sec,
                        result.stats.decisions,
                        result.stats.conflicts,
                    );
                    out.write_all(result_to_row(file, heuristic, &result).as_bytes())
                        .expect("couldn't write CSV row");
                }
                Err(err) => {
                    eprintln!(
                        "[{}] {} -> ERROR after {:.3}s: {}",
                        heuristic,
                        file.display(),
                        started.elapsed().as_secs_f64(),
                        err,
                    );
                }
            }
        }
    }

    println!("wrote results to {}", opt.out.display());
}

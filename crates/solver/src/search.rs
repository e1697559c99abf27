use crate::{
    clause::Clause,
    dimacs,
    engine::Engine,
    error::Error,
    heuristics::{
        Heuristic,
        VsidsParams,
    },
    literal::VariableTable,
};
use std::{
    collections::HashMap,
    path::Path,
    time::{
        Duration,
        Instant,
    },
};

/// Configuration for a single [`solve_cnf`] or [`solve_dimacs`] call.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Name of the decision heuristic: `"baseline"`/`"random"` or `"vsids"`.
    pub heuristic_name: String,
    /// Wall-clock budget for the whole solve.
    pub timeout_sec: f64,
    /// Seed for the heuristic's internal PRNG.
    pub seed: u64,
    /// VSIDS tuning; ignored by the random heuristic.
    pub vsids: VsidsParams,
    /// Emit `log::debug!` lines for each decision, conflict, and backjump.
    pub debug: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            heuristic_name: "vsids".to_string(),
            timeout_sec: 10.0,
            seed: 0,
            vsids: VsidsParams::default(),
            debug: false,
        }
    }
}

/// The terminal outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Sat,
    Unsat,
    Timeout,
}

/// Counters accumulated over the course of a solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub decisions: u64,
    pub conflicts: u64,
    pub learned_clauses: u64,
    pub propagations: u64,
}

/// The outcome of a solve: its status, timing, stats, and (for SAT, or
/// best-effort otherwise) the resulting assignment by variable name.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: Status,
    pub runtime_sec: f64,
    pub stats: SolveStats,
    pub assignment: HashMap<String, bool>,
}

fn extract_assignment(engine: &Engine, table: &VariableTable) -> HashMap<String, bool> {
    table
        .variables()
        .filter_map(|variable| {
            engine
                .state()
                .model()
                .value_of(variable)
                .map(|value| (table.name(variable).to_string(), value))
        })
        .collect()
}

/// Runs the CDCL search loop over `clauses` until SAT, UNSAT, or timeout.
///
/// This is the outer loop described by the rule engine's contract: at each
/// iteration it sweeps the clause database looking for a conflict or a unit
/// propagation, resolves any conflict found down to its asserting level, and
/// otherwise either declares the formula satisfied or asks the heuristic for
/// the next decision.
pub fn solve_cnf(
    clauses: Vec<Clause>,
    variables: VariableTable,
    options: &SolveOptions,
) -> Result<SolveResult, Error> {
    let start = Instant::now();
    let deadline = Duration::from_secs_f64(options.timeout_sec.max(0.0));

    let mut heuristic = Heuristic::new(
        &options.heuristic_name,
        variables.variables(),
        options.seed,
        options.vsids,
    )?;
    let mut engine = Engine::new(clauses);
    let mut stats = SolveStats::default();

    loop {
        if start.elapsed() >= deadline {
            return Ok(SolveResult {
                status: Status::Timeout,
                runtime_sec: start.elapsed().as_secs_f64(),
                stats,
                assignment: extract_assignment(&engine, &variables),
            })
        }

        let num_clauses = engine.state().clauses().len();
        let mut progressed = true;
        while progressed && !engine.in_conflict() {
            progressed = false;
            for index in 0..num_clauses.min(engine.state().clauses().len()) {
                if engine.conflict(index) {
                    stats.conflicts += 1;
                    progressed = false;
                    break
                }
                if engine.propagate(index) {
                    stats.propagations += 1;
                    progressed = true;
                }
            }
        }

        if engine.in_conflict() {
            if engine.fail() {
                return Ok(SolveResult {
                    status: Status::Unsat,
                    runtime_sec: start.elapsed().as_secs_f64(),
                    stats,
                    assignment: extract_assignment(&engine, &variables),
                })
            }
            engine.explain();
            if let Some(learned) = engine.learn() {
                stats.learned_clauses += 1;
                heuristic.on_learned_clause(&learned);
            }
            heuristic.on_conflict();
            let target_level = engine.asserting_level().max(0) as usize;
            engine.backjump(target_level);
            if options.debug {
                log::debug!(
                    "backjumped to level {} (conflicts={}, learned={})",
                    target_level,
                    stats.conflicts,
                    stats.learned_clauses,
                );
            }
            continue
        }

        if engine.state().is_formula_satisfied() {
            engine.mark_sat();
            return Ok(SolveResult {
                status: Status::Sat,
                runtime_sec: start.elapsed().as_secs_f64(),
                stats,
                assignment: extract_assignment(&engine, &variables),
            })
        }

        match heuristic.pick_decision(engine.state().model()) {
            Some(literal) => {
                engine.decide(literal);
                stats.decisions += 1;
                if options.debug {
                    log::debug!(
                        "decided {:?} at level {} (decisions={})",
                        literal,
                        engine.state().model().decision_level(),
                        stats.decisions,
                    );
                }
            }
            None => {
                // No free variable left but the formula was not recognized as
                // satisfied: sound propagation should make this unreachable.
                return Ok(SolveResult {
                    status: Status::Unsat,
                    runtime_sec: start.elapsed().as_secs_f64(),
                    stats,
                    assignment: extract_assignment(&engine, &variables),
                })
            }
        }
    }
}

/// Parses `path` as a DIMACS CNF file and solves it.
pub fn solve_dimacs(path: impl AsRef<Path>, options: &SolveOptions) -> Result<SolveResult, Error> {
    let (clauses, variables) = dimacs::parse_dimacs_file(path)?;
    solve_cnf(clauses, variables, options)
}

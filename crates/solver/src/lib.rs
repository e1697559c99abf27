//! A conflict-driven clause learning (CDCL) propositional SAT solver core.
//!
//! The crate is organized around a small rule engine ([`engine::Engine`]) that
//! exposes the individual CDCL operations — propagate, decide, conflict,
//! explain, backjump, fail, learn — as composable methods over a shared
//! [`engine::State`]. The [`search`] module drives that engine to termination;
//! [`dimacs`] parses CNF input; [`heuristics`] supplies the decision strategies.

#![deny(unsafe_code)]

pub mod clause;
pub mod dimacs;
pub mod engine;
pub mod error;
pub mod graph;
pub mod heuristics;
pub mod literal;
pub mod model;
pub mod search;

pub use crate::{
    clause::Clause,
    engine::{
        Engine,
        State,
    },
    error::Error,
    graph::ImplicationGraph,
    heuristics::{
        Heuristic,
        RandomHeuristic,
        VsidsHeuristic,
        VsidsParams,
    },
    literal::{
        Literal,
        Sign,
        Variable,
        VariableTable,
    },
    model::Model,
    search::{
        solve_cnf,
        solve_dimacs,
        SolveOptions,
        SolveResult,
        SolveStats,
        Status,
    },
};

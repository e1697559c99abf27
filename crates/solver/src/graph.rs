use crate::literal::Literal;
use ahash::{
    AHashMap,
    AHashSet,
};

/// An implication graph: a DAG over literals where an edge `src -> tgt` records
/// that `src` was one of the antecedents that forced `tgt` to be assigned.
///
/// Cloning an `ImplicationGraph` performs a full structural deep copy of its edge
/// map and conflict clause, which is exactly what [`crate::engine::Engine::decide`]
/// relies on to snapshot the graph at every decision.
#[derive(Debug, Default, Clone)]
pub struct ImplicationGraph {
    edges: AHashMap<Literal, AHashSet<Literal>>,
    conflict_clause: Option<AHashSet<Literal>>,
}

impl ImplicationGraph {
    /// Creates an empty graph with no conflict clause.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `node` as present in the graph with no antecedents yet.
    pub fn add_node(&mut self, node: Literal) {
        self.edges.entry(node).or_default();
    }

    /// Records that `src` is an antecedent of `tgt`.
    ///
    /// # Panics
    ///
    /// If `tgt` was never registered with [`Self::add_node`].
    pub fn add_edge(&mut self, src: Literal, tgt: Literal) {
        self.edges
            .get_mut(&tgt)
            .expect("edge target was never registered as a node")
            .insert(src);
    }

    /// Returns the antecedents of `node`, if it is part of the graph.
    pub fn antecedents(&self, node: Literal) -> Option<&AHashSet<Literal>> {
        self.edges.get(&node)
    }

    /// Sets the working conflict clause to the given literal set.
    pub fn set_conflict(&mut self, literals: impl IntoIterator<Item = Literal>) {
        self.conflict_clause = Some(literals.into_iter().collect());
    }

    /// Returns the current working conflict clause, if any.
    pub fn conflict_clause(&self) -> Option<&AHashSet<Literal>> {
        self.conflict_clause.as_ref()
    }

    /// Clears the working conflict clause.
    pub fn clear_conflict(&mut self) {
        self.conflict_clause = None;
    }

    /// Performs one resolution step against `node`: removes `node`'s complement
    /// from the working conflict clause and adds the complement of every one of
    /// `node`'s antecedents in its place.
    ///
    /// # Panics
    ///
    /// If there is no working conflict clause.
    pub fn explain(&mut self, node: Literal) {
        let antecedents = self
            .edges
            .get(&node)
            .cloned()
            .unwrap_or_default();
        let clause = self
            .conflict_clause
            .as_mut()
            .expect("explain called without an active conflict clause");
        clause.remove(&node.negate());
        for parent in antecedents {
            clause.insert(parent.negate());
        }
    }
}

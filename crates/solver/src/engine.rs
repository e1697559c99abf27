use crate::{
    clause::Clause,
    graph::ImplicationGraph,
    literal::Literal,
    model::Model,
};

/// Bundles the clause database, model, and terminal flags for a single solve.
#[derive(Debug, Clone)]
pub struct State {
    clauses: Vec<Clause>,
    model: Model,
    conflict: Option<Clause>,
    unsat: bool,
    sat: bool,
}

impl State {
    /// Creates a fresh state over `clauses` with an empty model.
    pub fn new(clauses: Vec<Clause>) -> Self {
        Self {
            clauses,
            model: Model::new(),
            conflict: None,
            unsat: false,
            sat: false,
        }
    }

    /// Returns the clause database.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Returns the published conflict clause, if any.
    pub fn conflict(&self) -> Option<&Clause> {
        self.conflict.as_ref()
    }

    /// Returns `true` once the formula has been determined unsatisfiable.
    pub fn is_unsat(&self) -> bool {
        self.unsat
    }

    /// Returns `true` once a satisfying model has been found.
    pub fn is_sat(&self) -> bool {
        self.sat
    }

    /// Marks the state as satisfied.
    pub fn mark_sat(&mut self) {
        self.sat = true;
    }

    /// Returns `true` if every clause is satisfied under the current model.
    pub fn is_formula_satisfied(&self) -> bool {
        self.clauses.iter().all(|clause| self.is_clause_satisfied(clause))
    }

    /// Returns `true` if `clause` has at least one literal present in the model.
    pub fn is_clause_satisfied(&self, clause: &Clause) -> bool {
        clause.iter().any(|literal| self.model.contains(literal))
    }
}

/// The CDCL rule engine: a small set of operations over a [`State`] and a stack
/// of implication-graph snapshots, one per decision level.
///
/// Every operation mirrors a rule of the underlying proof system: it checks its
/// precondition, applies its effect if the precondition holds, and reports
/// whether it fired. Callers (see [`crate::search`]) compose these into a search
/// loop; the engine itself holds no looping logic.
#[derive(Debug, Clone)]
pub struct Engine {
    state: State,
    graphs: Vec<ImplicationGraph>,
    in_conflict: bool,
}

impl Engine {
    /// Creates a new engine over the given clause database.
    pub fn new(clauses: Vec<Clause>) -> Self {
        Self {
            state: State::new(clauses),
            graphs: vec![ImplicationGraph::new()],
            in_conflict: false,
        }
    }

    /// Returns the underlying state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns `true` if the engine currently has an unresolved conflict.
    pub fn in_conflict(&self) -> bool {
        self.in_conflict
    }

    fn graph(&self) -> &ImplicationGraph {
        self.graphs.last().expect("graph stack is never empty")
    }

    fn graph_mut(&mut self) -> &mut ImplicationGraph {
        self.graphs.last_mut().expect("graph stack is never empty")
    }

    /// Attempts unit propagation on the clause at `clause_index`.
    ///
    /// If exactly one literal of the clause is not falsified by the model and
    /// that literal is itself unassigned, assigns it and records the rest of the
    /// clause as its antecedents in the implication graph. Returns whether this
    /// fired.
    ///
    /// # Precondition
    ///
    /// The engine must not currently be in conflict.
    pub fn propagate(&mut self, clause_index: usize) -> bool {
        if self.in_conflict {
            return false
        }
        let clause = &self.state.clauses[clause_index];
        let mut unassigned_lit = None;
        let mut num_unassigned = 0;
        for literal in clause.iter() {
            if !self.state.model.contains(literal.negate()) {
                num_unassigned += 1;
                unassigned_lit = Some(literal);
            }
        }
        let Some(unassigned_lit) = unassigned_lit else {
            return false
        };
        if num_unassigned != 1
            || self.state.model.contains(unassigned_lit)
            || self.state.model.contains(unassigned_lit.negate())
        {
            return false
        }
        self.state.model.assign(unassigned_lit);
        self.graph_mut().add_node(unassigned_lit);
        for literal in clause.iter() {
            if literal != unassigned_lit {
                self.graph_mut().add_edge(literal.negate(), unassigned_lit);
            }
        }
        true
    }

    /// Raises the decision level and assigns `literal` as a fresh decision,
    /// snapshotting the implication graph.
    ///
    /// # Precondition
    ///
    /// Neither `literal` nor its complement may already be assigned.
    pub fn decide(&mut self, literal: Literal) -> bool {
        if self.state.model.contains(literal) || self.state.model.contains(literal.negate()) {
            return false
        }
        self.state.model.decide(literal);
        let snapshot = self.graph().clone();
        self.graphs.push(snapshot);
        true
    }

    /// Checks whether the clause at `clause_index` is fully falsified by the
    /// model, and if so enters the conflict state with it as the working
    /// conflict clause.
    ///
    /// # Precondition
    ///
    /// The engine must not currently be in conflict.
    pub fn conflict(&mut self, clause_index: usize) -> bool {
        if self.in_conflict {
            return false
        }
        let clause = &self.state.clauses[clause_index];
        if !clause.iter().all(|literal| self.state.model.contains(literal.negate())) {
            return false
        }
        self.in_conflict = true;
        let literals = clause.iter().collect::<Vec<_>>();
        self.graph_mut().set_conflict(literals.iter().copied());
        self.state.conflict = Some(Clause::new(literals));
        true
    }

    /// Resolves the working conflict clause back to its First UIP.
    ///
    /// Repeatedly pops the most recently assigned literal of the current
    /// decision level and resolves it out of the working conflict clause, until
    /// exactly one literal of the current level remains.
    ///
    /// # Precondition
    ///
    /// The engine must be in conflict, with at least one literal assigned at the
    /// current decision level.
    pub fn explain(&mut self) -> bool {
        if !self.in_conflict {
            return false
        }
        loop {
            if self.state.model.current_level_literals().len() <= 1 {
                break
            }
            let last = self.state.model.pop_last();
            self.graph_mut().explain(last);
        }
        if let Some(clause) = self.graph().conflict_clause() {
            self.state.conflict = Some(Clause::new(clause.iter().copied()));
        }
        true
    }

    /// Returns the decision level the engine should backjump to, given the
    /// current working conflict clause: the highest level among the conflict
    /// clause's literals other than the negation of the current last trail
    /// literal (the First UIP), or `0` if none remain.
    ///
    /// # Precondition
    ///
    /// The engine must be in conflict with a published conflict clause.
    pub fn asserting_level(&self) -> i64 {
        let uip = self.state.model.last_literal();
        let Some(conflict) = self.graph().conflict_clause() else {
            return 0
        };
        let mut level = -1i64;
        for &literal in conflict {
            if literal == uip.negate() {
                continue
            }
            level = level.max(self.state.model.get_level(literal));
        }
        level.max(0)
    }

    /// Backjumps to `target_level`, truncating the model and graph stack and
    /// asserting the negation of the First UIP there.
    ///
    /// Returns `false` without effect if `target_level` is below the computed
    /// asserting level.
    ///
    /// # Precondition
    ///
    /// The engine must be in conflict with a published conflict clause.
    pub fn backjump(&mut self, target_level: usize) -> bool {
        if !self.in_conflict || self.graph().conflict_clause().is_none() {
            return false
        }
        let asserting_level = self.asserting_level();
        if (target_level as i64) < asserting_level {
            return false
        }
        let uip = self.state.model.last_literal();
        self.state.model.backjump(target_level);
        self.state.model.assign(uip.negate());
        self.in_conflict = false;
        self.state.conflict = None;
        self.graphs.truncate(target_level + 1);
        self.graph_mut().clear_conflict();
        true
    }

    /// Marks the state as satisfied under the current model.
    pub fn mark_sat(&mut self) {
        self.state.mark_sat();
    }

    /// Declares the formula unsatisfiable if the engine is in conflict at
    /// decision level 0.
    pub fn fail(&mut self) -> bool {
        if self.in_conflict && self.state.model.decision_level() == 0 {
            self.state.unsat = true;
            true
        } else {
            false
        }
    }

    /// Appends the published conflict clause to the clause database if it is not
    /// already present, returning the learned clause.
    pub fn learn(&mut self) -> Option<Clause> {
        let clause = self.state.conflict.clone()?;
        if !self.state.clauses.contains(&clause) {
            self.state.clauses.push(clause.clone());
        }
        Some(clause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::{
        Sign,
        VariableTable,
    };

    fn lit(table: &mut VariableTable, name: &str, sign: Sign) -> Literal {
        Literal::new(table.intern(name), sign)
    }

    #[test]
    fn propagate_fires_on_unit_clause() {
        let mut table = VariableTable::new();
        let a = lit(&mut table, "a", Sign::POS);
        let b = lit(&mut table, "b", Sign::POS);
        let clause = Clause::new([a.negate(), b]);
        let mut engine = Engine::new(vec![clause]);
        engine.state.model.assign(a);
        assert!(engine.propagate(0));
        assert!(engine.state().model().contains(b));
    }

    #[test]
    fn conflict_detects_falsified_clause() {
        let mut table = VariableTable::new();
        let a = lit(&mut table, "a", Sign::POS);
        let clause = Clause::new([a]);
        let mut engine = Engine::new(vec![clause]);
        engine.state.model.assign(a.negate());
        assert!(engine.conflict(0));
        assert!(engine.in_conflict());
    }

    #[test]
    fn fail_at_root_level_marks_unsat() {
        let mut table = VariableTable::new();
        let a = lit(&mut table, "a", Sign::POS);
        let clause = Clause::new([a]);
        let mut engine = Engine::new(vec![clause]);
        engine.state.model.assign(a.negate());
        engine.conflict(0);
        assert!(engine.fail());
        assert!(engine.state().is_unsat());
    }

    #[test]
    fn explain_and_backjump_hand_trace() {
        // c0={1} c1={-1,2} c2={-3,4} c3={-5,-6} c4={-1,-5,7} c5={-2,-5,6,-7}
        let mut table = VariableTable::new();
        let v1 = lit(&mut table, "1", Sign::POS);
        let v2 = lit(&mut table, "2", Sign::POS);
        let v3 = lit(&mut table, "3", Sign::POS);
        let v4 = lit(&mut table, "4", Sign::POS);
        let v5 = lit(&mut table, "5", Sign::POS);
        let v6 = lit(&mut table, "6", Sign::POS);
        let v7 = lit(&mut table, "7", Sign::POS);
        let clauses = vec![
            Clause::new([v1]),
            Clause::new([v1.negate(), v2]),
            Clause::new([v3.negate(), v4]),
            Clause::new([v5.negate(), v6.negate()]),
            Clause::new([v1.negate(), v5.negate(), v7]),
            Clause::new([v2.negate(), v5.negate(), v6, v7.negate()]),
        ];
        let mut engine = Engine::new(clauses);
        assert!(engine.propagate(0)); // c0 unit: assigns 1 at level 0
        assert!(engine.decide(v3)); // level 1
        assert!(engine.propagate(2)); // c2 unit: assigns 4
        assert!(engine.decide(v5)); // level 2
        assert!(engine.propagate(4)); // c4 unit: assigns 7
        assert!(engine.propagate(1)); // c1 unit: assigns 2
        assert!(engine.propagate(5)); // c5 unit: assigns 6
        assert!(engine.conflict(3)); // c3 = {-5,-6} is now falsified
        assert!(engine.explain());
        assert_eq!(engine.asserting_level(), 0);
        assert!(engine.backjump(0));
        assert!(!engine.in_conflict());
        assert_eq!(engine.state().model().decision_level(), 0);
        assert!(engine.state().model().contains(v5.negate()));
    }
}

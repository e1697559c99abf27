use crate::literal::{
    Literal,
    Variable,
};
use ahash::AHashMap;

/// The current partial assignment (the trail), partitioned into decision levels.
///
/// `assignment` is the ground truth ordering; `values` mirrors it as a per-variable
/// lookup table so membership tests and level lookups are O(1) rather than O(trail
/// length), per the model-membership acceleration this crate adopts over the
/// reference design.
#[derive(Debug, Default, Clone)]
pub struct Model {
    assignment: Vec<Literal>,
    decisions: Vec<usize>,
    values: AHashMap<Variable, (bool, i64)>,
}

impl Model {
    /// Creates an empty model at decision level 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current decision level.
    pub fn decision_level(&self) -> usize {
        self.decisions.len()
    }

    /// Returns the full trail, oldest assignment first.
    pub fn assignment(&self) -> &[Literal] {
        &self.assignment
    }

    /// Assigns `literal` at the current decision level without raising the level
    /// (a propagated or root-level literal).
    ///
    /// # Panics
    ///
    /// If `literal` or its complement is already assigned.
    pub fn assign(&mut self, literal: Literal) {
        debug_assert!(!self.contains(literal) && !self.contains(literal.negate()));
        let level = self.decision_level() as i64;
        self.values.insert(literal.variable(), (literal.is_pos(), level));
        self.assignment.push(literal);
    }

    /// Raises the decision level and assigns `literal` as the new decision.
    ///
    /// # Panics
    ///
    /// If `literal` or its complement is already assigned.
    pub fn decide(&mut self, literal: Literal) {
        debug_assert!(!self.contains(literal) && !self.contains(literal.negate()));
        self.decisions.push(self.assignment.len());
        let level = self.decisions.len() as i64;
        self.values.insert(literal.variable(), (literal.is_pos(), level));
        self.assignment.push(literal);
    }

    /// Truncates the trail back to the end of `target_level`, discarding every
    /// assignment made afterwards, and returns the solver to that level.
    pub fn backjump(&mut self, target_level: usize) {
        let cut = self.decisions.get(target_level).copied().unwrap_or(self.assignment.len());
        for literal in self.assignment.drain(cut..) {
            self.values.remove(&literal.variable());
        }
        self.decisions.truncate(target_level);
    }

    /// Returns the literals assigned at the current decision level, in trail order.
    pub fn current_level_literals(&self) -> &[Literal] {
        if self.decisions.is_empty() {
            &self.assignment
        } else {
            &self.assignment[*self.decisions.last().unwrap()..]
        }
    }

    /// Pops and returns the most recently assigned literal.
    ///
    /// # Panics
    ///
    /// If the trail is empty.
    pub fn pop_last(&mut self) -> Literal {
        let literal = self.assignment.pop().expect("popped from an empty trail");
        self.values.remove(&literal.variable());
        literal
    }

    /// Returns the most recently assigned literal without removing it.
    ///
    /// # Panics
    ///
    /// If the trail is empty.
    pub fn last_literal(&self) -> Literal {
        *self.assignment.last().expect("model has no assignments")
    }

    /// Returns `true` if `literal` (with its exact polarity) is assigned.
    pub fn contains(&self, literal: Literal) -> bool {
        matches!(self.values.get(&literal.variable()), Some(&(pos, _)) if pos == literal.is_pos())
    }

    /// Returns the decision level at which `literal`'s variable was assigned, or
    /// `-1` if the variable is unassigned.
    ///
    /// A literal and its complement share a level, since a variable is only ever
    /// assigned one polarity at a time.
    pub fn get_level(&self, literal: Literal) -> i64 {
        self.values
            .get(&literal.variable())
            .map(|&(_, level)| level)
            .unwrap_or(-1)
    }

    /// Returns `true` if `variable` has been assigned either polarity.
    pub fn is_assigned(&self, variable: Variable) -> bool {
        self.values.contains_key(&variable)
    }

    /// Returns the current polarity of `variable`, if assigned.
    pub fn value_of(&self, variable: Variable) -> Option<bool> {
        self.values.get(&variable).map(|&(pos, _)| pos)
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
    fn decide_raises_level_assign_does_not() {
        let mut table = VariableTable::new();
        let mut model = Model::new();
        let a = lit(&mut table, "a", Sign::POS);
        let b = lit(&mut table, "b", Sign::POS);
        model.assign(a);
        assert_eq!(model.decision_level(), 0);
        model.decide(b);
        assert_eq!(model.decision_level(), 1);
        assert_eq!(model.get_level(a), 0);
        assert_eq!(model.get_level(b), 1);
    }

    #[test]
    fn backjump_restores_earlier_level() {
        let mut table = VariableTable::new();
        let mut model = Model::new();
        let a = lit(&mut table, "a", Sign::POS);
        let b = lit(&mut table, "b", Sign::POS);
        let c = lit(&mut table, "c", Sign::POS);
        model.decide(a);
        model.decide(b);
        model.assign(c);
        model.backjump(1);
        assert_eq!(model.decision_level(), 1);
        assert!(model.contains(a));
        assert!(!model.contains(b));
        assert!(!model.contains(c));
        assert_eq!(model.get_level(b), -1);
    }

    #[test]
    fn complement_is_absent_when_literal_present() {
        let mut table = VariableTable::new();
        let mut model = Model::new();
        let a = lit(&mut table, "a", Sign::POS);
        model.assign(a);
        assert!(model.contains(a));
        assert!(!model.contains(a.negate()));
    }
}

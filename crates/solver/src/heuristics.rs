use crate::{
    clause::Clause,
    error::Error,
    literal::{
        Literal,
        Sign,
        Variable,
    },
    model::Model,
};
use ahash::AHashMap;
use rand::{
    rngs::SmallRng,
    Rng,
    SeedableRng,
};

/// The decision heuristic interface, implemented as a tagged enum over the two
/// concrete strategies this crate supports rather than a trait object: there is
/// no open-extension requirement, and matching on a fixed set of variants is both
/// cheaper and easier to reason about.
#[derive(Debug, Clone)]
pub enum Heuristic {
    Random(RandomHeuristic),
    Vsids(VsidsHeuristic),
}

impl Heuristic {
    /// Builds a heuristic named `name` over `variables`, seeded with `seed`.
    ///
    /// `name` is matched case-insensitively against `"baseline"`/`"random"` for
    /// [`RandomHeuristic`] and `"vsids"` for [`VsidsHeuristic`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHeuristic`] for any other name.
    pub fn new<I>(name: &str, variables: I, seed: u64, vsids: VsidsParams) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Variable>,
    {
        match name.to_ascii_lowercase().as_str() {
            "baseline" | "random" => {
                Ok(Self::Random(RandomHeuristic::new(variables, seed)))
            }
            "vsids" => Ok(Self::Vsids(VsidsHeuristic::new(variables, seed, vsids))),
            other => Err(Error::UnknownHeuristic(other.to_string())),
        }
    }

    /// Returns the next decision literal, or `None` if every variable is assigned.
    pub fn pick_decision(&mut self, model: &Model) -> Option<Literal> {
        match self {
            Self::Random(h) => h.pick_decision(model),
            Self::Vsids(h) => h.pick_decision(model),
        }
    }

    /// Notifies the heuristic that `clause` was just learned.
    pub fn on_learned_clause(&mut self, clause: &Clause) {
        match self {
            Self::Random(h) => h.on_learned_clause(clause),
            Self::Vsids(h) => h.on_learned_clause(clause),
        }
    }

    /// Notifies the heuristic that a conflict was just encountered.
    pub fn on_conflict(&mut self) {
        match self {
            Self::Random(h) => h.on_conflict(),
            Self::Vsids(h) => h.on_conflict(),
        }
    }
}

/// Picks an unassigned variable and polarity uniformly at random.
///
/// Used as a baseline to compare against VSIDS; ignores conflicts and learned
/// clauses entirely.
#[derive(Debug, Clone)]
pub struct RandomHeuristic {
    variables: Vec<Variable>,
    rng: SmallRng,
}

impl RandomHeuristic {
    fn new<I>(variables: I, seed: u64) -> Self
    where
        I: IntoIterator<Item = Variable>,
    {
        Self {
            variables: variables.into_iter().collect(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn pick_decision(&mut self, model: &Model) -> Option<Literal> {
        let unassigned = self
            .variables
            .iter()
            .copied()
            .filter(|&v| !model.is_assigned(v))
            .collect::<Vec<_>>();
        let &variable = unassigned.get(self.rng.gen_range(0..unassigned.len().max(1)))?;
        let sign = if self.rng.gen_bool(0.5) {
            Sign::POS
        } else {
            Sign::NEG
        };
        Some(Literal::new(variable, sign))
    }

    fn on_learned_clause(&mut self, _clause: &Clause) {}

    fn on_conflict(&mut self) {}
}

/// Tuning parameters for [`VsidsHeuristic`].
#[derive(Debug, Clone, Copy)]
pub struct VsidsParams {
    /// Activity added to every literal of a freshly learned clause.
    pub bump: f64,
    /// Multiplicative decay applied to every activity every `decay_period` conflicts.
    pub decay_factor: f64,
    /// How many conflicts between decay passes; `0` disables decay.
    pub decay_period: u32,
}

impl Default for VsidsParams {
    fn default() -> Self {
        Self {
            bump: 1.0,
            decay_factor: 0.95,
            decay_period: 50,
        }
    }
}

/// Variable State Independent Decaying Sum: branches on the literal with the
/// highest activity, where activity accumulates from clause learning and decays
/// periodically so recent conflicts dominate the score.
#[derive(Debug, Clone)]
pub struct VsidsHeuristic {
    variables: Vec<Variable>,
    activity: AHashMap<Literal, f64>,
    params: VsidsParams,
    conflicts_since_decay: u32,
    rng: SmallRng,
}

impl VsidsHeuristic {
    fn new<I>(variables: I, seed: u64, params: VsidsParams) -> Self
    where
        I: IntoIterator<Item = Variable>,
    {
        let variables = variables.into_iter().collect::<Vec<_>>();
        let mut activity = AHashMap::default();
        for &variable in &variables {
            activity.insert(Literal::new(variable, Sign::POS), 0.0);
            activity.insert(Literal::new(variable, Sign::NEG), 0.0);
        }
        Self {
            variables,
            activity,
            params,
            conflicts_since_decay: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn pick_decision(&mut self, model: &Model) -> Option<Literal> {
        let mut best: Vec<Literal> = Vec::new();
        let mut best_activity = f64::NEG_INFINITY;
        for &variable in &self.variables {
            if model.is_assigned(variable) {
                continue
            }
            for sign in [Sign::POS, Sign::NEG] {
                let literal = Literal::new(variable, sign);
                let activity = self.activity.get(&literal).copied().unwrap_or(0.0);
                if activity > best_activity {
                    best_activity = activity;
                    best.clear();
                    best.push(literal);
                } else if activity == best_activity {
                    best.push(literal);
                }
            }
        }
        if best.is_empty() {
            return None
        }
        let index = self.rng.gen_range(0..best.len());
        Some(best[index])
    }

    fn on_learned_clause(&mut self, clause: &Clause) {
        for literal in clause.iter() {
            *self.activity.entry(literal).or_insert(0.0) += self.params.bump;
        }
    }

    fn on_conflict(&mut self) {
        if self.params.decay_period == 0 {
            return
        }
        self.conflicts_since_decay += 1;
        if self.conflicts_since_decay >= self.params.decay_period {
            self.conflicts_since_decay = 0;
            for value in self.activity.values_mut() {
                *value *= self.params.decay_factor;
            }
        }
    }
}

//! Engine settings shared by every forward run.

use prodrule_core::RuleSet;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::conflict::{ConflictResolver, Strategy};
use crate::forward::{ForwardChainingEngine, DEFAULT_MAX_ITERATIONS};

/// Settings for building a [`ForwardChainingEngine`].
///
/// Missing fields take their defaults, so an empty table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Conflict-resolution strategy (default: `FIRST_MATCH`).
    pub strategy: Strategy,
    /// Bound on passes over the rule pool (default: 100).
    pub max_iterations: usize,
    /// Seed for `RANDOM`. Without one the resolver is seeded from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::FirstMatch,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn resolver(&self) -> ConflictResolver<StdRng> {
        match self.seed {
            Some(seed) => ConflictResolver::seeded(self.strategy, seed),
            None => ConflictResolver::from_entropy(self.strategy),
        }
    }

    /// A forward engine over `rules` with these settings.
    pub fn forward<'a>(&self, rules: &'a RuleSet) -> ForwardChainingEngine<'a, StdRng> {
        ForwardChainingEngine::new(rules, self.resolver()).with_max_iterations(self.max_iterations)
    }
}

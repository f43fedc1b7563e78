//! Conflict resolution: picking one rule out of a conflict set.
//!
//! The engine computes which rules are applicable; the resolver only
//! decides which of them fires next. It never mutates the conflict set.

use std::fmt;

use prodrule_core::Rule;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Strategy
// ──────────────────────────────────────────────

/// Conflict-resolution strategy.
///
/// Names are written `FIRST_MATCH`, `HIGHEST_PRIORITY`, `MOST_SPECIFIC`
/// and `RANDOM` in config files and knowledge bases. An unrecognised name
/// falls back to [`Strategy::FirstMatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Strategy {
    /// First rule of the conflict set.
    #[default]
    FirstMatch,
    /// Largest priority; ties go to the earliest rule.
    HighestPriority,
    /// Most conditions; ties go to the earliest rule.
    MostSpecific,
    /// Uniform choice from the resolver's random source.
    Random,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::FirstMatch => "FIRST_MATCH",
            Strategy::HighestPriority => "HIGHEST_PRIORITY",
            Strategy::MostSpecific => "MOST_SPECIFIC",
            Strategy::Random => "RANDOM",
        }
    }

    /// Strict lookup. Accepts the canonical names in any case, with `-` in
    /// place of `_`.
    pub fn parse(name: &str) -> Option<Strategy> {
        match name.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "FIRST_MATCH" => Some(Strategy::FirstMatch),
            "HIGHEST_PRIORITY" => Some(Strategy::HighestPriority),
            "MOST_SPECIFIC" => Some(Strategy::MostSpecific),
            "RANDOM" => Some(Strategy::Random),
            _ => None,
        }
    }

    /// Lenient lookup: unknown names resolve to `FirstMatch`.
    pub fn from_name(name: &str) -> Strategy {
        Strategy::parse(name).unwrap_or_else(|| {
            tracing::warn!(strategy = name, "unknown strategy, using FIRST_MATCH");
            Strategy::FirstMatch
        })
    }
}

impl From<String> for Strategy {
    fn from(name: String) -> Self {
        Strategy::from_name(&name)
    }
}

impl From<Strategy> for String {
    fn from(strategy: Strategy) -> Self {
        strategy.as_str().to_string()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────
// Resolver
// ──────────────────────────────────────────────

/// Applies a [`Strategy`] to conflict sets.
///
/// The random source is owned by the resolver and supplied by the caller,
/// so a seeded resolver replays the same choices for the same sequence of
/// conflict sets. Strategies other than `Random` never touch it.
#[derive(Debug, Clone)]
pub struct ConflictResolver<R = StdRng> {
    strategy: Strategy,
    rng: R,
}

impl ConflictResolver<StdRng> {
    /// Resolver backed by a `StdRng` seeded with `seed`.
    pub fn seeded(strategy: Strategy, seed: u64) -> Self {
        ConflictResolver::new(strategy, StdRng::seed_from_u64(seed))
    }

    /// Resolver backed by a `StdRng` seeded from the operating system.
    pub fn from_entropy(strategy: Strategy) -> Self {
        ConflictResolver::new(strategy, StdRng::from_entropy())
    }
}

impl<R: Rng> ConflictResolver<R> {
    pub fn new(strategy: Strategy, rng: R) -> Self {
        ConflictResolver { strategy, rng }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Position in `conflict_set` of the rule to fire, or `None` if the set
    /// is empty.
    pub fn select(&mut self, conflict_set: &[&Rule]) -> Option<usize> {
        if conflict_set.is_empty() {
            return None;
        }
        let position = match self.strategy {
            Strategy::FirstMatch => 0,
            Strategy::HighestPriority => position_of_max(conflict_set, |r| r.priority()),
            Strategy::MostSpecific => position_of_max(conflict_set, |r| r.specificity()),
            Strategy::Random => self.rng.gen_range(0..conflict_set.len()),
        };
        Some(position)
    }
}

/// Position of the largest key; the earliest position wins ties.
fn position_of_max<K: Ord>(conflict_set: &[&Rule], key: impl Fn(&Rule) -> K) -> usize {
    let mut best = 0;
    let mut best_key = key(conflict_set[0]);
    for (i, &rule) in conflict_set.iter().enumerate().skip(1) {
        let k = key(rule);
        if k > best_key {
            best = i;
            best_key = k;
        }
    }
    best
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

//! Forward chaining over a shrinking rule pool.
//!
//! Each run copies the rule set into a pool of rule positions. Every pass
//! collects the applicable rules from the pool, then fires them one at a
//! time in the order the resolver picks, removing each fired rule from the
//! pool for good. The run stops as soon as the goals hold, when a pass finds
//! nothing applicable, or when the iteration cap runs out.
//!
//! Rules left in a pass's conflict set are not re-checked after an earlier
//! rule of the same pass fires; they fire even if that firing changed the
//! facts they tested.

use prodrule_core::{Rule, RuleSet, WorkingMemory};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

use crate::conflict::ConflictResolver;
use crate::trace::{fire, LogSink, TraceEvent, TraceSink};

/// Default bound on passes over the pool.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Why a forward run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Halt {
    GoalsReached,
    /// A pass began with no applicable rule in the pool.
    NoApplicableRules,
    IterationCap,
}

impl std::fmt::Display for Halt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Halt::GoalsReached => write!(f, "goals reached"),
            Halt::NoApplicableRules => write!(f, "no applicable rules"),
            Halt::IterationCap => write!(f, "iteration cap reached"),
        }
    }
}

/// A rule that fired during a forward run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FiredRule {
    /// Position of the rule in the rule set.
    pub index: usize,
    pub name: String,
    pub iteration: usize,
}

/// Outcome of a forward run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwardRun {
    pub halt: Halt,
    /// Passes started, including the last one.
    pub iterations: usize,
    /// Firings in order.
    pub fired: Vec<FiredRule>,
}

impl ForwardRun {
    pub fn goals_reached(&self) -> bool {
        self.halt == Halt::GoalsReached
    }
}

/// Whether every goal is bound to a value that is not null and, if it is
/// a boolean, is `true`. An empty goal list is satisfied.
pub fn goals_satisfied<G: AsRef<str>>(goals: &[G], memory: &WorkingMemory) -> bool {
    goals
        .iter()
        .all(|goal| memory.get(goal.as_ref()).is_some_and(|v| v.is_affirmative()))
}

/// Data-driven engine over one rule set.
pub struct ForwardChainingEngine<'a, R = StdRng> {
    rules: &'a RuleSet,
    resolver: ConflictResolver<R>,
    max_iterations: usize,
}

impl<'a, R: Rng> ForwardChainingEngine<'a, R> {
    pub fn new(rules: &'a RuleSet, resolver: ConflictResolver<R>) -> Self {
        ForwardChainingEngine {
            rules,
            resolver,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Run to completion, mutating `memory`.
    ///
    /// Goals are checked only after a firing, so a run whose first pass
    /// finds nothing applicable fails even with no goals.
    pub fn run<G, S>(&mut self, memory: &mut WorkingMemory, goals: &[G], sink: &mut S) -> ForwardRun
    where
        G: AsRef<str>,
        S: TraceSink + ?Sized,
    {
        let rules = self.rules;
        let mut pool: Vec<usize> = (0..rules.len()).collect();
        let mut fired = Vec::new();
        let mut iteration = 0;

        while iteration < self.max_iterations {
            iteration += 1;
            sink.record(TraceEvent::IterationStarted { iteration });

            let mut applicable: Vec<usize> = pool
                .iter()
                .copied()
                .filter(|&i| rules[i].is_applicable(memory))
                .collect();

            if applicable.is_empty() {
                sink.record(TraceEvent::NoApplicableRules { iteration });
                return self.finish(Halt::NoApplicableRules, iteration, fired);
            }

            while !applicable.is_empty() {
                sink.record(TraceEvent::ConflictSet {
                    size: applicable.len(),
                });
                let candidates: Vec<&Rule> = applicable.iter().map(|&i| &rules[i]).collect();
                let Some(position) = self.resolver.select(&candidates) else {
                    break;
                };

                let index = applicable.remove(position);
                pool.retain(|&i| i != index);

                let rule = &rules[index];
                fire(rule, memory, sink);
                fired.push(FiredRule {
                    index,
                    name: rule.name().to_string(),
                    iteration,
                });

                if goals_satisfied(goals, memory) {
                    sink.record(TraceEvent::GoalReached { iteration });
                    return self.finish(Halt::GoalsReached, iteration, fired);
                }
            }
        }

        sink.record(TraceEvent::IterationCapReached {
            iterations: iteration,
        });
        self.finish(Halt::IterationCap, iteration, fired)
    }

    fn finish(&self, halt: Halt, iterations: usize, fired: Vec<FiredRule>) -> ForwardRun {
        tracing::debug!(
            halt = %halt,
            iterations,
            fired = fired.len(),
            strategy = %self.resolver.strategy(),
            "forward chaining finished"
        );
        ForwardRun {
            halt,
            iterations,
            fired,
        }
    }
}

/// Forward-chain `rules` over `memory` until `goals` hold or
/// `max_iterations` passes have run. Events go to `tracing`. Returns
/// whether the goals were reached.
pub fn forward_chain<G: AsRef<str>, R: Rng>(
    memory: &mut WorkingMemory,
    rules: &RuleSet,
    goals: &[G],
    resolver: ConflictResolver<R>,
    max_iterations: usize,
) -> bool {
    ForwardChainingEngine::new(rules, resolver)
        .with_max_iterations(max_iterations)
        .run(memory, goals, &mut LogSink)
        .goals_reached()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::Strategy;
    use crate::trace::NullSink;
    use prodrule_core::Value;

    fn resolver(strategy: Strategy) -> ConflictResolver {
        ConflictResolver::seeded(strategy, 7)
    }

    fn fired_names(run: &ForwardRun) -> Vec<&str> {
        run.fired.iter().map(|f| f.name.as_str()).collect()
    }

    // -- Goals --

    #[test]
    fn goals_need_affirmative_values() {
        let mut memory = WorkingMemory::new();
        memory.set("a", "x");
        memory.set("b", false);
        memory.set("c", Value::Null);
        memory.set("d", 0);

        assert!(goals_satisfied(&["a", "d"], &memory));
        assert!(!goals_satisfied(&["a", "b"], &memory));
        assert!(!goals_satisfied(&["c"], &memory));
        assert!(!goals_satisfied(&["missing"], &memory));
        assert!(goals_satisfied::<&str>(&[], &memory));
    }

    // -- Halting --

    #[test]
    fn chains_until_goal() {
        let rules: RuleSet = vec![
            Rule::new("second").when("a", "=", true).then("b", true),
            Rule::new("first").then("a", true),
        ]
        .into_iter()
        .collect();
        let mut memory = WorkingMemory::new();
        let mut events = Vec::new();

        let run = ForwardChainingEngine::new(&rules, resolver(Strategy::FirstMatch)).run(
            &mut memory,
            &["b"],
            &mut events,
        );

        assert_eq!(run.halt, Halt::GoalsReached);
        assert_eq!(run.iterations, 2);
        assert_eq!(fired_names(&run), vec!["first", "second"]);
        assert_eq!(events.last(), Some(&TraceEvent::GoalReached { iteration: 2 }));
    }

    #[test]
    fn stops_when_nothing_applies() {
        let rules: RuleSet = vec![Rule::new("never").when("x", "=", 1).then("y", true)]
            .into_iter()
            .collect();
        let mut memory = WorkingMemory::new();

        let run = ForwardChainingEngine::new(&rules, resolver(Strategy::FirstMatch)).run(
            &mut memory,
            &["y"],
            &mut NullSink,
        );

        assert_eq!(run.halt, Halt::NoApplicableRules);
        assert_eq!(run.iterations, 1);
        assert!(run.fired.is_empty());
        assert!(memory.is_empty());
    }

    #[test]
    fn pool_exhaustion_without_goals_fails() {
        let rules: RuleSet = vec![Rule::new("a").then("x", 1), Rule::new("b").then("y", 2)]
            .into_iter()
            .collect();
        let mut memory = WorkingMemory::new();

        let run = ForwardChainingEngine::new(&rules, resolver(Strategy::FirstMatch)).run(
            &mut memory,
            &["z"],
            &mut NullSink,
        );

        assert_eq!(run.halt, Halt::NoApplicableRules);
        assert_eq!(run.iterations, 2);
        assert_eq!(fired_names(&run), vec!["a", "b"]);
        assert!(!run.goals_reached());
    }

    #[test]
    fn iteration_cap_bounds_passes() {
        // Each pass enables exactly one more rule.
        let rules: RuleSet = vec![
            Rule::new("s3").when("s2", "=", true).then("s3", true),
            Rule::new("s2").when("s1", "=", true).then("s2", true),
            Rule::new("s1").then("s1", true),
        ]
        .into_iter()
        .collect();
        let mut memory = WorkingMemory::new();
        let mut events = Vec::new();

        let run = ForwardChainingEngine::new(&rules, resolver(Strategy::FirstMatch))
            .with_max_iterations(2)
            .run(&mut memory, &["s3"], &mut events);

        assert_eq!(run.halt, Halt::IterationCap);
        assert_eq!(run.iterations, 2);
        assert_eq!(fired_names(&run), vec!["s1", "s2"]);
        assert!(!memory.has("s3"));
        assert_eq!(
            events.last(),
            Some(&TraceEvent::IterationCapReached { iterations: 2 })
        );
    }

    #[test]
    fn zero_cap_runs_nothing() {
        let rules: RuleSet = vec![Rule::new("a").then("x", 1)].into_iter().collect();
        let mut memory = WorkingMemory::new();
        let run = ForwardChainingEngine::new(&rules, resolver(Strategy::FirstMatch))
            .with_max_iterations(0)
            .run(&mut memory, &["x"], &mut NullSink);
        assert_eq!(run.halt, Halt::IterationCap);
        assert_eq!(run.iterations, 0);
        assert!(memory.is_empty());
    }

    #[test]
    fn empty_rule_set_is_a_valid_run() {
        let rules = RuleSet::new();
        let mut memory = WorkingMemory::new();
        let run = ForwardChainingEngine::new(&rules, resolver(Strategy::HighestPriority)).run(
            &mut memory,
            &["x"],
            &mut NullSink,
        );
        assert_eq!(run.halt, Halt::NoApplicableRules);
    }

    #[test]
    fn empty_goals_succeed_after_first_firing() {
        let rules: RuleSet = vec![Rule::new("a").then("x", 1), Rule::new("b").then("y", 1)]
            .into_iter()
            .collect();
        let mut memory = WorkingMemory::new();
        let run = ForwardChainingEngine::new(&rules, resolver(Strategy::FirstMatch)).run(
            &mut memory,
            &[] as &[&str],
            &mut NullSink,
        );
        assert!(run.goals_reached());
        assert_eq!(fired_names(&run), vec!["a"]);
    }

    #[test]
    fn empty_goals_with_nothing_applicable_fail() {
        let rules = RuleSet::new();
        let mut memory = WorkingMemory::new();
        let run = ForwardChainingEngine::new(&rules, resolver(Strategy::FirstMatch)).run(
            &mut memory,
            &[] as &[&str],
            &mut NullSink,
        );
        assert!(!run.goals_reached());
    }

    #[test]
    fn null_bound_facts_do_not_enable_rules() {
        let rules: RuleSet = vec![
            Rule::new("not_five").when("x", "!=", 5).then("a", true),
            Rule::new("present").when("x", "exists", Value::Null).then("b", true),
        ]
        .into_iter()
        .collect();
        let mut memory = WorkingMemory::new();
        memory.set("x", Value::Null);

        let run = ForwardChainingEngine::new(&rules, resolver(Strategy::FirstMatch)).run(
            &mut memory,
            &["a"],
            &mut NullSink,
        );

        assert_eq!(run.halt, Halt::NoApplicableRules);
        assert!(run.fired.is_empty());
        assert!(!memory.has("a"));
        assert!(!memory.has("b"));
    }

    // -- Pool semantics --

    #[test]
    fn a_rule_fires_at_most_once_even_if_reapplicable() {
        // "toggle" stays applicable forever; it must still fire only once.
        let rules: RuleSet = vec![
            Rule::new("toggle").then("n", 1),
            Rule::new("bump").when("n", "=", 1).then("m", 1),
        ]
        .into_iter()
        .collect();
        let mut memory = WorkingMemory::new();

        let run = ForwardChainingEngine::new(&rules, resolver(Strategy::FirstMatch)).run(
            &mut memory,
            &["never"],
            &mut NullSink,
        );

        assert_eq!(fired_names(&run), vec!["toggle", "bump"]);
        assert_eq!(run.halt, Halt::NoApplicableRules);
    }

    #[test]
    fn conflict_set_members_fire_without_recheck() {
        // Both rules apply in pass 1. "clear" fires first and falsifies
        // "guarded"'s condition, but "guarded" still fires in the same pass.
        let rules: RuleSet = vec![
            Rule::new("clear").with_priority(2).then("flag", false),
            Rule::new("guarded").when("flag", "=", true).then("out", true),
        ]
        .into_iter()
        .collect();
        let mut memory = WorkingMemory::new();
        memory.set("flag", true);

        let run = ForwardChainingEngine::new(&rules, resolver(Strategy::HighestPriority)).run(
            &mut memory,
            &["out"],
            &mut NullSink,
        );

        assert!(run.goals_reached());
        assert_eq!(fired_names(&run), vec!["clear", "guarded"]);
        assert_eq!(run.iterations, 1);
    }

    #[test]
    fn conflict_set_sizes_shrink_within_a_pass() {
        let rules: RuleSet = vec![
            Rule::new("a").then("x", 1),
            Rule::new("b").then("y", 1),
            Rule::new("c").then("z", 1),
        ]
        .into_iter()
        .collect();
        let mut memory = WorkingMemory::new();
        let mut events = Vec::new();

        ForwardChainingEngine::new(&rules, resolver(Strategy::FirstMatch)).run(
            &mut memory,
            &["none"],
            &mut events,
        );

        let sizes: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::ConflictSet { size } => Some(*size),
                _ => None,
            })
            .collect();
        assert_eq!(sizes, vec![3, 2, 1]);
    }

    // -- Strategies --

    #[test]
    fn highest_priority_orders_firings() {
        let rules: RuleSet = vec![
            Rule::new("low").with_priority(1).then("a", 1),
            Rule::new("high").with_priority(9).then("b", 1),
            Rule::new("mid").with_priority(5).then("c", 1),
            Rule::new("mid_late").with_priority(5).then("d", 1),
        ]
        .into_iter()
        .collect();
        let mut memory = WorkingMemory::new();

        let run = ForwardChainingEngine::new(&rules, resolver(Strategy::HighestPriority)).run(
            &mut memory,
            &["none"],
            &mut NullSink,
        );

        assert_eq!(fired_names(&run), vec!["high", "mid", "mid_late", "low"]);
    }

    #[test]
    fn most_specific_orders_firings() {
        let mut memory = WorkingMemory::new();
        memory.set("p", 1);
        memory.set("q", 1);
        let rules: RuleSet = vec![
            Rule::new("one").when("p", "=", 1).then("a", 1),
            Rule::new("two").when("p", "=", 1).when("q", "=", 1).then("b", 1),
            Rule::new("zero").then("c", 1),
        ]
        .into_iter()
        .collect();

        let run = ForwardChainingEngine::new(&rules, resolver(Strategy::MostSpecific)).run(
            &mut memory,
            &["none"],
            &mut NullSink,
        );

        assert_eq!(fired_names(&run), vec!["two", "one", "zero"]);
    }

    #[test]
    fn convenience_wrapper_reports_goal() {
        let rules: RuleSet = vec![Rule::new("a").then("x", true)].into_iter().collect();
        let mut memory = WorkingMemory::new();
        assert!(forward_chain(
            &mut memory,
            &rules,
            &["x"],
            resolver(Strategy::FirstMatch),
            DEFAULT_MAX_ITERATIONS,
        ));
        assert_eq!(memory.get("x"), Some(&Value::from(true)));
    }

    #[test]
    fn convenience_wrapper_honours_cap() {
        let rules: RuleSet = vec![
            Rule::new("a").then("x", true),
            Rule::new("b").when("x", "=", true).then("y", true),
        ]
        .into_iter()
        .collect();
        let mut memory = WorkingMemory::new();
        assert!(!forward_chain(
            &mut memory,
            &rules,
            &["y"],
            resolver(Strategy::FirstMatch),
            1,
        ));
        assert!(memory.has("x"));
        assert!(!memory.has("y"));
    }
}

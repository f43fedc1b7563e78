//! Goal-driven proof search.
//!
//! A goal holds if working memory already binds it to an affirmative value,
//! or if some rule that writes it can have every condition's fact proved in
//! turn. Proving a rule fires it. Conditions are proved by fact name alone:
//! their operators and expected values are not consulted.
//!
//! One visited set is shared across a whole [`BackwardChainingEngine::prove`]
//! call. A goal that failed in one branch is therefore reported as a cycle
//! if another branch asks for it again.

use std::collections::HashSet;

use prodrule_core::{RuleSet, WorkingMemory};

use crate::trace::{fire, LogSink, TraceEvent, TraceSink};

/// Backward chainer over one rule set.
#[derive(Debug, Clone, Copy)]
pub struct BackwardChainingEngine<'a> {
    rules: &'a RuleSet,
}

impl<'a> BackwardChainingEngine<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        BackwardChainingEngine { rules }
    }

    /// Try to establish `goal`, firing the rules of every successful proof
    /// step into `memory`.
    pub fn prove<S: TraceSink + ?Sized>(
        &self,
        memory: &mut WorkingMemory,
        goal: &str,
        sink: &mut S,
    ) -> bool {
        let mut visited = HashSet::new();
        let proved = self.prove_goal(memory, goal, &mut visited, sink);
        tracing::debug!(goal, proved, visited = visited.len(), "backward chaining finished");
        proved
    }

    fn prove_goal<S: TraceSink + ?Sized>(
        &self,
        memory: &mut WorkingMemory,
        goal: &str,
        visited: &mut HashSet<String>,
        sink: &mut S,
    ) -> bool {
        if let Some(value) = memory.get(goal) {
            sink.record(TraceEvent::GoalKnown {
                goal: goal.to_string(),
                value: value.clone(),
            });
            return value.is_affirmative();
        }

        if !visited.insert(goal.to_string()) {
            sink.record(TraceEvent::CycleDetected {
                goal: goal.to_string(),
            });
            return false;
        }

        let rules = self.rules;
        let mut producers = rules.producers_of(goal).peekable();
        if producers.peek().is_none() {
            sink.record(TraceEvent::NoProducingRule {
                goal: goal.to_string(),
            });
            return false;
        }

        for (_, rule) in producers {
            sink.record(TraceEvent::TryingRule {
                goal: goal.to_string(),
                rule: rule.name().to_string(),
            });
            let established = rule
                .conditions()
                .iter()
                .all(|condition| self.prove_goal(memory, condition.fact(), visited, sink));
            if established {
                fire(rule, memory, sink);
                return true;
            }
        }

        sink.record(TraceEvent::GoalFailed {
            goal: goal.to_string(),
        });
        false
    }
}

/// Prove `goal` against `rules`, sending events to `tracing`.
pub fn backward_chain(memory: &mut WorkingMemory, rules: &RuleSet, goal: &str) -> bool {
    BackwardChainingEngine::new(rules).prove(memory, goal, &mut LogSink)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::NullSink;
    use prodrule_core::{Rule, Value};

    fn rules(list: Vec<Rule>) -> RuleSet {
        list.into_iter().collect()
    }

    #[test]
    fn known_goals_answer_from_memory() {
        let set = RuleSet::new();
        let engine = BackwardChainingEngine::new(&set);
        let mut memory = WorkingMemory::new();
        memory.set("yes", true);
        memory.set("no", false);
        memory.set("text", "x");
        memory.set("nothing", Value::Null);

        assert!(engine.prove(&mut memory, "yes", &mut NullSink));
        assert!(engine.prove(&mut memory, "text", &mut NullSink));
        assert!(!engine.prove(&mut memory, "no", &mut NullSink));
        assert!(!engine.prove(&mut memory, "nothing", &mut NullSink));
    }

    #[test]
    fn null_goal_is_not_re_derived() {
        // A present null short-circuits even when a rule could produce it.
        let set = rules(vec![Rule::new("make").then("g", true)]);
        let mut memory = WorkingMemory::new();
        memory.set("g", Value::Null);

        assert!(!backward_chain(&mut memory, &set, "g"));
        assert_eq!(memory.get("g"), Some(&Value::Null));
    }

    #[test]
    fn absent_goal_without_producer_fails() {
        let set = rules(vec![Rule::new("other").then("x", true)]);
        let mut memory = WorkingMemory::new();
        let mut events = Vec::new();

        assert!(!BackwardChainingEngine::new(&set).prove(&mut memory, "g", &mut events));
        assert_eq!(
            events,
            vec![TraceEvent::NoProducingRule {
                goal: "g".to_string()
            }]
        );
    }

    #[test]
    fn proof_fires_rules_bottom_up() {
        let set = rules(vec![
            Rule::new("top").when("mid", "=", true).then("goal", "done"),
            Rule::new("middle").when("base", "=", 1).then("mid", true),
        ]);
        let mut memory = WorkingMemory::new();
        memory.set("base", 1);

        assert!(backward_chain(&mut memory, &set, "goal"));
        assert_eq!(memory.get("mid"), Some(&Value::from(true)));
        assert_eq!(memory.get("goal"), Some(&Value::from("done")));
    }

    #[test]
    fn operators_and_values_are_ignored() {
        // The condition asks for base > 100, but presence is enough.
        let set = rules(vec![Rule::new("loose").when("base", ">", 100).then("g", true)]);
        let mut memory = WorkingMemory::new();
        memory.set("base", 1);

        assert!(backward_chain(&mut memory, &set, "g"));
        assert!(!set[0].is_applicable(&memory));
    }

    #[test]
    fn later_producers_are_tried_after_failures() {
        let set = rules(vec![
            Rule::new("blocked").when("missing", "exists", Value::Null).then("g", 1),
            Rule::new("open").then("g", 2),
        ]);
        let mut memory = WorkingMemory::new();

        assert!(backward_chain(&mut memory, &set, "g"));
        assert_eq!(memory.get("g"), Some(&Value::from(2)));
    }

    #[test]
    fn cycles_fail() {
        let set = rules(vec![
            Rule::new("a_from_b").when("b", "=", true).then("a", true),
            Rule::new("b_from_a").when("a", "=", true).then("b", true),
        ]);
        let mut memory = WorkingMemory::new();
        let mut events = Vec::new();

        assert!(!BackwardChainingEngine::new(&set).prove(&mut memory, "a", &mut events));
        assert!(events.contains(&TraceEvent::CycleDetected {
            goal: "a".to_string()
        }));
        assert!(memory.is_empty());
    }

    #[test]
    fn visited_set_is_shared_between_branches() {
        // "shared" fails under the first producer of g; when the second
        // producer asks again it is reported as a cycle, not retried.
        let set = rules(vec![
            Rule::new("first")
                .when("shared", "exists", Value::Null)
                .when("absent", "exists", Value::Null)
                .then("g", 1),
            Rule::new("second").when("shared", "exists", Value::Null).then("g", 2),
            Rule::new("make_shared").when("absent", "exists", Value::Null).then("shared", true),
        ]);
        let mut memory = WorkingMemory::new();
        let mut events = Vec::new();

        assert!(!BackwardChainingEngine::new(&set).prove(&mut memory, "g", &mut events));
        assert!(events.contains(&TraceEvent::CycleDetected {
            goal: "shared".to_string()
        }));
    }

    #[test]
    fn each_call_starts_fresh() {
        let set = rules(vec![Rule::new("make").when("seed", "=", 1).then("g", true)]);
        let engine = BackwardChainingEngine::new(&set);
        let mut memory = WorkingMemory::new();

        assert!(!engine.prove(&mut memory, "g", &mut NullSink));
        memory.set("seed", 1);
        assert!(engine.prove(&mut memory, "g", &mut NullSink));
    }
}

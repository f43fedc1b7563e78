//! Actions, rules and rule sets.

use serde::{Deserialize, Serialize};

use crate::condition::{Condition, Operator};
use crate::memory::WorkingMemory;
use crate::value::Value;

// ──────────────────────────────────────────────
// Actions
// ──────────────────────────────────────────────

/// Unconditional assignment of a value to a fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    fact: String,
    value: Value,
}

impl Action {
    pub fn new(fact: impl Into<String>, value: impl Into<Value>) -> Self {
        Action {
            fact: fact.into(),
            value: value.into(),
        }
    }

    /// Name of the fact this action writes.
    pub fn fact(&self) -> &str {
        &self.fact
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Overwrite the fact in `memory`. Always succeeds.
    pub fn apply(&self, memory: &mut WorkingMemory) {
        memory.set(self.fact.clone(), self.value.clone());
    }
}

// ──────────────────────────────────────────────
// Rules
// ──────────────────────────────────────────────

/// A production rule: when every condition holds, apply every action.
///
/// The name is a label for tracing only and need not be unique. An empty
/// condition list makes the rule always applicable.
///
/// In knowledge-base files conditions are listed under `"when"` and
/// actions under `"then"`; `priority` defaults to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    name: String,
    #[serde(default)]
    priority: i32,
    #[serde(default, rename = "when")]
    conditions: Vec<Condition>,
    #[serde(default, rename = "then")]
    actions: Vec<Action>,
}

impl Rule {
    /// Start a rule with no conditions, no actions and priority 0.
    pub fn new(name: impl Into<String>) -> Self {
        Rule {
            name: name.into(),
            priority: 0,
            conditions: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Append a condition.
    pub fn when(
        mut self,
        fact: impl Into<String>,
        op: impl Into<Operator>,
        value: impl Into<Value>,
    ) -> Self {
        self.conditions.push(Condition::new(fact, op, value));
        self
    }

    /// Append an action.
    pub fn then(mut self, fact: impl Into<String>, value: impl Into<Value>) -> Self {
        self.actions.push(Action::new(fact, value));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Larger is preferred.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Number of conditions.
    pub fn specificity(&self) -> usize {
        self.conditions.len()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Whether every condition holds, checked in order and stopping at the
    /// first that does not.
    pub fn is_applicable(&self, memory: &WorkingMemory) -> bool {
        self.conditions.iter().all(|c| c.evaluate(memory))
    }

    /// Whether any action of this rule writes `fact`.
    pub fn produces(&self, fact: &str) -> bool {
        self.actions.iter().any(|a| a.fact == fact)
    }
}

// ──────────────────────────────────────────────
// Rule sets
// ──────────────────────────────────────────────

/// Rules in insertion order. Order is significant: it is the first-match
/// order and the tie-break order for conflict resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(Vec<Rule>);

impl RuleSet {
    pub fn new() -> Self {
        RuleSet(Vec::new())
    }

    /// Append a rule. Duplicates are kept.
    pub fn add(&mut self, rule: Rule) {
        self.0.push(rule);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }

    /// Rules with an action writing `fact`, with their positions, in set
    /// order.
    pub fn producers_of<'a>(&'a self, fact: &'a str) -> impl Iterator<Item = (usize, &'a Rule)> {
        self.0
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.produces(fact))
    }
}

impl std::ops::Index<usize> for RuleSet {
    type Output = Rule;

    fn index(&self, index: usize) -> &Rule {
        &self.0[index]
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        RuleSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

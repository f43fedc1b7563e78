//! Condition operators and their evaluation against working memory.

use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::memory::WorkingMemory;
use crate::value::Value;

// ──────────────────────────────────────────────
// Operators
// ──────────────────────────────────────────────

/// Comparison operator of a [`Condition`].
///
/// Written in knowledge-base files by its symbol (`"="`, `">="`, `"in"`,
/// `"startsWith"`, ...). A symbol outside the known set is kept as
/// [`Operator::Other`]; conditions using it never hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    In,
    Contains,
    StartsWith,
    EndsWith,
    Matches,
    Exists,
    NotExists,
    Other(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::In => "in",
            Operator::Contains => "contains",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::Matches => "matches",
            Operator::Exists => "exists",
            Operator::NotExists => "not_exists",
            Operator::Other(s) => s,
        }
    }
}

impl From<&str> for Operator {
    fn from(s: &str) -> Self {
        match s {
            "=" => Operator::Eq,
            "!=" => Operator::Ne,
            ">" => Operator::Gt,
            "<" => Operator::Lt,
            ">=" => Operator::Ge,
            "<=" => Operator::Le,
            "in" => Operator::In,
            "contains" => Operator::Contains,
            "startsWith" => Operator::StartsWith,
            "endsWith" => Operator::EndsWith,
            "matches" => Operator::Matches,
            "exists" => Operator::Exists,
            "not_exists" => Operator::NotExists,
            other => Operator::Other(other.to_string()),
        }
    }
}

impl From<String> for Operator {
    fn from(s: String) -> Self {
        Operator::from(s.as_str())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────
// Conditions
// ──────────────────────────────────────────────

/// A test of one fact against an expected value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    fact: String,
    op: Operator,
    /// Omitted for `exists` / `not_exists`, which ignore it.
    #[serde(default)]
    value: Value,
    /// Compiled `matches` pattern, built on first use. `None` inside means
    /// the pattern does not compile.
    #[serde(skip)]
    pattern: OnceLock<Option<Regex>>,
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.fact == other.fact && self.op == other.op && self.value == other.value
    }
}

impl Condition {
    pub fn new(fact: impl Into<String>, op: impl Into<Operator>, value: impl Into<Value>) -> Self {
        Condition {
            fact: fact.into(),
            op: op.into(),
            value: value.into(),
            pattern: OnceLock::new(),
        }
    }

    /// Name of the fact this condition tests.
    pub fn fact(&self) -> &str {
        &self.fact
    }

    pub fn op(&self) -> &Operator {
        &self.op
    }

    pub fn expected(&self) -> &Value {
        &self.value
    }

    /// Evaluate against `memory`.
    ///
    /// A fact that is absent or bound to null fails every operator. The
    /// presence check runs first, so `exists` is always true and
    /// `not_exists` always false once it is passed.
    pub fn evaluate(&self, memory: &WorkingMemory) -> bool {
        let Some(actual) = memory.get(&self.fact).filter(|v| !v.is_null()) else {
            return false;
        };
        let expected = &self.value;

        match &self.op {
            Operator::Eq => actual == expected,
            Operator::Ne => actual != expected,
            Operator::Gt => actual.compare_numeric(expected) == Ordering::Greater,
            Operator::Lt => actual.compare_numeric(expected) == Ordering::Less,
            Operator::Ge => actual.compare_numeric(expected) != Ordering::Less,
            Operator::Le => actual.compare_numeric(expected) != Ordering::Greater,
            Operator::In => expected
                .as_list()
                .is_some_and(|items| items.contains(actual)),
            Operator::Contains => match (actual, expected) {
                (Value::Text(haystack), Value::Text(needle)) => haystack.contains(needle.as_str()),
                (Value::List(items), _) => items.contains(expected),
                _ => false,
            },
            Operator::StartsWith => match (actual, expected) {
                (Value::Text(s), Value::Text(prefix)) => s.starts_with(prefix.as_str()),
                _ => false,
            },
            Operator::EndsWith => match (actual, expected) {
                (Value::Text(s), Value::Text(suffix)) => s.ends_with(suffix.as_str()),
                _ => false,
            },
            Operator::Matches => match (actual, expected) {
                (Value::Text(s), Value::Text(_)) => self.pattern().is_some_and(|re| re.is_match(s)),
                _ => false,
            },
            Operator::Exists => true,
            Operator::NotExists => false,
            Operator::Other(_) => false,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.fact, self.op, self.value)
    }
}

impl Condition {
    /// The expected value as a whole-string regex, compiled once. A pattern
    /// that fails to compile never matches.
    fn pattern(&self) -> Option<&Regex> {
        self.pattern
            .get_or_init(|| match &self.value {
                Value::Text(p) => Regex::new(&format!("^(?:{})$", p)).ok(),
                _ => None,
            })
            .as_ref()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

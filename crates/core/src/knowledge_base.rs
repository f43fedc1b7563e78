//! Knowledge-base documents: initial facts, rules and default goals.
//!
//! A knowledge base is plain input data. The engines never build one; a
//! caller loads it and hands its parts to them.
//!
//! ```json
//! {
//!   "name": "cpu advisor",
//!   "strategy": "HIGHEST_PRIORITY",
//!   "facts": { "budget": 165000 },
//!   "goals": ["cpu_recommendation"],
//!   "rules": [
//!     { "name": "threadripper", "priority": 5,
//!       "when": [ { "fact": "category", "op": "=", "value": "professional" } ],
//!       "then": [ { "fact": "cpu_recommendation", "value": "Threadripper" } ] }
//!   ]
//! }
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::KnowledgeBaseError;
use crate::memory::WorkingMemory;
use crate::rule::RuleSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub name: String,
    /// Preferred conflict-resolution strategy name, if the document names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Initial working memory.
    #[serde(default)]
    pub facts: WorkingMemory,
    /// Default goals for a forward-chaining run.
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub rules: RuleSet,
}

impl KnowledgeBase {
    pub fn from_json_str(s: &str) -> Result<Self, KnowledgeBaseError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let text = std::fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Every fact name the rules read or write, in name order.
    pub fn referenced_facts(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        for rule in &self.rules {
            names.extend(rule.conditions().iter().map(|c| c.fact()));
            names.extend(rule.actions().iter().map(|a| a.fact()));
        }
        names
    }
}

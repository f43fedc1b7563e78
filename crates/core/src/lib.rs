//! prodrule-core: data model of the production-rule engine.
//!
//! Facts, conditions, actions and rules, plus the knowledge-base document
//! format used to load them. Inference lives in `prodrule-eval`.
//!
//! # Public API
//!
//! - [`Value`] -- closed set of fact values
//! - [`WorkingMemory`] -- fact name to value store
//! - [`Condition`], [`Operator`] -- tests over a single fact
//! - [`Action`], [`Rule`], [`RuleSet`] -- productions in insertion order
//! - [`KnowledgeBase`] -- loadable bundle of facts, rules and goals

pub mod condition;
pub mod error;
pub mod knowledge_base;
pub mod memory;
pub mod rule;
pub mod value;

// ── Convenience re-exports ───────────────────────────────────────────

pub use condition::{Condition, Operator};
pub use error::KnowledgeBaseError;
pub use knowledge_base::KnowledgeBase;
pub use memory::WorkingMemory;
pub use rule::{Action, Rule, RuleSet};
pub use value::Value;

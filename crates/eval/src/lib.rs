//! Inference engines for prodrule rule sets.
//!
//! Two engines share the same facts and rules:
//!
//! - [`ForwardChainingEngine`] fires applicable rules, chosen by a
//!   [`ConflictResolver`], until a set of goals holds.
//! - [`BackwardChainingEngine`] starts from one goal and searches for
//!   rules that produce it.
//!
//! Both report their steps as [`TraceEvent`]s through a [`TraceSink`].

pub mod backward;
pub mod config;
pub mod conflict;
pub mod forward;
pub mod trace;

pub use backward::{backward_chain, BackwardChainingEngine};
pub use config::EngineConfig;
pub use conflict::{ConflictResolver, Strategy};
pub use forward::{
    forward_chain, goals_satisfied, FiredRule, ForwardChainingEngine, ForwardRun, Halt,
    DEFAULT_MAX_ITERATIONS,
};
pub use trace::{LogSink, NullSink, TraceEvent, TraceSink};

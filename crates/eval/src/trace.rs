//! Structured trace events emitted by the engines.
//!
//! The engines report what they do through a [`TraceSink`] and never format
//! output themselves. Rendering is up to the sink.

use prodrule_core::{Rule, Value, WorkingMemory};
use serde::Serialize;

/// One step of an inference run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    // Forward chaining
    /// A new pass over the rule pool began.
    IterationStarted { iteration: usize },
    /// The resolver is about to choose among `size` applicable rules.
    ConflictSet { size: usize },
    /// The pool had no applicable rule at the start of an iteration.
    NoApplicableRules { iteration: usize },
    /// All goals hold after a firing in this iteration.
    GoalReached { iteration: usize },
    /// The iteration cap ran out before the goals held.
    IterationCapReached { iterations: usize },

    // Shared
    /// A rule's actions are being applied.
    RuleFired { name: String },
    /// An action wrote a fact.
    FactSet { name: String, value: Value },

    // Backward chaining
    /// The goal is already bound in working memory.
    GoalKnown { goal: String, value: Value },
    /// The goal was met again while still being proved.
    CycleDetected { goal: String },
    /// No rule writes the goal.
    NoProducingRule { goal: String },
    /// Attempting to prove the goal through `rule`.
    TryingRule { goal: String, rule: String },
    /// Every producing rule failed.
    GoalFailed { goal: String },
}

/// Receiver of [`TraceEvent`]s.
pub trait TraceSink {
    fn record(&mut self, event: TraceEvent);
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn record(&mut self, event: TraceEvent) {
        (**self).record(event);
    }
}

/// Collects every event, in order.
impl TraceSink for Vec<TraceEvent> {
    fn record(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn record(&mut self, _event: TraceEvent) {}
}

/// Forwards events to `tracing`: rule firings and run outcomes at `debug`,
/// everything else at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn record(&mut self, event: TraceEvent) {
        match &event {
            TraceEvent::RuleFired { name } => tracing::debug!(rule = %name, "rule fired"),
            TraceEvent::GoalReached { iteration } => {
                tracing::debug!(iteration, "goals reached")
            }
            TraceEvent::NoApplicableRules { iteration } => {
                tracing::debug!(iteration, "no applicable rules")
            }
            TraceEvent::IterationCapReached { iterations } => {
                tracing::debug!(iterations, "iteration cap reached")
            }
            TraceEvent::CycleDetected { goal } => tracing::debug!(goal = %goal, "cycle detected"),
            TraceEvent::FactSet { name, value } => {
                tracing::trace!(fact = %name, value = %value, "fact set")
            }
            other => tracing::trace!(event = ?other),
        }
    }
}

/// Apply every action of `rule` in order, reporting the firing and each
/// write.
pub(crate) fn fire<S: TraceSink + ?Sized>(rule: &Rule, memory: &mut WorkingMemory, sink: &mut S) {
    sink.record(TraceEvent::RuleFired {
        name: rule.name().to_string(),
    });
    for action in rule.actions() {
        action.apply(memory);
        sink.record(TraceEvent::FactSet {
            name: action.fact().to_string(),
            value: action.value().clone(),
        });
    }
}

use std::path::Path;
use std::process;

use prodrule_core::{KnowledgeBase, WorkingMemory};
use prodrule_eval::{BackwardChainingEngine, LogSink, TraceEvent, TraceSink};

use super::{apply_assignments_or_exit, load_kb_or_exit, print_json, EXIT_GOALS_UNMET};
use crate::render;
use crate::OutputFormat;

pub(crate) struct BackwardOutcome {
    pub proved: bool,
    pub memory: WorkingMemory,
    pub events: Vec<TraceEvent>,
}

pub(crate) fn run_backward(
    kb: &KnowledgeBase,
    mut memory: WorkingMemory,
    goal: &str,
    trace: bool,
) -> BackwardOutcome {
    let mut events: Vec<TraceEvent> = Vec::new();
    let mut log = LogSink;
    let sink: &mut dyn TraceSink = if trace { &mut events } else { &mut log };
    let proved = BackwardChainingEngine::new(&kb.rules).prove(&mut memory, goal, sink);
    BackwardOutcome {
        proved,
        memory,
        events,
    }
}

pub(crate) fn backward_json(
    kb: &KnowledgeBase,
    goal: &str,
    outcome: &BackwardOutcome,
) -> serde_json::Value {
    let mut json = serde_json::json!({
        "knowledge_base": kb.name,
        "goal": goal,
        "proved": outcome.proved,
        "value": outcome.memory.get(goal),
        "memory": outcome.memory,
    });
    if !outcome.events.is_empty() {
        json["trace"] = serde_json::json!(outcome.events);
    }
    json
}

pub(crate) fn print_backward_text(goal: &str, outcome: &BackwardOutcome) {
    render::print_trace(&outcome.events);
    match (outcome.proved, outcome.memory.get(goal)) {
        (true, Some(value)) => println!("proved '{}' = {}", goal, value),
        (true, None) => println!("proved '{}'", goal),
        (false, _) => println!("could not prove '{}'", goal),
    }
    render::print_memory(&outcome.memory);
}

pub(crate) fn cmd_backward(
    kb_path: &Path,
    goal: &str,
    assignments: &[String],
    trace: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let kb = load_kb_or_exit(kb_path, output, quiet);
    let mut memory = kb.facts.clone();
    apply_assignments_or_exit(&mut memory, assignments, output, quiet);

    let outcome = run_backward(&kb, memory, goal, trace);

    if !quiet {
        match output {
            OutputFormat::Json => print_json(&backward_json(&kb, goal, &outcome)),
            OutputFormat::Text => print_backward_text(goal, &outcome),
        }
    }

    if !outcome.proved {
        process::exit(EXIT_GOALS_UNMET);
    }
}

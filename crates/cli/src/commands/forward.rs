use std::path::{Path, PathBuf};
use std::process;

use prodrule_core::{KnowledgeBase, WorkingMemory};
use prodrule_eval::{EngineConfig, ForwardRun, LogSink, Strategy, TraceEvent, TraceSink};

use super::{apply_assignments_or_exit, load_kb_or_exit, print_json, EXIT_GOALS_UNMET};
use crate::config::{CliConfig, EngineSection};
use crate::render;
use crate::{report_error, OutputFormat};

/// Options of `prodrule forward` beyond the knowledge base path.
pub(crate) struct ForwardOptions {
    pub goals: Vec<String>,
    pub strategy: Option<String>,
    pub seed: Option<u64>,
    pub max_iterations: Option<usize>,
    pub assignments: Vec<String>,
    pub trace: bool,
    pub config: Option<PathBuf>,
}

/// A finished forward run and what it recorded.
pub(crate) struct ForwardOutcome {
    pub run: ForwardRun,
    pub memory: WorkingMemory,
    pub config: EngineConfig,
    pub events: Vec<TraceEvent>,
}

/// Forward-chain `kb`'s rules from `memory` toward `goals`. Events are kept
/// when `trace` is set and sent to the log otherwise.
pub(crate) fn run_forward(
    kb: &KnowledgeBase,
    mut memory: WorkingMemory,
    goals: &[String],
    config: EngineConfig,
    trace: bool,
) -> ForwardOutcome {
    let mut events: Vec<TraceEvent> = Vec::new();
    let mut log = LogSink;
    let sink: &mut dyn TraceSink = if trace { &mut events } else { &mut log };
    let run = config.forward(&kb.rules).run(&mut memory, goals, sink);
    ForwardOutcome {
        run,
        memory,
        config,
        events,
    }
}

pub(crate) fn forward_json(
    kb: &KnowledgeBase,
    goals: &[String],
    outcome: &ForwardOutcome,
) -> serde_json::Value {
    let mut json = serde_json::json!({
        "knowledge_base": kb.name,
        "strategy": outcome.config.strategy,
        "goals": goals,
        "goals_reached": outcome.run.goals_reached(),
        "halt": outcome.run.halt,
        "iterations": outcome.run.iterations,
        "fired": outcome.run.fired,
        "memory": outcome.memory,
    });
    if !outcome.events.is_empty() {
        json["trace"] = serde_json::json!(outcome.events);
    }
    json
}

pub(crate) fn print_forward_text(kb: &KnowledgeBase, outcome: &ForwardOutcome) {
    println!(
        "knowledge base: {} (strategy {})",
        display_name(kb),
        outcome.config.strategy
    );
    render::print_trace(&outcome.events);
    render::print_forward(&outcome.run, &outcome.memory);
}

pub(crate) fn display_name(kb: &KnowledgeBase) -> &str {
    if kb.name.is_empty() {
        "(unnamed)"
    } else {
        &kb.name
    }
}

pub(crate) fn cmd_forward(
    kb_path: &Path,
    options: ForwardOptions,
    output: OutputFormat,
    quiet: bool,
) {
    let kb = load_kb_or_exit(kb_path, output, quiet);

    let file = match options.config.as_deref() {
        Some(path) => match CliConfig::load(path) {
            Ok(config) => config.engine,
            Err(e) => {
                report_error(&format!("error: {}", e), output, quiet);
                process::exit(1);
            }
        },
        None => EngineSection::default(),
    };
    let flags = EngineSection {
        strategy: options.strategy.as_deref().map(Strategy::from_name),
        max_iterations: options.max_iterations,
        seed: options.seed,
    };
    let kb_strategy = kb.strategy.as_deref().map(Strategy::from_name);
    let config = flags.or(file).resolve(kb_strategy);

    let mut memory = kb.facts.clone();
    apply_assignments_or_exit(&mut memory, &options.assignments, output, quiet);

    let goals = if options.goals.is_empty() {
        kb.goals.clone()
    } else {
        options.goals
    };

    let outcome = run_forward(&kb, memory, &goals, config, options.trace);

    if !quiet {
        match output {
            OutputFormat::Json => print_json(&forward_json(&kb, &goals, &outcome)),
            OutputFormat::Text => print_forward_text(&kb, &outcome),
        }
    }

    if !outcome.run.goals_reached() {
        process::exit(EXIT_GOALS_UNMET);
    }
}

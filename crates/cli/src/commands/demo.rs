//! The bundled CPU advisor walkthrough.

use std::process;

use clap::ValueEnum;
use prodrule_core::{KnowledgeBase, Value};
use prodrule_eval::{EngineConfig, Strategy};

use super::backward::{backward_json, print_backward_text, run_backward};
use super::forward::{forward_json, print_forward_text, run_forward};
use super::{print_json, EXIT_GOALS_UNMET};
use crate::{report_error, OutputFormat};

const CPU_ADVISOR: &str = include_str!("../../../../kb/cpu_advisor.json");

/// Goal the backward half of the walkthrough checks.
const RECOMMENDATION: &str = "cpu_recommendation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum DemoMode {
    /// Forward chaining toward the advisor's goals only
    Forward,
    /// Backward chaining for a recommendation from the initial facts only
    Backward,
}

fn load_advisor(output: OutputFormat, quiet: bool) -> KnowledgeBase {
    match KnowledgeBase::from_json_str(CPU_ADVISOR) {
        Ok(kb) => kb,
        Err(e) => {
            let msg = format!("internal error: failed to parse embedded knowledge base: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn advisor_config(kb: &KnowledgeBase) -> EngineConfig {
    EngineConfig {
        strategy: kb
            .strategy
            .as_deref()
            .map(Strategy::from_name)
            .unwrap_or_default(),
        ..EngineConfig::default()
    }
}

pub(crate) fn cmd_demo(mode: Option<DemoMode>, trace: bool, output: OutputFormat, quiet: bool) {
    let kb = load_advisor(output, quiet);
    match mode {
        Some(DemoMode::Forward) => {
            let config = advisor_config(&kb);
            let outcome = run_forward(&kb, kb.facts.clone(), &kb.goals, config, trace);
            if !quiet {
                match output {
                    OutputFormat::Json => print_json(&forward_json(&kb, &kb.goals, &outcome)),
                    OutputFormat::Text => print_forward_text(&kb, &outcome),
                }
            }
            if !outcome.run.goals_reached() {
                process::exit(EXIT_GOALS_UNMET);
            }
        }
        Some(DemoMode::Backward) => {
            let outcome = run_backward(&kb, kb.facts.clone(), RECOMMENDATION, trace);
            if !quiet {
                match output {
                    OutputFormat::Json => {
                        print_json(&backward_json(&kb, RECOMMENDATION, &outcome))
                    }
                    OutputFormat::Text => print_backward_text(RECOMMENDATION, &outcome),
                }
            }
            if !outcome.proved {
                process::exit(EXIT_GOALS_UNMET);
            }
        }
        None => walkthrough(&kb, trace, output, quiet),
    }
}

/// Forward run, then the recommendation is reset to null and checked by
/// backward chaining. A null goal counts as failed, so the check reports
/// failure; the walkthrough still exits 0.
fn walkthrough(kb: &KnowledgeBase, trace: bool, output: OutputFormat, quiet: bool) {
    let forward = run_forward(kb, kb.facts.clone(), &kb.goals, advisor_config(kb), trace);

    let mut memory = forward.memory.clone();
    memory.set(RECOMMENDATION, Value::Null);
    let backward = run_backward(kb, memory, RECOMMENDATION, trace);

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "forward": forward_json(kb, &kb.goals, &forward),
            "backward": backward_json(kb, RECOMMENDATION, &backward),
        })),
        OutputFormat::Text => {
            println!("== forward chaining ==");
            print_forward_text(kb, &forward);
            println!();
            println!("== backward check ==");
            println!("reset {} to null", RECOMMENDATION);
            print_backward_text(RECOMMENDATION, &backward);
        }
    }
}

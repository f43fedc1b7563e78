use std::path::Path;

use prodrule_core::{KnowledgeBase, Rule};

use super::forward::display_name;
use super::{load_kb_or_exit, print_json};
use crate::OutputFormat;

fn reads(rule: &Rule) -> Vec<String> {
    rule.conditions().iter().map(|c| c.to_string()).collect()
}

fn writes(rule: &Rule) -> Vec<String> {
    rule.actions()
        .iter()
        .map(|a| format!("{} = {}", a.fact(), a.value()))
        .collect()
}

pub(crate) fn inspect_json(kb: &KnowledgeBase) -> serde_json::Value {
    let rules: Vec<serde_json::Value> = kb
        .rules
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            serde_json::json!({
                "index": index,
                "name": rule.name(),
                "priority": rule.priority(),
                "specificity": rule.specificity(),
                "when": reads(rule),
                "then": writes(rule),
            })
        })
        .collect();
    serde_json::json!({
        "name": kb.name,
        "strategy": kb.strategy,
        "goals": kb.goals,
        "facts": kb.facts,
        "referenced_facts": kb.referenced_facts(),
        "rules": rules,
    })
}

pub(crate) fn cmd_inspect(kb_path: &Path, output: OutputFormat, quiet: bool) {
    let kb = load_kb_or_exit(kb_path, output, quiet);
    if quiet {
        return;
    }

    match output {
        OutputFormat::Json => print_json(&inspect_json(&kb)),
        OutputFormat::Text => {
            println!("knowledge base: {}", display_name(&kb));
            if let Some(strategy) = &kb.strategy {
                println!("strategy: {}", strategy);
            }
            if !kb.goals.is_empty() {
                println!("goals: {}", kb.goals.join(", "));
            }
            println!("{} fact(s), {} rule(s)", kb.facts.len(), kb.rules.len());
            for (index, rule) in kb.rules.iter().enumerate() {
                println!(
                    "  [{}] {} (priority {}, specificity {})",
                    index,
                    rule.name(),
                    rule.priority(),
                    rule.specificity()
                );
                for condition in reads(rule) {
                    println!("      when {}", condition);
                }
                for action in writes(rule) {
                    println!("      then {}", action);
                }
            }
        }
    }
}

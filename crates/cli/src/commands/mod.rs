pub(crate) mod backward;
pub(crate) mod demo;
pub(crate) mod forward;
pub(crate) mod inspect;

use std::path::Path;
use std::process;

use prodrule_core::{KnowledgeBase, Value, WorkingMemory};

use crate::{report_error, OutputFormat};

/// Exit status when a run completed but its goals were not met.
pub(crate) const EXIT_GOALS_UNMET: i32 = 2;

pub(crate) fn load_kb_or_exit(path: &Path, output: OutputFormat, quiet: bool) -> KnowledgeBase {
    match KnowledgeBase::load(path) {
        Ok(kb) => kb,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

/// Parse a `name=value` fact assignment.
///
/// The value is read as JSON (`true`, `42`, `"text"`, `[1, 2]`, `null`).
/// A bare word that is not JSON is taken as text, so `task_type=work`
/// works without quoting.
pub(crate) fn parse_assignment(arg: &str) -> Result<(String, Value), String> {
    let (name, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", arg))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing fact name in '{}'", arg));
    }
    let raw = raw.trim();
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(_) if is_bare_word(raw) => Value::from(raw),
        Err(e) => return Err(format!("invalid value for '{}': {}", name, e)),
    };
    Ok((name.to_string(), value))
}

fn is_bare_word(raw: &str) -> bool {
    !raw.is_empty() && !raw.starts_with(['"', '[', '{'])
}

/// Apply `--set` assignments over `memory`, exiting on the first bad one.
pub(crate) fn apply_assignments_or_exit(
    memory: &mut WorkingMemory,
    assignments: &[String],
    output: OutputFormat,
    quiet: bool,
) {
    for arg in assignments {
        match parse_assignment(arg) {
            Ok((name, value)) => {
                memory.set(name, value);
            }
            Err(msg) => {
                report_error(&format!("error: {}", msg), output, quiet);
                process::exit(1);
            }
        }
    }
}

pub(crate) fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("serialization error: {}", e))
    );
}

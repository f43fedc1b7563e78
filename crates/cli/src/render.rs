//! Text rendering of engine output.

use prodrule_core::WorkingMemory;
use prodrule_eval::{ForwardRun, Halt, TraceEvent};

/// One line per trace event. Forward steps inside an iteration are indented.
pub(crate) fn trace_line(event: &TraceEvent) -> String {
    match event {
        TraceEvent::IterationStarted { iteration } => format!("iteration {}", iteration),
        TraceEvent::ConflictSet { size } => format!("  conflict set: {} rule(s)", size),
        TraceEvent::NoApplicableRules { .. } => "  no applicable rules".to_string(),
        TraceEvent::GoalReached { iteration } => format!("  goals reached in iteration {}", iteration),
        TraceEvent::IterationCapReached { iterations } => {
            format!("stopped after {} iteration(s)", iterations)
        }
        TraceEvent::RuleFired { name } => format!("  fire: {}", name),
        TraceEvent::FactSet { name, value } => format!("    set {} = {}", name, value),
        TraceEvent::GoalKnown { goal, value } => format!("goal '{}' is known: {}", goal, value),
        TraceEvent::CycleDetected { goal } => format!("cycle at '{}'", goal),
        TraceEvent::NoProducingRule { goal } => format!("no rule produces '{}'", goal),
        TraceEvent::TryingRule { goal, rule } => format!("trying '{}' for '{}'", rule, goal),
        TraceEvent::GoalFailed { goal } => format!("could not prove '{}'", goal),
    }
}

pub(crate) fn print_trace(events: &[TraceEvent]) {
    for event in events {
        println!("{}", trace_line(event));
    }
}

pub(crate) fn print_memory(memory: &WorkingMemory) {
    println!("working memory:");
    if memory.is_empty() {
        println!("  (empty)");
    }
    for (name, value) in memory {
        println!("  {} = {}", name, value);
    }
}

pub(crate) fn outcome_line(run: &ForwardRun) -> String {
    match run.halt {
        Halt::GoalsReached => format!("goals reached after {} iteration(s)", run.iterations),
        Halt::NoApplicableRules => format!(
            "goals not reached: no applicable rules after {} iteration(s)",
            run.iterations
        ),
        Halt::IterationCap => format!(
            "goals not reached within {} iteration(s)",
            run.iterations
        ),
    }
}

pub(crate) fn print_forward(run: &ForwardRun, memory: &WorkingMemory) {
    println!("{}", outcome_line(run));
    if !run.fired.is_empty() {
        println!("fired:");
        for (n, fired) in run.fired.iter().enumerate() {
            println!("  {}. {} (iteration {})", n + 1, fired.name, fired.iteration);
        }
    }
    print_memory(memory);
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodrule_core::Value;
    use prodrule_eval::FiredRule;

    #[test]
    fn trace_lines() {
        assert_eq!(
            trace_line(&TraceEvent::FactSet {
                name: "budget_ok".to_string(),
                value: Value::from(true)
            }),
            "    set budget_ok = true"
        );
        assert_eq!(
            trace_line(&TraceEvent::TryingRule {
                goal: "g".to_string(),
                rule: "make g".to_string()
            }),
            "trying 'make g' for 'g'"
        );
    }

    #[test]
    fn outcome_lines() {
        let run = ForwardRun {
            halt: Halt::IterationCap,
            iterations: 3,
            fired: vec![FiredRule {
                index: 0,
                name: "a".to_string(),
                iteration: 1,
            }],
        };
        assert_eq!(outcome_line(&run), "goals not reached within 3 iteration(s)");
    }
}

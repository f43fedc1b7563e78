mod commands;
mod config;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use commands::backward::cmd_backward;
use commands::demo::{cmd_demo, DemoMode};
use commands::forward::{cmd_forward, ForwardOptions};
use commands::inspect::cmd_inspect;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Production-rule inference engine.
#[derive(Parser)]
#[command(name = "prodrule", version, about = "Production-rule inference engine")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forward-chain a knowledge base toward its goals
    Forward {
        /// Path to the knowledge base JSON file
        kb: PathBuf,
        /// Goal fact; repeatable. Defaults to the knowledge base's goals
        #[arg(long = "goal")]
        goals: Vec<String>,
        /// Conflict-resolution strategy (FIRST_MATCH, HIGHEST_PRIORITY, MOST_SPECIFIC, RANDOM)
        #[arg(long)]
        strategy: Option<String>,
        /// Seed for the RANDOM strategy
        #[arg(long)]
        seed: Option<u64>,
        /// Bound on passes over the rule pool (default: 100)
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Set a fact before the run, as name=value; repeatable
        #[arg(long = "set", value_name = "NAME=VALUE")]
        assignments: Vec<String>,
        /// Print every engine step
        #[arg(long)]
        trace: bool,
        /// Path to a TOML settings file with an [engine] table
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Prove one goal by backward chaining
    Backward {
        /// Path to the knowledge base JSON file
        kb: PathBuf,
        /// Fact to prove
        goal: String,
        /// Set a fact before the proof, as name=value; repeatable
        #[arg(long = "set", value_name = "NAME=VALUE")]
        assignments: Vec<String>,
        /// Print every engine step
        #[arg(long)]
        trace: bool,
    },

    /// Run the bundled CPU advisor
    Demo {
        /// Run only one engine; without it, runs the full walkthrough
        #[arg(value_enum)]
        mode: Option<DemoMode>,
        /// Print every engine step
        #[arg(long)]
        trace: bool,
    },

    /// List a knowledge base's rules and facts
    Inspect {
        /// Path to the knowledge base JSON file
        kb: PathBuf,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Forward {
            kb,
            goals,
            strategy,
            seed,
            max_iterations,
            assignments,
            trace,
            config,
        } => {
            let options = ForwardOptions {
                goals,
                strategy,
                seed,
                max_iterations,
                assignments,
                trace,
                config,
            };
            cmd_forward(&kb, options, cli.output, cli.quiet);
        }
        Commands::Backward {
            kb,
            goal,
            assignments,
            trace,
        } => {
            cmd_backward(&kb, &goal, &assignments, trace, cli.output, cli.quiet);
        }
        Commands::Demo { mode, trace } => {
            cmd_demo(mode, trace, cli.output, cli.quiet);
        }
        Commands::Inspect { kb } => {
            cmd_inspect(&kb, cli.output, cli.quiet);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

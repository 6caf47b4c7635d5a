use std::fs;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ws_cli::runner::run_scenario;
use ws_cli::scenario::Scenario;

#[derive(Debug, Parser)]
#[command(name = "ws-cli")]
#[command(about = "WormScript batch runner")]
struct Cli {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Run a script against a JSON scenario until it completes.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    #[arg(long = "script")]
    script: String,
    #[arg(long = "scenario")]
    scenario: String,
    /// Give up after this many replenished game turns.
    #[arg(long = "max-turns", default_value_t = 1_000)]
    max_turns: usize,
    /// Abort scripts that exceed this many engine steps in one turn.
    #[arg(long = "step-limit")]
    step_limit: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Mode::Run(args) => run(args),
    }
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let source = fs::read_to_string(&args.script)
        .with_context(|| format!("reading script {}", args.script))?;
    let scenario_text = fs::read_to_string(&args.scenario)
        .with_context(|| format!("reading scenario {}", args.scenario))?;
    let scenario: Scenario = serde_json::from_str(&scenario_text)
        .with_context(|| format!("parsing scenario {}", args.scenario))?;
    let report = run_scenario(&source, &scenario, args.max_turns, args.step_limit)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

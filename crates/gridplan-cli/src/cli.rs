use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gridplan", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect scenario configuration
    Scenario {
        #[command(subcommand)]
        command: ScenarioCommands,
    },
    /// Build, solve and export every subproblem/stage of a scenario
    Run {
        /// Scenario configuration file (YAML or JSON)
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: PathBuf,
        #[arg(long)]
        scenario_id: u32,
        /// Directory holding `<subproblem>/<stage>/inputs`
        #[arg(long, value_hint = ValueHint::DirPath)]
        scenario_dir: PathBuf,
        /// LP solver backend (clarabel, highs)
        #[arg(long, default_value = "clarabel")]
        solver: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Directory to write the script into, named the way the shell
        /// expects (e.g. `gridplan.bash`, `_gridplan`); stdout when omitted
        #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScenarioCommands {
    /// Print a scenario's features, subscenarios and required modules as JSON
    Resolve {
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: PathBuf,
        #[arg(long)]
        scenario_id: u32,
    },
    /// Print a scenario's subproblems and stages as JSON
    Stages {
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: PathBuf,
        #[arg(long)]
        scenario_id: u32,
    },
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

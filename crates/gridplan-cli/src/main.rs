use clap::Parser;
use gridplan_cli::cli::{Cli, Commands};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
    }

    let result = match &cli.command {
        Commands::Scenario { command } => commands::scenario::handle(command),
        Commands::Run {
            config,
            scenario_id,
            scenario_dir,
            solver,
        } => commands::run::handle(config, *scenario_id, scenario_dir, solver),
        Commands::Completions { shell, out_dir } => {
            commands::completions::handle(*shell, out_dir.as_deref())
        }
    };

    match result {
        Ok(()) => {
            info!("command finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("command failed: {:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

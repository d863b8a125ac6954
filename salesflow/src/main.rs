// salesflow/src/main.rs

mod cli;
mod commands;
mod logging;

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;

use cli::{Cli, Commands};
use salesflow_core::infrastructure::config::{ProjectConfig, load_project_config};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 1. Load the Config (Infra)
    let config = match load_project_config(&cli.project_dir) {
        Ok(config) => config,
        Err(e) => {
            // No usable config: log next to the default location anyway.
            let defaults = ProjectConfig::default();
            let logs_dir = std::env::var("SALESFLOW_LOGS_DIR").unwrap_or(defaults.logs_dir.clone());
            let _guard = start_logging(
                &defaults.resolve(&cli.project_dir, &logs_dir),
                cli.command.log_file_name(),
            );
            tracing::error!(error = %e, project_dir = ?cli.project_dir, "Invalid project configuration");
            eprintln!("❌ Invalid project configuration: {}", e);
            return commands::failure();
        }
    };

    // 2. Setup Logging (one file per job)
    // The guard must outlive the command so buffered lines reach the file.
    let logs_dir = config.resolve(&cli.project_dir, &config.logs_dir);
    let _guard = start_logging(&logs_dir, cli.command.log_file_name());
    tracing::info!(project = %config.name, project_dir = ?cli.project_dir, "Configuration loaded");

    // 3. Dispatch
    match cli.command {
        Commands::Preprocess { input, output } => {
            commands::preprocess::execute(&cli.project_dir, &config, input, output)
        }
        Commands::Train {
            processed_dir,
            mode,
        } => commands::train::execute(
            &cli.project_dir,
            &config,
            processed_dir,
            mode.map(Into::into),
        ),
        Commands::Check { target, input } => {
            commands::check::execute(&cli.project_dir, &config, target, input)
        }
    }
}

fn start_logging(logs_dir: &Path, file_name: &str) -> Option<WorkerGuard> {
    match logging::init(logs_dir, file_name) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("⚠️  File logging disabled: {:#}", e);
            None
        }
    }
}

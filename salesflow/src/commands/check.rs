// salesflow/src/commands/check.rs
//
// USE CASE: data-quality gates, usable from CI.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::error;

use salesflow_core::application::{check_model, check_processed, check_raw};
use salesflow_core::domain::project::ProjectConfig;
use salesflow_core::infrastructure::adapters::{CsvFiles, JsonModelStore};

use crate::cli::CheckTarget;

pub fn execute(
    project_dir: &Path,
    config: &ProjectConfig,
    target: CheckTarget,
    input: Option<PathBuf>,
) -> ExitCode {
    let result = match target {
        CheckTarget::Raw => check_raw(&CsvFiles, project_dir, config, input.as_deref()),
        CheckTarget::Processed => {
            check_processed(&CsvFiles, project_dir, config, input.as_deref())
        }
        CheckTarget::Model => {
            let store = JsonModelStore::new(config.resolve(project_dir, &config.model_dir));
            check_model(&store)
        }
    };

    match result {
        Ok(report) if report.passed() => {
            println!("✅ {} check passed: {}", report.subject, report.path.display());
            ExitCode::SUCCESS
        }
        Ok(report) => {
            eprintln!("❌ {} check failed: {}", report.subject, report.path.display());
            for finding in &report.findings {
                eprintln!("   ➜ {}", finding);
            }
            super::failure()
        }
        Err(e) if e.is_not_found() => {
            error!(error = %e, "Nothing to check");
            eprintln!("❌ {}", e);
            super::missing_input()
        }
        Err(e) => {
            error!(error = %e, "Check aborted");
            eprintln!("💥 Check aborted: {}", e);
            super::failure()
        }
    }
}

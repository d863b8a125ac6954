// salesflow/src/commands/preprocess.rs
//
// USE CASE: raw sales CSV -> processed wide CSV.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use tracing::error;

use salesflow_core::application::{PreprocessRequest, run_preprocess};
use salesflow_core::domain::project::ProjectConfig;
use salesflow_core::infrastructure::adapters::CsvFiles;

pub fn execute(
    project_dir: &Path,
    config: &ProjectConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> ExitCode {
    let start = Instant::now();
    println!("🧹 Preprocessing sales data...");

    let request = PreprocessRequest { input, output };
    match run_preprocess(&CsvFiles, &CsvFiles, project_dir, config, request) {
        Ok(outcome) => {
            println!("   Input:  {}", outcome.input.display());
            println!(
                "   {} raw rows -> {} timestamps x {} models",
                outcome.raw_rows,
                outcome.rows,
                outcome.columns.len()
            );
            println!("✨ Processed CSV written to {}", outcome.output.display());
            println!("   Done in {:.2?}", start.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Preprocessing failed");
            eprintln!("\n💥 Preprocessing failed: {}", e);
            super::failure()
        }
    }
}

// salesflow/src/commands/train.rs
//
// USE CASE: latest processed CSV -> model artifact.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use comfy_table::{Table, presets::UTF8_FULL};
use tracing::error;

use salesflow_core::application::{TrainOutcome, TrainRequest, run_training};
use salesflow_core::domain::project::ProjectConfig;
use salesflow_core::domain::training::FeatureMode;
use salesflow_core::infrastructure::adapters::{CsvFiles, JsonModelStore};
use salesflow_core::ports::storage::ArtifactKind;

pub fn execute(
    project_dir: &Path,
    config: &ProjectConfig,
    processed_dir: Option<PathBuf>,
    mode: Option<FeatureMode>,
) -> ExitCode {
    let start = Instant::now();
    println!("🧠 Training sales model...");

    let store = JsonModelStore::new(config.resolve(project_dir, &config.model_dir));
    let request = TrainRequest {
        processed_dir,
        mode,
    };

    match run_training(&CsvFiles, &store, project_dir, config, request) {
        Ok(outcome) => {
            print_summary(&outcome);
            println!("   Done in {:.2?}", start.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) if e.is_not_found() => {
            error!(error = %e, "No processed data to train on");
            eprintln!("\n❌ No processed data found: {}", e);
            eprintln!("👉 Have you run 'salesflow preprocess'?");
            super::missing_input()
        }
        Err(e) => {
            error!(error = %e, "Training failed");
            eprintln!("\n💥 Training failed: {}", e);
            super::failure()
        }
    }
}

fn print_summary(outcome: &TrainOutcome) {
    let model = &outcome.model;
    println!("   Input:    {}", outcome.input.display());
    println!(
        "   Target:   {} ({} mode, {} features)",
        model.target,
        model.mode,
        model.features.len()
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["RMSE".to_string(), format!("{:.4}", model.metrics.rmse)]);
    table.add_row(vec!["MAE".to_string(), format!("{:.4}", model.metrics.mae)]);
    table.add_row(vec!["R²".to_string(), format!("{:.4}", model.metrics.r2)]);
    table.add_row(vec![
        "Rows (train / test)".to_string(),
        format!("{} / {}", model.n_train, model.n_test),
    ]);
    println!("{table}");

    match outcome.saved.kind {
        ArtifactKind::Canonical => {
            println!("✨ Canonical model saved to {}", outcome.saved.path.display())
        }
        ArtifactKind::Snapshot => println!(
            "✨ Canonical model kept, snapshot saved to {}",
            outcome.saved.path.display()
        ),
    }
}

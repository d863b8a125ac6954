// salesflow-core/src/application/train.rs
//
// USE CASE: latest processed CSV -> trained, evaluated, persisted model.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::domain::project::ProjectConfig;
use crate::domain::training::{FeatureMode, TrainedModel, infer_xy, train_and_evaluate};
use crate::error::SalesflowError;
use crate::infrastructure::discovery::latest_matching;
use crate::ports::storage::{ModelStore, SavedModel, TableSource};

#[derive(Debug, Default, Clone)]
pub struct TrainRequest {
    /// Overrides the configured processed directory.
    pub processed_dir: Option<PathBuf>,
    /// Overrides the configured feature mode.
    pub mode: Option<FeatureMode>,
}

#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub input: PathBuf,
    pub saved: SavedModel,
    pub model: TrainedModel,
}

pub fn run_training(
    source: &dyn TableSource,
    store: &dyn ModelStore,
    project_dir: &Path,
    config: &ProjectConfig,
    request: TrainRequest,
) -> Result<TrainOutcome, SalesflowError> {
    info!("=== Model training started ===");

    // 1. Locate input
    let processed_dir = request
        .processed_dir
        .unwrap_or_else(|| config.resolve(project_dir, &config.processed_dir));
    fs::create_dir_all(&processed_dir)?;
    let input = latest_matching(&processed_dir, &config.processed_pattern, None)?;
    info!(path = ?input, "Latest processed CSV");

    // 2. Load + split features/target
    let table = source.read_table(&input)?;
    let mode = request.mode.unwrap_or(config.training.mode);
    let dataset = infer_xy(&table, mode)?;
    info!(
        rows = dataset.n_rows(),
        features = dataset.feature_names.len(),
        target = %dataset.target_name,
        %mode,
        "Training dataset ready"
    );

    // 3. Train + evaluate
    let report = train_and_evaluate(&dataset, &config.training)?;
    info!(
        rmse = %format!("{:.4}", report.metrics.rmse),
        mae = %format!("{:.4}", report.metrics.mae),
        r2 = %format!("{:.4}", report.metrics.r2),
        "Metrics"
    );

    // 4. Persist
    let source_name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string());
    let model = TrainedModel::new(report, &dataset, mode, source_name, Utc::now());
    let saved = store.save(&model)?;
    info!(path = ?saved.path, kind = ?saved.kind, "=== Model training finished ===");

    Ok(TrainOutcome {
        input,
        saved,
        model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::training::GbtParams;
    use crate::infrastructure::adapters::{CsvFiles, JsonModelStore};
    use crate::ports::storage::ArtifactKind;
    use anyhow::Result;
    use tempfile::tempdir;

    fn fast_config() -> ProjectConfig {
        let mut config = ProjectConfig::default();
        config.training.booster = GbtParams {
            n_trees: 20,
            ..GbtParams::default()
        };
        config
    }

    fn write_processed(dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        let mut csv = String::from("gpu-a,gpu-b,gpu-c\n");
        for i in 0..20 {
            csv.push_str(&format!("{},{},{}\n", i * 2 + i % 3, i, i % 3));
        }
        fs::write(dir.join("sales_processed_20240101_1200.csv"), csv)?;
        Ok(())
    }

    #[test]
    fn test_first_run_canonical_second_run_snapshot() -> Result<()> {
        let project = tempdir()?;
        let config = fast_config();
        write_processed(&project.path().join("data/processed"))?;
        let store = JsonModelStore::new(project.path().join("model"));

        let first = run_training(&CsvFiles, &store, project.path(), &config, TrainRequest::default())?;
        assert_eq!(first.saved.kind, ArtifactKind::Canonical);
        assert_eq!(first.model.target, "gpu-a");
        assert_eq!(first.model.features, vec!["gpu-b", "gpu-c"]);
        assert_eq!(first.model.n_test, 4);
        let canonical = fs::read(&first.saved.path)?;

        let second = run_training(&CsvFiles, &store, project.path(), &config, TrainRequest::default())?;
        assert_eq!(second.saved.kind, ArtifactKind::Snapshot);
        assert_eq!(fs::read(&first.saved.path)?, canonical);
        Ok(())
    }

    #[test]
    fn test_empty_processed_dir_is_not_found() -> Result<()> {
        let project = tempdir()?;
        let store = JsonModelStore::new(project.path().join("model"));

        let res = run_training(
            &CsvFiles,
            &store,
            project.path(),
            &fast_config(),
            TrainRequest::default(),
        );
        assert!(res.is_err_and(|e| e.is_not_found()));
        assert!(!store.canonical_path().exists());
        Ok(())
    }

    #[test]
    fn test_request_overrides_dir_and_mode() -> Result<()> {
        let project = tempdir()?;
        let elsewhere = project.path().join("elsewhere");
        write_processed(&elsewhere)?;
        let store = JsonModelStore::new(project.path().join("model"));

        let outcome = run_training(
            &CsvFiles,
            &store,
            project.path(),
            &fast_config(),
            TrainRequest {
                processed_dir: Some(elsewhere),
                mode: Some(FeatureMode::All),
            },
        )?;
        assert_eq!(outcome.model.mode, FeatureMode::All);
        assert_eq!(outcome.model.features.len(), 3);
        Ok(())
    }
}

// salesflow-core/src/domain/training/model.rs

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::project::TrainingConfig;
use crate::domain::training::booster::GradientBoostedTrees;
use crate::domain::training::dataset::{Dataset, FeatureMode, train_test_split};
use crate::domain::training::metrics::RegressionMetrics;

pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Output of one train/evaluate cycle, before it is stamped and stored.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub booster: GradientBoostedTrees,
    pub metrics: RegressionMetrics,
    pub n_train: usize,
    pub n_test: usize,
}

/// Hold out `config.test_size` of the rows, fit the booster on the rest and
/// score it on the held-out part.
pub fn train_and_evaluate(
    dataset: &Dataset,
    config: &TrainingConfig,
) -> Result<TrainingReport, DomainError> {
    let (train, test) = train_test_split(dataset, config.test_size, config.seed)?;
    info!(
        train_rows = train.n_rows(),
        test_rows = test.n_rows(),
        features = dataset.feature_names.len(),
        "Dataset split"
    );

    let booster = GradientBoostedTrees::fit(&config.booster, &train.x, &train.y)?;
    let predictions = booster.predict(&test.x)?;
    let metrics = RegressionMetrics::evaluate(&test.y, &predictions);

    Ok(TrainingReport {
        booster,
        metrics,
        n_train: train.n_rows(),
        n_test: test.n_rows(),
    })
}

/// Persistable model artifact: the booster plus what it was trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub format_version: u32,
    pub trained_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub mode: FeatureMode,
    pub target: String,
    pub features: Vec<String>,
    pub n_train: usize,
    pub n_test: usize,
    pub metrics: RegressionMetrics,
    pub booster: GradientBoostedTrees,
}

impl TrainedModel {
    pub fn new(
        report: TrainingReport,
        dataset: &Dataset,
        mode: FeatureMode,
        source: Option<String>,
        trained_at: DateTime<Utc>,
    ) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            trained_at,
            source,
            mode,
            target: dataset.target_name.clone(),
            features: dataset.feature_names.clone(),
            n_train: report.n_train,
            n_test: report.n_test,
            metrics: report.metrics,
            booster: report.booster,
        }
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, DomainError> {
        self.booster.predict(x)
    }

    /// Consistency checks for an artifact read back from disk.
    pub fn check(&self) -> Result<(), DomainError> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(DomainError::InvalidDataset(format!(
                "unsupported model format version {} (expected {MODEL_FORMAT_VERSION})",
                self.format_version
            )));
        }
        if self.features.len() != self.booster.n_features() {
            return Err(DomainError::InvalidDataset(format!(
                "model lists {} features but its trees use {}",
                self.features.len(),
                self.booster.n_features()
            )));
        }
        self.booster.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Table;
    use crate::domain::training::{GbtParams, infer_xy};
    use anyhow::Result;

    fn linear_table() -> Table {
        // target a = 2 * b + c
        let rows: Vec<Vec<String>> = (0..30)
            .map(|i| {
                let b = i % 7;
                let c = i % 5;
                vec![(2 * b + c).to_string(), b.to_string(), c.to_string()]
            })
            .collect();
        Table::new(vec!["a".into(), "b".into(), "c".into()], rows)
    }

    fn quick_config() -> TrainingConfig {
        TrainingConfig {
            booster: GbtParams {
                n_trees: 50,
                ..GbtParams::default()
            },
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_train_and_evaluate_reports_split_and_metrics() -> Result<()> {
        let ds = infer_xy(&linear_table(), FeatureMode::First)?;
        let report = train_and_evaluate(&ds, &quick_config())?;
        assert_eq!(report.n_test, 6);
        assert_eq!(report.n_train, 24);
        assert!(report.metrics.rmse.is_finite());
        assert!(report.metrics.mae >= 0.0);
        Ok(())
    }

    #[test]
    fn test_model_artifact_round_trip() -> Result<()> {
        let ds = infer_xy(&linear_table(), FeatureMode::First)?;
        let report = train_and_evaluate(&ds, &quick_config())?;
        let model = TrainedModel::new(
            report,
            &ds,
            FeatureMode::First,
            Some("sales_processed_20240101_1200.csv".into()),
            Utc::now(),
        );
        assert_eq!(model.target, "a");
        assert_eq!(model.features, vec!["b", "c"]);

        let json = serde_json::to_string_pretty(&model)?;
        let back: TrainedModel = serde_json::from_str(&json)?;
        back.check()?;
        assert_eq!(back.mode, FeatureMode::First);
        assert_eq!(back.predict(&ds.x)?.len(), ds.n_rows());
        Ok(())
    }

    #[test]
    fn test_check_rejects_foreign_version() -> Result<()> {
        let ds = infer_xy(&linear_table(), FeatureMode::First)?;
        let report = train_and_evaluate(&ds, &quick_config())?;
        let mut model = TrainedModel::new(report, &ds, FeatureMode::First, None, Utc::now());
        model.format_version = 99;
        assert!(model.check().is_err());
        Ok(())
    }
}

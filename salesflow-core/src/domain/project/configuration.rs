// src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::domain::training::{FeatureMode, GbtParams};

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_raw_dir")]
    pub raw_dir: String,

    #[validate(length(min = 1, message = "raw-pattern cannot be empty"))]
    #[serde(default = "default_raw_pattern")]
    pub raw_pattern: String,

    /// File inside `raw-dir` used when nothing matches `raw-pattern`.
    #[serde(default = "default_raw_fallback")]
    pub raw_fallback: Option<String>,

    #[serde(default = "default_processed_dir")]
    pub processed_dir: String,

    #[validate(length(min = 1, message = "processed-pattern cannot be empty"))]
    #[serde(default = "default_processed_pattern")]
    pub processed_pattern: String,

    #[serde(default = "default_model_dir")]
    pub model_dir: String,

    #[serde(default = "default_logs_dir")]
    pub logs_dir: String,

    #[validate(nested)]
    #[serde(default)]
    pub training: TrainingConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            raw_dir: default_raw_dir(),
            raw_pattern: default_raw_pattern(),
            raw_fallback: default_raw_fallback(),
            processed_dir: default_processed_dir(),
            processed_pattern: default_processed_pattern(),
            model_dir: default_model_dir(),
            logs_dir: default_logs_dir(),
            training: TrainingConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Anchors a configured directory on the project root (absolute paths win).
    pub fn resolve(&self, project_dir: &Path, configured: &str) -> PathBuf {
        let p = Path::new(configured);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            project_dir.join(p)
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct TrainingConfig {
    pub mode: FeatureMode,

    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    pub test_size: f64,

    /// Seed of the train/test shuffle (the booster has its own).
    pub seed: u64,

    #[validate(nested)]
    pub booster: GbtParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            mode: FeatureMode::First,
            test_size: 0.2,
            seed: 42,
            booster: GbtParams::default(),
        }
    }
}

fn default_name() -> String {
    "salesflow".to_string()
}
fn default_raw_dir() -> String {
    "data/raw".to_string()
}
fn default_raw_pattern() -> String {
    "sales_*.csv".to_string()
}
fn default_raw_fallback() -> Option<String> {
    Some("sales.csv".to_string())
}
fn default_processed_dir() -> String {
    "data/processed".to_string()
}
fn default_processed_pattern() -> String {
    "sales_processed_*.csv".to_string()
}
fn default_model_dir() -> String {
    "model".to_string()
}
fn default_logs_dir() -> String {
    "logs".to_string()
}

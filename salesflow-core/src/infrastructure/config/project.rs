// salesflow-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::configuration::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["salesflow_project_conf.yaml", "salesflow.yaml"];

// --- LOADER ---

/// Loads `salesflow.yaml` (if any) from the project dir, validates it and
/// applies `SALESFLOW_*` environment overrides. No file means defaults.
#[instrument]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let mut config = match find_main_config(project_dir) {
        Some(config_path) => {
            info!(path = ?config_path, "Loading project configuration");
            let content = fs::read_to_string(&config_path)?;
            parse_project_config(&content)?
        }
        None => {
            info!("No project configuration file, using defaults");
            ProjectConfig::default()
        }
    };

    // Override via Variables d'Environnement (Pattern 'Layering')
    // Permet de faire: SALESFLOW_MODEL_DIR=/tmp/models salesflow train
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

pub fn parse_project_config(content: &str) -> Result<ProjectConfig, InfrastructureError> {
    // An empty document deserializes to unit, not to an all-default struct
    if content.trim().is_empty() {
        return Ok(ProjectConfig::default());
    }
    let config: ProjectConfig = serde_yaml::from_str(content)?;
    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;
    Ok(config)
}

fn find_main_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.is_file())
}

fn apply_env_overrides<F>(config: &mut ProjectConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let targets: [(&str, &mut String); 4] = [
        ("SALESFLOW_RAW_DIR", &mut config.raw_dir),
        ("SALESFLOW_PROCESSED_DIR", &mut config.processed_dir),
        ("SALESFLOW_MODEL_DIR", &mut config.model_dir),
        ("SALESFLOW_LOGS_DIR", &mut config.logs_dir),
    ];
    for (key, slot) in targets {
        if let Some(val) = lookup(key) {
            info!(key, old = %slot, new = %val, "Overriding directory via ENV");
            *slot = val;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::training::FeatureMode;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() -> Result<()> {
        let dir = tempdir()?;
        let config = load_project_config(dir.path())?;
        assert_eq!(config.raw_dir, "data/raw");
        assert_eq!(config.raw_pattern, "sales_*.csv");
        assert_eq!(config.raw_fallback.as_deref(), Some("sales.csv"));
        assert_eq!(config.processed_dir, "data/processed");
        assert_eq!(config.processed_pattern, "sales_processed_*.csv");
        assert_eq!(config.model_dir, "model");
        assert_eq!(config.logs_dir, "logs");
        assert_eq!(config.training.mode, FeatureMode::First);
        assert_eq!(config.training.test_size, 0.2);
        assert_eq!(config.training.booster.n_trees, 300);
        Ok(())
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() -> Result<()> {
        let config = parse_project_config(
            "name: gpu-sales\nmodel-dir: artifacts\ntraining:\n  mode: all\n  booster:\n    n-trees: 50\n",
        )?;
        assert_eq!(config.name, "gpu-sales");
        assert_eq!(config.model_dir, "artifacts");
        assert_eq!(config.processed_dir, "data/processed");
        assert_eq!(config.training.mode, FeatureMode::All);
        assert_eq!(config.training.booster.n_trees, 50);
        assert_eq!(config.training.booster.max_depth, 6);
        Ok(())
    }

    #[test]
    fn test_file_is_discovered() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("salesflow.yaml"), "logs-dir: var/log\n")?;
        let config = load_project_config(dir.path())?;
        assert_eq!(config.logs_dir, "var/log");
        Ok(())
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let res = parse_project_config("training:\n  test-size: 1.5\n");
        assert!(matches!(res, Err(InfrastructureError::ConfigError(_))));

        let res = parse_project_config("training:\n  booster:\n    subsample: 0.0\n");
        assert!(matches!(res, Err(InfrastructureError::ConfigError(_))));

        let res = parse_project_config("training: [not, a, map]\n");
        assert!(matches!(res, Err(InfrastructureError::YamlError(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ProjectConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            "SALESFLOW_MODEL_DIR" => Some("/srv/models".to_string()),
            _ => None,
        });
        assert_eq!(config.model_dir, "/srv/models");
        assert_eq!(config.raw_dir, "data/raw");
    }
}

// salesflow-core/src/infrastructure/adapters/model_store.rs

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{info, instrument, warn};

use crate::domain::training::TrainedModel;
use crate::error::SalesflowError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, atomic_write_new};
use crate::ports::storage::{ArtifactKind, ModelStore, SavedModel};

pub const CANONICAL_MODEL_FILE: &str = "model.json";

/// Models as pretty JSON files in one directory: `model.json` for the first
/// model ever trained, `model_YYYYMMDD_HHMM.json` for every later one.
pub struct JsonModelStore {
    dir: PathBuf,
}

impl JsonModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn snapshot_path(&self, at: NaiveDateTime) -> PathBuf {
        self.dir.join(format!("model_{}.json", at.format("%Y%m%d_%H%M")))
    }

    /// [`ModelStore::save`] with an explicit clock.
    pub fn save_at(
        &self,
        model: &TrainedModel,
        at: NaiveDateTime,
    ) -> Result<SavedModel, SalesflowError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec_pretty(model).map_err(InfrastructureError::Json)?;

        let canonical = self.canonical_path();
        if !canonical.exists() {
            if atomic_write_new(&canonical, &json)? {
                info!(path = ?canonical, "Canonical model written");
                return Ok(SavedModel {
                    path: canonical,
                    kind: ArtifactKind::Canonical,
                });
            }
            warn!(path = ?canonical, "Canonical model appeared concurrently, writing a snapshot");
        }

        let snapshot = self.snapshot_path(at);
        atomic_write(&snapshot, &json)?;
        info!(path = ?snapshot, "Model snapshot written");
        Ok(SavedModel {
            path: snapshot,
            kind: ArtifactKind::Snapshot,
        })
    }
}

impl ModelStore for JsonModelStore {
    #[instrument(skip(self, model), fields(dir = ?self.dir))]
    fn save(&self, model: &TrainedModel) -> Result<SavedModel, SalesflowError> {
        self.save_at(model, Local::now().naive_local())
    }

    fn canonical_path(&self) -> PathBuf {
        self.dir.join(CANONICAL_MODEL_FILE)
    }

    fn load(&self, path: &Path) -> Result<TrainedModel, SalesflowError> {
        let bytes = fs::read(path)?;
        let model: TrainedModel = serde_json::from_slice(&bytes)
            .map_err(InfrastructureError::Json)?;
        model.check()?;
        Ok(model)
    }
}

// salesflow-core/src/ports/storage.rs

// What the use cases need from storage, without knowing it is CSV or JSON on disk.

use std::path::{Path, PathBuf};

use crate::domain::sales::WideTable;
use crate::domain::table::Table;
use crate::domain::training::TrainedModel;
use crate::error::SalesflowError;

pub trait TableSource {
    fn read_table(&self, path: &Path) -> Result<Table, SalesflowError>;
}

pub trait TableSink {
    fn write_wide(&self, path: &Path, table: &WideTable) -> Result<(), SalesflowError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// First model ever stored; never overwritten afterwards.
    Canonical,
    /// Timestamped copy written once a canonical artifact exists.
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedModel {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

pub trait ModelStore {
    fn save(&self, model: &TrainedModel) -> Result<SavedModel, SalesflowError>;

    fn canonical_path(&self) -> PathBuf;

    fn load(&self, path: &Path) -> Result<TrainedModel, SalesflowError>;
}

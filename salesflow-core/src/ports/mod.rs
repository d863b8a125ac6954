// salesflow-core/src/ports/mod.rs

pub mod storage;

pub use storage::{ArtifactKind, ModelStore, SavedModel, TableSink, TableSource};

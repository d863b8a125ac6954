pub mod project;

pub use crate::domain::project::{ProjectConfig, TrainingConfig};
pub use project::{load_project_config, parse_project_config};

// salesflow-core/src/domain/training/mod.rs

pub mod booster;
pub mod dataset;
pub mod metrics;
pub mod model;

pub use booster::{GbtParams, GradientBoostedTrees, Objective};
pub use dataset::{Dataset, FeatureMode, infer_xy, train_test_split};
pub use metrics::RegressionMetrics;
pub use model::{TrainedModel, TrainingReport, train_and_evaluate};

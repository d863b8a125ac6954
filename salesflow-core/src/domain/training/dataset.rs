// salesflow-core/src/domain/training/dataset.rs

use std::fmt;

use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::error::DomainError;
use crate::domain::table::Table;

/// How the regression target is derived from the processed table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureMode {
    /// Target = first numeric column, features = the other numeric columns.
    #[default]
    First,
    /// Target = row sum of every numeric column, features = every numeric column.
    All,
}

impl fmt::Display for FeatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureMode::First => write!(f, "first"),
            FeatureMode::All => write!(f, "all"),
        }
    }
}

/// Feature matrix and target vector ready for the booster.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub target_name: String,
    pub x: Array2<f64>,
    pub y: Array1<f64>,
}

impl Dataset {
    pub fn n_rows(&self) -> usize {
        self.y.len()
    }

    fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            target_name: self.target_name.clone(),
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
        }
    }
}

/// A column is numeric when every non-blank cell parses as a number.
/// Blank and non-finite cells read as 0.
fn numeric_column(table: &Table, index: usize) -> Option<Vec<f64>> {
    let mut values = Vec::with_capacity(table.len());
    for cell in table.column(index) {
        let cell = cell.trim();
        if cell.is_empty() {
            values.push(0.0);
            continue;
        }
        let v: f64 = cell.parse().ok()?;
        values.push(if v.is_finite() { v } else { 0.0 });
    }
    Some(values)
}

/// Splits a processed table into features and target according to `mode`.
pub fn infer_xy(table: &Table, mode: FeatureMode) -> Result<Dataset, DomainError> {
    let mut names = Vec::new();
    let mut columns = Vec::new();
    for (i, header) in table.headers.iter().enumerate() {
        match numeric_column(table, i) {
            Some(values) => {
                names.push(header.trim().to_string());
                columns.push(values);
            }
            None => debug!(column = %header, "Skipping non-numeric column"),
        }
    }

    if columns.is_empty() {
        return Err(DomainError::InvalidDataset(
            "no numeric column in processed table".into(),
        ));
    }

    let n_rows = table.len();

    let (target_name, y, feature_names, features) = match mode {
        FeatureMode::First => {
            let target = columns.remove(0);
            let target_name = names.remove(0);
            if columns.is_empty() {
                return Err(DomainError::InvalidDataset(format!(
                    "mode 'first' needs at least one feature column besides target '{target_name}'"
                )));
            }
            (target_name, Array1::from(target), names, columns)
        }
        FeatureMode::All => {
            warn!(
                "Feature mode 'all' builds the target as the sum of the feature columns: \
                 the model sees its own target (leakage), metrics will be optimistic"
            );
            let y = Array1::from_shape_fn(n_rows, |r| columns.iter().map(|c| c[r]).sum::<f64>());
            ("sum(all)".to_string(), y, names, columns)
        }
    };

    let x = Array2::from_shape_fn((n_rows, features.len()), |(r, c)| features[c][r]);

    Ok(Dataset {
        feature_names,
        target_name,
        x,
        y,
    })
}

/// Random hold-out split: `ceil(n * test_size)` rows go to the test side.
/// Returns `(train, test)`.
pub fn train_test_split(
    dataset: &Dataset,
    test_size: f64,
    seed: u64,
) -> Result<(Dataset, Dataset), DomainError> {
    let n = dataset.n_rows();
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(DomainError::InvalidDataset(format!(
            "cannot split {n} rows with test size {test_size}: both sides need at least one row"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    Ok((dataset.select_rows(train_idx), dataset.select_rows(test_idx)))
}

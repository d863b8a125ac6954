// salesflow-core/src/domain/training/metrics.rs

use ndarray::Array1;
use serde::{Deserialize, Deserializer, Serialize};

/// Hold-out evaluation of a regressor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub rmse: f64,
    pub mae: f64,
    /// `NaN` when undefined (fewer than two samples); stored as `null`.
    #[serde(deserialize_with = "nan_if_null")]
    pub r2: f64,
}

fn nan_if_null<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
}

impl RegressionMetrics {
    /// Callers guarantee equal, non-zero lengths.
    pub fn evaluate(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let n = y_true.len() as f64;
        let residuals = y_true - y_pred;

        let mse = residuals.mapv(|r| r * r).sum() / n;
        let mae = residuals.mapv(f64::abs).sum() / n;

        let r2 = if y_true.len() < 2 {
            f64::NAN
        } else {
            let mean = y_true.sum() / n;
            let ss_tot = y_true.mapv(|t| (t - mean).powi(2)).sum();
            let ss_res = residuals.mapv(|r| r * r).sum();
            if ss_tot == 0.0 {
                // Constant truth: perfect fit scores 1, anything else 0
                if ss_res == 0.0 { 1.0 } else { 0.0 }
            } else {
                1.0 - ss_res / ss_tot
            }
        };

        Self {
            rmse: mse.sqrt(),
            mae,
            r2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_prediction() {
        let y = array![1.0, 2.0, 3.0];
        let m = RegressionMetrics::evaluate(&y, &y);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.r2, 1.0);
    }

    #[test]
    fn test_known_values() {
        let y = array![1.0, 2.0, 3.0, 4.0];
        let p = array![2.0, 2.0, 3.0, 2.0];
        let m = RegressionMetrics::evaluate(&y, &p);
        // residuals: -1, 0, 0, 2 -> mse 5/4, mae 3/4, ss_tot 5
        assert!((m.rmse - 1.25f64.sqrt()).abs() < 1e-12);
        assert!((m.mae - 0.75).abs() < 1e-12);
        assert!(m.r2.abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_r2() {
        let single = RegressionMetrics::evaluate(&array![5.0], &array![4.0]);
        assert!(single.r2.is_nan());
        assert_eq!(single.rmse, 1.0);

        let constant = RegressionMetrics::evaluate(&array![2.0, 2.0], &array![2.0, 3.0]);
        assert_eq!(constant.r2, 0.0);
    }

    #[test]
    fn test_nan_r2_survives_json() -> anyhow::Result<()> {
        let m = RegressionMetrics::evaluate(&array![5.0], &array![4.0]);
        let json = serde_json::to_string(&m)?;
        assert!(json.contains("\"r2\":null"));
        let back: RegressionMetrics = serde_json::from_str(&json)?;
        assert!(back.r2.is_nan());
        Ok(())
    }
}

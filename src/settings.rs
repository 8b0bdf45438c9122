use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::model::ColumnMapping;
use crate::data::proximity::ProximityStrategy;
use crate::data::tolerance::Tolerance;
use crate::error::{EvalError, Result};

/// Settings for one evaluation run.
///
/// Can be read from a JSON file; absent fields take their defaults:
///
/// ```json
/// {
///   "mz_tol_ppm": 10.0,
///   "rt_tol_sec": 6.0,
///   "columns": { "id": "row ID", "mz": "row m/z", "rt": "row retention time" },
///   "strategy": "sorted-mz"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Mass tolerance in ppm.
    pub mz_tol_ppm: f64,
    /// Retention-time tolerance in seconds.
    pub rt_tol_sec: f64,
    pub columns: ColumnMapping,
    pub strategy: ProximityStrategy,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        let tolerance = Tolerance::default();
        EvaluationSettings {
            mz_tol_ppm: tolerance.mz_ppm,
            rt_tol_sec: tolerance.rt_sec,
            columns: ColumnMapping::default(),
            strategy: ProximityStrategy::default(),
        }
    }
}

impl EvaluationSettings {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings: EvaluationSettings = serde_json::from_str(&text)?;
        Ok(settings)
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.mz_tol_ppm, self.rt_tol_sec)
    }

    /// Tolerances must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("mz_tol_ppm", self.mz_tol_ppm), ("rt_tol_sec", self.rt_tol_sec)] {
            if !value.is_finite() || value < 0.0 {
                return Err(EvalError::Settings(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let settings = EvaluationSettings::default();
        assert_eq!(settings.tolerance(), Tolerance::new(20.0, 20.0));
        assert_eq!(settings.strategy, ProximityStrategy::SortedMz);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let settings: EvaluationSettings =
            serde_json::from_str(r#"{"mz_tol_ppm": 5.0, "strategy": "exhaustive"}"#).unwrap();
        assert_eq!(settings.mz_tol_ppm, 5.0);
        assert_eq!(settings.rt_tol_sec, 20.0);
        assert_eq!(settings.strategy, ProximityStrategy::Exhaustive);
        assert_eq!(settings.columns, ColumnMapping::default());
    }

    #[test]
    fn partial_column_mapping() {
        let settings: EvaluationSettings =
            serde_json::from_str(r#"{"columns": {"rt": "rt_min"}}"#).unwrap();
        assert_eq!(settings.columns.rt, "rt_min");
        assert_eq!(settings.columns.mz, "row m/z");
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let settings = EvaluationSettings {
            rt_tol_sec: -1.0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(EvalError::Settings(_))));
    }
}

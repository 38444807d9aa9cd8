//! Engine settings.

use quadcsg_math::Tolerance;
use serde::{Deserialize, Serialize};

use crate::error::{CsgError, Result};

/// Numerical settings shared by every object of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Crossings closer than this along a track are merged.
    pub merge_distance: f64,
    /// Offset used when probing either side of a surface.
    pub probe_step: f64,
    /// Largest number of surfaces a rule may have for truth-table minimization.
    pub max_minimize_surfaces: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            merge_distance: 1e-8,
            probe_step: 5e-6,
            max_minimize_surfaces: 16,
        }
    }
}

impl Settings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.merge_distance.is_nan() || self.merge_distance <= 0.0 {
            return Err(CsgError::InvalidSettings(
                "merge_distance must be positive".into(),
            ));
        }
        if self.probe_step.is_nan() || self.probe_step <= Tolerance::DEFAULT.linear {
            return Err(CsgError::InvalidSettings(format!(
                "probe_step must exceed the surface tolerance {}",
                Tolerance::DEFAULT.linear
            )));
        }
        if self.max_minimize_surfaces == 0
            || self.max_minimize_surfaces > quadcsg_logic::MAX_VARIABLES
        {
            return Err(CsgError::InvalidSettings(format!(
                "max_minimize_surfaces must be between 1 and {}",
                quadcsg_logic::MAX_VARIABLES
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let bad = [
            Settings {
                merge_distance: 0.0,
                ..Settings::default()
            },
            Settings {
                probe_step: 1e-7,
                ..Settings::default()
            },
            Settings {
                max_minimize_surfaces: 0,
                ..Settings::default()
            },
            Settings {
                merge_distance: f64::NAN,
                ..Settings::default()
            },
        ];
        for s in bad {
            assert!(matches!(s.validate(), Err(CsgError::InvalidSettings(_))), "{s:?}");
        }
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let s: Settings = toml::from_str("probe_step = 1e-4").unwrap();
        assert_eq!(s.probe_step, 1e-4);
        assert_eq!(s.merge_distance, 1e-8);
        assert_eq!(s.max_minimize_surfaces, 16);
    }
}

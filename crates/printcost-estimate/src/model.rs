//! Volume-to-material approximation.
//!
//! The interior of a part is printed at the chosen infill ratio while its
//! walls are always solid. Two heuristic constants approximate this without
//! slicing: a wall fraction that keeps a floor of material at low infill, and
//! a per-shell surcharge on the whole volume.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EstimateError, Result};

/// Extra volume added per perimeter shell, as a fraction of the model volume.
pub const SHELL_COEFFICIENT: f64 = 0.05;

/// Share of the unfilled interior that still ends up as solid wall material.
pub const SHELL_WALL_FRACTION: f64 = 0.25;

/// Cubic millimetres per cubic centimetre.
pub const MM3_PER_CM3: f64 = 1000.0;

/// Grams per kilogram.
pub const GRAMS_PER_KG: f64 = 1000.0;

/// Smallest accepted layer height (mm).
pub const MIN_LAYER_HEIGHT: f64 = 0.05;

/// Largest accepted layer height (mm).
pub const MAX_LAYER_HEIGHT: f64 = 1.0;

/// Coefficients of the material approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialModel {
    /// Volume surcharge per shell.
    pub shell_coefficient: f64,
    /// Solid fraction of the unfilled interior.
    pub shell_wall_fraction: f64,
}

impl Default for MaterialModel {
    fn default() -> Self {
        Self {
            shell_coefficient: SHELL_COEFFICIENT,
            shell_wall_fraction: SHELL_WALL_FRACTION,
        }
    }
}

impl MaterialModel {
    /// Validate coefficients loaded from configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.shell_coefficient.is_finite() || self.shell_coefficient < 0.0 {
            return Err(EstimateError::validation(
                "shell_coefficient",
                "must be a non-negative number",
            ));
        }
        if !(0.0..=1.0).contains(&self.shell_wall_fraction) {
            return Err(EstimateError::validation(
                "shell_wall_fraction",
                "must be between 0 and 1",
            ));
        }
        Ok(())
    }

    /// `1 + shells * shell_coefficient`.
    pub fn shell_factor(&self, shell_count: u32) -> f64 {
        1.0 + shell_count as f64 * self.shell_coefficient
    }

    /// `infill + (1 - infill) * shell_wall_fraction`.
    pub fn core_fraction(&self, infill_ratio: f64) -> f64 {
        infill_ratio + (1.0 - infill_ratio) * self.shell_wall_fraction
    }

    /// Volume of material actually extruded for a model of `volume_cm3`.
    ///
    /// Applies the raw formula; range checks live in [`PrintParameters`].
    pub fn effective_volume_cm3(
        &self,
        volume_cm3: f64,
        infill_ratio: f64,
        shell_count: u32,
    ) -> f64 {
        volume_cm3 * self.core_fraction(infill_ratio) * self.shell_factor(shell_count)
    }
}

/// Validated slicing parameters that drive the material approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrintParameters {
    layer_height: f64,
    infill_ratio: f64,
    shell_count: u32,
}

impl PrintParameters {
    /// Build parameters, rejecting out-of-range values.
    ///
    /// `layer_height` is informational and does not affect the estimate.
    /// `infill_ratio` must lie in `[0, 1]`. A `shell_count` of zero is
    /// raised to one.
    pub fn new(layer_height: f64, infill_ratio: f64, shell_count: u32) -> Result<Self> {
        if !layer_height.is_finite()
            || !(MIN_LAYER_HEIGHT..=MAX_LAYER_HEIGHT).contains(&layer_height)
        {
            return Err(EstimateError::validation(
                "layer_height",
                format!(
                    "must be between {MIN_LAYER_HEIGHT} and {MAX_LAYER_HEIGHT} mm, \
                     got {layer_height}"
                ),
            ));
        }
        if !infill_ratio.is_finite() || !(0.0..=1.0).contains(&infill_ratio) {
            return Err(EstimateError::validation(
                "infill_ratio",
                format!("must be between 0 and 1, got {infill_ratio}"),
            ));
        }
        let shells = if shell_count < 1 {
            warn!("shell count {shell_count} raised to 1");
            1
        } else {
            shell_count
        };
        Ok(Self {
            layer_height,
            infill_ratio,
            shell_count: shells,
        })
    }

    /// Build parameters from an infill percentage (0 to 100).
    pub fn from_infill_percent(
        layer_height: f64,
        infill_percent: f64,
        shell_count: u32,
    ) -> Result<Self> {
        if !infill_percent.is_finite() || !(0.0..=100.0).contains(&infill_percent) {
            return Err(EstimateError::validation(
                "infill_percent",
                format!("must be between 0 and 100, got {infill_percent}"),
            ));
        }
        Self::new(layer_height, infill_percent / 100.0, shell_count)
    }

    /// Layer height (mm).
    pub fn layer_height(&self) -> f64 {
        self.layer_height
    }

    /// Infill ratio in `[0, 1]`.
    pub fn infill_ratio(&self) -> f64 {
        self.infill_ratio
    }

    /// Number of perimeter shells, at least one.
    pub fn shell_count(&self) -> u32 {
        self.shell_count
    }
}

impl Default for PrintParameters {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            infill_ratio: 0.2,
            shell_count: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solid_without_shells_is_nominal_volume() {
        let model = MaterialModel::default();
        assert_eq!(model.effective_volume_cm3(10.0, 1.0, 0), 10.0);
    }

    #[test]
    fn test_zero_infill_keeps_wall_floor() {
        let model = MaterialModel::default();
        assert_eq!(model.core_fraction(0.0), 0.25);
        let volume = model.effective_volume_cm3(10.0, 0.0, 0);
        assert!(volume > 0.0);
        assert_relative_eq!(volume, 2.5);
    }

    #[test]
    fn test_shell_surcharge() {
        let model = MaterialModel::default();
        assert_relative_eq!(model.shell_factor(2), 1.1);
        // 20% infill, 2 shells: 10 * (0.2 + 0.8 * 0.25) * 1.1
        assert_relative_eq!(model.effective_volume_cm3(10.0, 0.2, 2), 4.4, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_coefficients() {
        let model = MaterialModel {
            shell_coefficient: 0.1,
            shell_wall_fraction: 0.5,
        };
        assert!(model.validate().is_ok());
        assert_relative_eq!(model.effective_volume_cm3(4.0, 0.0, 1), 2.2, epsilon = 1e-12);

        let bad = MaterialModel {
            shell_wall_fraction: 1.5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_shell_count_clamped_to_one() {
        let params = PrintParameters::new(0.2, 0.5, 0).unwrap();
        assert_eq!(params.shell_count(), 1);
        assert_eq!(PrintParameters::new(0.2, 0.5, 3).unwrap().shell_count(), 3);
    }

    #[test]
    fn test_negative_infill_rejected() {
        let err = PrintParameters::new(0.2, -0.1, 2).unwrap_err();
        assert!(matches!(
            err,
            EstimateError::Validation {
                field: "infill_ratio",
                ..
            }
        ));
    }

    #[test]
    fn test_infill_above_one_rejected() {
        assert!(PrintParameters::new(0.2, 1.01, 2).is_err());
        assert!(PrintParameters::new(0.2, f64::NAN, 2).is_err());
    }

    #[test]
    fn test_layer_height_range() {
        assert!(PrintParameters::new(0.05, 0.2, 2).is_ok());
        assert!(PrintParameters::new(1.0, 0.2, 2).is_ok());
        assert!(PrintParameters::new(0.0, 0.2, 2).is_err());
        assert!(PrintParameters::new(1.5, 0.2, 2).is_err());
    }

    #[test]
    fn test_from_infill_percent() {
        let params = PrintParameters::from_infill_percent(0.2, 20.0, 2).unwrap();
        assert_relative_eq!(params.infill_ratio(), 0.2);
        assert!(PrintParameters::from_infill_percent(0.2, 120.0, 2).is_err());
        assert!(PrintParameters::from_infill_percent(0.2, -5.0, 2).is_err());
    }
}

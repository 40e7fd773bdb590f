//! TOML configuration.
//!
//! Every field is optional; missing values fall back to the defaults of the
//! interactive calculator (0.2 mm layers, 20 % infill, two shells, PLA).
//!
//! ```toml
//! [model]
//! shell_coefficient = 0.05
//! shell_wall_fraction = 0.25
//!
//! [print]
//! layer_height = 0.2
//! infill_percent = 20
//! shell_count = 2
//!
//! [material]
//! kind = "petg"
//! cost_per_kg = 22.5
//!
//! [energy]
//! printer = "prusa-mk4"
//! cost_per_kwh = 0.30
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::energy::EnergyRate;
use crate::error::{EstimateError, Result};
use crate::material::{Filament, FilamentKind};
use crate::model::{MaterialModel, PrintParameters};
use crate::printer::PrinterProfile;

/// Default cap on model file size (256 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 256 * 1024 * 1024;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Material approximation coefficients.
    pub model: MaterialModel,
    /// Slicing parameters.
    pub print: PrintSettings,
    /// Filament selection.
    pub material: MaterialSettings,
    /// Electricity pricing.
    pub energy: EnergySettings,
    /// Input limits.
    pub limits: Limits,
}

impl EstimatorConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EstimatorConfig = toml::from_str(text)?;
        config.model.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| EstimateError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }
}

/// Slicing parameters as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrintSettings {
    /// Layer height (mm).
    pub layer_height: f64,
    /// Infill percentage, 0 to 100.
    pub infill_percent: f64,
    /// Perimeter shells.
    pub shell_count: u32,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            infill_percent: 20.0,
            shell_count: 2,
        }
    }
}

impl PrintSettings {
    /// Validate into [`PrintParameters`].
    pub fn to_parameters(&self) -> Result<PrintParameters> {
        PrintParameters::from_infill_percent(
            self.layer_height,
            self.infill_percent,
            self.shell_count,
        )
    }
}

/// Filament as written in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialSettings {
    /// Filament family.
    pub kind: FilamentKind,
    /// Density override (g/cm³); the preset for `kind` when absent.
    pub density: Option<f64>,
    /// Price per kilogram.
    pub cost_per_kg: f64,
}

impl MaterialSettings {
    /// Validate into a [`Filament`].
    pub fn to_filament(&self) -> Result<Filament> {
        match self.density {
            Some(density) => Filament::new(self.kind, density, self.cost_per_kg),
            None => Filament::preset(self.kind, self.cost_per_kg),
        }
    }
}

/// Electricity pricing inputs, in whichever form the user has them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnergySettings {
    /// Flat cost per hour of printing.
    pub cost_per_hour: Option<f64>,
    /// Built-in printer profile supplying the wattage.
    pub printer: Option<String>,
    /// Explicit average draw (W); takes precedence over `printer`.
    pub watts: Option<f64>,
    /// Tariff per kWh.
    pub cost_per_kwh: Option<f64>,
}

impl EnergySettings {
    /// Pick the energy mode from the inputs supplied.
    ///
    /// A tariff per kWh together with a wattage (explicit or from a printer
    /// profile) selects metered pricing. Otherwise the hourly rate is used,
    /// defaulting to free electricity.
    pub fn resolve(&self) -> Result<EnergyRate> {
        let watts = match (self.watts, self.printer.as_deref()) {
            (Some(watts), _) => Some(watts),
            (None, Some(key)) => {
                let profile = PrinterProfile::find(key)
                    .ok_or_else(|| EstimateError::Config(format!("unknown printer '{key}'")))?;
                Some(profile.watts)
            }
            (None, None) => None,
        };

        match (self.cost_per_kwh, watts, self.cost_per_hour) {
            (Some(_), _, Some(_)) => Err(EstimateError::Config(
                "set either cost_per_hour or cost_per_kwh, not both".into(),
            )),
            (Some(cost_per_kwh), Some(watts), None) => EnergyRate::metered(watts, cost_per_kwh),
            (Some(_), None, None) => Err(EstimateError::Config(
                "cost_per_kwh needs a wattage: set watts or printer".into(),
            )),
            (None, _, cost_per_hour) => EnergyRate::hourly(cost_per_hour.unwrap_or(0.0)),
        }
    }
}

/// Input limits enforced by the caller before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Largest model file accepted, in bytes.
    pub max_file_bytes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = EstimatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, EstimatorConfig::default());
        let params = config.print.to_parameters().unwrap();
        assert_relative_eq!(params.infill_ratio(), 0.2);
        assert_eq!(params.shell_count(), 2);
        assert_eq!(config.material.to_filament().unwrap().density_g_cm3(), 1.24);
        assert_eq!(config.energy.resolve().unwrap(), EnergyRate::Hourly { cost_per_hour: 0.0 });
        assert_eq!(config.limits.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
    }

    #[test]
    fn test_full_config() {
        let config = EstimatorConfig::from_toml_str(
            r#"
            [model]
            shell_coefficient = 0.04

            [print]
            layer_height = 0.12
            infill_percent = 40
            shell_count = 3

            [material]
            kind = "petg"
            cost_per_kg = 22.5

            [energy]
            printer = "prusa-mk4"
            cost_per_kwh = 0.30

            [limits]
            max_file_bytes = 1024
            "#,
        )
        .unwrap();

        assert_eq!(config.model.shell_coefficient, 0.04);
        assert_eq!(config.model.shell_wall_fraction, 0.25);
        assert_eq!(config.print.shell_count, 3);
        assert_eq!(config.material.kind, FilamentKind::Petg);
        assert_eq!(
            config.energy.resolve().unwrap(),
            EnergyRate::Metered {
                watts: 80.0,
                cost_per_kwh: 0.30
            }
        );
        assert_eq!(config.limits.max_file_bytes, 1024);
    }

    #[test]
    fn test_explicit_watts_override_printer() {
        let settings = EnergySettings {
            printer: Some("ender3".into()),
            watts: Some(200.0),
            cost_per_kwh: Some(0.2),
            ..Default::default()
        };
        assert_eq!(settings.resolve().unwrap().cost_per_hour(), 200.0 / 1000.0 * 0.2);
    }

    #[test]
    fn test_energy_conflicts() {
        let both = EnergySettings {
            cost_per_hour: Some(0.1),
            watts: Some(100.0),
            cost_per_kwh: Some(0.2),
            ..Default::default()
        };
        assert!(matches!(both.resolve(), Err(EstimateError::Config(_))));

        let no_watts = EnergySettings {
            cost_per_kwh: Some(0.2),
            ..Default::default()
        };
        assert!(matches!(no_watts.resolve(), Err(EstimateError::Config(_))));

        let unknown = EnergySettings {
            printer: Some("makerbot".into()),
            cost_per_kwh: Some(0.2),
            ..Default::default()
        };
        assert!(matches!(unknown.resolve(), Err(EstimateError::Config(_))));
    }

    #[test]
    fn test_watts_without_tariff_uses_hourly() {
        let settings = EnergySettings {
            watts: Some(100.0),
            cost_per_hour: Some(0.05),
            ..Default::default()
        };
        assert_eq!(
            settings.resolve().unwrap(),
            EnergyRate::Hourly { cost_per_hour: 0.05 }
        );
    }

    #[test]
    fn test_density_override() {
        let settings = MaterialSettings {
            kind: FilamentKind::Other,
            density: Some(1.5),
            cost_per_kg: 40.0,
        };
        assert_eq!(settings.to_filament().unwrap().density_g_cm3(), 1.5);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = EstimatorConfig::from_toml_str("[print]\ninfill = 20\n").unwrap_err();
        assert!(matches!(err, EstimateError::ConfigParse(_)));
    }

    #[test]
    fn test_invalid_model_rejected() {
        let err =
            EstimatorConfig::from_toml_str("[model]\nshell_wall_fraction = 2.0\n").unwrap_err();
        assert!(matches!(err, EstimateError::Validation { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[material]\nkind = \"abs\"\ncost_per_kg = 18").unwrap();
        file.flush().unwrap();

        let config = EstimatorConfig::load(file.path()).unwrap();
        assert_eq!(config.material.kind, FilamentKind::Abs);
        assert_eq!(config.material.cost_per_kg, 18.0);

        let missing = EstimatorConfig::load("/no/such/printcost.toml").unwrap_err();
        assert!(matches!(missing, EstimateError::ConfigRead { .. }));
    }
}

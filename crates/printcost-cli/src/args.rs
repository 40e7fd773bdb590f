//! Shared command-line arguments and how they override the config file.

use clap::Args;
use printcost_estimate::{
    EnergySettings, EstimatorConfig, FilamentKind, MaterialSettings, PrintSettings,
};

/// Filament selection flags.
#[derive(Args, Debug, Clone, Default)]
pub struct MaterialArgs {
    /// Filament type (pla, abs, petg, nylon, other)
    #[arg(long)]
    pub material: Option<FilamentKind>,

    /// Filament density in g/cm³ (defaults to the preset for the type)
    #[arg(long)]
    pub density: Option<f64>,

    /// Filament cost per kg
    #[arg(long)]
    pub cost_per_kg: Option<f64>,
}

impl MaterialArgs {
    /// Overlay these flags on the configured material.
    pub fn apply(&self, settings: &mut MaterialSettings) {
        if let Some(kind) = self.material {
            settings.kind = kind;
            // A new type brings its own preset density unless one is given.
            settings.density = None;
        }
        if let Some(density) = self.density {
            settings.density = Some(density);
        }
        if let Some(cost) = self.cost_per_kg {
            settings.cost_per_kg = cost;
        }
    }
}

/// Print time and electricity pricing flags.
#[derive(Args, Debug, Clone, Default)]
pub struct EnergyArgs {
    /// Print time in hours
    #[arg(long, default_value_t = 0.0)]
    pub hours: f64,

    /// Electricity cost per hour of printing
    #[arg(long, conflicts_with = "cost_per_kwh")]
    pub cost_per_hour: Option<f64>,

    /// Printer model supplying the power draw (see `printcost printers`)
    #[arg(long)]
    pub printer: Option<String>,

    /// Average printer power draw in watts
    #[arg(long)]
    pub watts: Option<f64>,

    /// Electricity cost per kWh
    #[arg(long)]
    pub cost_per_kwh: Option<f64>,
}

impl EnergyArgs {
    /// Overlay these flags on the configured energy settings.
    ///
    /// Choosing one pricing mode on the command line discards the other
    /// mode's rate from the config file.
    pub fn apply(&self, settings: &mut EnergySettings) {
        if let Some(cost) = self.cost_per_hour {
            settings.cost_per_hour = Some(cost);
            settings.cost_per_kwh = None;
        }
        if let Some(cost) = self.cost_per_kwh {
            settings.cost_per_kwh = Some(cost);
            settings.cost_per_hour = None;
        }
        if let Some(printer) = &self.printer {
            settings.printer = Some(printer.clone());
            settings.watts = None;
        }
        if let Some(watts) = self.watts {
            settings.watts = Some(watts);
        }
    }
}

/// Slicing parameter flags for model estimates.
#[derive(Args, Debug, Clone, Default)]
pub struct PrintArgs {
    /// Layer height in mm
    #[arg(long)]
    pub layer_height: Option<f64>,

    /// Infill percentage (0-100)
    #[arg(long)]
    pub infill: Option<f64>,

    /// Number of solid perimeters/shells
    #[arg(long)]
    pub shells: Option<u32>,
}

impl PrintArgs {
    /// Overlay these flags on the configured print settings.
    pub fn apply(&self, settings: &mut PrintSettings) {
        if let Some(layer_height) = self.layer_height {
            settings.layer_height = layer_height;
        }
        if let Some(infill) = self.infill {
            settings.infill_percent = infill;
        }
        if let Some(shells) = self.shells {
            settings.shell_count = shells;
        }
    }
}

/// Apply every override group to a loaded config.
pub fn merge(
    mut config: EstimatorConfig,
    print: Option<&PrintArgs>,
    material: &MaterialArgs,
    energy: &EnergyArgs,
) -> EstimatorConfig {
    if let Some(print) = print {
        print.apply(&mut config.print);
    }
    material.apply(&mut config.material);
    energy.apply(&mut config.energy);
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use printcost_estimate::EnergyRate;

    #[test]
    fn test_material_override_resets_density() {
        let mut settings = MaterialSettings {
            kind: FilamentKind::Other,
            density: Some(2.0),
            cost_per_kg: 10.0,
        };
        MaterialArgs {
            material: Some(FilamentKind::Abs),
            cost_per_kg: Some(18.0),
            ..Default::default()
        }
        .apply(&mut settings);
        assert_eq!(settings.kind, FilamentKind::Abs);
        assert_eq!(settings.density, None);
        assert_eq!(settings.cost_per_kg, 18.0);
    }

    #[test]
    fn test_cli_tariff_replaces_config_hourly_rate() {
        let mut settings = EnergySettings {
            cost_per_hour: Some(0.05),
            ..Default::default()
        };
        EnergyArgs {
            printer: Some("bambu-a1".into()),
            cost_per_kwh: Some(0.4),
            ..Default::default()
        }
        .apply(&mut settings);
        assert_eq!(
            settings.resolve().unwrap(),
            EnergyRate::Metered {
                watts: 95.0,
                cost_per_kwh: 0.4
            }
        );
    }

    #[test]
    fn test_print_overrides() {
        let config = merge(
            EstimatorConfig::default(),
            Some(&PrintArgs {
                infill: Some(55.0),
                shells: Some(4),
                ..Default::default()
            }),
            &MaterialArgs::default(),
            &EnergyArgs::default(),
        );
        assert_eq!(config.print.infill_percent, 55.0);
        assert_eq!(config.print.shell_count, 4);
        assert_eq!(config.print.layer_height, 0.2);
    }
}

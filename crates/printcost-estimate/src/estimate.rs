//! Cost aggregation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::energy::PrintJob;
use crate::error::{ensure_non_negative, Result};
use crate::material::Filament;
use crate::model::{MaterialModel, PrintParameters, GRAMS_PER_KG};

/// Breakdown of an estimated print cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Model volume (cm³); absent for manual estimates.
    pub volume_cm3: Option<f64>,
    /// Filament mass (g).
    pub mass_g: f64,
    /// Filament cost.
    pub material_cost: f64,
    /// Electricity cost.
    pub energy_cost: f64,
    /// `material_cost + energy_cost`.
    pub total_cost: f64,
}

impl CostEstimate {
    fn from_mass(
        volume_cm3: Option<f64>,
        mass_g: f64,
        filament: &Filament,
        job: &PrintJob,
    ) -> Self {
        let material_cost = mass_g / GRAMS_PER_KG * filament.cost_per_kg();
        let energy_cost = job.energy_cost();
        Self {
            volume_cm3,
            mass_g,
            material_cost,
            energy_cost,
            total_cost: material_cost + energy_cost,
        }
    }
}

/// Estimate the cost of printing a model of `volume_cm3` with the default
/// material model.
pub fn estimate(
    volume_cm3: f64,
    params: &PrintParameters,
    filament: &Filament,
    job: &PrintJob,
) -> Result<CostEstimate> {
    estimate_with_model(&MaterialModel::default(), volume_cm3, params, filament, job)
}

/// Estimate the cost of printing a model of `volume_cm3` with custom model
/// coefficients.
pub fn estimate_with_model(
    model: &MaterialModel,
    volume_cm3: f64,
    params: &PrintParameters,
    filament: &Filament,
    job: &PrintJob,
) -> Result<CostEstimate> {
    let volume_cm3 = ensure_non_negative("volume", volume_cm3)?;
    model.validate()?;

    let effective_cm3 =
        model.effective_volume_cm3(volume_cm3, params.infill_ratio(), params.shell_count());
    let mass_g = effective_cm3 * filament.density_g_cm3();
    debug!(
        "volume {:.3} cm³ -> effective {:.3} cm³ -> {:.3} g",
        volume_cm3, effective_cm3, mass_g
    );

    Ok(CostEstimate::from_mass(Some(volume_cm3), mass_g, filament, job))
}

/// Estimate the cost from a known filament mass, skipping the volume model.
pub fn estimate_manual(mass_g: f64, filament: &Filament, job: &PrintJob) -> Result<CostEstimate> {
    let mass_g = ensure_non_negative("mass", mass_g)?;
    Ok(CostEstimate::from_mass(None, mass_g, filament, job))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::EnergyRate;
    use crate::material::FilamentKind;
    use approx::assert_relative_eq;

    fn pla(cost_per_kg: f64) -> Filament {
        Filament::preset(FilamentKind::Pla, cost_per_kg).unwrap()
    }

    #[test]
    fn test_solid_part_regression() {
        // 10 cm³ solid, no shell surcharge, PLA at 20/kg, free electricity.
        let model = MaterialModel::default();
        let effective = model.effective_volume_cm3(10.0, 1.0, 0);
        assert_eq!(effective, 10.0);

        let mass_g = effective * 1.24;
        assert_relative_eq!(mass_g, 12.4, epsilon = 1e-12);

        let job = PrintJob::new(1.0, EnergyRate::hourly(0.0).unwrap()).unwrap();
        let result = estimate_manual(mass_g, &pla(20.0), &job).unwrap();
        assert_relative_eq!(result.material_cost, 0.248, epsilon = 1e-12);
        assert_eq!(result.energy_cost, 0.0);
        assert_relative_eq!(result.total_cost, 0.248, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_shells_are_clamped_before_estimating() {
        // The same solid part priced through validated parameters gets one shell.
        let params = PrintParameters::new(0.2, 1.0, 0).unwrap();
        assert_eq!(params.shell_count(), 1);

        let job = PrintJob::new(1.0, EnergyRate::hourly(0.0).unwrap()).unwrap();
        let result = estimate(10.0, &params, &pla(20.0), &job).unwrap();
        assert_relative_eq!(result.mass_g, 13.02, epsilon = 1e-9);
        assert_relative_eq!(result.material_cost, 0.2604, epsilon = 1e-12);
        assert_relative_eq!(result.total_cost, 0.2604, epsilon = 1e-12);
    }

    #[test]
    fn test_estimate_from_volume() {
        let params = PrintParameters::new(0.2, 1.0, 1).unwrap();
        let job = PrintJob::new(1.0, EnergyRate::default()).unwrap();
        let result = estimate(10.0, &params, &pla(20.0), &job).unwrap();

        // One shell clamps the surcharge to 5%.
        assert_eq!(result.volume_cm3, Some(10.0));
        assert_relative_eq!(result.mass_g, 10.0 * 1.05 * 1.24, epsilon = 1e-12);
        assert_relative_eq!(result.material_cost, result.mass_g / 1000.0 * 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_infill_still_has_mass() {
        let params = PrintParameters::new(0.2, 0.0, 0).unwrap();
        let job = PrintJob::new(0.0, EnergyRate::default()).unwrap();
        let result = estimate(10.0, &params, &pla(20.0), &job).unwrap();
        assert!(result.mass_g > 0.0);
        assert!(result.material_cost > 0.0);
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let params = PrintParameters::default();
        let job = PrintJob::new(3.5, EnergyRate::metered(150.0, 0.28).unwrap()).unwrap();
        let result = estimate(42.0, &params, &pla(24.99), &job).unwrap();
        assert_eq!(result.total_cost, result.material_cost + result.energy_cost);
        assert!(result.material_cost >= 0.0);
        assert!(result.energy_cost >= 0.0);
        assert_relative_eq!(result.energy_cost, 3.5 * 0.15 * 0.28, epsilon = 1e-12);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let params = PrintParameters::new(0.2, 0.35, 3).unwrap();
        let job = PrintJob::new(7.25, EnergyRate::metered(95.0, 0.31).unwrap()).unwrap();
        let filament = Filament::preset(FilamentKind::Petg, 27.5).unwrap();
        let a = estimate(123.456, &params, &filament, &job).unwrap();
        let b = estimate(123.456, &params, &filament, &job).unwrap();
        assert_eq!(a.mass_g.to_bits(), b.mass_g.to_bits());
        assert_eq!(a.total_cost.to_bits(), b.total_cost.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let params = PrintParameters::default();
        let job = PrintJob::new(1.0, EnergyRate::default()).unwrap();
        assert!(estimate(-1.0, &params, &pla(20.0), &job).is_err());
        assert!(estimate_manual(-5.0, &pla(20.0), &job).is_err());
    }

    #[test]
    fn test_manual_has_no_volume() {
        let job = PrintJob::new(2.0, EnergyRate::hourly(0.5).unwrap()).unwrap();
        let result = estimate_manual(250.0, &pla(20.0), &job).unwrap();
        assert_eq!(result.volume_cm3, None);
        assert_relative_eq!(result.material_cost, 5.0, epsilon = 1e-12);
        assert_relative_eq!(result.energy_cost, 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.total_cost, 6.0, epsilon = 1e-12);
    }
}

//! Electricity cost of a print.
//!
//! A rate is either quoted directly per hour of printing, or derived from the
//! printer's power draw and the tariff per kWh. Both reduce to a cost per
//! hour, so the aggregation code never branches on the mode.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, Result};

/// Watts per kilowatt.
pub const WATTS_PER_KW: f64 = 1000.0;

/// How electricity is priced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EnergyRate {
    /// Flat cost per hour of printing.
    Hourly {
        /// Currency per hour.
        cost_per_hour: f64,
    },
    /// Average power draw priced per kWh.
    Metered {
        /// Average draw in watts.
        watts: f64,
        /// Currency per kWh.
        cost_per_kwh: f64,
    },
}

impl EnergyRate {
    /// Flat hourly rate.
    pub fn hourly(cost_per_hour: f64) -> Result<Self> {
        let rate = EnergyRate::Hourly { cost_per_hour };
        rate.validate()?;
        Ok(rate)
    }

    /// Power-based rate.
    pub fn metered(watts: f64, cost_per_kwh: f64) -> Result<Self> {
        let rate = EnergyRate::Metered { watts, cost_per_kwh };
        rate.validate()?;
        Ok(rate)
    }

    /// Check every component is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        match *self {
            EnergyRate::Hourly { cost_per_hour } => {
                ensure_non_negative("cost_per_hour", cost_per_hour)?;
            }
            EnergyRate::Metered { watts, cost_per_kwh } => {
                ensure_non_negative("watts", watts)?;
                ensure_non_negative("cost_per_kwh", cost_per_kwh)?;
            }
        }
        Ok(())
    }

    /// Equivalent cost per hour of printing.
    pub fn cost_per_hour(&self) -> f64 {
        match *self {
            EnergyRate::Hourly { cost_per_hour } => cost_per_hour,
            EnergyRate::Metered { watts, cost_per_kwh } => watts / WATTS_PER_KW * cost_per_kwh,
        }
    }
}

impl Default for EnergyRate {
    fn default() -> Self {
        EnergyRate::Hourly { cost_per_hour: 0.0 }
    }
}

/// Duration of a print and how its electricity is priced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrintJob {
    hours: f64,
    energy: EnergyRate,
}

impl PrintJob {
    /// Validate and bundle print time with its energy rate.
    pub fn new(hours: f64, energy: EnergyRate) -> Result<Self> {
        let hours = ensure_non_negative("hours", hours)?;
        energy.validate()?;
        Ok(Self { hours, energy })
    }

    /// Print time in hours.
    pub fn hours(&self) -> f64 {
        self.hours
    }

    /// Energy rate.
    pub fn energy(&self) -> EnergyRate {
        self.energy
    }

    /// Electricity cost for the whole print.
    pub fn energy_cost(&self) -> f64 {
        self.hours * self.energy.cost_per_hour()
    }
}

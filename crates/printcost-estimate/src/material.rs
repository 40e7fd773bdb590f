//! Filament presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, EstimateError, Result};

/// Common filament families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilamentKind {
    /// Polylactic acid.
    #[default]
    Pla,
    /// Acrylonitrile butadiene styrene.
    Abs,
    /// Glycol-modified PET.
    Petg,
    /// Polyamide.
    Nylon,
    /// Anything else; supply the density explicitly.
    Other,
}

impl FilamentKind {
    /// All presets, in display order.
    pub const ALL: [FilamentKind; 5] = [
        FilamentKind::Pla,
        FilamentKind::Abs,
        FilamentKind::Petg,
        FilamentKind::Nylon,
        FilamentKind::Other,
    ];

    /// Typical density in g/cm³.
    pub fn density_g_cm3(self) -> f64 {
        match self {
            FilamentKind::Pla => 1.24,
            FilamentKind::Abs => 1.04,
            FilamentKind::Petg => 1.27,
            FilamentKind::Nylon => 1.14,
            FilamentKind::Other => 1.24,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            FilamentKind::Pla => "PLA",
            FilamentKind::Abs => "ABS",
            FilamentKind::Petg => "PETG",
            FilamentKind::Nylon => "Nylon",
            FilamentKind::Other => "Other",
        }
    }
}

impl fmt::Display for FilamentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilamentKind {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self> {
        FilamentKind::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EstimateError::validation("material", format!("unknown filament '{s}'")))
    }
}

/// Filament in use: its family, density and price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Filament {
    kind: FilamentKind,
    density_g_cm3: f64,
    cost_per_kg: f64,
}

impl Filament {
    /// Filament with an explicit density.
    ///
    /// Density must be positive; cost may be zero.
    pub fn new(kind: FilamentKind, density_g_cm3: f64, cost_per_kg: f64) -> Result<Self> {
        let density_g_cm3 = ensure_non_negative("density", density_g_cm3)?;
        if density_g_cm3 == 0.0 {
            return Err(EstimateError::validation("density", "must be greater than zero"));
        }
        let cost_per_kg = ensure_non_negative("cost_per_kg", cost_per_kg)?;
        Ok(Self {
            kind,
            density_g_cm3,
            cost_per_kg,
        })
    }

    /// Filament using the preset density for `kind`.
    pub fn preset(kind: FilamentKind, cost_per_kg: f64) -> Result<Self> {
        Self::new(kind, kind.density_g_cm3(), cost_per_kg)
    }

    /// Filament family.
    pub fn kind(&self) -> FilamentKind {
        self.kind
    }

    /// Density in g/cm³.
    pub fn density_g_cm3(&self) -> f64 {
        self.density_g_cm3
    }

    /// Price per kilogram.
    pub fn cost_per_kg(&self) -> f64 {
        self.cost_per_kg
    }
}

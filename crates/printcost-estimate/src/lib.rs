#![warn(missing_docs)]

//! Material and energy cost estimation for 3D prints.
//!
//! Two modes are supported. In manual mode the filament mass is known and
//! only priced. In model mode the enclosed volume of an STL mesh is
//! converted to an approximate filament mass from the infill ratio and
//! shell count, then priced the same way.
//!
//! # Example
//!
//! ```ignore
//! use printcost_estimate::{
//!     estimate_from_stl_path, EnergyRate, Filament, FilamentKind, MaterialModel,
//!     PrintJob, PrintParameters,
//! };
//!
//! let params = PrintParameters::from_infill_percent(0.2, 20.0, 2)?;
//! let filament = Filament::preset(FilamentKind::Pla, 20.0)?;
//! let job = PrintJob::new(3.5, EnergyRate::metered(120.0, 0.30)?)?;
//!
//! let model = MaterialModel::default();
//! let result = estimate_from_stl_path("part.stl", &model, &params, &filament, &job)?;
//! println!("Estimated cost: {:.2}", result.estimate.total_cost);
//! ```

pub mod config;
pub mod energy;
pub mod error;
pub mod estimate;
pub mod material;
pub mod model;
pub mod pipeline;
pub mod printer;

pub use config::{EnergySettings, EstimatorConfig, Limits, MaterialSettings, PrintSettings};
pub use energy::{EnergyRate, PrintJob};
pub use error::{EstimateError, Result};
pub use estimate::{estimate, estimate_manual, estimate_with_model, CostEstimate};
pub use material::{Filament, FilamentKind};
pub use model::{MaterialModel, PrintParameters, SHELL_COEFFICIENT, SHELL_WALL_FRACTION};
pub use pipeline::{
    estimate_from_mesh, estimate_from_stl_bytes, estimate_from_stl_path, ModelEstimate,
};
pub use printer::PrinterProfile;

//! Model-driven estimation: mesh in, cost out.

use std::path::Path;

use printcost_mesh::{
    compute_volume, mass_properties, read_stl_bytes, read_stl_path, MassProperties, TriangleMesh,
};
use tracing::{info, warn};

use crate::energy::PrintJob;
use crate::error::Result;
use crate::estimate::{estimate_with_model, CostEstimate};
use crate::material::Filament;
use crate::model::{MaterialModel, PrintParameters, MM3_PER_CM3};

/// Everything the model pipeline learned about a mesh and its cost.
#[derive(Debug, Clone)]
pub struct ModelEstimate {
    /// Enclosed volume (mm³); zero when the mesh was degenerate.
    pub volume_mm3: f64,
    /// Centroid and inertia, reported alongside the cost.
    pub mass_properties: MassProperties,
    /// Cost breakdown.
    pub estimate: CostEstimate,
    /// Set when the mesh bounded no volume and zero was assumed.
    pub warning: Option<String>,
}

/// Estimate the cost of printing an already loaded mesh.
///
/// A degenerate mesh is not an error: the volume falls back to zero and
/// the reason is kept in [`ModelEstimate::warning`].
pub fn estimate_from_mesh(
    mesh: &TriangleMesh,
    model: &MaterialModel,
    params: &PrintParameters,
    filament: &Filament,
    job: &PrintJob,
) -> Result<ModelEstimate> {
    // Malformed index data is rejected here, before any cost is computed.
    let (volume_mm3, warning) = match compute_volume(mesh) {
        Ok(volume) => (volume, None),
        Err(e) if e.is_degenerate() => {
            warn!("{e}; assuming zero volume");
            (0.0, Some(e.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let estimate = estimate_with_model(model, volume_mm3 / MM3_PER_CM3, params, filament, job)?;
    info!(
        "Estimated {:.2} g, total cost {:.2}",
        estimate.mass_g, estimate.total_cost
    );

    Ok(ModelEstimate {
        volume_mm3,
        mass_properties: mass_properties(mesh)?,
        estimate,
        warning,
    })
}

/// Read an STL file and estimate its print cost.
pub fn estimate_from_stl_path(
    path: impl AsRef<Path>,
    model: &MaterialModel,
    params: &PrintParameters,
    filament: &Filament,
    job: &PrintJob,
) -> Result<ModelEstimate> {
    let mesh = read_stl_path(path)?;
    estimate_from_mesh(&mesh, model, params, filament, job)
}

/// Decode STL bytes and estimate their print cost.
pub fn estimate_from_stl_bytes(
    bytes: &[u8],
    model: &MaterialModel,
    params: &PrintParameters,
    filament: &Filament,
    job: &PrintJob,
) -> Result<ModelEstimate> {
    let mesh = read_stl_bytes(bytes)?;
    estimate_from_mesh(&mesh, model, params, filament, job)
}

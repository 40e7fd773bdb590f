//! Volume, mass properties and other measurements of a triangle mesh.

use std::path::Path;

use nalgebra::Matrix3;
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::io::{read_stl_bytes, read_stl_path};
use crate::{Point3, TriangleMesh, Vec3};

/// Volumes with a smaller magnitude (mm³) are treated as degenerate.
pub const DEGENERATE_VOLUME_EPSILON: f64 = 1e-9;

/// Volume, centroid and inertia of a closed mesh at unit density.
#[derive(Debug, Clone, PartialEq)]
pub struct MassProperties {
    /// Enclosed volume in cubic mesh units.
    pub volume: f64,
    /// Volume-weighted centroid.
    pub centroid: Point3,
    /// Inertia tensor about the centroid, unit density.
    pub inertia: Matrix3<f64>,
}

impl MassProperties {
    fn zero() -> Self {
        Self {
            volume: 0.0,
            centroid: Point3::origin(),
            inertia: Matrix3::zeros(),
        }
    }
}

// =============================================================================
// Volume
// =============================================================================

/// Signed volume about the origin.
///
/// Each facet `(v1, v2, v3)` contributes the tetrahedron
/// `v1 · (v2 × v3) / 6`. Outward (counter-clockwise) winding gives a
/// positive total for a closed surface.
pub fn signed_volume(mesh: &TriangleMesh) -> Result<f64> {
    mesh.validate()?;
    let sum: f64 = mesh
        .triangles()
        .map(|[v1, v2, v3]| v1.coords.dot(&v2.coords.cross(&v3.coords)))
        .sum();
    Ok(sum / 6.0)
}

/// Signed volume with the tetrahedra apexed at `reference` instead of the
/// origin.
///
/// For a watertight mesh the result does not depend on `reference`.
pub fn signed_volume_about(mesh: &TriangleMesh, reference: Point3) -> Result<f64> {
    mesh.validate()?;
    let sum: f64 = mesh
        .triangles()
        .map(|[v1, v2, v3]| {
            let (a, b, c) = (v1 - reference, v2 - reference, v3 - reference);
            a.dot(&b.cross(&c))
        })
        .sum();
    Ok(sum / 6.0)
}

/// Enclosed volume of a closed mesh, in the mesh's cubic length unit.
///
/// The magnitude of the signed volume is returned, so a mesh whose winding
/// is inverted throughout measures the same as the original. Meshes that
/// are not watertight produce a meaningless value; this is not detected.
///
/// Returns [`MeshError::Malformed`] for index data that does not describe
/// whole triangles, and [`MeshError::Degenerate`] when there are no facets
/// or the facets enclose no measurable volume.
pub fn compute_volume(mesh: &TriangleMesh) -> Result<f64> {
    if mesh.is_empty() {
        return Err(MeshError::Degenerate("mesh has no facets".into()));
    }
    let volume = signed_volume(mesh)?.abs();
    debug!(
        "Integrated {} facets: volume {:.4} mm³",
        mesh.num_triangles(),
        volume
    );
    if !volume.is_finite() {
        return Err(MeshError::Degenerate(format!(
            "volume is not finite ({volume})"
        )));
    }
    if volume < DEGENERATE_VOLUME_EPSILON {
        return Err(MeshError::Degenerate(format!(
            "{} facets enclose zero volume",
            mesh.num_triangles()
        )));
    }
    Ok(volume)
}

/// Read an STL file and measure its volume (mm³).
pub fn volume_from_path(path: impl AsRef<Path>) -> Result<f64> {
    let mesh = read_stl_path(path)?;
    compute_volume(&mesh)
}

/// Decode STL bytes and measure their volume (mm³).
pub fn volume_from_bytes(bytes: &[u8]) -> Result<f64> {
    let mesh = read_stl_bytes(bytes)?;
    compute_volume(&mesh)
}

// =============================================================================
// Mass properties
// =============================================================================

/// Polyhedral mass properties (volume, centroid, inertia about the centroid).
///
/// Integrates the ten monomials 1, x, y, z, x², y², z², xy, yz, zx over the
/// enclosed region face by face (Eberly's formulation). An inverted mesh is
/// normalised so `volume` is never negative. Empty or zero-volume meshes
/// yield all-zero properties; malformed index data is an error.
pub fn mass_properties(mesh: &TriangleMesh) -> Result<MassProperties> {
    const MULT: [f64; 10] = [
        1.0 / 6.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 60.0,
        1.0 / 60.0,
        1.0 / 60.0,
        1.0 / 120.0,
        1.0 / 120.0,
        1.0 / 120.0,
    ];

    mesh.validate()?;
    let mut intg = [0.0f64; 10];
    for [p0, p1, p2] in mesh.triangles() {
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let d = e1.cross(&e2);

        let (f1x, f2x, f3x, g0x, g1x, g2x) = subexpressions(p0.x, p1.x, p2.x);
        let (_, f2y, f3y, g0y, g1y, g2y) = subexpressions(p0.y, p1.y, p2.y);
        let (_, f2z, f3z, g0z, g1z, g2z) = subexpressions(p0.z, p1.z, p2.z);

        intg[0] += d.x * f1x;
        intg[1] += d.x * f2x;
        intg[2] += d.y * f2y;
        intg[3] += d.z * f2z;
        intg[4] += d.x * f3x;
        intg[5] += d.y * f3y;
        intg[6] += d.z * f3z;
        intg[7] += d.x * (p0.y * g0x + p1.y * g1x + p2.y * g2x);
        intg[8] += d.y * (p0.z * g0y + p1.z * g1y + p2.z * g2y);
        intg[9] += d.z * (p0.x * g0z + p1.x * g1z + p2.x * g2z);
    }
    for (value, m) in intg.iter_mut().zip(MULT) {
        *value *= m;
    }

    // Every integral flips sign with the winding; normalise to outward.
    if intg[0] < 0.0 {
        for value in intg.iter_mut() {
            *value = -*value;
        }
    }

    let volume = intg[0];
    if volume < DEGENERATE_VOLUME_EPSILON || !volume.is_finite() {
        return Ok(MassProperties::zero());
    }

    let c = Vec3::new(intg[1], intg[2], intg[3]) / volume;

    let ixx = intg[5] + intg[6] - volume * (c.y * c.y + c.z * c.z);
    let iyy = intg[4] + intg[6] - volume * (c.z * c.z + c.x * c.x);
    let izz = intg[4] + intg[5] - volume * (c.x * c.x + c.y * c.y);
    let ixy = -(intg[7] - volume * c.x * c.y);
    let iyz = -(intg[8] - volume * c.y * c.z);
    let ixz = -(intg[9] - volume * c.z * c.x);

    Ok(MassProperties {
        volume,
        centroid: Point3::from(c),
        inertia: Matrix3::new(ixx, ixy, ixz, ixy, iyy, iyz, ixz, iyz, izz),
    })
}

fn subexpressions(w0: f64, w1: f64, w2: f64) -> (f64, f64, f64, f64, f64, f64) {
    let temp0 = w0 + w1;
    let f1 = temp0 + w2;
    let temp1 = w0 * w0;
    let temp2 = temp1 + w1 * temp0;
    let f2 = temp2 + w2 * f1;
    let f3 = w0 * temp1 + w1 * temp2 + w2 * f2;
    let g0 = f2 + w0 * (f1 + w0);
    let g1 = f2 + w1 * (f1 + w1);
    let g2 = f2 + w2 * (f1 + w2);
    (f1, f2, f3, g0, g1, g2)
}

// =============================================================================
// Surface measurements
// =============================================================================

/// Total surface area of all facets.
pub fn surface_area(mesh: &TriangleMesh) -> Result<f64> {
    mesh.validate()?;
    Ok(mesh
        .triangles()
        .map(|[v0, v1, v2]| (v1 - v0).cross(&(v2 - v0)).norm() / 2.0)
        .sum())
}

/// Axis-aligned bounding box as `(min, max)`, or `None` for a mesh without
/// vertices.
pub fn bounding_box(mesh: &TriangleMesh) -> Option<(Point3, Point3)> {
    if mesh.num_vertices() == 0 {
        return None;
    }
    let mut min = [f64::MAX; 3];
    let mut max = [f64::MIN; 3];
    for chunk in mesh.vertices.chunks_exact(3) {
        for i in 0..3 {
            let v = chunk[i] as f64;
            min[i] = min[i].min(v);
            max[i] = max[i].max(v);
        }
    }
    Some((Point3::from(min), Point3::from(max)))
}

#![warn(missing_docs)]

//! Triangle mesh loading and volume integration for printcost.
//!
//! Reads binary or ASCII STL files into a [`TriangleMesh`] and measures the
//! enclosed volume by summing signed tetrahedra, one per facet, against a
//! common reference point. Mass properties (centroid, inertia), surface area
//! and bounds are available for reporting; only the volume feeds the cost
//! model.
//!
//! # Example
//!
//! ```ignore
//! use printcost_mesh::{read_stl_path, compute_volume};
//!
//! let mesh = read_stl_path("part.stl")?;
//! let volume_mm3 = compute_volume(&mesh)?;
//! println!("volume: {:.2} cm³", volume_mm3 / 1000.0);
//! ```

pub mod error;
pub mod io;
pub mod measure;

pub use error::{MeshError, Result};
pub use io::{read_stl_bytes, read_stl_path};
pub use measure::{
    bounding_box, compute_volume, mass_properties, signed_volume, signed_volume_about,
    surface_area, volume_from_bytes, volume_from_path, MassProperties, DEGENERATE_VOLUME_EPSILON,
};

use nalgebra::Vector3;

/// A point in 3D space, in the mesh's native length unit (mm for STL).
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Triangulated surface read from an STL file.
///
/// Facets are stored as index triples into a shared vertex array. The
/// facet normals found in the file are kept for reference but are never
/// consulted by the volume computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of facet normals: `[nx0, ny0, nz0, ...]`, one per triangle.
    /// Empty when the source carried no normals.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from vertex positions and index triples.
    ///
    /// Fails with [`MeshError::Malformed`] unless the arrays describe whole
    /// triangles over existing vertices.
    pub fn from_parts(vertices: Vec<f32>, indices: Vec<u32>) -> Result<Self> {
        let mesh = Self {
            vertices,
            indices,
            normals: Vec::new(),
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Check that the flat arrays hold whole vertices, whole triangles and
    /// in-range indices.
    ///
    /// The fields are public, so every measurement runs this before touching
    /// the index buffer.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.len() % 3 != 0 {
            return Err(MeshError::Malformed(format!(
                "{} coordinates do not form whole vertices",
                self.vertices.len()
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::Malformed(format!(
                "{} indices do not form whole triangles",
                self.indices.len()
            )));
        }
        let num_vertices = self.num_vertices();
        if let Some(pos) = self
            .indices
            .iter()
            .position(|&i| i as usize >= num_vertices)
        {
            return Err(MeshError::Malformed(format!(
                "triangle {} references vertex {} of {}",
                pos / 3,
                self.indices[pos],
                num_vertices
            )));
        }
        Ok(())
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// True when the mesh has no facets.
    pub fn is_empty(&self) -> bool {
        self.num_triangles() == 0
    }

    /// Position of vertex `i` in double precision.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn vertex(&self, i: usize) -> Point3 {
        let base = i * 3;
        Point3::new(
            self.vertices[base] as f64,
            self.vertices[base + 1] as f64,
            self.vertices[base + 2] as f64,
        )
    }

    /// Corner positions of triangle `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or the mesh fails [`validate`].
    ///
    /// [`validate`]: TriangleMesh::validate
    pub fn triangle(&self, i: usize) -> [Point3; 3] {
        let tri = &self.indices[i * 3..i * 3 + 3];
        [
            self.vertex(tri[0] as usize),
            self.vertex(tri[1] as usize),
            self.vertex(tri[2] as usize),
        ]
    }

    /// Iterate over the corner positions of every triangle, in file order.
    ///
    /// Same panics as [`TriangleMesh::triangle`]; call
    /// [`TriangleMesh::validate`] first on meshes assembled by hand.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        (0..self.num_triangles()).map(move |i| self.triangle(i))
    }

    /// Return a copy shifted by `(dx, dy, dz)`.
    pub fn translate(&self, dx: f32, dy: f32, dz: f32) -> TriangleMesh {
        let mut moved = self.clone();
        for v in moved.vertices.chunks_exact_mut(3) {
            v[0] += dx;
            v[1] += dy;
            v[2] += dz;
        }
        moved
    }

    /// Return a copy with every facet's winding reversed.
    pub fn flip_winding(&self) -> TriangleMesh {
        let mut flipped = self.clone();
        for tri in flipped.indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
        for n in flipped.normals.iter_mut() {
            *n = -*n;
        }
        flipped
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mesh = test_meshes::cube(10.0);
        assert_eq!(mesh.num_triangles(), 12);
        assert_eq!(mesh.num_vertices(), 8);
        assert!(!mesh.is_empty());
        assert!(TriangleMesh::new().is_empty());
    }

    #[test]
    fn test_triangle_corners() {
        let mesh = test_meshes::cube(10.0);
        let [a, b, c] = mesh.triangle(0);
        assert_eq!(a, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(b, Point3::new(10.0, 10.0, 0.0));
        assert_eq!(c, Point3::new(10.0, 0.0, 0.0));
        assert_eq!(mesh.triangles().count(), 12);
    }

    #[test]
    fn test_from_parts_rejects_out_of_range_index() {
        let err = TriangleMesh::from_parts(vec![0.0; 9], vec![0, 1, 7]).unwrap_err();
        assert!(matches!(err, MeshError::Malformed(_)));
        assert!(!err.is_degenerate());
    }

    #[test]
    fn test_from_parts_rejects_partial_triangle() {
        let err = TriangleMesh::from_parts(vec![0.0; 9], vec![0, 1, 2, 0]).unwrap_err();
        assert!(matches!(err, MeshError::Malformed(_)));

        let err = TriangleMesh::from_parts(vec![0.0; 8], vec![0, 1, 2]).unwrap_err();
        assert!(matches!(err, MeshError::Malformed(_)));
    }

    #[test]
    fn test_validate_catches_edited_fields() {
        let mut mesh = test_meshes::tetrahedron(1.0);
        assert!(mesh.validate().is_ok());
        mesh.indices.push(4);
        assert!(mesh.validate().is_err());
        mesh.indices.extend_from_slice(&[0, 1]);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_translate() {
        let mesh = test_meshes::cube(10.0).translate(5.0, -2.0, 1.0);
        assert_eq!(mesh.vertex(0), Point3::new(5.0, -2.0, 1.0));
        assert_eq!(mesh.vertex(6), Point3::new(15.0, 8.0, 11.0));
    }

    #[test]
    fn test_flip_winding() {
        let mesh = test_meshes::cube(10.0);
        let flipped = mesh.flip_winding();
        assert_eq!(&flipped.indices[0..3], &[0, 1, 2]);
        assert_eq!(flipped.flip_winding(), mesh);
    }
}

//! STL reading and writing.
//!
//! Both binary and ASCII STL are accepted. `stl_io` decides between the two
//! by looking for a `solid ` prefix, which misreads two kinds of files found
//! in the wild: binary files whose 80-byte header begins with `solid`, and
//! ASCII files whose first line is a bare `solid`. The format is therefore
//! settled here first and the buffer adjusted before `stl_io` sees it.

use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{MeshError, Result};
use crate::{Point3, TriangleMesh, Vec3};

/// Label used in errors for meshes decoded from memory.
const MEMORY_ORIGIN: &str = "<memory>";

const BINARY_HEADER_LEN: usize = 80;
const BINARY_PREAMBLE_LEN: usize = BINARY_HEADER_LEN + 4;
const BINARY_FACET_LEN: usize = 50;

/// Read an STL file from disk.
///
/// The whole file is read into memory and the handle closed before
/// decoding starts.
pub fn read_stl_path(path: impl AsRef<Path>) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let origin = path.display().to_string();

    let bytes = std::fs::read(path).map_err(|source| MeshError::Parse {
        origin: origin.clone(),
        source,
    })?;

    let mesh = decode(&bytes, &origin)?;
    info!(
        "Loaded {}: {} vertices, {} triangles",
        origin,
        mesh.num_vertices(),
        mesh.num_triangles()
    );
    Ok(mesh)
}

/// Decode an STL file already held in memory.
pub fn read_stl_bytes(bytes: &[u8]) -> Result<TriangleMesh> {
    decode(bytes, MEMORY_ORIGIN)
}

/// True when the length matches the facet count stored at bytes 80..84.
fn has_binary_layout(bytes: &[u8]) -> bool {
    let Some(count) = bytes.get(BINARY_HEADER_LEN..BINARY_PREAMBLE_LEN) else {
        return false;
    };
    let count = u32::from_le_bytes([count[0], count[1], count[2], count[3]]) as u64;
    count * BINARY_FACET_LEN as u64 + BINARY_PREAMBLE_LEN as u64 == bytes.len() as u64
}

/// Blank the header so `stl_io` cannot mistake it for an ASCII `solid` line.
fn as_binary(bytes: &[u8]) -> Cow<'_, [u8]> {
    if bytes.starts_with(b"solid") && bytes.len() >= BINARY_HEADER_LEN {
        let mut owned = bytes.to_vec();
        owned[..BINARY_HEADER_LEN].fill(0);
        Cow::Owned(owned)
    } else {
        Cow::Borrowed(bytes)
    }
}

/// Give a bare `solid` first line the trailing space `stl_io` expects.
fn as_ascii(bytes: &[u8]) -> Cow<'_, [u8]> {
    match bytes.strip_prefix(b"solid") {
        Some(rest) if rest.first().map_or(true, |b| b.is_ascii_whitespace() && *b != b' ') => {
            let mut owned = Vec::with_capacity(bytes.len() + 1);
            owned.extend_from_slice(b"solid ");
            owned.extend_from_slice(rest);
            Cow::Owned(owned)
        }
        _ => Cow::Borrowed(bytes),
    }
}

fn read_indexed(bytes: &[u8], origin: &str) -> Result<stl_io::IndexedMesh> {
    stl_io::read_stl(&mut Cursor::new(bytes)).map_err(|source| MeshError::Parse {
        origin: origin.to_string(),
        source,
    })
}

fn decode(bytes: &[u8], origin: &str) -> Result<TriangleMesh> {
    let stl = if has_binary_layout(bytes) {
        debug!("STL {} has binary layout", origin);
        read_indexed(&as_binary(bytes), origin)?
    } else if bytes.starts_with(b"solid") {
        match read_indexed(&as_ascii(bytes), origin) {
            Ok(stl) => stl,
            // Binary files with a `solid` header and trailing padding.
            Err(ascii_err) if bytes.len() >= BINARY_PREAMBLE_LEN => {
                debug!("STL {} is not ASCII ({}), retrying as binary", origin, ascii_err);
                read_indexed(&as_binary(bytes), origin).map_err(|_| ascii_err)?
            }
            Err(ascii_err) => return Err(ascii_err),
        }
    } else {
        read_indexed(bytes, origin)?
    };

    debug!(
        "STL {} contains {} unique vertices, {} facets",
        origin,
        stl.vertices.len(),
        stl.faces.len()
    );

    let mut mesh = TriangleMesh {
        vertices: Vec::with_capacity(stl.vertices.len() * 3),
        indices: Vec::with_capacity(stl.faces.len() * 3),
        normals: Vec::with_capacity(stl.faces.len() * 3),
    };

    for v in &stl.vertices {
        mesh.vertices.extend_from_slice(&v.0);
    }

    for face in &stl.faces {
        for &i in &face.vertices {
            let index = u32::try_from(i).map_err(|_| MeshError::Parse {
                origin: origin.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("vertex index {i} exceeds u32 range"),
                ),
            })?;
            mesh.indices.push(index);
        }
        mesh.normals.extend_from_slice(&face.normal.0);
    }

    Ok(mesh)
}

impl TriangleMesh {
    /// Encode as binary STL.
    ///
    /// Facet normals are recomputed from the winding rather than copied from
    /// [`TriangleMesh::normals`].
    pub fn to_stl_bytes(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let vertex = |p: Point3| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32]);
        let triangles: Vec<stl_io::Triangle> = self
            .triangles()
            .map(|[v0, v1, v2]| {
                let n = (v1 - v0).cross(&(v2 - v0));
                let len = n.norm();
                let normal = if len > 1e-10 { n / len } else { Vec3::z() };
                let normal = [normal.x as f32, normal.y as f32, normal.z as f32];
                stl_io::Triangle {
                    normal: stl_io::Normal::new(normal),
                    vertices: [vertex(v0), vertex(v1), vertex(v2)],
                }
            })
            .collect();

        let mut data = Vec::with_capacity(BINARY_PREAMBLE_LEN + triangles.len() * BINARY_FACET_LEN);
        stl_io::write_stl(&mut data, triangles.iter()).map_err(MeshError::Encode)?;
        Ok(data)
    }
}

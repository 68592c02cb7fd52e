/// Corner deduplication: turns per-face attribute streams into an indexed mesh
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

use crate::error::MeshError;
use crate::geometry::IndexedMesh;

/// Bit pattern of a (position, normal) pair, so lookups match exact floats only
type CornerKey = ([u32; 3], [u32; 3]);

fn corner_key(position: &Point3<f32>, normal: &Vector3<f32>) -> CornerKey {
    (
        [position.x.to_bits(), position.y.to_bits(), position.z.to_bits()],
        [normal.x.to_bits(), normal.y.to_bits(), normal.z.to_bits()],
    )
}

/// Build an index buffer over the unique corners of `positions`/`normals`.
///
/// Both streams hold one entry per face corner, three corners per triangle.
/// Corners are merged only when position and normal are bit-identical; the
/// first occurrence decides the output order.
pub fn index_vbo(
    positions: &[Point3<f32>],
    normals: &[Vector3<f32>],
) -> Result<IndexedMesh, MeshError> {
    if positions.len() != normals.len() {
        return Err(MeshError::MismatchedStreams {
            positions: positions.len(),
            normals: normals.len(),
        });
    }

    let mut seen: HashMap<CornerKey, u32> = HashMap::with_capacity(positions.len());
    let mut mesh = IndexedMesh {
        positions: Vec::new(),
        normals: Vec::new(),
        indices: Vec::with_capacity(positions.len()),
    };

    for (position, normal) in positions.iter().zip(normals) {
        let next = mesh.positions.len() as u32;
        let index = *seen.entry(corner_key(position, normal)).or_insert_with(|| {
            mesh.positions.push(*position);
            mesh.normals.push(*normal);
            next
        });
        mesh.indices.push(index);
    }

    Ok(mesh)
}

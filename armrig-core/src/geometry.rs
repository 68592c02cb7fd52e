/// Geometry primitives shared by the loader, the indexer and the renderer
use nalgebra::{Point3, Vector3};

use crate::indexer::index_vbo;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding of the positions, zero for degenerate faces
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1
            .cross(&edge2)
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::zeros)
    }
}

/// Indexed triangle mesh: deduplicated vertex streams plus a triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub indices: Vec<u32>,
}

impl IndexedMesh {
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Walk the index buffer three entries at a time
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            let vertex = |i: u32| {
                let i = i as usize;
                Vertex::new(self.positions[i], self.normals[i])
            };
            Triangle::new(vertex(tri[0]), vertex(tri[1]), vertex(tri[2]))
        })
    }

    /// Axis-aligned box centered on the origin, used when no OBJ asset is given
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vector3::new(width / 2.0, height / 2.0, depth / 2.0);
        let mut positions = Vec::with_capacity(36);
        let mut normals = Vec::with_capacity(36);

        // (normal, u, v) with u x v == normal so the faces wind counter-clockwise
        let faces = [
            (Vector3::x(), Vector3::y(), Vector3::z()),
            (-Vector3::x(), Vector3::z(), Vector3::y()),
            (Vector3::y(), Vector3::z(), Vector3::x()),
            (-Vector3::y(), Vector3::x(), Vector3::z()),
            (Vector3::z(), Vector3::x(), Vector3::y()),
            (-Vector3::z(), Vector3::y(), Vector3::x()),
        ];

        for (normal, u, v) in faces {
            let corner = |su: f32, sv: f32| {
                Point3::from(
                    (normal + u * su + v * sv).component_mul(&half),
                )
            };
            let quad = [
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            ];
            for i in [0, 1, 2, 0, 2, 3] {
                positions.push(quad[i]);
                normals.push(normal);
            }
        }

        // Streams are built in lockstep above, so indexing cannot fail
        index_vbo(&positions, &normals).unwrap_or_default()
    }
}

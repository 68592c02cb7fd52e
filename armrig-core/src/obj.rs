/// Wavefront OBJ reader for triangulated meshes exported with positions, UVs and normals
use log::{debug, info};
use nalgebra::{Point3, Vector3};
use nom::{
    character::complete::{char, space0, space1, u32 as decimal},
    combinator::{all_consuming, opt},
    number::complete::float,
    sequence::preceded,
    IResult,
};
use std::fs;
use std::path::Path;

use crate::error::MeshError;
use crate::geometry::IndexedMesh;
use crate::indexer::index_vbo;

/// Per-corner attribute streams, three entries per triangle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjData {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
}

impl ObjData {
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Deduplicate the streams into a drawable mesh
    pub fn into_indexed(self) -> Result<IndexedMesh, MeshError> {
        index_vbo(&self.positions, &self.normals)
    }
}

/// 1-based references of one face corner; the texture coordinate is ignored
#[derive(Debug, Clone, Copy)]
struct FaceCorner {
    position: u32,
    normal: u32,
}

/// Read and parse an OBJ file from disk
pub fn load_obj(path: &Path) -> Result<ObjData, MeshError> {
    info!("Loading OBJ file {}", path.display());
    let text = fs::read_to_string(path).map_err(|source| MeshError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let data = parse_obj(&text)?;
    debug!(
        "{}: {} triangles",
        path.display(),
        data.triangle_count()
    );
    Ok(data)
}

/// Read an OBJ file and index it in one step
pub fn load_indexed(path: &Path) -> Result<IndexedMesh, MeshError> {
    load_obj(path)?.into_indexed()
}

/// Parse OBJ text.
///
/// Only `v`, `vn` and `f` records are read. Faces must be exactly three
/// `v/vt/vn` triples; anything else (`v//vn`, quads, polygons) is rejected
/// so a partially-read mesh never reaches the renderer.
pub fn parse_obj(input: &str) -> Result<ObjData, MeshError> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut corners: Vec<(usize, FaceCorner)> = Vec::new();

    for (number, raw) in input.lines().enumerate() {
        let line = number + 1;
        let record = raw.trim();
        let (keyword, rest) = record
            .split_once(|c: char| c.is_whitespace())
            .unwrap_or((record, ""));

        match keyword {
            "v" => {
                let (_, v) = all_consuming(parse_vector3)(rest).map_err(|_| MeshError::Malformed {
                    line,
                    record: keyword.to_string(),
                })?;
                positions.push(Point3::from(v));
            }
            "vn" => {
                let (_, n) = all_consuming(parse_vector3)(rest).map_err(|_| MeshError::Malformed {
                    line,
                    record: keyword.to_string(),
                })?;
                normals.push(n);
            }
            "f" => {
                let (_, face) = all_consuming(parse_face)(rest)
                    .map_err(|_| MeshError::UnsupportedFace { line })?;
                corners.extend(face.into_iter().map(|corner| (line, corner)));
            }
            // vt, comments, groups, smoothing, materials
            _ => {}
        }
    }

    let mut data = ObjData {
        positions: Vec::with_capacity(corners.len()),
        normals: Vec::with_capacity(corners.len()),
    };
    for (line, corner) in corners {
        data.positions
            .push(resolve(&positions, corner.position, line, "position")?);
        data.normals
            .push(resolve(&normals, corner.normal, line, "normal")?);
    }

    Ok(data)
}

/// Convert a 1-based OBJ reference to an element of `items`
fn resolve<T: Copy>(items: &[T], index: u32, line: usize, kind: &'static str) -> Result<T, MeshError> {
    index
        .checked_sub(1)
        .and_then(|i| items.get(i as usize))
        .copied()
        .ok_or(MeshError::IndexOutOfRange {
            line,
            kind,
            index,
            count: items.len(),
        })
}

/// Three floats, tolerating the optional fourth `w` component of `v`
fn parse_vector3(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, _) = space0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = space1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = space1(input)?;
    let (input, z) = float(input)?;
    let (input, _) = opt(preceded(space1, float))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn parse_face(input: &str) -> IResult<&str, [FaceCorner; 3]> {
    let (input, _) = space0(input)?;
    let (input, a) = parse_corner(input)?;
    let (input, _) = space1(input)?;
    let (input, b) = parse_corner(input)?;
    let (input, _) = space1(input)?;
    let (input, c) = parse_corner(input)?;
    let (input, _) = space0(input)?;
    Ok((input, [a, b, c]))
}

fn parse_corner(input: &str) -> IResult<&str, FaceCorner> {
    let (input, position) = decimal(input)?;
    let (input, _) = char('/')(input)?;
    let (input, _texcoord) = decimal(input)?;
    let (input, _) = char('/')(input)?;
    let (input, normal) = decimal(input)?;
    Ok((input, FaceCorner { position, normal }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const QUAD: &str = "\
# two triangles sharing an edge
o Plane
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 1.0
vn 0.0 0.0 1.0
s off
f 1/1/1 2/1/1 3/2/1
f 1/1/1 3/2/1 4/2/1
";

    #[test]
    fn test_parse_corner_streams() {
        let data = parse_obj(QUAD).unwrap();
        assert_eq!(data.triangle_count(), 2);
        assert_eq!(data.positions.len(), 6);
        // 1-based references become 0-based lookups
        assert_eq!(data.positions[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(data.positions[5], Point3::new(0.0, 1.0, 0.0));
        assert!(data.normals.iter().all(|n| *n == Vector3::z()));
    }

    #[test]
    fn test_parse_and_index() {
        let mesh = parse_obj(QUAD).unwrap().into_indexed().unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_face_without_texcoord_is_rejected() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        assert!(matches!(
            parse_obj(text),
            Err(MeshError::UnsupportedFace { line: 5 })
        ));
    }

    #[test]
    fn test_quad_face_is_rejected() {
        let text = QUAD.replace("f 1/1/1 2/1/1 3/2/1", "f 1/1/1 2/1/1 3/2/1 4/2/1");
        assert!(matches!(
            parse_obj(&text),
            Err(MeshError::UnsupportedFace { line: 11 })
        ));
    }

    #[test]
    fn test_index_out_of_range() {
        let text = "v 0 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 1/1/1\n";
        match parse_obj(text) {
            Err(MeshError::IndexOutOfRange {
                line,
                kind,
                index,
                count,
            }) => {
                assert_eq!((line, kind, index, count), (3, "position", 2, 1));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_zero_index_is_out_of_range() {
        let text = "v 0 0 0\nvn 0 0 1\nf 1/1/0 1/1/1 1/1/1\n";
        assert!(matches!(
            parse_obj(text),
            Err(MeshError::IndexOutOfRange { kind: "normal", index: 0, .. })
        ));
    }

    #[test]
    fn test_malformed_vertex() {
        let text = "v 0.0 zero 1.0\n";
        assert!(matches!(
            parse_obj(text),
            Err(MeshError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(QUAD.as_bytes()).unwrap();

        let mesh = load_indexed(file.path()).unwrap();
        assert_eq!(mesh.index_count(), 6);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_obj(&dir.path().join("Missing.obj"));
        assert!(matches!(result, Err(MeshError::Open { .. })));
    }
}

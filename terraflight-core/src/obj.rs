/// Loader for the OBJ subset used by the flyover scenes
///
/// Supported directives: `v x y z`, `vn x y z`, and `f` with 1-based
/// `p`, `p//n`, or `p/t/n` vertex references (any texture index is ignored).
/// Polygonal faces are fan-triangulated from their first vertex. Anything
/// else (`#`, `o`, `usemtl`, `vt`, ...) is skipped. A malformed directive
/// fails the whole load.
use std::collections::HashMap;

use log::debug;
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::take_till1,
    character::complete::{multispace0, multispace1},
    combinator::all_consuming,
    multi::many1,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use thiserror::Error;

use crate::trimesh::{GeometryError, IndexTriple, Trimesh};

#[derive(Debug, Error, PartialEq)]
pub enum ObjError {
    #[error("malformed OBJ directive on line {line}")]
    Malformed { line: usize },
    #[error("face references an out-of-range index on line {line}")]
    IndexOutOfRange { line: usize },
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Parse OBJ text into a deduplicated `Trimesh`.
///
/// Each distinct face reference (the raw `p`/`p//n`/`p/t/n` token, the
/// "vertex key") is emitted exactly once; faces that reuse a key reuse its
/// output index. If the file carries no `vn` lines, smooth normals are
/// generated before returning, so the mesh always has normals.
pub fn load_obj(text: &str) -> Result<Trimesh, ObjError> {
    let mut tmp_positions: Vec<Point3<f32>> = Vec::new();
    let mut tmp_normals: Vec<Vector3<f32>> = Vec::new();
    // (line number, raw face reference tokens), resolved in a second pass
    // so faces may precede the vertices they reference
    let mut faces: Vec<(usize, Vec<&str>)> = Vec::new();

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("vn") {
            if !rest.starts_with(char::is_whitespace) {
                continue;
            }
            let (_, normal) = all_consuming(coordinate_triple)(rest)
                .map_err(|_| ObjError::Malformed { line })?;
            tmp_normals.push(Vector3::new(normal[0], normal[1], normal[2]));
        } else if let Some(rest) = trimmed.strip_prefix('v') {
            if !rest.starts_with(char::is_whitespace) {
                continue; // vt and friends
            }
            let (_, position) = all_consuming(coordinate_triple)(rest)
                .map_err(|_| ObjError::Malformed { line })?;
            tmp_positions.push(Point3::new(position[0], position[1], position[2]));
        } else if let Some(rest) = trimmed.strip_prefix('f') {
            if !rest.starts_with(char::is_whitespace) {
                continue;
            }
            let (_, refs) = all_consuming(face_references)(rest)
                .map_err(|_| ObjError::Malformed { line })?;
            if refs.len() < 3 {
                return Err(ObjError::Malformed { line });
            }
            faces.push((line, refs));
        }
    }

    let has_normals = !tmp_normals.is_empty();
    let mut positions: Vec<Point3<f32>> = Vec::new();
    let mut normals: Vec<Vector3<f32>> = Vec::new();
    let mut indices: Vec<IndexTriple> = Vec::new();
    let mut key_to_index: HashMap<&str, u32> = HashMap::new();

    for (line, refs) in &faces {
        let mut resolved = Vec::with_capacity(refs.len());
        for key in refs {
            let index = match key_to_index.get(key) {
                Some(&index) => index,
                None => {
                    let (position_index, normal_index) = split_vertex_key(key, *line)?;
                    let position = *tmp_positions
                        .get(position_index)
                        .ok_or(ObjError::IndexOutOfRange { line: *line })?;

                    let index = positions.len() as u32;
                    positions.push(position);
                    if has_normals {
                        let normal_index =
                            normal_index.ok_or(ObjError::Malformed { line: *line })?;
                        let normal = *tmp_normals
                            .get(normal_index)
                            .ok_or(ObjError::IndexOutOfRange { line: *line })?;
                        normals.push(normal);
                    }
                    key_to_index.insert(*key, index);
                    index
                }
            };
            resolved.push(index);
        }

        // Fan triangulation from the first referenced vertex
        for i in 1..resolved.len() - 1 {
            indices.push([resolved[0], resolved[i], resolved[i + 1]]);
        }
    }

    debug!(
        "loaded OBJ: {} vertices, {} triangles, normals {}",
        positions.len(),
        indices.len(),
        if has_normals { "from file" } else { "generated" }
    );

    let mut mesh = Trimesh::new(positions, normals, indices, Vec::new());
    if !has_normals {
        mesh.generate_normals()?;
    }
    Ok(mesh)
}

/// Three whitespace-separated floats after a directive keyword
fn coordinate_triple(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, x) = preceded(multispace1, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, [x, y, z]))
}

/// The raw vertex-reference tokens of a face line
fn face_references(input: &str) -> IResult<&str, Vec<&str>> {
    let (input, refs) = many1(preceded(
        multispace1,
        take_till1(|c: char| c.is_whitespace()),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, refs))
}

/// Split a vertex key into 0-based position and optional normal indices.
fn split_vertex_key(key: &str, line: usize) -> Result<(usize, Option<usize>), ObjError> {
    let mut parts = key.split('/');
    let position = parts.next().unwrap_or("");
    let texture = parts.next();
    let normal = parts.next();
    if parts.next().is_some() {
        return Err(ObjError::Malformed { line });
    }
    // `p/t` carries no normal; `p//n` leaves the texture slot empty
    let _ = texture;

    let position_index = parse_obj_index(position, line)?;
    let normal_index = match normal {
        Some(n) => Some(parse_obj_index(n, line)?),
        None => None,
    };
    Ok((position_index, normal_index))
}

/// OBJ indices are 1-based; convert to a 0-based array offset.
fn parse_obj_index(token: &str, line: usize) -> Result<usize, ObjError> {
    token
        .parse::<usize>()
        .ok()
        .and_then(|i| i.checked_sub(1))
        .ok_or(ObjError::Malformed { line })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_without_normals_generates_them() {
        let mesh = load_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices(), &[[0, 1, 2]]);
        for n in mesh.normals() {
            assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
        }
    }

    #[test]
    fn test_shared_keys_are_deduplicated() {
        // Two triangles of a quad share an edge: 4 distinct keys, not 6
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n";
        let mesh = load_obj(text).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_same_position_different_normal_is_two_vertices() {
        let text = concat!(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n",
            "vn 0 0 1\nvn 0 1 0\n",
            "f 1//1 2//1 3//1\n",
            "f 1//2 2//2 3//2\n",
        );
        let mesh = load_obj(text).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.normals().len(), 6);
    }

    #[test]
    fn test_polygon_fans_into_triangles() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = load_obj(text).unwrap();
        assert_eq!(mesh.indices(), &[[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_slash_slash_normals_are_resolved() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let mesh = load_obj(text).unwrap();
        assert_eq!(mesh.normals().len(), 3);
        assert!((mesh.normals()[0] - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_unknown_directives_are_skipped() {
        let text = "# comment\no thing\nusemtl mat\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        assert!(load_obj(text).is_ok());
    }

    #[test]
    fn test_non_numeric_coordinate_fails_the_load() {
        let err = load_obj("v 0 zero 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap_err();
        assert_eq!(err, ObjError::Malformed { line: 1 });
    }

    #[test]
    fn test_wrong_arity_fails_the_load() {
        let err = load_obj("v 0 0\n").unwrap_err();
        assert_eq!(err, ObjError::Malformed { line: 1 });
    }

    #[test]
    fn test_out_of_range_face_index_fails_the_load() {
        let err = load_obj("v 0 0 0\nv 1 0 0\nf 1 2 9\n").unwrap_err();
        assert_eq!(err, ObjError::IndexOutOfRange { line: 3 });
    }

    #[test]
    fn test_short_face_fails_the_load() {
        let err = load_obj("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
        assert_eq!(err, ObjError::Malformed { line: 3 });
    }

    #[test]
    fn test_missing_normal_in_normal_bearing_file_fails() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3\n";
        let err = load_obj(text).unwrap_err();
        assert_eq!(err, ObjError::Malformed { line: 5 });
    }
}

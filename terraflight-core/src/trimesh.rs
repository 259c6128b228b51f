/// Indexed triangle mesh with generated normals and derived bounds
use nalgebra::{Point2, Point3, Vector3};
use thiserror::Error;

/// Three offsets into the position array, one triangle per entry.
pub type IndexTriple = [u32; 3];

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("mesh has no positions")]
    EmptyMesh,
    #[error("bounding box has not been computed yet")]
    BoundsNotComputed,
    #[error("triangle {triangle} has zero area")]
    DegenerateTriangle { triangle: usize },
}

/// An indexed triangle mesh.
///
/// Positions, normals, and texture coordinates are parallel arrays; normals
/// and texture coordinates may be empty until generated/provided. Bounds and
/// centroid are computed on demand and cached; they are NOT invalidated if
/// the positions are mutated afterwards — recompute after structural edits.
#[derive(Debug, Clone)]
pub struct Trimesh {
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    indices: Vec<IndexTriple>,
    tex_coords: Vec<Point2<f32>>,
    bounds: Option<(Point3<f32>, Point3<f32>)>,
    centroid: Option<Point3<f32>>,
}

impl Trimesh {
    pub fn new(
        positions: Vec<Point3<f32>>,
        normals: Vec<Vector3<f32>>,
        indices: Vec<IndexTriple>,
        tex_coords: Vec<Point2<f32>>,
    ) -> Self {
        debug_assert!(
            indices
                .iter()
                .flatten()
                .all(|&i| (i as usize) < positions.len()),
            "triangle index out of range"
        );
        Self {
            positions,
            normals,
            indices,
            tex_coords,
            bounds: None,
            centroid: None,
        }
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn indices(&self) -> &[IndexTriple] {
        &self.indices
    }

    pub fn tex_coords(&self) -> &[Point2<f32>] {
        &self.tex_coords
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Cached bounding-box corners, if `bounding_box` has been called.
    pub fn min(&self) -> Option<Point3<f32>> {
        self.bounds.map(|(min, _)| min)
    }

    pub fn max(&self) -> Option<Point3<f32>> {
        self.bounds.map(|(_, max)| max)
    }

    /// Generate one smooth normal per vertex.
    ///
    /// Each triangle's unit face normal `(B - A) x (C - A)` is accumulated
    /// into its three vertices, then every accumulator is normalized. A
    /// vertex referenced by no triangle keeps a zero normal.
    pub fn generate_normals(&mut self) -> Result<(), GeometryError> {
        let mut accum = vec![Vector3::zeros(); self.positions.len()];

        for (t, &[ia, ib, ic]) in self.indices.iter().enumerate() {
            let a = self.positions[ia as usize];
            let b = self.positions[ib as usize];
            let c = self.positions[ic as usize];

            let face_normal = (b - a)
                .cross(&(c - a))
                .try_normalize(1e-12)
                .ok_or(GeometryError::DegenerateTriangle { triangle: t })?;

            accum[ia as usize] += face_normal;
            accum[ib as usize] += face_normal;
            accum[ic as usize] += face_normal;
        }

        self.normals = accum
            .into_iter()
            .map(|n| n.try_normalize(1e-12).unwrap_or_else(Vector3::zeros))
            .collect();
        Ok(())
    }

    /// Scan all positions and return (and cache) the component-wise
    /// min/max corners.
    pub fn bounding_box(&mut self) -> Result<(Point3<f32>, Point3<f32>), GeometryError> {
        let first = *self.positions.first().ok_or(GeometryError::EmptyMesh)?;
        let mut min = first;
        let mut max = first;

        for pos in &self.positions {
            min = Point3::new(min.x.min(pos.x), min.y.min(pos.y), min.z.min(pos.z));
            max = Point3::new(max.x.max(pos.x), max.y.max(pos.y), max.z.max(pos.z));
        }

        self.bounds = Some((min, max));
        self.centroid = Some(nalgebra::center(&min, &max));
        Ok((min, max))
    }

    /// Midpoint of the last computed bounding box (box center, not a mass
    /// centroid). Calling this before `bounding_box` is a usage error.
    pub fn centroid(&self) -> Result<Point3<f32>, GeometryError> {
        self.centroid.ok_or(GeometryError::BoundsNotComputed)
    }

    /// Positions flattened to `[x, y, z, x, y, z, ..]` for buffer upload.
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }

    pub fn flat_normals(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| [n.x, n.y, n.z]).collect()
    }

    pub fn flat_tex(&self) -> Vec<f32> {
        self.tex_coords.iter().flat_map(|t| [t.x, t.y]).collect()
    }

    pub fn flat_indices(&self) -> Vec<u32> {
        self.indices.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> Trimesh {
        Trimesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![],
            vec![[0, 1, 2]],
            vec![],
        )
    }

    #[test]
    fn test_bounding_box_and_centroid() {
        let mut mesh = Trimesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 3.0, -1.0),
                Point3::new(1.0, 5.0, 4.0),
            ],
            vec![],
            vec![[0, 1, 2]],
            vec![],
        );
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, -1.0));
        assert_eq!(max, Point3::new(2.0, 5.0, 4.0));
        assert_eq!(mesh.centroid().unwrap(), Point3::new(1.0, 2.5, 1.5));
    }

    #[test]
    fn test_centroid_before_bounds_is_an_error() {
        let mesh = triangle_mesh();
        assert_eq!(mesh.centroid(), Err(GeometryError::BoundsNotComputed));
    }

    #[test]
    fn test_bounding_box_of_empty_mesh_fails() {
        let mut mesh = Trimesh::new(vec![], vec![], vec![], vec![]);
        assert_eq!(mesh.bounding_box(), Err(GeometryError::EmptyMesh));
    }

    #[test]
    fn test_generated_normal_faces_plus_z() {
        let mut mesh = triangle_mesh();
        mesh.generate_normals().unwrap();
        assert_eq!(mesh.normals().len(), 3);
        for n in mesh.normals() {
            assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
        }
    }

    #[test]
    fn test_generated_normals_are_unit_length() {
        // Two triangles of a unit square folded along the Y axis
        let mut mesh = Trimesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, -1.0),
            ],
            vec![],
            vec![[0, 1, 2], [0, 2, 3]],
            vec![],
        );
        mesh.generate_normals().unwrap();
        for n in mesh.normals() {
            assert!((n.norm() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_area_triangle_is_rejected() {
        let mut mesh = Trimesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 1.0),
                Point3::new(2.0, 2.0, 2.0),
            ],
            vec![],
            vec![[0, 1, 2]],
            vec![],
        );
        assert_eq!(
            mesh.generate_normals(),
            Err(GeometryError::DegenerateTriangle { triangle: 0 })
        );
    }

    #[test]
    fn test_flat_accessors_interleave_components() {
        let mut mesh = triangle_mesh();
        mesh.generate_normals().unwrap();
        assert_eq!(mesh.flat_positions().len(), 9);
        assert_eq!(mesh.flat_normals().len(), 9);
        assert_eq!(mesh.flat_indices(), vec![0, 1, 2]);
        assert_eq!(mesh.flat_positions()[3], 1.0);
    }
}

/// Heightmap terrain: a regular grid of elevation samples
use log::debug;
use nalgebra::{Point2, Point3};
use thiserror::Error;

use crate::trimesh::{IndexTriple, Trimesh};

#[derive(Debug, Error, PartialEq)]
pub enum TerrainError {
    #[error("elevation grid holds {actual} samples, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("terrain needs at least one sample in each direction")]
    EmptyGrid,
}

/// A `width x depth` grid of elevations, row-major with `x` varying fastest.
///
/// The grid is the source of truth for both the renderable terrain mesh
/// (`to_trimesh`) and the bilinear ground queries that keep a terrain-bound
/// camera riding the surface (`sample_height`).
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    elevations: Vec<f32>,
    width: usize,
    depth: usize,
}

impl Terrain {
    pub fn new(elevations: Vec<f32>, width: usize, depth: usize) -> Result<Self, TerrainError> {
        if width == 0 || depth == 0 {
            return Err(TerrainError::EmptyGrid);
        }
        if elevations.len() != width * depth {
            return Err(TerrainError::DimensionMismatch {
                expected: width * depth,
                actual: elevations.len(),
            });
        }
        Ok(Self {
            elevations,
            width,
            depth,
        })
    }

    /// Build a terrain from raw 8-bit grayscale samples, one byte per grid
    /// point, as produced by a decoded heightmap image.
    pub fn from_grayscale(samples: &[u8], width: usize, depth: usize) -> Result<Self, TerrainError> {
        let elevations = samples.iter().map(|&s| f32::from(s)).collect();
        Self::new(elevations, width, depth)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Elevation at an integer grid point.
    pub fn elevation(&self, x: usize, z: usize) -> f32 {
        debug_assert!(x < self.width && z < self.depth);
        self.elevations[z * self.width + x]
    }

    /// Bilinear elevation at fractional coordinates.
    ///
    /// Coordinates are clamped into `[0, width-1] x [0, depth-1]` before
    /// sampling, so edge and out-of-range queries never fail; camera
    /// buoyancy depends on that.
    pub fn sample_height(&self, x: f32, z: f32) -> f32 {
        let x = x.clamp(0.0, (self.width - 1) as f32);
        let z = z.clamp(0.0, (self.depth - 1) as f32);

        let x0 = x.floor() as usize;
        let z0 = z.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.depth - 1);
        let tx = x - x0 as f32;
        let tz = z - z0 as f32;

        let near = self.elevation(x0, z0) * (1.0 - tx) + self.elevation(x1, z0) * tx;
        let far = self.elevation(x0, z1) * (1.0 - tx) + self.elevation(x1, z1) * tx;
        near * (1.0 - tz) + far * tz
    }

    /// Emit the grid as an indexed mesh: one vertex per sample at
    /// `(x, elevation, z)`, texture coordinates spanning `[0, 1]` over the
    /// grid extent, and two triangles per unit cell wound so generated
    /// normals face +Y.
    ///
    /// Normals are not generated here; call `generate_normals` on the
    /// result, as the render path does.
    pub fn to_trimesh(&self) -> Trimesh {
        let mut positions = Vec::with_capacity(self.width * self.depth);
        let mut tex_coords = Vec::with_capacity(self.width * self.depth);
        for z in 0..self.depth {
            for x in 0..self.width {
                positions.push(Point3::new(x as f32, self.elevation(x, z), z as f32));
                tex_coords.push(Point2::new(
                    x as f32 / self.width as f32,
                    z as f32 / self.depth as f32,
                ));
            }
        }

        let mut indices: Vec<IndexTriple> = Vec::new();
        let stride = self.width as u32;
        for z in 0..self.depth.saturating_sub(1) {
            for x in 0..self.width.saturating_sub(1) {
                let a = z as u32 * stride + x as u32;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                indices.push([a, c, b]);
                indices.push([b, c, d]);
            }
        }

        debug!(
            "terrain mesh: {}x{} grid, {} vertices, {} triangles",
            self.width,
            self.depth,
            positions.len(),
            indices.len()
        );

        Trimesh::new(positions, Vec::new(), indices, tex_coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn ramp() -> Terrain {
        // 3x2 grid rising along +x
        Terrain::new(vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0], 3, 2).unwrap()
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        assert_eq!(
            Terrain::new(vec![0.0; 5], 3, 2),
            Err(TerrainError::DimensionMismatch {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn test_sample_is_exact_at_grid_points() {
        let terrain = ramp();
        assert_eq!(terrain.sample_height(0.0, 0.0), 0.0);
        assert_eq!(terrain.sample_height(2.0, 1.0), 2.0);
        assert_eq!(terrain.sample_height(1.0, 0.0), 1.0);
    }

    #[test]
    fn test_sample_at_cell_midpoint_averages_corners() {
        let terrain = Terrain::new(vec![0.0, 4.0, 8.0, 12.0], 2, 2).unwrap();
        assert!((terrain.sample_height(0.5, 0.5) - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_samples_clamp() {
        let terrain = ramp();
        assert_eq!(terrain.sample_height(-10.0, -10.0), 0.0);
        assert_eq!(terrain.sample_height(1000.0, 1000.0), 2.0);
    }

    #[test]
    fn test_mesh_has_one_vertex_per_sample_and_two_triangles_per_cell() {
        let mesh = ramp().to_trimesh();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.tex_coords().len(), 6);
    }

    #[test]
    fn test_mesh_heights_match_samples() {
        let mesh = ramp().to_trimesh();
        let p = mesh.positions()[5]; // row z = 1, column x = 2
        assert_eq!(p, Point3::new(2.0, 2.0, 1.0));
    }

    #[test]
    fn test_flat_terrain_normals_face_up() {
        let terrain = Terrain::new(vec![5.0; 9], 3, 3).unwrap();
        let mut mesh = terrain.to_trimesh();
        mesh.generate_normals().unwrap();
        for n in mesh.normals() {
            assert!((n - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
        }
    }

    #[test]
    fn test_grayscale_samples_widen_losslessly() {
        let terrain = Terrain::from_grayscale(&[0, 128, 255, 7], 2, 2).unwrap();
        assert_eq!(terrain.elevation(1, 1), 7.0);
        assert_eq!(terrain.elevation(0, 1), 255.0);
    }
}

/// Explicit scene state: placed meshes and collectible pickup logic
///
/// The host's event handlers used to mutate shared object/position lists;
/// here the whole mutable scene lives in one `SceneState` value that update
/// functions take and return control of.
use log::debug;
use nalgebra::{Matrix4, Point3};

use crate::transform::Transform;
use crate::trimesh::{GeometryError, Trimesh};

/// A mesh instance placed in the world: its model transform plus the
/// model-space bounding box captured at creation time.
#[derive(Debug, Clone)]
pub struct Prop {
    world_from_model: Matrix4<f32>,
    min: Point3<f32>,
    max: Point3<f32>,
}

impl Prop {
    /// Capture the mesh's bounding box and place it under `world_from_model`.
    pub fn from_trimesh(
        mesh: &mut Trimesh,
        world_from_model: Matrix4<f32>,
    ) -> Result<Self, GeometryError> {
        let (min, max) = mesh.bounding_box()?;
        Ok(Self {
            world_from_model,
            min,
            max,
        })
    }

    pub fn world_from_model(&self) -> &Matrix4<f32> {
        &self.world_from_model
    }

    /// World-space axis-aligned bounds: all eight model-space box corners
    /// transformed, then reduced component-wise.
    pub fn world_bounds(&self) -> (Point3<f32>, Point3<f32>) {
        let mut min = Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut max = Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
        for corner in [
            Point3::new(self.min.x, self.min.y, self.min.z),
            Point3::new(self.max.x, self.min.y, self.min.z),
            Point3::new(self.min.x, self.max.y, self.min.z),
            Point3::new(self.max.x, self.max.y, self.min.z),
            Point3::new(self.min.x, self.min.y, self.max.z),
            Point3::new(self.max.x, self.min.y, self.max.z),
            Point3::new(self.min.x, self.max.y, self.max.z),
            Point3::new(self.max.x, self.max.y, self.max.z),
        ] {
            let p = self.world_from_model.transform_point(&corner);
            min = Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        (min, max)
    }

    /// Ground-plane containment test used for pickups: y is ignored so a
    /// camera riding the terrain can collect objects hovering above it.
    pub fn contains_xz(&self, position: Point3<f32>) -> bool {
        let (min, max) = self.world_bounds();
        position.x >= min.x && position.x <= max.x && position.z >= min.z && position.z <= max.z
    }
}

/// All mutable world state: static props, remaining collectibles, and the
/// running pickup count.
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    props: Vec<Prop>,
    collectibles: Vec<Prop>,
    collected: usize,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_prop(&mut self, prop: Prop) {
        self.props.push(prop);
    }

    pub fn add_collectible(&mut self, prop: Prop) {
        self.collectibles.push(prop);
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn collectibles(&self) -> &[Prop] {
        &self.collectibles
    }

    pub fn collected(&self) -> usize {
        self.collected
    }

    /// Per-frame collectible spin about each item's own model Y axis.
    pub fn spin_collectibles(&mut self, degrees: f32) {
        let spin = Transform::rotate_y(degrees);
        for collectible in &mut self.collectibles {
            collectible.world_from_model *= spin;
        }
    }

    /// Remove and count the first collectible whose ground footprint
    /// contains `position`. Returns whether anything was picked up.
    pub fn collect_at(&mut self, position: Point3<f32>) -> bool {
        match self
            .collectibles
            .iter()
            .position(|c| c.contains_xz(position))
        {
            Some(index) => {
                self.collectibles.remove(index);
                self.collected += 1;
                debug!(
                    "collected item at ({:.1}, {:.1}), {} remaining",
                    position.x,
                    position.z,
                    self.collectibles.len()
                );
                true
            }
            None => false,
        }
    }
}

/// First-person camera with incremental yaw/pitch and terrain riding
use nalgebra::{Matrix4, Point3, UnitVector3, Vector3};
use thiserror::Error;

use crate::terrain::Terrain;
use crate::transform::Transform;

/// Accumulated pitch must stay strictly inside (-80, 80) degrees so the
/// forward vector can never flip through the vertical.
const PITCH_LIMIT_DEGREES: f32 = 80.0;

const MIN_DIRECTION_NORM: f32 = 1e-6;

#[derive(Debug, Error, PartialEq)]
pub enum CameraError {
    #[error("look direction is zero-length or parallel to the world up")]
    DegenerateDirection,
}

/// A camera defined by a position, a unit forward direction, and a fixed
/// world up.
///
/// `right` and the view matrix are re-derived from `forward` and `world_up`
/// after every mutation rather than integrated incrementally; that
/// Gram-Schmidt-style rebuild is what keeps the basis orthonormal under
/// arbitrarily long sequences of yaw/pitch/move calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Point3<f32>,
    forward: UnitVector3<f32>,
    world_up: UnitVector3<f32>,
    right: UnitVector3<f32>,
    eye_from_world: Matrix4<f32>,
    pitch_degrees: f32,
}

impl Camera {
    /// Place a camera at `from` looking toward `to`.
    ///
    /// Fails if the look direction is zero-length or parallel to
    /// `world_up` — the orthonormal basis would be undefined.
    pub fn look_at(
        from: Point3<f32>,
        to: Point3<f32>,
        world_up: Vector3<f32>,
    ) -> Result<Self, CameraError> {
        let forward = UnitVector3::try_new(to - from, MIN_DIRECTION_NORM)
            .ok_or(CameraError::DegenerateDirection)?;
        let world_up = UnitVector3::try_new(world_up, MIN_DIRECTION_NORM)
            .ok_or(CameraError::DegenerateDirection)?;
        let right = UnitVector3::try_new(forward.cross(&world_up), MIN_DIRECTION_NORM)
            .ok_or(CameraError::DegenerateDirection)?;

        let mut camera = Self {
            position: from,
            forward,
            world_up,
            right,
            eye_from_world: Matrix4::identity(),
            pitch_degrees: 0.0,
        };
        camera.reorient();
        Ok(camera)
    }

    /// Translate along the forward direction.
    pub fn advance(&mut self, distance: f32) {
        self.position += self.forward.into_inner() * distance;
        self.reorient();
    }

    /// Translate along the right direction.
    pub fn strafe(&mut self, distance: f32) {
        self.position += self.right.into_inner() * distance;
        self.reorient();
    }

    /// Rotate the forward direction about the world up. Positive degrees
    /// turn toward the camera's right, matching mouse-drag expectations.
    pub fn yaw(&mut self, degrees: f32) {
        let rotation = Transform::rotate_around_axis(&self.world_up, -degrees);
        self.forward = UnitVector3::new_normalize(rotation.transform_vector(&self.forward));
        self.reorient();
    }

    /// Rotate the forward direction about the current right axis. Positive
    /// degrees look up. A request that would push the accumulated pitch out
    /// of (-80, 80) degrees is rejected outright, not clamped.
    pub fn pitch(&mut self, degrees: f32) {
        let accumulated = self.pitch_degrees + degrees;
        if accumulated <= -PITCH_LIMIT_DEGREES || accumulated >= PITCH_LIMIT_DEGREES {
            return;
        }
        let rotation = Transform::rotate_around_axis(&self.right, degrees);
        // new_normalize counters floating-point drift from the rotation
        self.forward = UnitVector3::new_normalize(rotation.transform_vector(&self.forward));
        self.pitch_degrees = accumulated;
        self.reorient();
    }

    /// Move the camera without changing its orientation.
    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
        self.reorient();
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.forward.into_inner()
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right.into_inner()
    }

    pub fn world_up(&self) -> Vector3<f32> {
        self.world_up.into_inner()
    }

    /// The view matrix mapping world coordinates into eye space.
    pub fn eye_from_world(&self) -> &Matrix4<f32> {
        &self.eye_from_world
    }

    /// Rebuild `right` and the view matrix from `forward` and the fixed
    /// world up. The rotation rows are right / up / -forward over the
    /// homogeneous identity row, applied after translating by -position.
    fn reorient(&mut self) {
        self.right = UnitVector3::new_normalize(self.forward.cross(&self.world_up));
        let up = UnitVector3::new_normalize(self.right.cross(&self.forward));

        let r = &self.right;
        let f = &self.forward;
        #[rustfmt::skip]
        let rotation = Matrix4::new(
             r.x,  r.y,  r.z, 0.0,
            up.x, up.y, up.z, 0.0,
            -f.x, -f.y, -f.z, 0.0,
             0.0,  0.0,  0.0, 1.0,
        );
        let translation =
            Transform::translate(-self.position.x, -self.position.y, -self.position.z);
        self.eye_from_world = rotation * translation;
    }
}

/// Ground-riding policy for a camera: clamps the position into the terrain
/// extent and pins its height to the sampled surface plus an eye offset.
///
/// The terrain is borrowed, not owned; it must outlive the constraint.
#[derive(Debug, Clone)]
pub struct GroundConstraint<'t> {
    terrain: &'t Terrain,
    eye_level: f32,
}

impl<'t> GroundConstraint<'t> {
    pub fn new(terrain: &'t Terrain, eye_level: f32) -> Self {
        Self { terrain, eye_level }
    }

    pub fn eye_level(&self) -> f32 {
        self.eye_level
    }

    pub fn elevate(&mut self, distance: f32) {
        self.eye_level += distance;
    }

    /// Clamp x/z into `[0, width] x [0, depth]` and buoy y onto the surface.
    pub fn apply(&self, position: Point3<f32>) -> Point3<f32> {
        let x = position.x.clamp(0.0, self.terrain.width() as f32);
        let z = position.z.clamp(0.0, self.terrain.depth() as f32);
        let y = self.terrain.sample_height(x, z) + self.eye_level;
        Point3::new(x, y, z)
    }
}

/// A `Camera` composed with a `GroundConstraint`, reapplied after every
/// positional mutation. Composition rather than subtyping: the orientation
/// math stays in `Camera`, the riding policy stays here.
#[derive(Debug, Clone)]
pub struct TerrainCamera<'t> {
    camera: Camera,
    ground: GroundConstraint<'t>,
}

impl<'t> TerrainCamera<'t> {
    pub fn new(
        from: Point3<f32>,
        to: Point3<f32>,
        world_up: Vector3<f32>,
        terrain: &'t Terrain,
        eye_level: f32,
    ) -> Result<Self, CameraError> {
        let camera = Camera::look_at(from, to, world_up)?;
        let ground = GroundConstraint::new(terrain, eye_level);
        let mut this = Self { camera, ground };
        this.snap_to_ground();
        Ok(this)
    }

    pub fn advance(&mut self, distance: f32) {
        self.camera.advance(distance);
        self.snap_to_ground();
    }

    pub fn strafe(&mut self, distance: f32) {
        self.camera.strafe(distance);
        self.snap_to_ground();
    }

    /// Raise or lower the eye offset above the terrain surface.
    pub fn elevate(&mut self, distance: f32) {
        self.ground.elevate(distance);
        self.snap_to_ground();
    }

    pub fn yaw(&mut self, degrees: f32) {
        self.camera.yaw(degrees);
    }

    pub fn pitch(&mut self, degrees: f32) {
        self.camera.pitch(degrees);
    }

    pub fn position(&self) -> Point3<f32> {
        self.camera.position()
    }

    pub fn eye_from_world(&self) -> &Matrix4<f32> {
        self.camera.eye_from_world()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    fn snap_to_ground(&mut self) {
        let pinned = self.ground.apply(self.camera.position());
        self.camera.set_position(pinned);
    }
}

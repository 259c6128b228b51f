/// Matrix factories shared by the camera, shadow, and scene layers
use nalgebra::{Matrix4, Perspective3, Rotation3, UnitVector3, Vector3};

/// Named constructors for the 4x4 transforms used throughout the crate.
///
/// Every factory follows the same convention: right-handed coordinates,
/// column vectors, `matrix * point`. Angles are taken in degrees because
/// that is what the input layer (mouse deltas, key repeats) hands us.
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix4<f32> {
        Matrix4::identity()
    }

    /// Create a translation matrix
    pub fn translate(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a (possibly non-uniform) scale matrix
    pub fn scale(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Rotation about the world Y axis
    pub fn rotate_y(degrees: f32) -> Matrix4<f32> {
        Self::rotate_around_axis(&Vector3::y_axis(), degrees)
    }

    /// Rotation about an arbitrary unit axis.
    ///
    /// The axis is a `UnitVector3`, so a degenerate (zero-length) axis is
    /// rejected at the call site rather than producing NaNs here.
    pub fn rotate_around_axis(axis: &UnitVector3<f32>, degrees: f32) -> Matrix4<f32> {
        Rotation3::from_axis_angle(axis, degrees.to_radians()).to_homogeneous()
    }

    /// Perspective projection from a vertical field of view in degrees
    pub fn fov_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
        Perspective3::new(aspect, fov_degrees.to_radians(), near, far).to_homogeneous()
    }

    /// Create a model-view-projection matrix
    pub fn clip_from_model(
        projection: &Matrix4<f32>,
        view: &Matrix4<f32>,
        model: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

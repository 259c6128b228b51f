/// Light-space transform chain for shadow-map sampling
///
/// The depth render and the comparison itself happen in the host render
/// layer; this module only assembles the matrix that maps a world-space
/// point into the texture space of a previously rendered depth buffer.
use nalgebra::Matrix4;

use crate::camera::Camera;
use crate::transform::Transform;

/// Remap clip-space `[-1, 1]` to texture-space `[0, 1]` on every axis.
pub fn bias_matrix() -> Matrix4<f32> {
    Transform::translate(0.5, 0.5, 0.5) * Transform::scale(0.5, 0.5, 0.5)
}

/// `Bias * Projection_light * View_light` for a light modeled as a camera.
///
/// Recompute only when the light moves; the result is plain data handed to
/// the render layer as a uniform.
pub fn texture_from_world(
    light: &Camera,
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
) -> Matrix4<f32> {
    let clip_from_light = Transform::fov_perspective(fov_degrees, aspect, near, far);
    bias_matrix() * clip_from_light * light.eye_from_world()
}

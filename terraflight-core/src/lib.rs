/// Terraflight Core Library - geometry construction and spatial transforms
///
/// This library provides the stateless core of a terrain flyover viewer:
/// OBJ loading into deduplicated triangle meshes, heightmap terrain
/// generation with bilinear ground queries, an incremental-rotation camera
/// with a terrain-riding constraint, the light-space shadow chain, and the
/// scene state for placed and collectible objects. It emits plain vertex,
/// index, and matrix data; all drawing belongs to the host render layer.

pub mod camera;
pub mod obj;
pub mod scene;
pub mod shadow;
pub mod terrain;
pub mod transform;
pub mod trimesh;

// Re-export commonly used types
pub use camera::{Camera, CameraError, GroundConstraint, TerrainCamera};
pub use obj::{load_obj, ObjError};
pub use scene::{Prop, SceneState};
pub use shadow::{bias_matrix, texture_from_world};
pub use terrain::{Terrain, TerrainError};
pub use transform::Transform;
pub use trimesh::{GeometryError, IndexTriple, Trimesh};

/// Example: Build a terrain, fly a camera over it, and collect an object
///
/// Usage: cargo run --example flyover [-- path/to/model.obj]

use std::env;
use std::fs;
use std::io;

use nalgebra::{Point3, Vector3};
use terraflight_core::{
    load_obj, texture_from_world, Camera, Prop, SceneState, Terrain, TerrainCamera, Transform,
};

fn main() -> io::Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    // A gentle procedural heightmap stands in for a decoded grayscale image
    let (width, depth) = (64, 64);
    let elevations: Vec<f32> = (0..depth)
        .flat_map(|z| {
            (0..width).map(move |x| {
                20.0 + 8.0 * (x as f32 * 0.2).sin() + 6.0 * (z as f32 * 0.15).cos()
            })
        })
        .collect();
    let terrain = Terrain::new(elevations, width, depth)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    let mut terrain_mesh = terrain.to_trimesh();
    terrain_mesh
        .generate_normals()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    let (min, max) = terrain_mesh
        .bounding_box()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    println!(
        "terrain: {} vertices, {} triangles, bounds y [{:.1}, {:.1}]",
        terrain_mesh.vertex_count(),
        terrain_mesh.triangle_count(),
        min.y,
        max.y
    );
    println!(
        "upload arrays: {} position floats, {} normal floats, {} tex floats, {} indices",
        terrain_mesh.flat_positions().len(),
        terrain_mesh.flat_normals().len(),
        terrain_mesh.flat_tex().len(),
        terrain_mesh.flat_indices().len()
    );

    // Load a model if one was given, otherwise use a built-in tetrahedron
    let obj_text = match args.get(1) {
        Some(path) => {
            println!("Loading OBJ file: {}", path);
            fs::read_to_string(path)?
        }
        None => concat!(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\n",
            "f 1 3 2\nf 1 2 4\nf 1 4 3\nf 2 3 4\n",
        )
        .to_string(),
    };
    let mut model = load_obj(&obj_text)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    println!(
        "model: {} vertices, {} triangles",
        model.vertex_count(),
        model.triangle_count()
    );

    // Drop a spinning collectible near the middle of the map
    let mut scene = SceneState::new();
    let placement = Transform::translate(34.0, 40.0, 30.0) * Transform::scale(8.0, 8.0, 8.0);
    let collectible = Prop::from_trimesh(&mut model, placement)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    scene.add_collectible(collectible);

    // Fly across the terrain, riding the surface
    let mut camera = TerrainCamera::new(
        Point3::new(2.0, 0.0, 30.0),
        Point3::new(34.0, 0.0, 30.0),
        Vector3::y(),
        &terrain,
        3.0,
    )
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    for step in 0..16 {
        camera.advance(2.5);
        scene.spin_collectibles(12.0);
        if scene.collect_at(camera.position()) {
            println!("step {:2}: picked up the collectible!", step);
        }
        let p = camera.position();
        println!("step {:2}: camera at ({:6.2}, {:6.2}, {:6.2})", step, p.x, p.y, p.z);
    }
    println!("collected {} of 1", scene.collected());

    // The shadow chain the render layer would upload alongside the view
    let light = Camera::look_at(
        Point3::new(80.0, 60.0, 80.0),
        Point3::new(32.0, 20.0, 32.0),
        Vector3::y(),
    )
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    let shadow_chain = texture_from_world(&light, 45.0, 1.0, 0.1, 1000.0);
    let probe = shadow_chain.transform_point(&Point3::new(32.0, 20.0, 32.0));
    println!(
        "light target samples shadow map at ({:.2}, {:.2})",
        probe.x, probe.y
    );

    Ok(())
}

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use constants::render_settings::{FLOOR_COLOUR, FLOOR_SIZE, GRID_LIFT, GRID_LINE_ALPHA};

use crate::settings::EditorSettings;

#[derive(Component)]
pub struct Floor;

#[derive(Component)]
pub struct GroundGrid;

/// Floor plane centred on the origin, with grid lines on every snap cell.
pub fn spawn_floor(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<EditorSettings>,
) {
    let [r, g, b] = FLOOR_COLOUR;
    commands.spawn((
        Name::new("Floor"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(FLOOR_SIZE, FLOOR_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::IDENTITY,
        Floor,
    ));

    let grid_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.0, 0.0, 0.0, GRID_LINE_ALPHA),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    commands.spawn((
        Name::new("GroundGrid"),
        Mesh3d(meshes.add(grid_mesh(FLOOR_SIZE, settings.snap_step))),
        MeshMaterial3d(grid_material),
        Transform::from_xyz(0.0, GRID_LIFT, 0.0),
        GroundGrid,
    ));
}

/// Line endpoints for a square grid of side `size` centred on the origin.
/// Lines run along both axes at every multiple of `step`.
pub fn grid_vertices(size: f32, step: f32) -> Vec<[f32; 3]> {
    if step <= 0.0 || size <= 0.0 {
        return Vec::new();
    }

    let half = size * 0.5;
    let cells = (half / step).floor() as i32;
    let mut vertices = Vec::with_capacity((cells as usize * 2 + 1) * 4);

    for i in -cells..=cells {
        let offset = i as f32 * step;
        // Line parallel to Z at x = offset
        vertices.push([offset, 0.0, -half]);
        vertices.push([offset, 0.0, half]);
        // Line parallel to X at z = offset
        vertices.push([-half, 0.0, offset]);
        vertices.push([half, 0.0, offset]);
    }

    vertices
}

fn grid_mesh(size: f32, step: f32) -> Mesh {
    let vertices = grid_vertices(size, step);
    let indices = (0..vertices.len() as u32).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

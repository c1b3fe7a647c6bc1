//! 3D viewport scaffolding: camera, lighting and the floor.
//!
//! Rendering and the frame loop are Bevy's; this module only spawns what the
//! furniture tool draws into and picks against.

/// Perspective camera and NDC ray casting.
pub mod camera;

/// Floor plane, snap grid and lights.
pub mod scene;

use bevy::prelude::*;

use camera::viewport_camera::spawn_viewport_camera;
use scene::floor::spawn_floor;
use scene::lighting::{insert_ambient_lighting, spawn_sun};

pub struct EnginePlugin;

impl Plugin for EnginePlugin {
    fn build(&self, app: &mut App) {
        insert_ambient_lighting(app);
        app.add_systems(Startup, (spawn_viewport_camera, spawn_sun, spawn_floor));
    }
}

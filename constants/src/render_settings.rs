use bevy::math::Vec3;

/// Camera position; the camera looks at the origin.
pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 10.0, 15.0);

/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 75.0;

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Scene clear colour, #f0f0f0.
pub const BACKGROUND_COLOUR: [f32; 3] = [0.941, 0.941, 0.941];

pub const AMBIENT_BRIGHTNESS: f32 = 600.0;

/// Directional light position; it points at the origin.
pub const SUN_POSITION: Vec3 = Vec3::new(10.0, 20.0, 10.0);
pub const SUN_ILLUMINANCE: f32 = 8_000.0;

/// Side length of the square floor plane.
pub const FLOOR_SIZE: f32 = 20.0;

/// Floor colour, #dddddd.
pub const FLOOR_COLOUR: [f32; 3] = [0.867, 0.867, 0.867];

/// Grid lines are lifted slightly to avoid z-fighting with the floor.
pub const GRID_LIFT: f32 = 0.002;
pub const GRID_LINE_ALPHA: f32 = 0.35;

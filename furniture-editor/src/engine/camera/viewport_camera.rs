use bevy::prelude::*;
use constants::render_settings::{CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_POSITION};

use crate::tools::furniture::interaction::RayCaster;

/// Marks the camera whose viewport receives pointer input.
#[derive(Component)]
pub struct ViewportCamera;

pub fn spawn_viewport_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("ViewportCamera"),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Transform::from_translation(CAMERA_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        ViewportCamera,
    ));
}

/// Un-projects NDC through a Bevy camera.
pub struct CameraRays<'a> {
    camera: &'a Camera,
    transform: &'a GlobalTransform,
}

impl<'a> CameraRays<'a> {
    pub fn new(camera: &'a Camera, transform: &'a GlobalTransform) -> Self {
        Self { camera, transform }
    }
}

impl RayCaster for CameraRays<'_> {
    fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray3d> {
        // Reverse-z: 1.0 is the near plane, values toward 0 approach infinity.
        let near = self.camera.ndc_to_world(self.transform, ndc.extend(1.0))?;
        let far = self.camera.ndc_to_world(self.transform, ndc.extend(f32::EPSILON))?;
        let direction = Dir3::new(far - near).ok()?;
        Some(Ray3d::new(near, direction))
    }
}

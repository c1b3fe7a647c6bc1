use bevy::prelude::*;
use constants::render_settings::{AMBIENT_BRIGHTNESS, BACKGROUND_COLOUR, SUN_ILLUMINANCE, SUN_POSITION};

pub fn insert_ambient_lighting(app: &mut App) {
    let [r, g, b] = BACKGROUND_COLOUR;
    app.insert_resource(ClearColor(Color::srgb(r, g, b)))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: AMBIENT_BRIGHTNESS,
            ..default()
        });
}

pub fn spawn_sun(mut commands: Commands) {
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: SUN_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(SUN_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

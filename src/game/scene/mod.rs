use bevy::prelude::*;

use crate::game::player::{CharacterAssets, SpawnPlayer};

const GROUND_WIDTH: f32 = 400.0;
const GROUND_DEPTH: f32 = 2.0;
const MARKER_SPACING: f32 = 2.0;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_ground);
    app.add_systems(Update, spawn_level.run_if(resource_added::<CharacterAssets>));
}

/// Ground strip with evenly spaced posts so sliding is visible
fn spawn_ground(mut commands: Commands) {
    info!("Spawning ground...");

    commands.spawn((
        Name::new("Ground"),
        Sprite::from_color(Color::srgb(0.3, 0.5, 0.3), Vec2::new(GROUND_WIDTH, GROUND_DEPTH)),
        Transform::from_xyz(0.0, -GROUND_DEPTH / 2.0, -1.0),
    ));

    let posts = (GROUND_WIDTH / MARKER_SPACING) as i32;
    for index in -posts / 2..=posts / 2 {
        commands.spawn((
            Name::new("Post"),
            Sprite::from_color(Color::srgb(0.25, 0.4, 0.25), Vec2::new(0.08, 0.4)),
            Transform::from_xyz(index as f32 * MARKER_SPACING, 0.2, -0.5),
        ));
    }
}

pub fn spawn_level(mut commands: Commands) {
    commands.queue(SpawnPlayer {
        position: Vec3::ZERO,
    });
}

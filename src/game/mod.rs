//! The side-scrolling character: tuning, skeleton animation, locomotion and the demo level.

mod camera_controller;
pub mod configs;
pub mod locomotion;
mod player;
mod scene;
pub mod skeleton;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        configs::plugin,
        skeleton::plugin,
        locomotion::plugin,
        player::plugin,
        scene::plugin,
        camera_controller::plugin,
    ));
}

use bevy::prelude::*;

use crate::game::{locomotion::LocomotionInput, player::Player};

const MOVE_LEFT: KeyCode = KeyCode::KeyA;
const MOVE_RIGHT: KeyCode = KeyCode::KeyD;
const ROOT_MOTION: KeyCode = KeyCode::Space;

/// Held horizontal direction; left wins when both keys are down
pub fn horizontal_from_keys(keyboard: &ButtonInput<KeyCode>) -> f32 {
    if keyboard.pressed(MOVE_LEFT) {
        -1.0
    } else if keyboard.pressed(MOVE_RIGHT) {
        1.0
    } else {
        0.0
    }
}

pub fn sample_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut players: Query<&mut LocomotionInput, With<Player>>,
) {
    let horizontal = horizontal_from_keys(&keyboard);
    let requested = keyboard.just_pressed(ROOT_MOTION);

    for mut input in &mut players {
        input.horizontal = horizontal;
        // The controller clears the request once it has seen it
        if requested {
            input.root_motion_requested = true;
        }
    }
}

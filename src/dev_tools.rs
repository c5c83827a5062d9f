//! Development tools for the game. This plugin is only enabled in dev builds.

use std::collections::HashMap;

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::game::locomotion::{LocomotionController, Phase};

const TOGGLE_KEY: KeyCode = KeyCode::F3;

/// Root-motion anchor and character origin overlays
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct LocomotionGizmos;

/// Last phase seen for each character
#[derive(Resource, Debug, Default)]
struct PhaseHistory(HashMap<Entity, Phase>);

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PhaseHistory>();
    app.init_gizmo_group::<LocomotionGizmos>();
    app.add_systems(Startup, disable_gizmos_by_default);
    app.add_systems(
        Update,
        (
            log_phase_changes,
            toggle_locomotion_gizmos.run_if(input_just_pressed(TOGGLE_KEY)),
            draw_locomotion_gizmos,
        ),
    );
}

fn disable_gizmos_by_default(mut store: ResMut<GizmoConfigStore>) {
    let (config, _) = store.config_mut::<LocomotionGizmos>();
    config.enabled = false;
}

fn toggle_locomotion_gizmos(mut store: ResMut<GizmoConfigStore>) {
    let (config, _) = store.config_mut::<LocomotionGizmos>();
    config.enabled = !config.enabled;
    info!(
        "Locomotion debug rendering: {}",
        if config.enabled { "ON" } else { "OFF" }
    );
}

/// Logs every phase transition of every character
fn log_phase_changes(
    characters: Query<(Entity, &LocomotionController), Changed<LocomotionController>>,
    mut removed: RemovedComponents<LocomotionController>,
    mut history: ResMut<PhaseHistory>,
) {
    for entity in removed.read() {
        history.0.remove(&entity);
    }
    for (entity, controller) in &characters {
        let phase = controller.phase();
        match history.0.insert(entity, phase) {
            Some(previous) if previous != phase => info!("{entity}: {previous:?} -> {phase:?}"),
            _ => {}
        }
    }
}

fn draw_locomotion_gizmos(
    mut gizmos: Gizmos<LocomotionGizmos>,
    characters: Query<(&LocomotionController, &GlobalTransform)>,
) {
    for (controller, transform) in &characters {
        let origin = transform.translation().truncate();
        gizmos.cross_2d(Isometry2d::from_translation(origin), 0.3, Color::WHITE);

        let capture = &controller.state().root_motion;
        if capture.active {
            let anchor = capture.object_start_world_pos;
            gizmos.circle_2d(
                Isometry2d::from_translation(anchor),
                0.15,
                Color::srgb(1.0, 0.8, 0.2),
            );
            gizmos.line_2d(anchor, origin, Color::srgb(1.0, 0.8, 0.2));
        }
    }
}

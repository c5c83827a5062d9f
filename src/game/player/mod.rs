mod assets;
mod controls;

use bevy::prelude::*;

use crate::{
    asset_tracking::LoadResource,
    game::{
        configs::LocomotionConfig,
        locomotion::{AnimatedRig, LocomotionController, LocomotionInput, LocomotionSystems},
        skeleton::{ClipPlayer, SkeletonBone},
    },
};

pub use assets::CharacterAssets;
pub use controls::{horizontal_from_keys, sample_keyboard};

// Player marker component
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

// Rest positions of the rig's bones, in rig space
const ROOT_REST: Vec2 = Vec2::new(0.0, 0.9);
const FRONT_FOOT_REST: Vec2 = Vec2::new(0.2, 0.08);
const BACK_FOOT_REST: Vec2 = Vec2::new(-0.2, 0.08);

pub const FRONT_FOOT: &str = "front_foot";
pub const BACK_FOOT: &str = "back_foot";

// Player spawn command
pub struct SpawnPlayer {
    pub position: Vec3,
}

impl Command for SpawnPlayer {
    fn apply(self, world: &mut World) {
        let _ = world.run_system_cached_with(spawn_player, self);
    }
}

fn spawn_player(
    In(spawn_config): In<SpawnPlayer>,
    mut commands: Commands,
    character: Res<CharacterAssets>,
    configs: Res<Assets<LocomotionConfig>>,
) {
    let Some(config) = configs.get(&character.config) else {
        error!("Locomotion config {} is not loaded", LocomotionConfig::PATH);
        return;
    };
    let root_bone = config.root_bone.clone();
    let controller = match LocomotionController::new(config.clone(), character.clips()) {
        Ok(controller) => controller,
        Err(err) => {
            error!("Player not spawned, locomotion config rejected: {err}");
            return;
        }
    };

    let body_color = Color::srgb(0.85, 0.55, 0.3);
    let foot_color = Color::srgb(0.35, 0.25, 0.2);

    let rig = commands
        .spawn((
            Name::new("Player Rig"),
            ClipPlayer::default()
                .with_setup_bone(root_bone.clone(), ROOT_REST)
                .with_setup_bone(FRONT_FOOT, FRONT_FOOT_REST)
                .with_setup_bone(BACK_FOOT, BACK_FOOT_REST)
                .with_auto_root_motion(root_bone.clone()),
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|rig| {
            rig.spawn((
                Name::new("Root Bone"),
                SkeletonBone::new(root_bone),
                Transform::from_translation(ROOT_REST.extend(0.1)),
                Visibility::default(),
                children![
                    (
                        Name::new("Torso"),
                        Sprite::from_color(body_color, Vec2::new(0.5, 0.9)),
                        Transform::from_xyz(0.0, 0.25, 0.0),
                    ),
                    (
                        Name::new("Head"),
                        Sprite::from_color(body_color, Vec2::new(0.4, 0.4)),
                        Transform::from_xyz(0.1, 0.95, 0.0),
                    ),
                ],
            ));
            for (name, rest, depth) in [
                (BACK_FOOT, BACK_FOOT_REST, 0.0),
                (FRONT_FOOT, FRONT_FOOT_REST, 0.2),
            ] {
                rig.spawn((
                    Name::new(name),
                    SkeletonBone::new(name),
                    Sprite::from_color(foot_color, Vec2::new(0.3, 0.12)),
                    Transform::from_translation(rest.extend(depth)),
                ));
            }
        })
        .id();

    commands
        .spawn((
            Name::new("Player"),
            Player,
            controller,
            LocomotionInput::default(),
            AnimatedRig(rig),
            Transform::from_translation(spawn_config.position),
            Visibility::Visible,
        ))
        .add_child(rig);

    info!("Player spawned at {}", spawn_config.position);
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Player>();

    // Config and clips arrive together as one resource
    app.load_resource::<CharacterAssets>();

    app.add_systems(
        Update,
        sample_keyboard
            .in_set(LocomotionSystems::Sample)
            .run_if(resource_exists::<ButtonInput<KeyCode>>),
    );
}

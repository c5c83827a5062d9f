//! Minimal 2D skeletal animation: authored clips, a track player, bone visuals and
//! optional automatic root motion.

mod clip;
mod player;

use bevy::{prelude::*, transform::TransformSystems};

pub use clip::{BoneKey, BoneTrack, ClipError, ClipId, SkeletonClip, SkeletonClipLoader};
pub use player::{AutoRootMotion, ClipPlayer, RigAnimator};

use crate::game::locomotion::rig_vector_to_world;

/// Runs in `PostUpdate` before transform propagation
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkeletonSystems {
    /// Advance players, apply automatic root motion and pose bone entities
    Animate,
}

/// Marks a child of a [`ClipPlayer`] entity whose translation follows a named bone
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SkeletonBone(pub String);

impl SkeletonBone {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_asset::<SkeletonClip>();
    app.init_asset_loader::<SkeletonClipLoader>();
    app.register_type::<SkeletonBone>();

    app.configure_sets(
        PostUpdate,
        SkeletonSystems::Animate.before(TransformSystems::Propagate),
    );
    app.add_systems(
        PostUpdate,
        (advance_clip_players, apply_auto_root_motion, pose_skeleton_bones)
            .chain()
            .in_set(SkeletonSystems::Animate),
    );
}

fn advance_clip_players(
    time: Res<Time>,
    clips: Res<Assets<SkeletonClip>>,
    mut players: Query<&mut ClipPlayer>,
) {
    let delta = time.delta_secs();
    for mut player in &mut players {
        player.advance(delta, &clips);
    }
}

/// Moves the parent of each rig by the root motion its player extracted this frame
pub fn apply_auto_root_motion(
    mut rigs: Query<(&mut ClipPlayer, &Transform, &ChildOf)>,
    mut parents: Query<&mut Transform, Without<ClipPlayer>>,
) {
    for (mut player, rig_transform, child_of) in &mut rigs {
        let delta = player.take_root_motion();
        if delta == Vec2::ZERO {
            continue;
        }
        let Ok(mut parent_transform) = parents.get_mut(child_of.parent()) else {
            continue;
        };
        let world_delta = rig_vector_to_world(&parent_transform, rig_transform, delta);
        parent_transform.translation += world_delta.extend(0.0);
    }
}

fn pose_skeleton_bones(
    players: Query<&ClipPlayer>,
    mut bones: Query<(&SkeletonBone, &ChildOf, &mut Transform)>,
) {
    for (bone, child_of, mut transform) in &mut bones {
        let Ok(player) = players.get(child_of.parent()) else {
            continue;
        };
        if let Some(position) = player.bone_local(&bone.0) {
            transform.translation.x = position.x;
            transform.translation.y = position.y;
        }
    }
}

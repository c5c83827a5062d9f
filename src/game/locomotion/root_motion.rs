//! Manual root-motion relay
//!
//! While a root-motion clip plays, the root bone's displacement since the clip started is
//! written to the character's world position, and the animated rig is offset by the
//! opposite local amount so the skeleton is not drawn moving twice. The relay runs after
//! animation evaluation each frame:
//!
//! ```text
//! Inactive --trigger--> Active --clip complete--> Cooldown (1 tick) --> Inactive
//! ```

use bevy::prelude::*;

use crate::game::skeleton::ClipId;

use super::{
    BASE_TRACK, CharacterBody, CharacterClips, MissingDependency, MotionState, Phase,
    RootMotionCapture, RootMotionRejected, SkeletonAnimator,
};

/// Hands positional authority to the root-motion clip
pub fn begin<A, B>(
    state: &mut MotionState,
    clips: &CharacterClips,
    root_bone: &str,
    animator: &mut A,
    body: &B,
) -> Result<(), RootMotionRejected>
where
    A: SkeletonAnimator + ?Sized,
    B: CharacterBody + ?Sized,
{
    if state.phase == Phase::RootMotion {
        return Err(RootMotionRejected::AlreadyActive);
    }
    let clip = clips
        .root_motion
        .ok_or(MissingDependency::Clip("root motion"))?;
    let bone_start = animator
        .bone_local(root_bone)
        .ok_or_else(|| MissingDependency::Bone(root_bone.to_string()))?;

    animator
        .set_clip(BASE_TRACK, clip, false)
        .ok_or(MissingDependency::ClipUnavailable("root motion"))?;

    let suspended = animator.auto_root_motion() == Some(true);
    if suspended {
        animator.set_auto_root_motion(false);
    }

    let object_start = body.world_position();
    state.root_motion = RootMotionCapture {
        active: true,
        object_start_world_pos: object_start,
        bone_start_local_pos: bone_start,
        awaiting: Some(clip),
        suspended_auto_root_motion: suspended,
    };
    state.phase = Phase::RootMotion;
    state.current_speed = 0.0;
    state.has_slipped_since_stop = false;

    info!("Root motion started at {object_start}, root bone at {bone_start}");
    Ok(())
}

/// Mirrors the root bone's travel onto the body and cancels it on the rig.
/// Returns the local bone delta that was applied.
pub fn sample<A, B>(
    state: &MotionState,
    root_bone: &str,
    animator: &A,
    body: &mut B,
) -> Option<Vec2>
where
    A: SkeletonAnimator + ?Sized,
    B: CharacterBody + ?Sized,
{
    let capture = &state.root_motion;
    if !capture.active {
        return None;
    }
    let Some(bone_now) = animator.bone_local(root_bone) else {
        warn!("Root bone `{root_bone}` disappeared during root motion");
        return None;
    };

    let delta = bone_now - capture.bone_start_local_pos;
    let world_delta = body.rig_vector_to_world(delta);
    body.set_world_position(capture.object_start_world_pos + world_delta);
    body.set_rig_local_position(-delta);

    trace!("Root bone delta {delta}, world delta {world_delta}");
    Some(delta)
}

/// Whether `completed` contains the clip the relay is waiting on
pub fn is_complete(state: &MotionState, completed: &[ClipId]) -> bool {
    state
        .root_motion
        .awaiting
        .is_some_and(|clip| completed.contains(&clip))
}

/// Reacts to the root-motion clip finishing: idle takes over the track, and the capture
/// stays active until the cooldown so this frame's sample still lands.
pub fn complete<A, B>(
    state: &mut MotionState,
    clips: &CharacterClips,
    animator: &mut A,
    body: &B,
) where
    A: SkeletonAnimator + ?Sized,
    B: CharacterBody + ?Sized,
{
    state.root_motion.awaiting = None;
    match clips.idle {
        Some(idle) => {
            animator.set_clip(BASE_TRACK, idle, true);
        }
        None => debug!("{}", MissingDependency::Clip("idle")),
    }
    info!("Root motion complete at {}", body.world_position());
}

/// Ends the cooldown: the rig returns to its origin and movement resumes from idle
pub fn finish_cooldown<A, B>(state: &mut MotionState, animator: &mut A, body: &mut B)
where
    A: SkeletonAnimator + ?Sized,
    B: CharacterBody + ?Sized,
{
    body.set_rig_local_position(Vec2::ZERO);
    if state.root_motion.suspended_auto_root_motion {
        animator.set_auto_root_motion(true);
    }
    state.root_motion = RootMotionCapture::default();
    state.phase = Phase::Idle;
    state.current_speed = 0.0;
    debug!("Root motion cooldown finished, rig reset");
}

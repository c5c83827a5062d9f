//! Chooses the clip for the current phase and keeps the run clip's rate in step with speed

use bevy::prelude::*;

use crate::game::{configs::LocomotionConfig, skeleton::ClipId};

use super::{BASE_TRACK, CharacterClips, MotionState, Phase, SkeletonAnimator};

/// Run clip playback rate for `speed`
pub fn playback_rate(config: &LocomotionConfig, speed: f32) -> f32 {
    let ratio = (speed / config.max_move_speed).clamp(0.0, 1.0);
    config.min_animation_speed + (config.max_animation_speed - config.min_animation_speed) * ratio
}

/// Starts `clip` on the base track unless it is already the active entry.
/// Returns `true` if playback was (re)started.
pub fn ensure_clip<A: SkeletonAnimator + ?Sized>(
    animator: &mut A,
    clip: Option<ClipId>,
    looping: bool,
) -> bool {
    let Some(clip) = clip else {
        return false;
    };
    let already_active = animator
        .current(BASE_TRACK)
        .is_some_and(|entry| entry.clip == clip);
    if already_active {
        return false;
    }
    animator.set_clip(BASE_TRACK, clip, looping).is_some()
}

pub fn select_animation<A: SkeletonAnimator + ?Sized>(
    state: &MotionState,
    config: &LocomotionConfig,
    clips: &CharacterClips,
    animator: &mut A,
) {
    match state.phase {
        Phase::Accelerating => {
            let Some(run) = clips.run else {
                return;
            };
            if ensure_clip(animator, Some(run), true) {
                debug!("Run clip started");
            }
            animator.set_playback_rate(BASE_TRACK, playback_rate(config, state.current_speed));
        }
        Phase::Idle => {
            if ensure_clip(animator, clips.idle, true) {
                debug!("Idle clip started");
            }
        }
        // The slip clip hands over to the queued idle clip by itself, and root motion owns
        // the track until its cooldown ends.
        Phase::Slipping | Phase::RootMotion => {}
    }
}

//! Turns discrete horizontal input into a continuously varying speed and a per-tick
//! displacement.
//!
//! Holding a direction accelerates towards the top speed. Releasing it while moving starts
//! a slip: speed decays at the slip rate for as long as the slip clip lasts, carrying the
//! character along the direction it faces. Slowing below [`SLIP_SPEED_THRESHOLD`] without
//! a slip snaps straight to idle.

use bevy::prelude::*;

use crate::game::configs::LocomotionConfig;

use super::{FrameClock, MotionState, Phase};

/// Release speed above which a stop turns into a slip; at or below it the character idles
pub const SLIP_SPEED_THRESHOLD: f32 = 0.1;

/// Moves `current` towards `target` by at most `max_delta`, never overshooting
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let difference = target - current;
    if difference.abs() <= max_delta {
        target
    } else {
        current + difference.signum() * max_delta
    }
}

/// What one integration tick produced
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntegratorStep {
    /// Horizontal world displacement for this tick
    pub displacement: f32,
    /// Facing changed this tick
    pub flipped: bool,
    /// A slip should begin; the caller plays the slip clip and calls [`begin_slip`]
    pub slip_requested: bool,
}

/// Turns to face `direction`. Returns `true` only when the facing actually changed.
pub fn update_facing(state: &mut MotionState, direction: f32) -> bool {
    if direction == 0.0 {
        return false;
    }
    let wants_right = direction > 0.0;
    if wants_right == state.facing_right {
        return false;
    }
    state.facing_right = wants_right;
    true
}

/// Horizontal scale with the sign of the current facing
pub fn mirrored_scale(state: &MotionState, scale: Vec2) -> Vec2 {
    Vec2::new(scale.x.abs() * state.facing_sign(), scale.y)
}

/// Advances speed and phase for one tick of `direction` input (-1, 0 or +1)
pub fn integrate(
    state: &mut MotionState,
    config: &LocomotionConfig,
    direction: f32,
    clock: &FrameClock,
) -> IntegratorStep {
    let mut step = IntegratorStep::default();

    if direction != 0.0 {
        if state.phase == Phase::Slipping {
            debug!("Slip interrupted by input");
        }
        state.phase = Phase::Accelerating;
        state.has_slipped_since_stop = false;

        state.current_speed = move_towards(
            state.current_speed,
            config.max_move_speed,
            config.acceleration * clock.delta,
        );
        step.displacement = direction * state.current_speed * clock.delta;
        step.flipped = update_facing(state, direction);
        return step;
    }

    if state.phase == Phase::Slipping {
        step.displacement = slip_step(state, config, clock);
    } else if !state.has_slipped_since_stop && state.current_speed > SLIP_SPEED_THRESHOLD {
        step.slip_requested = true;
    } else if state.current_speed <= SLIP_SPEED_THRESHOLD {
        state.current_speed = 0.0;
        state.has_slipped_since_stop = false;
        state.phase = Phase::Idle;
    }

    step
}

/// Captures a slip episode lasting `duration` seconds, starting now
pub fn begin_slip(state: &mut MotionState, clock: &FrameClock, duration: f32) {
    state.phase = Phase::Slipping;
    state.has_slipped_since_stop = true;
    state.slip.velocity_at_start = state.current_speed;
    state.slip.start_time = clock.elapsed;
    state.slip.duration = duration.max(0.0);
    info!(
        "Slip started at speed {:.2} for {:.2}s",
        state.current_speed, state.slip.duration
    );
}

fn slip_step(state: &mut MotionState, config: &LocomotionConfig, clock: &FrameClock) -> f32 {
    let elapsed = clock.elapsed - state.slip.start_time;

    if elapsed < state.slip.duration {
        state.current_speed = move_towards(
            state.current_speed,
            0.0,
            config.slip_deceleration * clock.delta,
        );
        trace!(
            "Slipping {:.2}/{:.2}s at speed {:.2}",
            elapsed, state.slip.duration, state.current_speed
        );
        state.facing_sign() * state.current_speed * clock.delta
    } else {
        debug!("Slip finished after {:.2}s", elapsed);
        state.phase = Phase::Idle;
        state.current_speed = 0.0;
        0.0
    }
}

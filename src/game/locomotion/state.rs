use bevy::prelude::*;

use crate::game::skeleton::ClipId;

/// Mutually exclusive motion mode of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum Phase {
    #[default]
    Idle,
    Accelerating,
    Slipping,
    /// The root-motion relay owns displacement; integration and clip selection are suspended
    RootMotion,
}

/// Captured once when a slip begins
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct SlipEpisode {
    pub velocity_at_start: f32,
    pub start_time: f32,
    /// Length of the slip clip, zero when there is none
    pub duration: f32,
}

/// Captured once when root motion begins, cleared when its cooldown ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct RootMotionCapture {
    pub active: bool,
    pub object_start_world_pos: Vec2,
    pub bone_start_local_pos: Vec2,
    /// Clip whose completion hands authority back, cleared once it completes
    pub awaiting: Option<ClipId>,
    /// Whether the animator's own root motion was switched off and must be restored
    pub suspended_auto_root_motion: bool,
}

/// Everything the controller tracks between ticks
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct MotionState {
    pub facing_right: bool,
    pub current_speed: f32,
    pub phase: Phase,
    pub has_slipped_since_stop: bool,
    pub slip: SlipEpisode,
    pub root_motion: RootMotionCapture,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            facing_right: true,
            current_speed: 0.0,
            phase: Phase::Idle,
            has_slipped_since_stop: false,
            slip: SlipEpisode::default(),
            root_motion: RootMotionCapture::default(),
        }
    }
}

impl MotionState {
    pub fn facing_sign(&self) -> f32 {
        if self.facing_right { 1.0 } else { -1.0 }
    }
}

/// Clip references a character animates with; any of them may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct CharacterClips {
    pub run: Option<ClipId>,
    pub slip: Option<ClipId>,
    pub idle: Option<ClipId>,
    pub root_motion: Option<ClipId>,
}

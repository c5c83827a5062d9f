//! What the controller needs from the animation, transform, input and clock systems

use bevy::{diagnostic::FrameCount, prelude::*};

use crate::game::skeleton::ClipId;

/// The only animation track the controller drives
pub const BASE_TRACK: usize = 0;

/// Snapshot of the entry playing on a track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackEntry {
    pub clip: ClipId,
    pub duration: f32,
    pub rate: f32,
    pub looping: bool,
}

/// Skeletal animation playback, as seen by the locomotion controller
pub trait SkeletonAnimator {
    /// Starts `clip` on `track` immediately, replacing the current entry and its queue.
    /// Returns `None` if the clip cannot be played.
    fn set_clip(&mut self, track: usize, clip: ClipId, looping: bool) -> Option<TrackEntry>;

    /// Plays `clip` `delay` seconds after the current entry on `track` finishes
    fn queue_clip(&mut self, track: usize, clip: ClipId, looping: bool, delay: f32);

    fn current(&self, track: usize) -> Option<TrackEntry>;

    fn set_playback_rate(&mut self, track: usize, rate: f32);

    /// Local position of a bone relative to its parent bone
    fn bone_local(&self, bone: &str) -> Option<Vec2>;

    /// Clips on `track` that finished since the last call
    fn drain_completions(&mut self, track: usize) -> Vec<ClipId>;

    /// State of the animator's own root-motion application, `None` if it has none
    fn auto_root_motion(&self) -> Option<bool> {
        None
    }

    fn set_auto_root_motion(&mut self, _enabled: bool) {}
}

/// The owning object's transform and the animated child ("rig") beneath it
pub trait CharacterBody {
    fn world_position(&self) -> Vec2;
    fn set_world_position(&mut self, position: Vec2);
    fn local_scale(&self) -> Vec2;
    fn set_local_scale(&mut self, scale: Vec2);
    fn set_rig_local_position(&mut self, position: Vec2);
    /// Maps a vector in the rig's local space into world space
    fn rig_vector_to_world(&self, vector: Vec2) -> Vec2;
}

/// Per-frame control intent for one character
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LocomotionInput {
    /// Held horizontal direction; only the sign is used
    pub horizontal: f32,
    /// Edge-triggered request to play the root-motion clip; consumed by the controller
    pub root_motion_requested: bool,
}

impl LocomotionInput {
    /// -1, 0 or +1
    pub fn direction(&self) -> f32 {
        if self.horizontal > 0.0 {
            1.0
        } else if self.horizontal < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}

/// Timing for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    /// Seconds since the previous tick
    pub delta: f32,
    /// Seconds since startup
    pub elapsed: f32,
    pub frame: u32,
}

impl FrameClock {
    pub fn from_time(time: &Time, frames: &FrameCount) -> Self {
        Self {
            delta: time.delta_secs(),
            elapsed: time.elapsed_secs(),
            frame: frames.0,
        }
    }

    /// The clock one tick of `delta` seconds later
    pub fn next(self, delta: f32) -> Self {
        Self {
            delta,
            elapsed: self.elapsed + delta,
            frame: self.frame.wrapping_add(1),
        }
    }
}

/// Transforms `vector` from the rig's local space to world space, assuming `body` is a root
/// entity and `rig` its direct child
pub fn rig_vector_to_world(body: &Transform, rig: &Transform, vector: Vec2) -> Vec2 {
    let in_body = rig.rotation * (rig.scale * vector.extend(0.0));
    (body.rotation * (body.scale * in_body)).truncate()
}

/// [`CharacterBody`] over a root entity's [`Transform`] and its rig child's [`Transform`]
pub struct BodyTransforms<'a> {
    pub body: &'a mut Transform,
    pub rig: &'a mut Transform,
}

impl CharacterBody for BodyTransforms<'_> {
    fn world_position(&self) -> Vec2 {
        self.body.translation.truncate()
    }

    fn set_world_position(&mut self, position: Vec2) {
        self.body.translation.x = position.x;
        self.body.translation.y = position.y;
    }

    fn local_scale(&self) -> Vec2 {
        self.body.scale.truncate()
    }

    fn set_local_scale(&mut self, scale: Vec2) {
        self.body.scale.x = scale.x;
        self.body.scale.y = scale.y;
    }

    fn set_rig_local_position(&mut self, position: Vec2) {
        self.rig.translation.x = position.x;
        self.rig.translation.y = position.y;
    }

    fn rig_vector_to_world(&self, vector: Vec2) -> Vec2 {
        rig_vector_to_world(self.body, self.rig, vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_is_sign_of_input() {
        let input = |horizontal| LocomotionInput {
            horizontal,
            root_motion_requested: false,
        };
        assert_eq!(input(0.3).direction(), 1.0);
        assert_eq!(input(-7.0).direction(), -1.0);
        assert_eq!(input(0.0).direction(), 0.0);
    }

    #[test]
    fn test_rig_vector_follows_mirrored_body() {
        let body = Transform::from_scale(Vec3::new(-1.0, 1.0, 1.0));
        let rig = Transform::from_scale(Vec3::splat(2.0));
        assert_eq!(
            rig_vector_to_world(&body, &rig, Vec2::new(3.0, 1.0)),
            Vec2::new(-6.0, 2.0)
        );
    }

    #[test]
    fn test_body_transforms_keep_depth() {
        let mut body = Transform::from_xyz(1.0, 2.0, 5.0);
        let mut rig = Transform::from_xyz(0.0, 0.0, 1.0);
        let mut view = BodyTransforms {
            body: &mut body,
            rig: &mut rig,
        };
        view.set_world_position(Vec2::new(4.0, -1.0));
        view.set_rig_local_position(Vec2::new(-3.0, 0.0));

        assert_eq!(body.translation, Vec3::new(4.0, -1.0, 5.0));
        assert_eq!(rig.translation, Vec3::new(-3.0, 0.0, 1.0));
    }
}

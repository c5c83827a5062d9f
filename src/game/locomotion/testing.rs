//! Recording doubles for the animator and body ports

use std::collections::HashMap;

use bevy::prelude::*;

use crate::game::skeleton::{ClipId, SkeletonClip};

use super::{CharacterBody, CharacterClips, SkeletonAnimator, TrackEntry};

/// Distinct clip ids for run, slip, idle and root motion
pub(crate) fn clip_ids() -> CharacterClips {
    let mut assets = Assets::<SkeletonClip>::default();
    let mut id = |name: &str| Some(assets.add(SkeletonClip::empty(name, 1.0)).id());
    CharacterClips {
        run: id("run"),
        slip: id("slip"),
        idle: id("idle"),
        root_motion: id("root_motion"),
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockAnimator {
    pub durations: HashMap<ClipId, f32>,
    pub current: Option<TrackEntry>,
    pub queued: Vec<(ClipId, bool, f32)>,
    pub set_calls: Vec<(ClipId, bool)>,
    pub bones: HashMap<String, Vec2>,
    pub completions: Vec<ClipId>,
    pub auto_root_motion: Option<bool>,
}

impl MockAnimator {
    pub fn with_clips(clips: &CharacterClips, duration: f32) -> Self {
        let mut animator = Self::default();
        for clip in [clips.run, clips.slip, clips.idle, clips.root_motion]
            .into_iter()
            .flatten()
        {
            animator.durations.insert(clip, duration);
        }
        animator.bones.insert("root".to_string(), Vec2::ZERO);
        animator
    }

    pub fn current_clip(&self) -> Option<ClipId> {
        self.current.map(|entry| entry.clip)
    }

    pub fn set_count(&self, clip: Option<ClipId>) -> usize {
        self.set_calls
            .iter()
            .filter(|(id, _)| Some(*id) == clip)
            .count()
    }
}

impl SkeletonAnimator for MockAnimator {
    fn set_clip(&mut self, _track: usize, clip: ClipId, looping: bool) -> Option<TrackEntry> {
        let duration = *self.durations.get(&clip)?;
        self.set_calls.push((clip, looping));
        self.queued.clear();
        let entry = TrackEntry {
            clip,
            duration,
            rate: 1.0,
            looping,
        };
        self.current = Some(entry);
        Some(entry)
    }

    fn queue_clip(&mut self, _track: usize, clip: ClipId, looping: bool, delay: f32) {
        self.queued.push((clip, looping, delay));
    }

    fn current(&self, _track: usize) -> Option<TrackEntry> {
        self.current
    }

    fn set_playback_rate(&mut self, _track: usize, rate: f32) {
        if let Some(entry) = self.current.as_mut() {
            entry.rate = rate;
        }
    }

    fn bone_local(&self, bone: &str) -> Option<Vec2> {
        self.bones.get(bone).copied()
    }

    fn drain_completions(&mut self, _track: usize) -> Vec<ClipId> {
        std::mem::take(&mut self.completions)
    }

    fn auto_root_motion(&self) -> Option<bool> {
        self.auto_root_motion
    }

    fn set_auto_root_motion(&mut self, enabled: bool) {
        if let Some(flag) = self.auto_root_motion.as_mut() {
            *flag = enabled;
        }
    }
}

/// Body with a uniform world scale applied to rig vectors
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MockBody {
    pub position: Vec2,
    pub scale: Vec2,
    pub rig_local: Vec2,
}

impl Default for MockBody {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            rig_local: Vec2::ZERO,
        }
    }
}

impl CharacterBody for MockBody {
    fn world_position(&self) -> Vec2 {
        self.position
    }

    fn set_world_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn local_scale(&self) -> Vec2 {
        self.scale
    }

    fn set_local_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    fn set_rig_local_position(&mut self, position: Vec2) {
        self.rig_local = position;
    }

    fn rig_vector_to_world(&self, vector: Vec2) -> Vec2 {
        self.scale * vector
    }
}

//! Single-skeleton clip player with per-track queues

use std::collections::{HashMap, VecDeque};

use bevy::prelude::*;

use crate::game::locomotion::{SkeletonAnimator, TrackEntry};

use super::clip::{ClipId, SkeletonClip};

/// An entry currently playing on a track
#[derive(Debug, Clone)]
struct ActiveEntry {
    clip: ClipId,
    duration: f32,
    looping: bool,
    rate: f32,
    time: f32,
    /// Number of full passes already reported as complete
    passes: u32,
    serial: u64,
}

impl ActiveEntry {
    fn snapshot(&self) -> TrackEntry {
        TrackEntry {
            clip: self.clip,
            duration: self.duration,
            rate: self.rate,
            looping: self.looping,
        }
    }

    fn sample_time(&self) -> f32 {
        if self.looping && self.duration > 0.0 {
            self.time.rem_euclid(self.duration)
        } else {
            self.time.min(self.duration)
        }
    }
}

/// An entry waiting for the current one to finish
#[derive(Debug, Clone)]
struct QueuedEntry {
    clip: ClipId,
    looping: bool,
    delay: f32,
}

#[derive(Debug, Clone, Default)]
struct Track {
    current: Option<ActiveEntry>,
    queue: VecDeque<QueuedEntry>,
    completed: Vec<ClipId>,
}

/// Automatic root-motion extraction
///
/// While enabled, the root bone of a non-looping entry on the base track is pinned to the
/// entry's first frame and its displacement is accumulated for [`apply_auto_root_motion`]
/// to move the parent with.
///
/// [`apply_auto_root_motion`]: super::apply_auto_root_motion
#[derive(Debug, Clone, Reflect)]
pub struct AutoRootMotion {
    pub enabled: bool,
    pub bone: String,
    pending: Vec2,
    anchor: Option<(u64, Vec2)>,
}

/// Plays [`SkeletonClip`]s on numbered tracks and caches the resulting bone pose
///
/// The pose is only re-evaluated in [`ClipPlayer::advance`], so switching clips mid-frame
/// leaves the current frame's pose untouched.
#[derive(Component, Debug, Clone, Default)]
pub struct ClipPlayer {
    tracks: Vec<Track>,
    setup_pose: HashMap<String, Vec2>,
    pose: HashMap<String, Vec2>,
    auto_root_motion: Option<AutoRootMotion>,
    next_serial: u64,
}

impl ClipPlayer {
    /// Declares a bone and its rest position
    pub fn with_setup_bone(mut self, bone: impl Into<String>, position: Vec2) -> Self {
        let bone = bone.into();
        self.pose.insert(bone.clone(), position);
        self.setup_pose.insert(bone, position);
        self
    }

    /// Enables automatic root-motion extraction for `bone`
    pub fn with_auto_root_motion(mut self, bone: impl Into<String>) -> Self {
        self.auto_root_motion = Some(AutoRootMotion {
            enabled: true,
            bone: bone.into(),
            pending: Vec2::ZERO,
            anchor: None,
        });
        self
    }

    fn track_mut(&mut self, track: usize) -> &mut Track {
        if self.tracks.len() <= track {
            self.tracks.resize_with(track + 1, Track::default);
        }
        &mut self.tracks[track]
    }

    fn start_entry(
        &mut self,
        track: usize,
        id: ClipId,
        clip: &SkeletonClip,
        looping: bool,
    ) -> TrackEntry {
        let serial = self.next_serial;
        self.next_serial += 1;
        let entry = ActiveEntry {
            clip: id,
            duration: clip.duration,
            looping,
            rate: 1.0,
            time: 0.0,
            passes: 0,
            serial,
        };
        let snapshot = entry.snapshot();
        self.track_mut(track).current = Some(entry);
        snapshot
    }

    /// Replaces whatever is playing on `track` and drops its queue
    pub fn set_clip(
        &mut self,
        track: usize,
        id: ClipId,
        clip: &SkeletonClip,
        looping: bool,
    ) -> TrackEntry {
        self.track_mut(track).queue.clear();
        self.start_entry(track, id, clip, looping)
    }

    /// Queues `id` to start `delay` seconds after the last entry on `track` finishes
    pub fn queue_clip(&mut self, track: usize, id: ClipId, looping: bool, delay: f32) {
        self.track_mut(track).queue.push_back(QueuedEntry {
            clip: id,
            looping,
            delay: delay.max(0.0),
        });
    }

    pub fn current(&self, track: usize) -> Option<TrackEntry> {
        self.tracks
            .get(track)
            .and_then(|track| track.current.as_ref())
            .map(ActiveEntry::snapshot)
    }

    pub fn set_playback_rate(&mut self, track: usize, rate: f32) {
        if let Some(entry) = self.track_mut(track).current.as_mut() {
            entry.rate = rate.max(0.0);
        }
    }

    pub fn bone_local(&self, bone: &str) -> Option<Vec2> {
        self.pose.get(bone).copied()
    }

    /// Clips that completed a pass on `track` during the last advance
    pub fn drain_completions(&mut self, track: usize) -> Vec<ClipId> {
        self.tracks
            .get_mut(track)
            .map(|track| std::mem::take(&mut track.completed))
            .unwrap_or_default()
    }

    pub fn auto_root_motion(&self) -> Option<&AutoRootMotion> {
        self.auto_root_motion.as_ref()
    }

    pub fn set_auto_root_motion(&mut self, enabled: bool) {
        if let Some(auto) = self.auto_root_motion.as_mut() {
            auto.enabled = enabled;
            auto.anchor = None;
        }
    }

    /// Returns and clears the displacement extracted since the last call
    pub fn take_root_motion(&mut self) -> Vec2 {
        self.auto_root_motion
            .as_mut()
            .map(|auto| std::mem::take(&mut auto.pending))
            .unwrap_or(Vec2::ZERO)
    }

    /// Advances every track by `delta` seconds and re-evaluates the pose
    pub fn advance(&mut self, delta: f32, clips: &Assets<SkeletonClip>) {
        for index in 0..self.tracks.len() {
            self.advance_track(index, delta, clips);
        }
        self.evaluate_pose(clips);
    }

    fn advance_track(&mut self, index: usize, delta: f32, clips: &Assets<SkeletonClip>) {
        let track = &mut self.tracks[index];
        track.completed.clear();

        let Some(entry) = track.current.as_mut() else {
            return;
        };
        entry.time += delta * entry.rate;

        if entry.duration <= 0.0 {
            if entry.passes == 0 {
                entry.passes = 1;
                track.completed.push(entry.clip);
            }
        } else {
            let passes = (entry.time / entry.duration).floor() as u32;
            let reported = if entry.looping { passes } else { passes.min(1) };
            for _ in entry.passes..reported {
                track.completed.push(entry.clip);
            }
            entry.passes = entry.passes.max(reported);
        }

        let Some(next) = track.queue.front() else {
            return;
        };
        let end = entry.duration * entry.passes.max(1) as f32 + next.delay;
        if entry.time < end {
            return;
        }

        let overflow = entry.time - end;
        let Some(next) = track.queue.pop_front() else {
            return;
        };
        match clips.get(next.clip) {
            Some(clip) => {
                self.start_entry(index, next.clip, clip, next.looping);
                if let Some(entry) = self.tracks[index].current.as_mut() {
                    entry.time = overflow;
                }
            }
            None => warn!("Queued clip {:?} is not loaded, skipping it", next.clip),
        }
    }

    fn evaluate_pose(&mut self, clips: &Assets<SkeletonClip>) {
        self.pose.clone_from(&self.setup_pose);

        for track in &self.tracks {
            let Some(entry) = track.current.as_ref() else {
                continue;
            };
            let Some(clip) = clips.get(entry.clip) else {
                continue;
            };
            let time = entry.sample_time();
            for bone in clip.animated_bones() {
                if let Some(position) = clip.sample(bone, time) {
                    self.pose.insert(bone.to_owned(), position);
                }
            }
        }

        self.extract_root_motion(clips);
    }

    fn extract_root_motion(&mut self, clips: &Assets<SkeletonClip>) {
        let Some(auto) = self.auto_root_motion.as_mut() else {
            return;
        };
        let entry = self
            .tracks
            .first()
            .and_then(|track| track.current.as_ref())
            .filter(|entry| !entry.looping);
        let (Some(entry), true) = (entry, auto.enabled) else {
            auto.anchor = None;
            return;
        };
        let Some(clip) = clips.get(entry.clip) else {
            return;
        };
        let (Some(start), Some(now)) = (
            clip.sample(&auto.bone, 0.0),
            clip.sample(&auto.bone, entry.sample_time()),
        ) else {
            return;
        };

        let last = match auto.anchor {
            Some((serial, last)) if serial == entry.serial => last,
            _ => start,
        };
        auto.pending += now - last;
        auto.anchor = Some((entry.serial, now));
        self.pose.insert(auto.bone.clone(), start);
    }
}

/// [`SkeletonAnimator`] view over a [`ClipPlayer`] and the loaded clips
pub struct RigAnimator<'a> {
    pub player: &'a mut ClipPlayer,
    pub clips: &'a Assets<SkeletonClip>,
}

impl SkeletonAnimator for RigAnimator<'_> {
    fn set_clip(&mut self, track: usize, clip: ClipId, looping: bool) -> Option<TrackEntry> {
        let Some(data) = self.clips.get(clip) else {
            warn!("Clip {clip:?} is not loaded, cannot play it");
            return None;
        };
        Some(self.player.set_clip(track, clip, data, looping))
    }

    fn queue_clip(&mut self, track: usize, clip: ClipId, looping: bool, delay: f32) {
        self.player.queue_clip(track, clip, looping, delay);
    }

    fn current(&self, track: usize) -> Option<TrackEntry> {
        self.player.current(track)
    }

    fn set_playback_rate(&mut self, track: usize, rate: f32) {
        self.player.set_playback_rate(track, rate);
    }

    fn bone_local(&self, bone: &str) -> Option<Vec2> {
        self.player.bone_local(bone)
    }

    fn drain_completions(&mut self, track: usize) -> Vec<ClipId> {
        self.player.drain_completions(track)
    }

    fn auto_root_motion(&self) -> Option<bool> {
        self.player.auto_root_motion().map(|auto| auto.enabled)
    }

    fn set_auto_root_motion(&mut self, enabled: bool) {
        self.player.set_auto_root_motion(enabled);
    }
}

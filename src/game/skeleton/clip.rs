//! Authored 2D skeleton clips and their RON loader

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a loaded clip. Two references are the same clip exactly when their ids match.
pub type ClipId = AssetId<SkeletonClip>;

/// A single authored position key for one bone
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneKey {
    /// Time in seconds from the start of the clip
    pub time: f32,
    /// Bone position relative to its parent, in skeleton units
    pub position: [f32; 2],
}

/// Keyframes for a single bone, sorted by time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneTrack {
    pub bone: String,
    pub keys: Vec<BoneKey>,
}

/// A named, pre-authored skeletal animation with a fixed duration
#[derive(Asset, TypePath, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkeletonClip {
    pub name: String,
    /// Length of one pass through the clip in seconds
    pub duration: f32,
    #[serde(default)]
    pub bones: Vec<BoneTrack>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClipError {
    #[error("clip `{name}` has an invalid duration of {duration}")]
    InvalidDuration { name: String, duration: f32 },
    #[error("bone `{bone}` in clip `{name}` has keys out of time order")]
    UnsortedKeys { name: String, bone: String },
}

impl SkeletonClip {
    /// A clip with no animated bones, useful for holds and placeholders
    pub fn empty(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            bones: Vec::new(),
        }
    }

    /// Adds a keyframed track for `bone`
    pub fn with_track(mut self, bone: impl Into<String>, keys: &[(f32, Vec2)]) -> Self {
        self.bones.push(BoneTrack {
            bone: bone.into(),
            keys: keys
                .iter()
                .map(|(time, position)| BoneKey {
                    time: *time,
                    position: position.to_array(),
                })
                .collect(),
        });
        self
    }

    pub fn validate(&self) -> Result<(), ClipError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ClipError::InvalidDuration {
                name: self.name.clone(),
                duration: self.duration,
            });
        }

        for track in &self.bones {
            if track.keys.windows(2).any(|pair| pair[1].time < pair[0].time) {
                return Err(ClipError::UnsortedKeys {
                    name: self.name.clone(),
                    bone: track.bone.clone(),
                });
            }
        }

        Ok(())
    }

    /// Samples the local position of `bone` at `time` seconds
    ///
    /// Positions are linearly interpolated between keys and held before the first and after
    /// the last key. Returns `None` if the clip does not animate the bone.
    pub fn sample(&self, bone: &str, time: f32) -> Option<Vec2> {
        let track = self.bones.iter().find(|track| track.bone == bone)?;
        sample_keys(&track.keys, time)
    }

    pub fn animated_bones(&self) -> impl Iterator<Item = &str> {
        self.bones.iter().map(|track| track.bone.as_str())
    }
}

fn sample_keys(keys: &[BoneKey], time: f32) -> Option<Vec2> {
    let first = keys.first()?;
    let next = keys.partition_point(|key| key.time <= time);

    if next == 0 {
        return Some(Vec2::from(first.position));
    }
    if next == keys.len() {
        return keys.last().map(|key| Vec2::from(key.position));
    }

    let from = &keys[next - 1];
    let to = &keys[next];
    let span = to.time - from.time;
    let t = if span > 0.0 { (time - from.time) / span } else { 1.0 };
    Some(Vec2::from(from.position).lerp(Vec2::from(to.position), t))
}

/// Asset loader for `*.clip.ron` files
#[derive(Default)]
pub struct SkeletonClipLoader;

impl AssetLoader for SkeletonClipLoader {
    type Asset = SkeletonClip;
    type Settings = ();
    type Error = anyhow::Error;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let clip: SkeletonClip = ron::de::from_bytes(&bytes)?;
        clip.validate()?;
        Ok(clip)
    }

    fn extensions(&self) -> &[&str] {
        &["clip.ron"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hop() -> SkeletonClip {
        SkeletonClip::empty("hop", 1.0).with_track(
            "root",
            &[
                (0.0, Vec2::ZERO),
                (0.5, Vec2::new(2.0, 1.0)),
                (1.0, Vec2::new(4.0, 0.0)),
            ],
        )
    }

    #[test]
    fn test_sample_interpolates_between_keys() {
        let clip = hop();
        assert_eq!(clip.sample("root", 0.25), Some(Vec2::new(1.0, 0.5)));
        assert_eq!(clip.sample("root", 0.5), Some(Vec2::new(2.0, 1.0)));
    }

    #[test]
    fn test_sample_holds_outside_key_range() {
        let clip = hop();
        assert_eq!(clip.sample("root", -1.0), Some(Vec2::ZERO));
        assert_eq!(clip.sample("root", 3.0), Some(Vec2::new(4.0, 0.0)));
        assert_eq!(clip.sample("hand", 0.5), None);
    }

    #[test]
    fn test_validate_rejects_bad_clips() {
        assert!(hop().validate().is_ok());

        let negative = SkeletonClip::empty("broken", -0.5);
        assert!(matches!(
            negative.validate(),
            Err(ClipError::InvalidDuration { .. })
        ));

        let unsorted = SkeletonClip::empty("unsorted", 1.0)
            .with_track("root", &[(0.6, Vec2::ZERO), (0.2, Vec2::ONE)]);
        assert!(matches!(
            unsorted.validate(),
            Err(ClipError::UnsortedKeys { .. })
        ));
    }

    #[test]
    fn test_clip_parses_from_ron() {
        let source = r#"(
            name: "slip",
            duration: 0.6,
            bones: [
                (bone: "root", keys: [
                    (time: 0.0, position: (0.0, 0.0)),
                    (time: 0.6, position: (0.4, 0.0)),
                ]),
            ],
        )"#;
        let clip: SkeletonClip = ron::de::from_str(source).unwrap();
        assert_eq!(clip.name, "slip");
        assert_eq!(clip.animated_bones().collect::<Vec<_>>(), vec!["root"]);
        assert_eq!(clip.sample("root", 0.3), Some(Vec2::new(0.2, 0.0)));
    }

    #[test]
    fn test_shipped_clips_are_valid() {
        let shipped = [
            include_str!("../../../assets/clips/idle.clip.ron"),
            include_str!("../../../assets/clips/run.clip.ron"),
            include_str!("../../../assets/clips/slip.clip.ron"),
            include_str!("../../../assets/clips/root_motion.clip.ron"),
        ];
        for source in shipped {
            let clip: SkeletonClip = ron::de::from_str(source).unwrap();
            assert!(clip.validate().is_ok(), "{} is invalid", clip.name);
        }

        let hop: SkeletonClip = ron::de::from_str(shipped[3]).unwrap();
        let travel = hop.sample("root", hop.duration).unwrap() - hop.sample("root", 0.0).unwrap();
        assert_eq!(travel, Vec2::new(3.0, 0.0));
    }
}

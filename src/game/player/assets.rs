use bevy::prelude::*;

use crate::game::{
    configs::LocomotionConfig,
    locomotion::CharacterClips,
    skeleton::SkeletonClip,
};

/// Resource holding handles to the player's tuning and clips
#[derive(Resource, Asset, Reflect, Clone)]
pub struct CharacterAssets {
    #[dependency]
    pub config: Handle<LocomotionConfig>,
    #[dependency]
    pub run: Handle<SkeletonClip>,
    #[dependency]
    pub slip: Handle<SkeletonClip>,
    #[dependency]
    pub idle: Handle<SkeletonClip>,
    #[dependency]
    pub root_motion: Handle<SkeletonClip>,
}

impl CharacterAssets {
    pub const PATH_RUN: &'static str = "clips/run.clip.ron";
    pub const PATH_SLIP: &'static str = "clips/slip.clip.ron";
    pub const PATH_IDLE: &'static str = "clips/idle.clip.ron";
    pub const PATH_ROOT_MOTION: &'static str = "clips/root_motion.clip.ron";

    pub fn clips(&self) -> CharacterClips {
        CharacterClips {
            run: Some(self.run.id()),
            slip: Some(self.slip.id()),
            idle: Some(self.idle.id()),
            root_motion: Some(self.root_motion.id()),
        }
    }
}

impl FromWorld for CharacterAssets {
    fn from_world(world: &mut World) -> Self {
        let assets = world.resource::<AssetServer>();
        Self {
            config: assets.load(LocomotionConfig::PATH),
            run: assets.load(Self::PATH_RUN),
            slip: assets.load(Self::PATH_SLIP),
            idle: assets.load(Self::PATH_IDLE),
            root_motion: assets.load(Self::PATH_ROOT_MOTION),
        }
    }
}

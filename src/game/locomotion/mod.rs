//! Side-scrolling locomotion: input-driven acceleration, slipping to a stop, facing, clip
//! selection and a manual root-motion relay.

mod controller;
mod error;
pub mod integrator;
mod ports;
pub mod root_motion;
mod scheduler;
pub mod selector;
mod state;
#[cfg(test)]
pub(crate) mod testing;

use bevy::{diagnostic::FrameCount, prelude::*, transform::TransformSystems};

pub use controller::LocomotionController;
pub use error::{MissingDependency, RootMotionRejected};
pub use ports::{
    BASE_TRACK, BodyTransforms, CharacterBody, FrameClock, LocomotionInput, SkeletonAnimator,
    TrackEntry, rig_vector_to_world,
};
pub use scheduler::{DeferredAction, TickScheduler};
pub use state::{CharacterClips, MotionState, Phase, RootMotionCapture, SlipEpisode};

use crate::game::skeleton::{ClipPlayer, RigAnimator, SkeletonClip, SkeletonSystems};

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionSystems {
    /// Fill [`LocomotionInput`] from devices
    Sample,
    /// Integrate movement and pick clips
    Drive,
    /// Relay root motion once clips have been advanced
    Relay,
}

/// Points a character at the child entity carrying its [`ClipPlayer`]
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AnimatedRig(pub Entity);

pub(super) fn plugin(app: &mut App) {
    app.register_type::<LocomotionController>()
        .register_type::<LocomotionInput>()
        .register_type::<AnimatedRig>();

    app.configure_sets(
        Update,
        (LocomotionSystems::Sample, LocomotionSystems::Drive).chain(),
    );
    app.configure_sets(
        PostUpdate,
        LocomotionSystems::Relay
            .after(SkeletonSystems::Animate)
            .before(TransformSystems::Propagate),
    );

    app.add_systems(Update, drive_locomotion.in_set(LocomotionSystems::Drive));
    app.add_systems(
        PostUpdate,
        relay_root_motion.in_set(LocomotionSystems::Relay),
    );
}

fn drive_locomotion(
    time: Res<Time>,
    frames: Res<FrameCount>,
    clips: Res<Assets<SkeletonClip>>,
    mut characters: Query<(
        &mut LocomotionController,
        &mut LocomotionInput,
        &mut Transform,
        &AnimatedRig,
    )>,
    mut rigs: Query<(&mut ClipPlayer, &mut Transform), Without<LocomotionController>>,
) {
    let clock = FrameClock::from_time(&time, &frames);

    for (mut controller, mut input, mut body, rig) in &mut characters {
        let Ok((mut player, mut rig_transform)) = rigs.get_mut(rig.0) else {
            warn_once!("Animated rig {} has no clip player, locomotion skipped", rig.0);
            continue;
        };
        let mut animator = RigAnimator {
            player: &mut player,
            clips: &clips,
        };
        let mut transforms = BodyTransforms {
            body: &mut body,
            rig: &mut rig_transform,
        };
        controller.update(&mut input, &clock, &mut animator, &mut transforms);
    }
}

fn relay_root_motion(
    clips: Res<Assets<SkeletonClip>>,
    mut characters: Query<(&mut LocomotionController, &mut Transform, &AnimatedRig)>,
    mut rigs: Query<(&mut ClipPlayer, &mut Transform), Without<LocomotionController>>,
) {
    for (mut controller, mut body, rig) in &mut characters {
        let Ok((mut player, mut rig_transform)) = rigs.get_mut(rig.0) else {
            continue;
        };
        let mut animator = RigAnimator {
            player: &mut player,
            clips: &clips,
        };
        let mut transforms = BodyTransforms {
            body: &mut body,
            rig: &mut rig_transform,
        };
        controller.late_update(&mut animator, &mut transforms);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::game::{configs::LocomotionConfig, skeleton};

    struct Scene {
        app: App,
        character: Entity,
        rig: Entity,
        clips: CharacterClips,
        _handles: Vec<Handle<SkeletonClip>>,
    }

    fn scene() -> Scene {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .add_plugins((skeleton::plugin, plugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));

        let mut assets = app.world_mut().resource_mut::<Assets<SkeletonClip>>();
        let handles = vec![
            assets.add(SkeletonClip::empty("run", 0.8)),
            assets.add(SkeletonClip::empty("slip", 0.4)),
            assets.add(SkeletonClip::empty("idle", 1.0)),
            assets.add(SkeletonClip::empty("root_motion", 0.3).with_track(
                "root",
                &[(0.0, Vec2::ZERO), (0.3, Vec2::new(3.0, 0.0))],
            )),
        ];
        let clips = CharacterClips {
            run: Some(handles[0].id()),
            slip: Some(handles[1].id()),
            idle: Some(handles[2].id()),
            root_motion: Some(handles[3].id()),
        };

        let world = app.world_mut();
        let rig = world
            .spawn((
                ClipPlayer::default()
                    .with_setup_bone("root", Vec2::ZERO)
                    .with_auto_root_motion("root"),
                Transform::default(),
            ))
            .id();
        let controller = LocomotionController::new(LocomotionConfig::default(), clips).unwrap();
        let character = world
            .spawn((
                controller,
                LocomotionInput::default(),
                Transform::from_xyz(2.0, 0.0, 0.0),
                AnimatedRig(rig),
            ))
            .add_child(rig)
            .id();

        Scene {
            app,
            character,
            rig,
            clips,
            _handles: handles,
        }
    }

    impl Scene {
        fn input(&mut self) -> Mut<'_, LocomotionInput> {
            self.app
                .world_mut()
                .get_mut::<LocomotionInput>(self.character)
                .unwrap()
        }

        fn controller(&self) -> &LocomotionController {
            self.app
                .world()
                .get::<LocomotionController>(self.character)
                .unwrap()
        }

        fn translation(&self, entity: Entity) -> Vec3 {
            self.app.world().get::<Transform>(entity).unwrap().translation
        }

        fn current_clip(&self) -> Option<skeleton::ClipId> {
            self.app
                .world()
                .get::<ClipPlayer>(self.rig)
                .and_then(|player| player.current(BASE_TRACK))
                .map(|entry| entry.clip)
        }
    }

    #[test]
    fn test_held_input_moves_character_and_plays_run() {
        let mut scene = scene();
        scene.input().horizontal = 1.0;

        for _ in 0..5 {
            scene.app.update();
        }

        assert!(scene.translation(scene.character).x > 2.0);
        assert_eq!(scene.controller().phase(), Phase::Accelerating);
        assert_eq!(scene.current_clip(), scene.clips.run);
    }

    #[test]
    fn test_root_motion_lands_at_clip_offset() {
        let mut scene = scene();
        scene.app.update();
        assert_eq!(scene.current_clip(), scene.clips.idle);

        scene.input().root_motion_requested = true;
        scene.app.update();
        assert_eq!(scene.controller().phase(), Phase::RootMotion);
        assert_eq!(scene.current_clip(), scene.clips.root_motion);

        let mut frames = 0;
        while scene.controller().phase() == Phase::RootMotion {
            scene.app.update();
            frames += 1;
            assert!(frames < 20, "root motion never finished");
        }

        let body = scene.translation(scene.character);
        assert!((body.x - 5.0).abs() < 1e-4, "ended at {body}");
        assert_eq!(scene.translation(scene.rig).truncate(), Vec2::ZERO);
        assert_eq!(scene.current_clip(), scene.clips.idle);

        let player = scene.app.world().get::<ClipPlayer>(scene.rig).unwrap();
        assert_eq!(player.auto_root_motion().map(|auto| auto.enabled), Some(true));
    }
}

use bevy::prelude::*;

use crate::game::configs::{ConfigError, LocomotionConfig};

use super::{
    BASE_TRACK, CharacterBody, CharacterClips, DeferredAction, FrameClock, LocomotionInput,
    MissingDependency, MotionState, Phase, SkeletonAnimator, TickScheduler, integrator,
    root_motion, selector,
};

/// Frames between speed log lines while accelerating
const SPEED_LOG_INTERVAL: u32 = 30;

/// Drives movement, facing and clip selection for one character, and relays root motion
/// from its skeleton while a root-motion clip plays.
///
/// [`LocomotionController::update`] runs once per frame before animation is evaluated and
/// [`LocomotionController::late_update`] once after.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct LocomotionController {
    config: LocomotionConfig,
    clips: CharacterClips,
    state: MotionState,
    scheduler: TickScheduler,
}

impl LocomotionController {
    pub fn new(config: LocomotionConfig, clips: CharacterClips) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            clips,
            state: MotionState::default(),
            scheduler: TickScheduler::default(),
        })
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn clips(&self) -> &CharacterClips {
        &self.clips
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn update<A, B>(
        &mut self,
        input: &mut LocomotionInput,
        clock: &FrameClock,
        animator: &mut A,
        body: &mut B,
    ) where
        A: SkeletonAnimator + ?Sized,
        B: CharacterBody + ?Sized,
    {
        let due = self.scheduler.tick();

        if std::mem::take(&mut input.root_motion_requested) {
            if let Err(rejected) = root_motion::begin(
                &mut self.state,
                &self.clips,
                &self.config.root_bone,
                animator,
                body,
            ) {
                warn!("Root motion request ignored: {rejected}");
            }
        }

        // The cooldown tick still belongs to root motion: input is ignored and requests are
        // rejected, and authority only returns once the tick is over.
        if self.state.phase == Phase::RootMotion {
            for action in due {
                match action {
                    DeferredAction::EndRootMotionCooldown => {
                        root_motion::finish_cooldown(&mut self.state, animator, body);
                    }
                }
            }
            return;
        }

        let step = integrator::integrate(&mut self.state, &self.config, input.direction(), clock);
        if step.slip_requested {
            self.start_slip(clock, animator);
        }

        if step.displacement != 0.0 {
            let position = body.world_position();
            body.set_world_position(position + Vec2::X * step.displacement);
        }
        if step.flipped {
            let scale = integrator::mirrored_scale(&self.state, body.local_scale());
            body.set_local_scale(scale);
        }

        if self.state.phase == Phase::Accelerating && clock.frame % SPEED_LOG_INTERVAL == 0 {
            debug!(
                "Speed {:.2}/{:.2}",
                self.state.current_speed, self.config.max_move_speed
            );
        }

        selector::select_animation(&self.state, &self.config, &self.clips, animator);
    }

    pub fn late_update<A, B>(&mut self, animator: &mut A, body: &mut B)
    where
        A: SkeletonAnimator + ?Sized,
        B: CharacterBody + ?Sized,
    {
        let completed = animator.drain_completions(BASE_TRACK);
        let finished = root_motion::is_complete(&self.state, &completed);

        root_motion::sample(&self.state, &self.config.root_bone, animator, body);

        if finished {
            root_motion::complete(&mut self.state, &self.clips, animator, body);
            self.scheduler.schedule(1, DeferredAction::EndRootMotionCooldown);
        }
    }

    fn start_slip<A: SkeletonAnimator + ?Sized>(&mut self, clock: &FrameClock, animator: &mut A) {
        let entry = match self.clips.slip {
            Some(slip) => animator.set_clip(BASE_TRACK, slip, false),
            None => None,
        };
        let duration = match entry {
            Some(entry) => {
                if let Some(idle) = self.clips.idle {
                    animator.queue_clip(BASE_TRACK, idle, true, 0.0);
                }
                entry.duration
            }
            None => {
                debug!("{}, slip ends immediately", MissingDependency::Clip("slip"));
                0.0
            }
        };
        integrator::begin_slip(&mut self.state, clock, duration);
    }
}

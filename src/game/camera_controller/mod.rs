use bevy::{prelude::*, transform::TransformSystems};

use crate::game::{locomotion::LocomotionSystems, player::Player};

/// World units visible per screen pixel
const VIEW_SCALE: f32 = 0.02;

/// Keeps a 2D camera horizontally centred on the player
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct FollowCamera {
    /// Exponential catch-up rate per second
    pub smoothing: f32,
    /// Height the camera holds above the world origin
    pub height: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            smoothing: 4.0,
            height: 1.5,
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<FollowCamera>();
    app.add_systems(Startup, spawn_camera);
    // Root motion has moved the player by the time this runs
    app.add_systems(
        PostUpdate,
        follow_player
            .after(LocomotionSystems::Relay)
            .before(TransformSystems::Propagate),
    );
}

fn spawn_camera(mut commands: Commands) {
    let follow = FollowCamera::default();
    commands.spawn((
        Name::new("Camera"),
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: VIEW_SCALE,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(0.0, follow.height, 0.0),
        follow,
    ));
}

/// Fraction of the remaining distance to close this frame
pub fn catch_up(smoothing: f32, delta: f32) -> f32 {
    1.0 - (-smoothing * delta).exp()
}

fn follow_player(
    time: Res<Time>,
    player: Query<&Transform, With<Player>>,
    mut cameras: Query<(&FollowCamera, &mut Transform), Without<Player>>,
) {
    let Ok(target) = player.single() else {
        return;
    };
    for (follow, mut camera) in &mut cameras {
        let t = catch_up(follow.smoothing, time.delta_secs());
        camera.translation.x += (target.translation.x - camera.translation.x) * t;
        camera.translation.y = follow.height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_up_is_a_fraction() {
        assert_eq!(catch_up(4.0, 0.0), 0.0);
        let step = catch_up(4.0, 0.1);
        assert!(step > 0.0 && step < 1.0);
        assert!(catch_up(4.0, 10.0) > 0.99);
    }
}

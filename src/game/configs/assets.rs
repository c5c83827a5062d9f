use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Movement and animation tuning for one character, loaded from a RON file
#[derive(Asset, Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Top horizontal speed in world units per second
    pub max_move_speed: f32,
    /// Speed gained per second while a direction is held
    pub acceleration: f32,
    /// Braking rate, validated and carried for tuning files but not consumed by the integrator
    pub deceleration: f32,
    /// Speed lost per second while slipping to a stop
    pub slip_deceleration: f32,
    /// Run clip playback rate at standstill
    pub min_animation_speed: f32,
    /// Run clip playback rate at top speed
    pub max_animation_speed: f32,
    /// Skeleton bone whose motion is relayed to the character during root motion
    pub root_bone: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("max_animation_speed ({max}) is below min_animation_speed ({min})")]
    AnimationSpeedRange { min: f32, max: f32 },
    #[error("root_bone must not be empty")]
    EmptyRootBone,
}

impl LocomotionConfig {
    /// Path to the player's locomotion tuning file
    pub const PATH: &'static str = "config/player.locomotion.ron";

    /// Rejects non-positive rates and an inverted animation speed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("max_move_speed", self.max_move_speed),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("slip_deceleration", self.slip_deceleration),
            ("min_animation_speed", self.min_animation_speed),
            ("max_animation_speed", self.max_animation_speed),
        ];
        for (field, value) in rates {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.max_animation_speed < self.min_animation_speed {
            return Err(ConfigError::AnimationSpeedRange {
                min: self.min_animation_speed,
                max: self.max_animation_speed,
            });
        }

        if self.root_bone.is_empty() {
            return Err(ConfigError::EmptyRootBone);
        }

        Ok(())
    }
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            max_move_speed: 5.0,
            acceleration: 20.0,
            deceleration: 15.0,
            slip_deceleration: 10.0,
            min_animation_speed: 0.5,
            max_animation_speed: 1.0,
            root_bone: "root".to_string(),
        }
    }
}

/// Asset loader for `*.locomotion.ron` files; invalid tuning fails the load
#[derive(Default)]
pub struct LocomotionConfigLoader;

impl AssetLoader for LocomotionConfigLoader {
    type Asset = LocomotionConfig;
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
        let config: LocomotionConfig = ron::de::from_bytes(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    fn extensions(&self) -> &[&str] {
        &["locomotion.ron"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LocomotionConfig::default();
        assert_eq!(config.max_move_speed, 5.0);
        assert_eq!(config.slip_deceleration, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_rates() {
        let config = LocomotionConfig {
            acceleration: 0.0,
            ..default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "acceleration",
                value: 0.0
            })
        );

        let config = LocomotionConfig {
            slip_deceleration: f32::NAN,
            ..default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "slip_deceleration",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_inverted_animation_range() {
        let config = LocomotionConfig {
            min_animation_speed: 1.5,
            max_animation_speed: 1.0,
            ..default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::AnimationSpeedRange { min: 1.5, max: 1.0 })
        );
    }

    #[test]
    fn test_partial_ron_falls_back_to_defaults() {
        let config: LocomotionConfig =
            ron::de::from_str("(max_move_speed: 7.5, root_bone: \"hips\")").unwrap();
        assert_eq!(config.max_move_speed, 7.5);
        assert_eq!(config.acceleration, 20.0);
        assert_eq!(config.root_bone, "hips");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config: LocomotionConfig = ron::de::from_str(include_str!(
            "../../../assets/config/player.locomotion.ron"
        ))
        .unwrap();
        assert_eq!(config, LocomotionConfig::default());
    }
}

pub mod assets;

use bevy::prelude::*;

pub use assets::{ConfigError, LocomotionConfig, LocomotionConfigLoader};

pub(super) fn plugin(app: &mut App) {
    // Register the asset loader for RON config files
    app.init_asset::<LocomotionConfig>();
    app.init_asset_loader::<LocomotionConfigLoader>();
    app.register_type::<LocomotionConfig>();
}

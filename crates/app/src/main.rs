//! Cantilever - interactive viewer for a modernist villa and its annex

use bevy::prelude::*;

mod config;
mod hotkeys;
mod insight;
mod overlay;

use cantilever_scene::ScenePlugin;
use config::ViewerConfig;

fn main() {
    // Parse configuration from environment
    let config = ViewerConfig::from_env();
    let window = config.window();

    let mut app = App::new();

    // Inserted before the scene plugin so it picks up the overrides
    app.insert_resource(config.navigation.clone());

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(window),
                ..default()
            })
            .set(bevy::log::LogPlugin {
                level: bevy::log::Level::INFO,
                ..default()
            }),
    );

    info!(
        "Starting Cantilever at {}x{}, FOV {} deg",
        config.display.width, config.display.height, config.navigation.fov_degrees
    );

    app.add_plugins(ScenePlugin)
        .add_plugins(hotkeys::HotkeyPlugin)
        .add_plugins(insight::InsightPlugin::new(config.insight))
        .add_plugins(overlay::OverlayPlugin)
        .run();
}

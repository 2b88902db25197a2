//! Application configuration gathered from the environment at startup

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use cantilever_config::{DisplayConfig, InsightConfig, NavigationConfig};

/// Everything the binary reads before building the app
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    pub display: DisplayConfig,
    pub navigation: NavigationConfig,
    pub insight: InsightConfig,
}

impl ViewerConfig {
    /// Defaults with `CANTILEVER_*` and API key overrides applied
    pub fn from_env() -> Self {
        Self {
            display: DisplayConfig::default(),
            navigation: NavigationConfig::from_env(),
            insight: InsightConfig::from_env(),
        }
    }

    pub fn window(&self) -> Window {
        Window {
            title: "Cantilever".into(),
            resolution: WindowResolution::new(self.display.width, self.display.height),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

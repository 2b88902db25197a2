//! Shared configuration for Cantilever
//!
//! This crate is the single source of truth for window dimensions, camera
//! navigation limits, gizmo snapping, and insight service settings. Values
//! default to the tuned constants below and can be overridden from the
//! environment at startup.

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default window width in pixels
pub const DEFAULT_WIDTH: u32 = 1600;

/// Default window height in pixels
pub const DEFAULT_HEIGHT: u32 = 900;

/// Default vertical field of view in degrees
pub const DEFAULT_FOV_DEGREES: f32 = 45.0;

/// Narrowest field of view the slider allows
pub const MIN_FOV_DEGREES: f32 = 15.0;

/// Widest field of view the slider allows
pub const MAX_FOV_DEGREES: f32 = 100.0;

/// FOV change per hotkey press
pub const FOV_STEP_DEGREES: f32 = 5.0;

/// Walking speed in world units per second (0.2 units/frame at 60 fps)
pub const DEFAULT_WALK_SPEED: f32 = 12.0;

/// Closest the orbit camera may dolly towards its target
pub const MIN_ORBIT_DISTANCE: f32 = 5.0;

/// Farthest the orbit camera may dolly away from its target
pub const MAX_ORBIT_DISTANCE: f32 = 50.0;

/// Lowest elevation above the horizon, in radians (polar angle PI/2 - 0.05)
pub const MIN_ELEVATION: f32 = 0.05;

/// Highest elevation, kept just short of straight down to avoid a degenerate look-at
pub const MAX_ELEVATION: f32 = 1.55;

/// Point the camera initially orbits around
pub const INITIAL_TARGET: [f32; 3] = [0.0, 2.0, 0.0];

/// Initial camera position in world space
pub const INITIAL_CAMERA_POSITION: [f32; 3] = [20.0, 10.0, 30.0];

/// Gizmo translation snaps to this grid (world units)
pub const TRANSLATION_SNAP: f32 = 0.5;

/// Gizmo rotation snaps to this increment (15 degrees)
pub const ROTATION_SNAP: f32 = std::f32::consts::PI / 12.0;

/// Delay applied before returning the fallback insight when no credential is set
pub const FALLBACK_DELAY_MS: u64 = 1500;

/// Default generative text endpoint (Gemini REST API)
pub const DEFAULT_INSIGHT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Clamp a field of view to the supported slider range
pub fn clamp_fov(degrees: f32) -> f32 {
    if degrees.is_nan() {
        return DEFAULT_FOV_DEGREES;
    }
    degrees.clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES)
}

/// Read a float override from the environment, ignoring unparseable values
fn env_f32(name: &str) -> Option<f32> {
    std::env::var(name).ok().and_then(|v| parse_f32(&v))
}

fn parse_f32(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Treat an empty credential the same as a missing one
fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Initial window size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Camera navigation tuning shared by the orbit navigator and the walk mover
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct NavigationConfig {
    /// Walking speed in world units per second
    pub walk_speed: f32,
    /// Orbit sensitivity (radians per pixel)
    pub orbit_sensitivity: f32,
    /// Zoom sensitivity (fraction of distance per scroll line)
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Elevation limits above the horizon, in radians
    pub min_elevation: f32,
    pub max_elevation: f32,
    pub initial_target: [f32; 3],
    pub initial_position: [f32; 3],
    /// Initial vertical field of view in degrees
    pub fov_degrees: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            walk_speed: DEFAULT_WALK_SPEED,
            orbit_sensitivity: 0.005,
            zoom_sensitivity: 0.1,
            min_distance: MIN_ORBIT_DISTANCE,
            max_distance: MAX_ORBIT_DISTANCE,
            min_elevation: MIN_ELEVATION,
            max_elevation: MAX_ELEVATION,
            initial_target: INITIAL_TARGET,
            initial_position: INITIAL_CAMERA_POSITION,
            fov_degrees: DEFAULT_FOV_DEGREES,
        }
    }
}

impl NavigationConfig {
    /// Defaults with `CANTILEVER_WALK_SPEED` and `CANTILEVER_FOV` overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(speed) = env_f32("CANTILEVER_WALK_SPEED").filter(|s| *s > 0.0) {
            config.walk_speed = speed;
        }
        if let Some(fov) = env_f32("CANTILEVER_FOV") {
            config.fov_degrees = clamp_fov(fov);
        }
        config
    }
}

/// Gizmo snapping increments
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct SnapConfig {
    /// Translation grid in world units
    pub translation: f32,
    /// Rotation increment in radians
    pub rotation: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            translation: TRANSLATION_SNAP,
            rotation: ROTATION_SNAP,
        }
    }
}

/// Settings for the generative insight service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct InsightConfig {
    /// Static credential; `None` selects the fallback path
    pub api_key: Option<String>,
    /// Full URL of the generateContent endpoint
    pub endpoint: String,
    /// Artificial latency before the fallback is returned without a credential
    pub fallback_delay_ms: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_INSIGHT_ENDPOINT.to_string(),
            fallback_delay_ms: FALLBACK_DELAY_MS,
        }
    }
}

impl InsightConfig {
    /// Read the credential from `API_KEY` (or `GEMINI_API_KEY`) and an optional
    /// endpoint override from `CANTILEVER_INSIGHT_ENDPOINT`
    pub fn from_env() -> Self {
        let api_key = non_empty(std::env::var("API_KEY").ok())
            .or_else(|| non_empty(std::env::var("GEMINI_API_KEY").ok()));
        let endpoint = non_empty(std::env::var("CANTILEVER_INSIGHT_ENDPOINT").ok())
            .unwrap_or_else(|| DEFAULT_INSIGHT_ENDPOINT.to_string());
        Self {
            api_key,
            endpoint,
            ..Self::default()
        }
    }

    /// Builder-style credential setter; blank keys count as missing
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = non_empty(Some(key.into()));
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DisplayConfig::default();
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.height, DEFAULT_HEIGHT);
    }

    #[test]
    fn test_clamp_fov() {
        assert_eq!(clamp_fov(5.0), MIN_FOV_DEGREES);
        assert_eq!(clamp_fov(140.0), MAX_FOV_DEGREES);
        assert_eq!(clamp_fov(60.0), 60.0);
        assert_eq!(clamp_fov(f32::NAN), DEFAULT_FOV_DEGREES);
    }

    #[test]
    fn test_parse_f32_rejects_garbage() {
        assert_eq!(parse_f32(" 12.5 "), Some(12.5));
        assert_eq!(parse_f32("fast"), None);
        assert_eq!(parse_f32("inf"), None);
    }

    #[test]
    fn test_navigation_defaults_match_reference() {
        let nav = NavigationConfig::default();
        assert_eq!(nav.min_distance, 5.0);
        assert_eq!(nav.max_distance, 50.0);
        assert_eq!(nav.initial_target, [0.0, 2.0, 0.0]);
        // 0.2 units per frame at 60 fps
        assert!((nav.walk_speed / 60.0 - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = InsightConfig::default().with_api_key("   ");
        assert!(!config.has_credential());
        let config = InsightConfig::default().with_api_key("secret");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }
}

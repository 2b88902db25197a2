//! Orbit camera controller
//!
//! Controls:
//! - Left mouse drag: Orbit around target
//! - Scroll wheel: Dolly (zoom)
//! - WASD / arrow keys: Walk (see `walk`)
//!
//! Panning is not available; the target only moves by walking.

use bevy::input::mouse::{MouseButton, MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use cantilever_config::NavigationConfig;

use crate::keys::KeyTrackingPlugin;
use crate::walk::camera_walk_system;
use crate::SceneSystems;

/// Pixel-based scroll deltas (touchpads) are scaled down to roughly one line
const PIXELS_PER_SCROLL_LINE: f32 = 100.0;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Capabilities other controllers need from the orbit navigator.
///
/// The gizmo only ever toggles `enabled`, and the walk mover only ever shifts
/// the target, so both go through this instead of the full camera state.
pub trait OrbitControl {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
    fn target(&self) -> Vec3;
    fn translate_target(&mut self, delta: Vec3);
}

/// Camera orbit controller state
#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera orbits around
    pub target: Vec3,
    /// Distance from target
    pub distance: f32,
    /// Horizontal angle (yaw) in radians
    pub yaw: f32,
    /// Elevation above the horizon in radians
    pub pitch: f32,
    /// While false, pointer input is ignored
    pub enabled: bool,
    /// Orbit sensitivity (radians per pixel)
    pub orbit_sensitivity: f32,
    /// Zoom sensitivity (fraction of distance per scroll line)
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&NavigationConfig::default())
    }
}

impl OrbitCamera {
    /// Build the orbit state that places the camera at the configured
    /// position looking at the configured target
    pub fn from_config(config: &NavigationConfig) -> Self {
        let target = Vec3::from_array(config.initial_target);
        let offset = Vec3::from_array(config.initial_position) - target;
        let length = offset.length().max(f32::EPSILON);

        Self {
            target,
            distance: length.clamp(config.min_distance, config.max_distance),
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / length)
                .asin()
                .clamp(config.min_elevation, config.max_elevation),
            enabled: true,
            orbit_sensitivity: config.orbit_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            min_pitch: config.min_elevation,
            max_pitch: config.max_elevation,
        }
    }

    /// Calculate camera position from orbit parameters
    pub fn calculate_position(&self) -> Vec3 {
        // Spherical to Cartesian conversion
        // Note: pitch is angle from horizontal, yaw is angle around Y axis
        let horizontal_distance = self.distance * self.pitch.cos();
        let y = self.distance * self.pitch.sin();
        let x = horizontal_distance * self.yaw.sin();
        let z = horizontal_distance * self.yaw.cos();

        self.target + Vec3::new(x, y, z)
    }

    /// Rotate around the target by a mouse delta in pixels
    pub fn orbit(&mut self, delta: Vec2) {
        if !self.enabled {
            return;
        }
        // Horizontal movement rotates around Y axis (yaw)
        self.yaw -= delta.x * self.orbit_sensitivity;
        // Vertical movement changes elevation; never dips below the horizon
        self.pitch = (self.pitch + delta.y * self.orbit_sensitivity)
            .clamp(self.min_pitch, self.max_pitch);
    }

    /// Move towards (positive lines) or away from the target
    pub fn dolly(&mut self, lines: f32) {
        if !self.enabled {
            return;
        }
        // Scale zoom speed by current distance for consistent feel
        let zoom_amount = lines * self.zoom_sensitivity * self.distance;
        self.distance = (self.distance - zoom_amount).clamp(self.min_distance, self.max_distance);
    }
}

impl OrbitControl for OrbitCamera {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn translate_target(&mut self, delta: Vec3) {
        self.target += delta;
    }
}

/// Plugin for orbit and walk camera controls
pub struct CameraControllerPlugin;

impl Plugin for CameraControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(KeyTrackingPlugin);
        // Orbit and zoom only read their own messages; the transform is
        // rebuilt once after every writer has run
        app.add_systems(
            Update,
            (
                camera_orbit_system,
                camera_zoom_system,
                camera_walk_system,
                update_camera_transform,
            )
                .chain()
                .in_set(SceneSystems::Camera),
        );
    }
}

/// Handle orbit (left mouse drag)
fn camera_orbit_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut motion_events: MessageReader<MouseMotion>,
    mut camera_query: Query<&mut OrbitCamera>,
) {
    if !mouse_button.pressed(MouseButton::Left) {
        motion_events.clear();
        return;
    }

    let mut delta = Vec2::ZERO;
    for event in motion_events.read() {
        delta += event.delta;
    }

    if delta == Vec2::ZERO {
        return;
    }

    for mut orbit in camera_query.iter_mut() {
        orbit.orbit(delta);
    }
}

/// Handle zoom (scroll wheel)
fn camera_zoom_system(
    mut scroll_events: MessageReader<MouseWheel>,
    mut camera_query: Query<&mut OrbitCamera>,
) {
    let mut scroll_lines = 0.0;
    for event in scroll_events.read() {
        scroll_lines += match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / PIXELS_PER_SCROLL_LINE,
        };
    }

    if scroll_lines == 0.0 {
        return;
    }

    for mut orbit in camera_query.iter_mut() {
        orbit.dolly(scroll_lines);
    }
}

/// Update camera transform from orbit state
fn update_camera_transform(
    mut camera_query: Query<(&OrbitCamera, &mut Transform), (With<MainCamera>, Changed<OrbitCamera>)>,
) {
    for (orbit, mut transform) in camera_query.iter_mut() {
        let position = orbit.calculate_position();
        *transform = Transform::from_translation(position).looking_at(orbit.target, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_initial_position_round_trips() {
        let orbit = OrbitCamera::default();
        assert_eq!(orbit.target, Vec3::new(0.0, 2.0, 0.0));
        let position = orbit.calculate_position();
        assert!((position - Vec3::new(20.0, 10.0, 30.0)).length() < EPS);
    }

    #[test]
    fn test_pitch_never_goes_below_horizon() {
        let mut orbit = OrbitCamera::default();
        orbit.orbit(Vec2::new(0.0, -100_000.0));
        assert!((orbit.pitch - 0.05).abs() < EPS);
        assert!(orbit.calculate_position().y > orbit.target.y);

        orbit.orbit(Vec2::new(0.0, 100_000.0));
        assert!(orbit.pitch <= orbit.max_pitch);
    }

    #[test]
    fn test_dolly_is_clamped() {
        let mut orbit = OrbitCamera::default();
        orbit.dolly(1000.0);
        assert_eq!(orbit.distance, 5.0);
        orbit.dolly(-1000.0);
        assert_eq!(orbit.distance, 50.0);
    }

    #[test]
    fn test_disabled_navigator_ignores_pointer_input() {
        let mut orbit = OrbitCamera::default();
        orbit.set_enabled(false);
        let before = (orbit.yaw, orbit.pitch, orbit.distance);
        orbit.orbit(Vec2::new(40.0, 25.0));
        orbit.dolly(3.0);
        assert_eq!(before, (orbit.yaw, orbit.pitch, orbit.distance));
    }

    #[test]
    fn test_translate_target_moves_camera_rigidly() {
        let mut orbit = OrbitCamera::default();
        let before = orbit.calculate_position();
        orbit.translate_target(Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(orbit.target(), Vec3::new(1.0, 2.0, -2.0));
        assert!((orbit.calculate_position() - before - Vec3::new(1.0, 0.0, -2.0)).length() < EPS);
    }

    #[test]
    fn test_yaw_drag_keeps_distance() {
        let mut orbit = OrbitCamera::default();
        orbit.orbit(Vec2::new(120.0, 0.0));
        let offset = orbit.calculate_position() - orbit.target;
        assert!((offset.length() - orbit.distance).abs() < EPS);
    }
}

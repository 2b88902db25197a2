//! Walk-style camera movement from held keys
//!
//! The camera slides along the ground plane relative to where it is looking.
//! The orbit target moves by the same amount so orbiting continues around a
//! point in front of the camera.

use bevy::prelude::*;
use cantilever_config::NavigationConfig;

use crate::camera::{MainCamera, OrbitCamera, OrbitControl};
use crate::keys::{KeySet, NavKey};

/// Horizontal unit vectors for a camera orientation: (forward, right)
fn ground_basis(rotation: Quat) -> (Vec3, Vec3) {
    let flatten = |v: Vec3| Vec3::new(v.x, 0.0, v.z).normalize_or_zero();
    (flatten(rotation * Vec3::NEG_Z), flatten(rotation * Vec3::X))
}

/// Displacement for one frame of walking.
///
/// `step` is speed times elapsed seconds. Opposite keys cancel out, and
/// diagonal movement is normalized so it is no faster than straight movement.
pub fn walk_displacement(rotation: Quat, keys: &KeySet, step: f32) -> Vec3 {
    let (forward, right) = ground_basis(rotation);

    let mut direction = Vec3::ZERO;
    if keys.is_held(NavKey::Forward) {
        direction += forward;
    }
    if keys.is_held(NavKey::Backward) {
        direction -= forward;
    }
    if keys.is_held(NavKey::Left) {
        direction -= right;
    }
    if keys.is_held(NavKey::Right) {
        direction += right;
    }

    direction.normalize_or_zero() * step
}

/// Move camera and orbit target together while direction keys are held
pub(crate) fn camera_walk_system(
    time: Res<Time>,
    keys: Res<KeySet>,
    nav: Res<NavigationConfig>,
    mut camera_query: Query<(&mut Transform, &mut OrbitCamera), With<MainCamera>>,
) {
    if !keys.any_held() {
        return;
    }

    let Ok((mut transform, mut orbit)) = camera_query.single_mut() else {
        return;
    };

    let delta = walk_displacement(transform.rotation, &keys, nav.walk_speed * time.delta_secs());
    if delta == Vec3::ZERO {
        return;
    }

    transform.translation += delta;
    orbit.translate_target(delta);
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn held(codes: &[KeyCode]) -> KeySet {
        let mut keys = KeySet::default();
        for code in codes {
            keys.on_key_event(*code, true);
        }
        keys
    }

    #[test]
    fn test_forward_follows_view_direction() {
        // Identity looks down -Z
        let delta = walk_displacement(Quat::IDENTITY, &held(&[KeyCode::KeyW]), 0.2);
        assert!((delta - Vec3::new(0.0, 0.0, -0.2)).length() < EPS);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let keys = held(&[KeyCode::KeyW, KeyCode::ArrowDown]);
        assert_eq!(walk_displacement(Quat::IDENTITY, &keys, 0.2), Vec3::ZERO);

        let keys = held(&[KeyCode::KeyA, KeyCode::KeyD]);
        assert_eq!(walk_displacement(Quat::IDENTITY, &keys, 0.2), Vec3::ZERO);
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let keys = held(&[KeyCode::KeyW, KeyCode::KeyD]);
        let delta = walk_displacement(Quat::IDENTITY, &keys, 0.2);
        assert!((delta.length() - 0.2).abs() < EPS);
        assert!(delta.x > 0.0 && delta.z < 0.0);
    }

    #[test]
    fn test_pitch_does_not_lift_camera() {
        let looking_down = Transform::from_xyz(20.0, 10.0, 30.0)
            .looking_at(Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
            .rotation;
        let delta = walk_displacement(looking_down, &held(&[KeyCode::ArrowUp]), 0.2);
        assert!(delta.y.abs() < EPS);
        assert!((delta.length() - 0.2).abs() < EPS);
    }

    #[test]
    fn test_no_keys_no_motion() {
        assert_eq!(walk_displacement(Quat::IDENTITY, &KeySet::default(), 0.2), Vec3::ZERO);
    }

    #[test]
    fn test_reference_step_per_frame() {
        let nav = NavigationConfig::default();
        let delta = walk_displacement(Quat::IDENTITY, &held(&[KeyCode::KeyS]), nav.walk_speed / 60.0);
        assert!((delta.z - 0.2).abs() < EPS);
    }
}

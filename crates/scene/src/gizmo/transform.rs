//! Gizmo drag math and transform application
//!
//! Drags are projected onto a horizontal plane through the gizmo center.
//! The building pose is always recomputed from the pose at grab time, so
//! snapping never accumulates error.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use cantilever_config::SnapConfig;

use crate::camera::MainCamera;
use crate::gizmo_raycast::GizmoHandle;
use crate::selection::Selectable;

use super::state::{DragOrigin, GizmoState};

/// Rays flatter than this never reach the drag plane in a useful place
const MIN_RAY_SLOPE: f32 = 1e-4;

/// Intersect a ray with the horizontal plane `y = plane_y`
pub(crate) fn ray_plane_hit(origin: Vec3, dir: Vec3, plane_y: f32) -> Option<Vec3> {
    if dir.y.abs() < MIN_RAY_SLOPE {
        return None;
    }
    let t = (plane_y - origin.y) / dir.y;
    (t > 0.0).then(|| origin + dir * t)
}

/// Round `value` to the nearest multiple of `step`; a non-positive step disables snapping
pub(crate) fn snap(value: f32, step: f32) -> f32 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

/// Heading of a horizontal offset around +Y, matching `Quat::from_rotation_y`
fn heading(offset: Vec3) -> f32 {
    offset.x.atan2(offset.z)
}

/// Signed yaw from `from` to `to` as seen from `center`, in (-PI, PI]
pub(crate) fn signed_yaw_between(center: Vec3, from: Vec3, to: Vec3) -> f32 {
    let mut angle = heading(to - center) - heading(from - center);
    if angle > PI {
        angle -= TAU;
    } else if angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Position after dragging `handle` from the grab point to `current`.
/// Only the handle's axes move, and each moved coordinate lands on the grid.
pub(crate) fn translated_position(
    origin: &DragOrigin,
    handle: GizmoHandle,
    current: Vec3,
    step: f32,
) -> Vec3 {
    let delta = current - origin.grab_point;
    let (move_x, move_z) = handle.translation_axes();
    let mut position = origin.original.translation;
    if move_x {
        position.x = snap(position.x + delta.x, step);
    }
    if move_z {
        position.z = snap(position.z + delta.z, step);
    }
    position
}

/// Advance the yaw accumulator to `current` and return the snapped rotation
pub(crate) fn rotated(origin: &mut DragOrigin, current: Vec3, step: f32) -> Quat {
    let center = origin.original.translation;
    let off_center = |p: Vec3| (p - center).with_y(0.0).length_squared() > f32::EPSILON;
    if off_center(current) && off_center(origin.last_point) {
        origin.accumulated_yaw += signed_yaw_between(center, origin.last_point, current);
        origin.last_point = current;
    }
    Quat::from_rotation_y(snap(origin.accumulated_yaw, step)) * origin.original.rotation
}

/// Move or rotate the attached building to follow the cursor
pub(crate) fn apply_gizmo_drag(
    mut gizmo_state: ResMut<GizmoState>,
    snap_config: Res<SnapConfig>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut buildings: Query<&mut Transform, (With<Selectable>, Without<MainCamera>)>,
) {
    if !gizmo_state.is_dragging() {
        return;
    }
    let handle = gizmo_state.active_handle;
    let Some(target) = gizmo_state.target() else {
        return;
    };
    let Ok(window) = window_query.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else {
        return;
    };
    let Ok(mut transform) = buildings.get_mut(target) else {
        return;
    };
    let Some(origin) = gizmo_state.drag.as_mut() else {
        return;
    };
    // Cursor above the horizon: hold the last pose
    let Some(current) = ray_plane_hit(ray.origin, *ray.direction, origin.plane_y) else {
        return;
    };

    if handle.is_translate() {
        let position = translated_position(origin, handle, current, snap_config.translation);
        if transform.translation != position {
            transform.translation = position;
        }
    } else if handle.is_rotate() {
        let rotation = rotated(origin, current, snap_config.rotation);
        if transform.rotation != rotation {
            transform.rotation = rotation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cantilever_ipc::TransformMode;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-4;

    fn origin_at(position: Vec3, grab: Vec3) -> DragOrigin {
        DragOrigin::new(Transform::from_translation(position), grab, TransformMode::Translate)
    }

    #[test]
    fn test_ray_plane_hit() {
        let hit = ray_plane_hit(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 1.0).normalize(), 0.0);
        assert!((hit.unwrap() - Vec3::new(0.0, 0.0, 10.0)).length() < EPS);
        // Parallel and pointing away both miss
        assert!(ray_plane_hit(Vec3::Y, Vec3::X, 0.0).is_none());
        assert!(ray_plane_hit(Vec3::Y, Vec3::Y, 0.0).is_none());
    }

    #[test]
    fn test_snap() {
        assert_eq!(snap(1.26, 0.5), 1.5);
        assert_eq!(snap(-0.24, 0.5), 0.0);
        assert_eq!(snap(0.3, 0.0), 0.3);
    }

    #[test]
    fn test_x_handle_moves_only_x_and_snaps() {
        let origin = origin_at(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0));
        let position = translated_position(&origin, GizmoHandle::TranslateX, Vec3::new(2.3, 0.0, 4.0), 0.5);
        assert_eq!(position, Vec3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn test_plane_handle_moves_x_and_z() {
        let origin = origin_at(Vec3::new(-25.0, 0.0, 5.0), Vec3::new(-24.0, 0.0, 5.0));
        let position =
            translated_position(&origin, GizmoHandle::TranslatePlane, Vec3::new(-21.8, 0.0, 7.1), 0.5);
        assert_eq!(position, Vec3::new(-23.0, 0.0, 7.0));
    }

    #[test]
    fn test_translation_snaps_world_coordinate() {
        // Building starts off-grid; the result still lands on the grid
        let origin = origin_at(Vec3::new(0.2, 0.0, 0.0), Vec3::ZERO);
        let position = translated_position(&origin, GizmoHandle::TranslateX, Vec3::new(0.1, 0.0, 0.0), 0.5);
        assert_eq!(position.x, 0.5);
    }

    #[test]
    fn test_signed_yaw_matches_rotation_direction() {
        let yaw = signed_yaw_between(Vec3::ZERO, Vec3::Z, Vec3::X);
        assert!((yaw - FRAC_PI_2).abs() < EPS);
        // Rotating +Z by that yaw lands on +X
        assert!((Quat::from_rotation_y(yaw) * Vec3::Z - Vec3::X).length() < EPS);
    }

    #[test]
    fn test_yaw_wraps_to_shortest_turn() {
        let from = Vec3::new(-0.1, 0.0, -1.0);
        let to = Vec3::new(0.1, 0.0, -1.0);
        assert!(signed_yaw_between(Vec3::ZERO, from, to).abs() < 0.3);
    }

    #[test]
    fn test_rotation_snaps_to_fifteen_degrees() {
        let mut origin = origin_at(Vec3::ZERO, Vec3::Z);
        let step = PI / 12.0;
        // About 20 degrees snaps to 15
        let current = Quat::from_rotation_y(20f32.to_radians()) * Vec3::Z;
        let rotation = rotated(&mut origin, current, step);
        let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
        assert!((yaw - step).abs() < EPS);
    }

    #[test]
    fn test_rotation_accumulates_past_half_turn() {
        let mut origin = origin_at(Vec3::ZERO, Vec3::Z);
        for degrees in (30..=270).step_by(30) {
            let current = Quat::from_rotation_y((degrees as f32).to_radians()) * Vec3::Z;
            rotated(&mut origin, current, PI / 12.0);
        }
        assert!((origin.accumulated_yaw - 270f32.to_radians()).abs() < EPS);
    }
}

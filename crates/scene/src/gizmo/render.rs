//! Gizmo rendering system

use std::f32::consts::FRAC_PI_2;

use bevy::math::Isometry3d;
use bevy::prelude::*;

use crate::camera::MainCamera;
use crate::gizmo_raycast::{GizmoGeometry, GizmoHandle};
use crate::selection::Selectable;
use crate::view::ViewSettings;

use super::state::{GizmoPhase, GizmoState};
use super::{gizmo_center, TransformGizmos};

/// Render the gizmo for the attached building using Bevy's gizmos API
pub(crate) fn render_gizmo(
    gizmo_state: Res<GizmoState>,
    view: Res<ViewSettings>,
    geometry: Res<GizmoGeometry>,
    camera_query: Query<&GlobalTransform, With<MainCamera>>,
    buildings: Query<&Transform, With<Selectable>>,
    mut gizmos: Gizmos<TransformGizmos>,
) {
    if gizmo_state.phase() == GizmoPhase::Inactive {
        return;
    }
    let Some(transform) = gizmo_state.target().and_then(|e| buildings.get(e).ok()) else {
        return;
    };
    let Ok(camera_transform) = camera_query.single() else {
        return;
    };

    let center = gizmo_center(transform);
    let geometry = geometry.for_camera_distance(camera_transform.translation().distance(center));
    let visibility = view.transform_mode.axis_visibility();

    // Get colors with hover/active highlighting
    let handle_color = |handle: GizmoHandle, base_color: Color| -> Color {
        if gizmo_state.active_handle == handle {
            Color::srgb(1.0, 1.0, 0.2) // Yellow for active
        } else if gizmo_state.hovered_handle == handle {
            match base_color {
                Color::Srgba(c) => Color::srgb(
                    (c.red * 1.5).min(1.0),
                    (c.green * 1.5).min(1.0),
                    (c.blue * 1.5).min(1.0),
                ),
                _ => base_color,
            }
        } else {
            base_color
        }
    };

    let base_x = Color::srgb(0.9, 0.2, 0.2);
    let base_y = Color::srgb(0.2, 0.8, 0.2);
    let base_z = Color::srgb(0.2, 0.3, 0.9);

    if visibility.x {
        let color = handle_color(GizmoHandle::TranslateX, base_x);
        gizmos.arrow(center, center + Vec3::X * geometry.arrow_length, color);
    }
    if visibility.z {
        let color = handle_color(GizmoHandle::TranslateZ, base_z);
        gizmos.arrow(center, center + Vec3::Z * geometry.arrow_length, color);
    }
    if visibility.x && visibility.z {
        let color = handle_color(GizmoHandle::TranslatePlane, Color::srgb(0.85, 0.85, 0.3));
        // Rect lies in XY by default; tip it onto the ground
        gizmos.rect(
            Isometry3d::new(geometry.plane_center(center), Quat::from_rotation_x(FRAC_PI_2)),
            Vec2::splat(geometry.plane_size),
            color,
        );
    }
    if visibility.y {
        let color = handle_color(GizmoHandle::RotateY, base_y);
        // Y rotation circle: perpendicular to Y axis
        gizmos.circle(
            Isometry3d::new(center, Quat::from_rotation_x(FRAC_PI_2)),
            geometry.ring_radius,
            color,
        );
        // Heading tick so the current yaw is visible while turning
        let heading = transform.rotation * Vec3::Z;
        let heading = Vec3::new(heading.x, 0.0, heading.z).normalize_or_zero();
        gizmos.line(center, center + heading * geometry.ring_radius, color);
    }
}

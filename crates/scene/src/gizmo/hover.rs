//! Gizmo hover detection

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::camera::MainCamera;
use crate::gizmo_raycast::{raycast_gizmo, GizmoGeometry, GizmoHandle};
use crate::selection::Selectable;
use crate::view::ViewSettings;

use super::gizmo_center;
use super::state::{GizmoPhase, GizmoState};

/// Detect which exposed gizmo handle the cursor is over
pub(crate) fn detect_gizmo_hover(
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    buildings: Query<&Transform, With<Selectable>>,
    view: Res<ViewSettings>,
    geometry: Res<GizmoGeometry>,
    mut gizmo_state: ResMut<GizmoState>,
) {
    // Don't update hover while dragging
    if gizmo_state.is_dragging() {
        return;
    }

    let hovered = hovered_handle(
        &gizmo_state,
        &window_query,
        &camera_query,
        &buildings,
        &view,
        &geometry,
    );
    if gizmo_state.hovered_handle != hovered {
        gizmo_state.hovered_handle = hovered;
    }
}

fn hovered_handle(
    gizmo_state: &GizmoState,
    window_query: &Query<&Window, With<PrimaryWindow>>,
    camera_query: &Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    buildings: &Query<&Transform, With<Selectable>>,
    view: &ViewSettings,
    geometry: &GizmoGeometry,
) -> GizmoHandle {
    if gizmo_state.phase() != GizmoPhase::AttachedIdle {
        return GizmoHandle::None;
    }
    let Some(transform) = gizmo_state.target().and_then(|e| buildings.get(e).ok()) else {
        return GizmoHandle::None;
    };
    let Some(cursor_pos) = window_query.single().ok().and_then(Window::cursor_position) else {
        return GizmoHandle::None;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return GizmoHandle::None;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else {
        return GizmoHandle::None;
    };

    let center = gizmo_center(transform);
    let sized = geometry.for_camera_distance(camera_transform.translation().distance(center));
    raycast_gizmo(
        ray.origin,
        *ray.direction,
        center,
        view.transform_mode.axis_visibility(),
        &sized,
    )
    .map_or(GizmoHandle::None, |hit| hit.handle)
}

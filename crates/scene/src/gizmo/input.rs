//! Gizmo input handling: attachment, press, release and interruptions

use bevy::input::mouse::MouseButton;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowFocused};
use cantilever_ipc::{SceneToUi, Transform3D};

use crate::camera::{MainCamera, OrbitCamera, OrbitControl};
use crate::gizmo_raycast::GizmoHandle;
use crate::selection::{Selectable, SelectionState};
use crate::view::ViewSettings;
use crate::OutboundUiMessages;

use super::gizmo_center;
use super::state::{DragOrigin, GizmoPhase, GizmoState};
use super::transform::ray_plane_hit;

type BuildingQuery<'w, 's> = Query<'w, 's, (Entity, &'static Selectable, &'static Transform)>;

pub(crate) fn to_transform3d(transform: &Transform) -> Transform3D {
    Transform3D {
        position: transform.translation.to_array(),
        rotation: transform.rotation.to_array(),
        scale: transform.scale.to_array(),
    }
}

/// Tell the UI where a finished drag left the building
fn report_drag_end(ended: Option<Entity>, buildings: &BuildingQuery, outbound: &mut OutboundUiMessages) {
    let Some((_, selectable, transform)) = ended.and_then(|e| buildings.get(e).ok()) else {
        return;
    };
    info!(
        "Gizmo: {} now at {:?}, yaw {:.1} deg",
        selectable.id.label(),
        transform.translation,
        transform.rotation.to_euler(EulerRot::YXZ).0.to_degrees()
    );
    outbound.send(SceneToUi::BuildingTransformed {
        id: selectable.id,
        transform: to_transform3d(transform),
    });
}

/// Follow the selection, and end a drag on focus loss or a mode switch
pub(crate) fn sync_gizmo_with_selection(
    selection: Res<SelectionState>,
    view: Res<ViewSettings>,
    mut focus_events: MessageReader<WindowFocused>,
    buildings: BuildingQuery,
    mut orbit_query: Query<&mut OrbitCamera, With<MainCamera>>,
    mut gizmo_state: ResMut<GizmoState>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    let mut nav = orbit_query.single_mut().ok();

    let wanted = selection.selected.and_then(|id| {
        buildings
            .iter()
            .find(|(_, selectable, _)| selectable.id == id)
            .map(|(entity, _, _)| entity)
    });

    let ended = match wanted {
        Some(entity) if gizmo_state.target() != Some(entity) => {
            gizmo_state.attach(entity, nav.as_deref_mut())
        }
        None if gizmo_state.phase() != GizmoPhase::Inactive => {
            gizmo_state.detach(nav.as_deref_mut())
        }
        _ => None,
    };
    report_drag_end(ended, &buildings, &mut outbound);

    let focus_lost = focus_events.read().any(|event| !event.focused);
    // The button check belongs to the release system
    if let Some(cause) = gizmo_state.interruption(view.transform_mode, focus_lost, true) {
        warn!("Gizmo: drag interrupted ({cause:?})");
        let ended = gizmo_state.end_drag(nav.as_deref_mut());
        report_drag_end(ended, &buildings, &mut outbound);
    }
}

/// Start a drag when the left button goes down on a hovered handle
pub(crate) fn handle_gizmo_press(
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut orbit_query: Query<&mut OrbitCamera, With<MainCamera>>,
    buildings: Query<&Transform, With<Selectable>>,
    view: Res<ViewSettings>,
    mut gizmo_state: ResMut<GizmoState>,
) {
    if !mouse_button.just_pressed(MouseButton::Left)
        || gizmo_state.phase() != GizmoPhase::AttachedIdle
        || gizmo_state.hovered_handle == GizmoHandle::None
    {
        return;
    }

    let Some(transform) = gizmo_state.target().and_then(|e| buildings.get(e).ok()) else {
        return;
    };
    let Some(cursor_pos) = window_query.single().ok().and_then(Window::cursor_position) else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else {
        return;
    };
    let Some(grab_point) = ray_plane_hit(ray.origin, *ray.direction, gizmo_center(transform).y)
    else {
        return;
    };

    let handle = gizmo_state.hovered_handle;
    let origin = DragOrigin::new(*transform, grab_point, view.transform_mode);
    if gizmo_state.begin_drag(handle, origin, orbit_query.single_mut().ok().as_deref_mut()) {
        info!("Gizmo: Started {:?} drag", handle);
    }
}

/// End the drag once the left button is up, whether or not the release
/// event itself was seen
pub(crate) fn handle_gizmo_release(
    mouse_button: Res<ButtonInput<MouseButton>>,
    view: Res<ViewSettings>,
    buildings: BuildingQuery,
    mut orbit_query: Query<&mut OrbitCamera, With<MainCamera>>,
    mut gizmo_state: ResMut<GizmoState>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    let held = mouse_button.pressed(MouseButton::Left);
    if gizmo_state.interruption(view.transform_mode, false, held).is_none() {
        return;
    }
    let ended = gizmo_state.end_drag(orbit_query.single_mut().ok().as_deref_mut());
    report_drag_end(ended, &buildings, &mut outbound);
}

/// Keep the navigator's enabled flag equal to "not dragging"
pub(crate) fn reconcile_navigator(
    gizmo_state: Res<GizmoState>,
    mut orbit_query: Query<&mut OrbitCamera, With<MainCamera>>,
) {
    let Ok(mut orbit) = orbit_query.single_mut() else {
        return;
    };
    // Read through Deref first so a settled flag does not mark the camera changed
    if orbit.is_enabled() != gizmo_state.is_dragging() {
        return;
    }
    if gizmo_state.reconcile(&mut *orbit) {
        debug!("Gizmo: navigator enabled flag reconciled to {}", orbit.enabled);
    }
}

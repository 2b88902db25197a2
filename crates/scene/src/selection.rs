//! Single-building selection
//!
//! Clicking a building part selects the building it belongs to. Clicking the
//! ground, a decoration or empty sky clears the selection. A press that turns
//! into an orbit drag, or that started on a gizmo handle, is not a click.
//! Uses Bevy's built-in MeshPickingPlugin for raycasting.

use bevy::picking::prelude::*;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use cantilever_ipc::{BuildingId, SceneToUi};

use crate::gizmo::{detect_gizmo_hover, GizmoState};
use crate::gizmo_raycast::GizmoHandle;
use crate::{OutboundUiMessages, SceneSystems};

/// Pointer travel (logical pixels) beyond which a press counts as a drag
pub(crate) const CLICK_DRAG_THRESHOLD: f32 = 4.0;

/// Marks the root entity of a selectable building
#[derive(Component, Debug, Clone, Copy)]
pub struct Selectable {
    pub id: BuildingId,
}

/// Marker component for the currently selected building root
#[derive(Component)]
pub struct Selected;

/// Resource tracking current selection (at most one building)
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: Option<BuildingId>,
}

impl SelectionState {
    /// Set the selection, returning true if it changed
    pub fn select(&mut self, id: Option<BuildingId>) -> bool {
        if self.selected == id {
            return false;
        }
        self.selected = id;
        true
    }

    pub fn clear(&mut self) -> bool {
        self.select(None)
    }

    pub fn is_selected(&self, id: BuildingId) -> bool {
        self.selected == Some(id)
    }
}

/// What a single click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Building(BuildingId),
    /// Ground, decorations or empty space
    Background,
}

/// Selection produced by the clicks of one pointer gesture. A building hit
/// wins over a background hit from the same gesture; no hits means the click
/// missed every mesh and deselects.
pub fn resolve_click(targets: &[ClickTarget]) -> Option<BuildingId> {
    targets.iter().find_map(|target| match target {
        ClickTarget::Building(id) => Some(*id),
        ClickTarget::Background => None,
    })
}

/// Walk up the hierarchy from a picked mesh to the building that owns it
pub(crate) fn find_building(
    mut entity: Entity,
    building_of: impl Fn(Entity) -> Option<BuildingId>,
    parent_of: impl Fn(Entity) -> Option<Entity>,
) -> Option<BuildingId> {
    loop {
        if let Some(id) = building_of(entity) {
            return Some(id);
        }
        entity = parent_of(entity)?;
    }
}

/// The current left-button press, tracked so a release can be classified
#[derive(Resource, Debug, Default)]
pub(crate) struct PointerGesture {
    press_position: Option<Vec2>,
    dragged: bool,
    on_gizmo: bool,
}

impl PointerGesture {
    pub(crate) fn press(&mut self, position: Option<Vec2>, on_gizmo: bool) {
        self.press_position = position;
        self.dragged = false;
        self.on_gizmo = on_gizmo;
    }

    pub(crate) fn track(&mut self, position: Vec2) {
        if let Some(start) = self.press_position
            && start.distance(position) > CLICK_DRAG_THRESHOLD
        {
            self.dragged = true;
        }
    }

    /// True if releasing now should be treated as a click
    pub(crate) fn is_click(&self) -> bool {
        !self.dragged && !self.on_gizmo
    }
}

/// Plugin for building selection
pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MeshPickingPlugin)
            .init_resource::<SelectionState>()
            .init_resource::<PointerGesture>()
            .add_systems(
                Update,
                track_pointer_gesture
                    .after(detect_gizmo_hover)
                    .in_set(SceneSystems::Input),
            )
            .add_systems(
                Update,
                (handle_click_selection, sync_selected_markers)
                    .chain()
                    .in_set(SceneSystems::Selection),
            );
    }
}

fn track_pointer_gesture(
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    gizmo: Res<GizmoState>,
    mut gesture: ResMut<PointerGesture>,
) {
    let cursor = window_query.single().ok().and_then(Window::cursor_position);

    if mouse_button.just_pressed(MouseButton::Left) {
        gesture.press(cursor, gizmo.hovered_handle != GizmoHandle::None);
    } else if mouse_button.pressed(MouseButton::Left)
        && let Some(position) = cursor
    {
        gesture.track(position);
    }
}

/// Handle click events for selection using Pointer events
fn handle_click_selection(
    mouse_button: Res<ButtonInput<MouseButton>>,
    gesture: Res<PointerGesture>,
    mut selection: ResMut<SelectionState>,
    mut click_events: MessageReader<Pointer<Click>>,
    selectables: Query<&Selectable>,
    parents: Query<&ChildOf>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    let targets: Vec<ClickTarget> = click_events
        .read()
        .filter(|event| event.button == PointerButton::Primary)
        .map(|event| {
            find_building(
                event.entity,
                |e| selectables.get(e).ok().map(|s| s.id),
                |e| parents.get(e).ok().map(ChildOf::parent),
            )
            .map_or(ClickTarget::Background, ClickTarget::Building)
        })
        .collect();

    // A release with no click event missed every mesh
    if targets.is_empty() && !mouse_button.just_released(MouseButton::Left) {
        return;
    }

    if !gesture.is_click() {
        return;
    }

    let next = resolve_click(&targets);
    if selection.select(next) {
        info!("Selection: {:?}", next);
        outbound.send(SceneToUi::SelectionChanged { selected: next });
    }
}

/// Keep the `Selected` marker on exactly the selected building root
fn sync_selected_markers(
    mut commands: Commands,
    selection: Res<SelectionState>,
    buildings: Query<(Entity, &Selectable, Has<Selected>)>,
) {
    for (entity, selectable, marked) in buildings.iter() {
        let wanted = selection.is_selected(selectable.id);
        if wanted && !marked {
            commands.entity(entity).insert(Selected);
        } else if !wanted && marked {
            commands.entity(entity).remove::<Selected>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_reports_changes_only() {
        let mut selection = SelectionState::default();
        assert!(selection.select(Some(BuildingId::MainVilla)));
        assert!(!selection.select(Some(BuildingId::MainVilla)));
        assert!(selection.select(Some(BuildingId::Annex)));
        assert!(selection.clear());
        assert!(!selection.clear());
    }

    #[test]
    fn test_building_click_beats_background() {
        let targets = [ClickTarget::Background, ClickTarget::Building(BuildingId::Annex)];
        assert_eq!(resolve_click(&targets), Some(BuildingId::Annex));
    }

    #[test]
    fn test_background_or_miss_deselects() {
        assert_eq!(resolve_click(&[ClickTarget::Background]), None);
        assert_eq!(resolve_click(&[]), None);
    }

    #[test]
    fn test_find_building_walks_up_to_root() {
        let mut world = World::new();
        let root = world.spawn_empty().id();
        let group = world.spawn_empty().id();
        let mesh = world.spawn_empty().id();
        let stray = world.spawn_empty().id();

        let building_of = |e: Entity| (e == root).then_some(BuildingId::MainVilla);
        let parent_of = |e: Entity| {
            if e == mesh {
                Some(group)
            } else if e == group {
                Some(root)
            } else {
                None
            }
        };

        assert_eq!(find_building(mesh, building_of, parent_of), Some(BuildingId::MainVilla));
        assert_eq!(find_building(stray, building_of, parent_of), None);
    }

    #[test]
    fn test_small_jitter_is_still_a_click() {
        let mut gesture = PointerGesture::default();
        gesture.press(Some(Vec2::new(100.0, 100.0)), false);
        gesture.track(Vec2::new(102.0, 101.0));
        assert!(gesture.is_click());
    }

    #[test]
    fn test_orbit_drag_is_not_a_click() {
        let mut gesture = PointerGesture::default();
        gesture.press(Some(Vec2::new(100.0, 100.0)), false);
        gesture.track(Vec2::new(160.0, 100.0));
        // Returning to the start does not turn it back into a click
        gesture.track(Vec2::new(100.0, 100.0));
        assert!(!gesture.is_click());
    }

    #[test]
    fn test_press_on_gizmo_is_not_a_click() {
        let mut gesture = PointerGesture::default();
        gesture.press(Some(Vec2::ZERO), true);
        assert!(!gesture.is_click());
        gesture.press(Some(Vec2::ZERO), false);
        assert!(gesture.is_click());
    }
}

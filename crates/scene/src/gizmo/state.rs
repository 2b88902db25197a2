//! GizmoState resource and state machine methods
//!
//! The gizmo is Inactive with no selection, AttachedIdle while bound to the
//! selected building, and Dragging while a handle is held. The orbit
//! navigator is disabled for exactly the Dragging phase; every transition
//! that enters or leaves it takes the navigator so the flag moves with it.

use bevy::prelude::*;
use cantilever_ipc::TransformMode;

use crate::camera::OrbitControl;
use crate::gizmo_raycast::GizmoHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoPhase {
    #[default]
    Inactive,
    AttachedIdle,
    Dragging,
}

/// Why a drag in progress has to stop without a release event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragInterrupt {
    FocusLost,
    ModeChanged,
    /// Left button is up but the release was never seen
    ButtonUp,
}

/// Where a drag started, so every frame is computed from the original pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DragOrigin {
    /// Building transform when the handle was grabbed
    pub original: Transform,
    /// Point on the drag plane under the cursor at grab time
    pub grab_point: Vec3,
    /// Height of the horizontal drag plane
    pub plane_y: f32,
    /// Mode the drag started in; a mode switch ends the drag
    pub mode: TransformMode,
    /// Last ground-plane hit, for accumulating yaw across many turns
    pub last_point: Vec3,
    /// Unsnapped yaw accumulated since the grab
    pub accumulated_yaw: f32,
}

impl DragOrigin {
    pub(crate) fn new(original: Transform, grab_point: Vec3, mode: TransformMode) -> Self {
        Self {
            original,
            grab_point,
            plane_y: grab_point.y,
            mode,
            last_point: grab_point,
            accumulated_yaw: 0.0,
        }
    }
}

/// Resource tracking current gizmo state
#[derive(Resource, Debug, Default)]
pub struct GizmoState {
    phase: GizmoPhase,
    /// Building root the gizmo is attached to
    target: Option<Entity>,
    /// Currently hovered handle (for visual feedback)
    pub hovered_handle: GizmoHandle,
    /// Currently active (being dragged) handle
    pub active_handle: GizmoHandle,
    pub(crate) drag: Option<DragOrigin>,
}

impl GizmoState {
    pub fn phase(&self) -> GizmoPhase {
        self.phase
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == GizmoPhase::Dragging
    }

    /// Bind to a building. Rebinding while dragging ends the drag first.
    /// Returns the entity whose drag was ended, if any.
    pub(crate) fn attach<N: OrbitControl + ?Sized>(
        &mut self,
        entity: Entity,
        nav: Option<&mut N>,
    ) -> Option<Entity> {
        if self.target == Some(entity) {
            return None;
        }
        let ended = self.end_drag(nav);
        self.target = Some(entity);
        self.phase = GizmoPhase::AttachedIdle;
        self.hovered_handle = GizmoHandle::None;
        ended
    }

    /// Unbind from the selection, ending any drag in progress
    pub(crate) fn detach<N: OrbitControl + ?Sized>(&mut self, nav: Option<&mut N>) -> Option<Entity> {
        let ended = self.end_drag(nav);
        self.target = None;
        self.phase = GizmoPhase::Inactive;
        self.hovered_handle = GizmoHandle::None;
        ended
    }

    /// Start dragging `handle`. Only valid from AttachedIdle with a real handle.
    pub(crate) fn begin_drag<N: OrbitControl + ?Sized>(
        &mut self,
        handle: GizmoHandle,
        origin: DragOrigin,
        nav: Option<&mut N>,
    ) -> bool {
        if self.phase != GizmoPhase::AttachedIdle || handle == GizmoHandle::None {
            return false;
        }
        self.phase = GizmoPhase::Dragging;
        self.active_handle = handle;
        self.drag = Some(origin);
        if let Some(nav) = nav {
            nav.set_enabled(false);
        }
        true
    }

    /// Finish the current drag, keeping whatever transform it produced.
    /// Returns the dragged entity, or None if nothing was being dragged.
    pub(crate) fn end_drag<N: OrbitControl + ?Sized>(&mut self, nav: Option<&mut N>) -> Option<Entity> {
        if self.phase != GizmoPhase::Dragging {
            return None;
        }
        self.phase = GizmoPhase::AttachedIdle;
        self.active_handle = GizmoHandle::None;
        self.drag = None;
        if let Some(nav) = nav {
            nav.set_enabled(true);
        }
        self.target
    }

    /// Decide whether the current drag must end this frame. `None` when not
    /// dragging or when the drag can go on.
    pub(crate) fn interruption(
        &self,
        mode: TransformMode,
        focus_lost: bool,
        button_held: bool,
    ) -> Option<DragInterrupt> {
        let drag = self.drag.filter(|_| self.is_dragging())?;
        if focus_lost {
            Some(DragInterrupt::FocusLost)
        } else if drag.mode != mode {
            Some(DragInterrupt::ModeChanged)
        } else if !button_held {
            Some(DragInterrupt::ButtonUp)
        } else {
            None
        }
    }

    /// Force `nav.enabled == !dragging`. Returns true if it had drifted.
    pub(crate) fn reconcile<N: OrbitControl + ?Sized>(&self, nav: &mut N) -> bool {
        let wanted = !self.is_dragging();
        if nav.is_enabled() == wanted {
            return false;
        }
        nav.set_enabled(wanted);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeNavigator {
        enabled: bool,
        target: Vec3,
    }

    impl FakeNavigator {
        fn enabled() -> Self {
            Self {
                enabled: true,
                ..default()
            }
        }
    }

    impl OrbitControl for FakeNavigator {
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

    fn origin() -> DragOrigin {
        DragOrigin::new(Transform::IDENTITY, Vec3::new(1.0, 0.0, 0.0), TransformMode::Translate)
    }

    fn entities() -> (Entity, Entity) {
        let mut world = World::new();
        (world.spawn_empty().id(), world.spawn_empty().id())
    }

    #[test]
    fn test_attach_and_detach() {
        let (villa, _) = entities();
        let mut nav = FakeNavigator::enabled();
        let mut gizmo = GizmoState::default();
        assert_eq!(gizmo.phase(), GizmoPhase::Inactive);

        gizmo.attach(villa, Some(&mut nav));
        assert_eq!(gizmo.phase(), GizmoPhase::AttachedIdle);
        assert_eq!(gizmo.target(), Some(villa));

        gizmo.detach(Some(&mut nav));
        assert_eq!(gizmo.phase(), GizmoPhase::Inactive);
        assert_eq!(gizmo.target(), None);
        assert!(nav.enabled);
    }

    #[test]
    fn test_drag_disables_navigator_until_release() {
        let (villa, _) = entities();
        let mut nav = FakeNavigator::enabled();
        let mut gizmo = GizmoState::default();
        gizmo.attach(villa, Some(&mut nav));

        assert!(gizmo.begin_drag(GizmoHandle::TranslateX, origin(), Some(&mut nav)));
        assert!(gizmo.is_dragging());
        assert!(!nav.enabled);

        assert_eq!(gizmo.end_drag(Some(&mut nav)), Some(villa));
        assert_eq!(gizmo.phase(), GizmoPhase::AttachedIdle);
        assert!(nav.enabled);
    }

    #[test]
    fn test_cannot_drag_without_attachment_or_handle() {
        let (villa, _) = entities();
        let mut nav = FakeNavigator::enabled();
        let mut gizmo = GizmoState::default();
        assert!(!gizmo.begin_drag(GizmoHandle::RotateY, origin(), Some(&mut nav)));

        gizmo.attach(villa, Some(&mut nav));
        assert!(!gizmo.begin_drag(GizmoHandle::None, origin(), Some(&mut nav)));
        assert!(nav.enabled);
    }

    #[test]
    fn test_deselect_mid_drag_restores_navigator() {
        let (villa, _) = entities();
        let mut nav = FakeNavigator::enabled();
        let mut gizmo = GizmoState::default();
        gizmo.attach(villa, Some(&mut nav));
        gizmo.begin_drag(GizmoHandle::TranslatePlane, origin(), Some(&mut nav));

        assert_eq!(gizmo.detach(Some(&mut nav)), Some(villa));
        assert!(nav.enabled);
        assert!(gizmo.drag.is_none());
    }

    #[test]
    fn test_switching_building_mid_drag_ends_drag() {
        let (villa, annex) = entities();
        let mut nav = FakeNavigator::enabled();
        let mut gizmo = GizmoState::default();
        gizmo.attach(villa, Some(&mut nav));
        gizmo.begin_drag(GizmoHandle::RotateY, origin(), Some(&mut nav));

        assert_eq!(gizmo.attach(annex, Some(&mut nav)), Some(villa));
        assert_eq!(gizmo.phase(), GizmoPhase::AttachedIdle);
        assert_eq!(gizmo.target(), Some(annex));
        assert!(nav.enabled);
    }

    #[test]
    fn test_reattaching_same_building_keeps_drag() {
        let (villa, _) = entities();
        let mut nav = FakeNavigator::enabled();
        let mut gizmo = GizmoState::default();
        gizmo.attach(villa, Some(&mut nav));
        gizmo.begin_drag(GizmoHandle::TranslateZ, origin(), Some(&mut nav));

        assert_eq!(gizmo.attach(villa, Some(&mut nav)), None);
        assert!(gizmo.is_dragging());
    }

    fn dragging(villa: Entity, nav: &mut FakeNavigator) -> GizmoState {
        let mut gizmo = GizmoState::default();
        gizmo.attach(villa, Some(&mut *nav));
        gizmo.begin_drag(GizmoHandle::TranslateX, origin(), Some(&mut *nav));
        gizmo
    }

    #[test]
    fn test_held_drag_in_same_mode_continues() {
        let (villa, _) = entities();
        let mut nav = FakeNavigator::enabled();
        let gizmo = dragging(villa, &mut nav);
        assert_eq!(gizmo.interruption(TransformMode::Translate, false, true), None);
        assert!(!nav.enabled);
    }

    #[test]
    fn test_no_interruption_when_idle() {
        let (villa, _) = entities();
        let mut nav = FakeNavigator::enabled();
        let mut gizmo = GizmoState::default();
        assert_eq!(gizmo.interruption(TransformMode::Rotate, true, false), None);
        gizmo.attach(villa, Some(&mut nav));
        assert_eq!(gizmo.interruption(TransformMode::Rotate, true, false), None);
    }

    #[test]
    fn test_each_interruption_ends_drag_and_restores_navigator() {
        let cases = [
            (TransformMode::Translate, true, true, DragInterrupt::FocusLost),
            (TransformMode::Rotate, false, true, DragInterrupt::ModeChanged),
            (TransformMode::Translate, false, false, DragInterrupt::ButtonUp),
        ];
        for (mode, focus_lost, button_held, expected) in cases {
            let (villa, _) = entities();
            let mut nav = FakeNavigator::enabled();
            let mut gizmo = dragging(villa, &mut nav);
            assert_eq!(gizmo.is_dragging(), !nav.enabled);

            assert_eq!(gizmo.interruption(mode, focus_lost, button_held), Some(expected));
            assert_eq!(gizmo.end_drag(Some(&mut nav)), Some(villa));

            assert_eq!(gizmo.phase(), GizmoPhase::AttachedIdle);
            assert!(nav.enabled);
            assert_eq!(gizmo.is_dragging(), !nav.enabled);
            assert_eq!(gizmo.interruption(mode, focus_lost, button_held), None);
        }
    }

    #[test]
    fn test_focus_loss_wins_over_mode_switch() {
        let (villa, _) = entities();
        let mut nav = FakeNavigator::enabled();
        let gizmo = dragging(villa, &mut nav);
        assert_eq!(
            gizmo.interruption(TransformMode::Rotate, true, false),
            Some(DragInterrupt::FocusLost)
        );
    }

    #[test]
    fn test_reconcile_heals_missing_navigator() {
        let (villa, _) = entities();
        let mut gizmo = GizmoState::default();
        gizmo.attach::<FakeNavigator>(villa, None);
        gizmo.begin_drag::<FakeNavigator>(GizmoHandle::TranslateX, origin(), None);

        // Navigator appears mid-drag still enabled
        let mut nav = FakeNavigator::enabled();
        assert!(gizmo.reconcile(&mut nav));
        assert!(!nav.enabled);
        assert!(!gizmo.reconcile(&mut nav));

        gizmo.end_drag::<FakeNavigator>(None);
        assert!(gizmo.reconcile(&mut nav));
        assert!(nav.enabled);
    }
}

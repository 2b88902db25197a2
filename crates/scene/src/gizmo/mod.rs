//! Transform gizmo for the selected building
//!
//! Move mode shows X and Z arrows plus a ground-plane square; Rotate mode
//! shows a single yaw ring. Dragging a handle takes the pointer away from
//! the orbit navigator until the button is released.
//!
//! Translation snaps to a 0.5 unit grid and rotation to 15 degree steps.

mod hover;
mod input;
mod render;
mod state;
mod transform;

use bevy::prelude::*;

use crate::gizmo_raycast::GizmoGeometry;
use crate::SceneSystems;

pub(crate) use hover::detect_gizmo_hover;
pub use state::{GizmoPhase, GizmoState};

/// The gizmo sits slightly above the building origin so it clears the foundation slab
const GIZMO_LIFT: f32 = 0.3;

/// Gizmo line group for handles, drawn on top of scene geometry
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct TransformGizmos;

/// World-space pivot of the gizmo for a building transform
pub(crate) fn gizmo_center(transform: &Transform) -> Vec3 {
    transform.translation + Vec3::Y * GIZMO_LIFT
}

/// Plugin for transform gizmos
pub struct GizmoPlugin;

impl Plugin for GizmoPlugin {
    fn build(&self, app: &mut App) {
        use input::{
            handle_gizmo_press, handle_gizmo_release, reconcile_navigator,
            sync_gizmo_with_selection,
        };
        use render::render_gizmo;
        use transform::apply_gizmo_drag;

        app.init_resource::<GizmoState>()
            .init_resource::<GizmoGeometry>()
            .init_gizmo_group::<TransformGizmos>()
            .add_systems(Startup, configure_gizmo_lines)
            .add_systems(Update, detect_gizmo_hover.in_set(SceneSystems::Input))
            .add_systems(
                Update,
                (
                    sync_gizmo_with_selection,
                    handle_gizmo_press,
                    apply_gizmo_drag,
                    handle_gizmo_release,
                    reconcile_navigator,
                )
                    .chain()
                    .in_set(SceneSystems::Gizmo),
            )
            .add_systems(Update, render_gizmo.in_set(SceneSystems::Draw));
    }
}

fn configure_gizmo_lines(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<TransformGizmos>();
    config.depth_bias = -1.0;
    config.line.width = 3.0;
}

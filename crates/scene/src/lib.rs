//! Villa scene for Cantilever
//!
//! This crate holds the interactive core of the viewer (key tracking,
//! walk-style camera movement, orbit navigation, single selection and the
//! transform gizmo) together with the static scene composition: two
//! buildings, decorations, ground and lighting.
//!
//! The binary crate adds windowing, hotkeys, the UI overlay and the insight
//! bridge on top of [`ScenePlugin`].

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::math::Isometry3d;
use bevy::prelude::*;
use cantilever_config::{NavigationConfig, SnapConfig};
use cantilever_ipc::{SceneToUi, UiToScene};

mod buildings;
mod camera;
mod decorations;
mod gizmo;
mod gizmo_raycast;
mod keys;
mod lighting;
mod selection;
mod view;
mod walk;

pub use buildings::{BuildingsPlugin, GuideAxis, GuideLine, GuideLines};
pub use camera::{CameraControllerPlugin, MainCamera, OrbitCamera, OrbitControl};
pub use decorations::{drift_x, Cloud, DecorationsPlugin};
pub use gizmo::{GizmoPhase, GizmoPlugin, GizmoState};
pub use gizmo_raycast::GizmoHandle;
pub use keys::{KeySet, NavKey};
pub use lighting::{LightingPlugin, SceneLighting, SunLight};
pub use selection::{ClickTarget, Selectable, Selected, SelectionPlugin, SelectionState};
pub use view::ViewSettings;
pub use walk::walk_displacement;

/// Resource for queuing messages to send to the UI
/// The app crate drains this every frame and updates the overlay
#[derive(Resource, Default)]
pub struct OutboundUiMessages {
    pub messages: Vec<SceneToUi>,
}

impl OutboundUiMessages {
    /// Queue a message to be sent to the UI
    pub fn send(&mut self, msg: SceneToUi) {
        self.messages.push(msg);
    }

    /// Take all queued messages, leaving the queue empty
    pub fn drain(&mut self) -> Vec<SceneToUi> {
        std::mem::take(&mut self.messages)
    }
}

/// A command issued by the UI layer (hotkeys, toolbar) to the scene
#[derive(Message, Debug, Clone)]
pub struct SceneCommand(pub UiToScene);

/// Frame ordering for systems that share the camera, the selection and the
/// gizmo. Selection settles first, the gizmo reacts to it, and the camera
/// reads whatever enabled flag the gizmo left behind.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneSystems {
    /// Raw input bookkeeping (held keys, pointer gesture)
    Input,
    Selection,
    Gizmo,
    Camera,
    /// Immediate-mode line drawing
    Draw,
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OutboundUiMessages>()
            .init_resource::<NavigationConfig>()
            .init_resource::<SnapConfig>()
            .add_message::<SceneCommand>();

        app.configure_sets(
            Update,
            (
                SceneSystems::Input,
                SceneSystems::Selection,
                SceneSystems::Gizmo,
                SceneSystems::Camera,
                SceneSystems::Draw,
            )
                .chain(),
        );

        app.add_plugins(view::ViewSettingsPlugin);
        app.add_plugins(CameraControllerPlugin);
        app.add_plugins(LightingPlugin);
        app.add_plugins(SelectionPlugin);
        app.add_plugins(GizmoPlugin);
        app.add_plugins(BuildingsPlugin);
        app.add_plugins(DecorationsPlugin);

        app.add_systems(Startup, setup_scene);
        app.add_systems(Update, draw_ground_grid.in_set(SceneSystems::Draw));
    }
}

/// Size of the ground plane along each side
const GROUND_SIZE: f32 = 200.0;

/// Ground sits just below the building foundations
const GROUND_LEVEL: f32 = -0.15;

/// ACES filmic, matching the look the scene was tuned under
const CAMERA_TONEMAPPING: Tonemapping = Tonemapping::AcesFitted;

/// Marker for the ground plane; clicks on it deselect
#[derive(Component)]
struct Ground;

/// Spawn the camera and the ground plane
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    nav: Res<NavigationConfig>,
    lighting: Res<SceneLighting>,
) {
    let orbit_camera = OrbitCamera::from_config(&nav);
    let camera_position = orbit_camera.calculate_position();
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: cantilever_config::clamp_fov(nav.fov_degrees).to_radians(),
            ..default()
        }),
        Transform::from_translation(camera_position).looking_at(orbit_camera.target, Vec3::Y),
        CAMERA_TONEMAPPING,
        lighting.fog(),
        MainCamera,
        orbit_camera,
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(0.0, GROUND_LEVEL, 0.0),
        Ground,
        Name::new("Ground"),
    ));

    info!(
        "Scene initialized, camera at {:?} orbiting {:?}",
        camera_position,
        Vec3::from_array(nav.initial_target)
    );
}

/// Draw the reference grid on top of the ground plane
fn draw_ground_grid(mut gizmos: Gizmos) {
    gizmos.grid(
        Isometry3d::new(
            Vec3::new(0.0, GROUND_LEVEL + 0.01, 0.0),
            Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
        ),
        UVec2::splat(50),
        Vec2::splat(4.0),
        Color::srgba(0.58, 0.64, 0.72, 0.35),
    );
}

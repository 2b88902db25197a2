//! Viewport display settings driven by UI commands

use bevy::prelude::*;
use cantilever_config::{clamp_fov, NavigationConfig};
use cantilever_ipc::{SceneToUi, TransformMode, UiToScene, ViewCommand};

use crate::camera::MainCamera;
use crate::{OutboundUiMessages, SceneCommand, SceneSystems};

/// Field of view, guide-line visibility and active gizmo mode
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewSettings {
    /// Vertical field of view in degrees, always within the slider range
    pub fov_degrees: f32,
    pub show_guides: bool,
    pub transform_mode: TransformMode,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            fov_degrees: cantilever_config::DEFAULT_FOV_DEGREES,
            show_guides: true,
            transform_mode: TransformMode::default(),
        }
    }
}

impl ViewSettings {
    pub fn from_config(nav: &NavigationConfig) -> Self {
        Self {
            fov_degrees: clamp_fov(nav.fov_degrees),
            ..default()
        }
    }

    /// Apply a command and report the resulting change, if any
    pub fn apply(&mut self, command: &ViewCommand) -> Option<SceneToUi> {
        match *command {
            ViewCommand::SetFov { degrees } => self.set_fov(degrees),
            ViewCommand::AdjustFov { delta } => self.set_fov(self.fov_degrees + delta),
            ViewCommand::SetShowGuides { visible } => self.set_guides(visible),
            ViewCommand::ToggleGuides => self.set_guides(!self.show_guides),
            ViewCommand::SetTransformMode(mode) => {
                if self.transform_mode == mode {
                    return None;
                }
                self.transform_mode = mode;
                Some(SceneToUi::TransformModeChanged { mode })
            }
        }
    }

    fn set_fov(&mut self, degrees: f32) -> Option<SceneToUi> {
        let degrees = clamp_fov(degrees);
        if degrees == self.fov_degrees {
            return None;
        }
        self.fov_degrees = degrees;
        Some(SceneToUi::FovChanged { degrees })
    }

    fn set_guides(&mut self, visible: bool) -> Option<SceneToUi> {
        if self.show_guides == visible {
            return None;
        }
        self.show_guides = visible;
        Some(SceneToUi::GuidesChanged { visible })
    }
}

pub(crate) struct ViewSettingsPlugin;

impl Plugin for ViewSettingsPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<NavigationConfig>()
            .map(ViewSettings::from_config)
            .unwrap_or_default();

        app.insert_resource(settings).add_systems(
            Update,
            (
                handle_view_commands.in_set(SceneSystems::Input),
                apply_camera_fov.in_set(SceneSystems::Camera),
            ),
        );
    }
}

fn handle_view_commands(
    mut commands: MessageReader<SceneCommand>,
    mut view: ResMut<ViewSettings>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    for SceneCommand(message) in commands.read() {
        let UiToScene::View(command) = message else {
            continue;
        };
        if let Some(change) = view.apply(command) {
            info!("View: {:?}", change);
            outbound.send(change);
        }
    }
}

/// Keep the camera projection in sync with the requested field of view
fn apply_camera_fov(view: Res<ViewSettings>, mut projections: Query<&mut Projection, With<MainCamera>>) {
    let fov = view.fov_degrees.to_radians();
    for mut projection in projections.iter_mut() {
        if let Projection::Perspective(perspective) = &mut *projection
            && (perspective.fov - fov).abs() > f32::EPSILON
        {
            perspective.fov = fov;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let view = ViewSettings::default();
        assert_eq!(view.fov_degrees, 45.0);
        assert!(view.show_guides);
        assert_eq!(view.transform_mode, TransformMode::Translate);
    }

    #[test]
    fn test_fov_is_clamped_to_slider_range() {
        let mut view = ViewSettings::default();
        view.apply(&ViewCommand::SetFov { degrees: 3.0 });
        assert_eq!(view.fov_degrees, 15.0);
        view.apply(&ViewCommand::AdjustFov { delta: 500.0 });
        assert_eq!(view.fov_degrees, 100.0);
    }

    #[test]
    fn test_adjust_at_limit_reports_nothing() {
        let mut view = ViewSettings::default();
        view.apply(&ViewCommand::SetFov { degrees: 100.0 });
        assert_eq!(view.apply(&ViewCommand::AdjustFov { delta: 5.0 }), None);
    }

    #[test]
    fn test_toggle_guides_emits_change() {
        let mut view = ViewSettings::default();
        assert_eq!(
            view.apply(&ViewCommand::ToggleGuides),
            Some(SceneToUi::GuidesChanged { visible: false })
        );
        assert_eq!(view.apply(&ViewCommand::SetShowGuides { visible: false }), None);
    }

    #[test]
    fn test_mode_change_only_reported_once() {
        let mut view = ViewSettings::default();
        let rotate = ViewCommand::SetTransformMode(TransformMode::Rotate);
        assert!(view.apply(&rotate).is_some());
        assert!(view.apply(&rotate).is_none());
    }

    #[test]
    fn test_from_config_clamps_fov() {
        let nav = NavigationConfig {
            fov_degrees: 170.0,
            ..default()
        };
        assert_eq!(ViewSettings::from_config(&nav).fov_degrees, 100.0);
    }
}

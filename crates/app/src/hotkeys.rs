//! Hotkey handling for Cantilever
//!
//! These keys stand in for the toolbar:
//! - G / R: Move or Rotate gizmo mode
//! - L: toggle guide lines
//! - Minus / Equal: narrow or widen the field of view
//! - I: request an AI design insight
//! - Escape: close the insight panel
//!
//! Walk keys (WASD and arrows) are tracked by the scene crate.

use bevy::prelude::*;
use cantilever_config::FOV_STEP_DEGREES;
use cantilever_ipc::{InsightCommand, TransformMode, UiToScene, ViewCommand};
use cantilever_scene::{SceneCommand, SceneSystems};

/// Command bound to a key, if any
pub fn command_for_key(key: KeyCode) -> Option<UiToScene> {
    let command = match key {
        KeyCode::KeyG => UiToScene::View(ViewCommand::SetTransformMode(TransformMode::Translate)),
        KeyCode::KeyR => UiToScene::View(ViewCommand::SetTransformMode(TransformMode::Rotate)),
        KeyCode::KeyL => UiToScene::View(ViewCommand::ToggleGuides),
        KeyCode::Minus | KeyCode::NumpadSubtract => UiToScene::View(ViewCommand::AdjustFov {
            delta: -FOV_STEP_DEGREES,
        }),
        KeyCode::Equal | KeyCode::NumpadAdd => UiToScene::View(ViewCommand::AdjustFov {
            delta: FOV_STEP_DEGREES,
        }),
        KeyCode::KeyI => UiToScene::Insight(InsightCommand::Request),
        KeyCode::Escape => UiToScene::Insight(InsightCommand::Dismiss),
        _ => return None,
    };
    Some(command)
}

pub struct HotkeyPlugin;

impl Plugin for HotkeyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, emit_hotkey_commands.before(SceneSystems::Input));
    }
}

fn emit_hotkey_commands(
    key_input: Res<ButtonInput<KeyCode>>,
    mut commands: MessageWriter<SceneCommand>,
) {
    // Modified chords belong to the window manager, not the viewer
    let ctrl = key_input.pressed(KeyCode::ControlLeft) || key_input.pressed(KeyCode::ControlRight);
    let alt = key_input.pressed(KeyCode::AltLeft) || key_input.pressed(KeyCode::AltRight);
    if ctrl || alt {
        return;
    }

    for key in key_input.get_just_pressed() {
        if let Some(command) = command_for_key(*key) {
            debug!("Hotkey {:?} -> {:?}", key, command);
            commands.write(SceneCommand(command));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_keys() {
        assert_eq!(
            command_for_key(KeyCode::KeyG),
            Some(UiToScene::View(ViewCommand::SetTransformMode(TransformMode::Translate)))
        );
        assert_eq!(
            command_for_key(KeyCode::KeyR),
            Some(UiToScene::View(ViewCommand::SetTransformMode(TransformMode::Rotate)))
        );
    }

    #[test]
    fn test_fov_keys_step_both_ways() {
        assert_eq!(
            command_for_key(KeyCode::Minus),
            Some(UiToScene::View(ViewCommand::AdjustFov { delta: -FOV_STEP_DEGREES }))
        );
        assert_eq!(command_for_key(KeyCode::NumpadAdd), command_for_key(KeyCode::Equal));
    }

    #[test]
    fn test_walk_keys_are_not_hotkeys() {
        for key in [KeyCode::KeyW, KeyCode::KeyA, KeyCode::KeyS, KeyCode::KeyD, KeyCode::ArrowUp] {
            assert_eq!(command_for_key(key), None);
        }
    }

    #[test]
    fn test_insight_keys() {
        assert_eq!(
            command_for_key(KeyCode::KeyI),
            Some(UiToScene::Insight(InsightCommand::Request))
        );
        assert_eq!(
            command_for_key(KeyCode::Escape),
            Some(UiToScene::Insight(InsightCommand::Dismiss))
        );
    }
}

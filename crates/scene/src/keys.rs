//! Held navigation keys
//!
//! Arrow keys and WASD both drive walking. Each physical binding keeps its own
//! flag, so releasing `W` while `ArrowUp` is still down keeps moving forward.

use bevy::input::keyboard::KeyboardInput;
use bevy::prelude::*;
use bevy::window::WindowFocused;

use crate::SceneSystems;

/// Logical walking direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Forward,
    Backward,
    Left,
    Right,
}

impl NavKey {
    pub const ALL: [NavKey; 4] = [NavKey::Forward, NavKey::Backward, NavKey::Left, NavKey::Right];

    /// Map a physical key to a direction and the binding slot it occupies
    fn from_key_code(key: KeyCode) -> Option<(NavKey, usize)> {
        let mapped = match key {
            KeyCode::ArrowUp => (NavKey::Forward, ARROW),
            KeyCode::ArrowDown => (NavKey::Backward, ARROW),
            KeyCode::ArrowLeft => (NavKey::Left, ARROW),
            KeyCode::ArrowRight => (NavKey::Right, ARROW),
            KeyCode::KeyW => (NavKey::Forward, LETTER),
            KeyCode::KeyS => (NavKey::Backward, LETTER),
            KeyCode::KeyA => (NavKey::Left, LETTER),
            KeyCode::KeyD => (NavKey::Right, LETTER),
            _ => return None,
        };
        Some(mapped)
    }

    fn index(self) -> usize {
        self as usize
    }
}

const ARROW: usize = 0;
const LETTER: usize = 1;

/// Which navigation keys are currently held
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct KeySet {
    held: [[bool; 2]; 4],
}

impl KeySet {
    /// Record a key transition. Returns true if the held state changed;
    /// unmapped keys and repeated presses return false.
    pub fn on_key_event(&mut self, key: KeyCode, pressed: bool) -> bool {
        let Some((nav, slot)) = NavKey::from_key_code(key) else {
            return false;
        };
        let flag = &mut self.held[nav.index()][slot];
        let changed = *flag != pressed;
        *flag = pressed;
        changed
    }

    /// True while any binding for `key` is down
    pub fn is_held(&self, key: NavKey) -> bool {
        self.held[key.index()].iter().any(|held| *held)
    }

    pub fn any_held(&self) -> bool {
        NavKey::ALL.iter().any(|key| self.is_held(*key))
    }

    /// Release everything, e.g. when key-up events can no longer arrive
    pub fn clear(&mut self) {
        self.held = [[false; 2]; 4];
    }
}

pub(crate) struct KeyTrackingPlugin;

impl Plugin for KeyTrackingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KeySet>().add_systems(
            Update,
            track_navigation_keys.in_set(SceneSystems::Input),
        );
    }
}

/// Feed raw keyboard events into the KeySet. Losing window focus releases all
/// keys, since the matching key-up would go to another window.
fn track_navigation_keys(
    mut key_events: MessageReader<KeyboardInput>,
    mut focus_events: MessageReader<WindowFocused>,
    mut keys: ResMut<KeySet>,
) {
    for event in key_events.read() {
        keys.on_key_event(event.key_code, event.state.is_pressed());
    }

    if focus_events.read().any(|event| !event.focused) && keys.any_held() {
        keys.clear();
        debug!("Window lost focus, released navigation keys");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut keys = KeySet::default();
        assert!(keys.on_key_event(KeyCode::KeyW, true));
        assert!(keys.is_held(NavKey::Forward));
        assert!(keys.on_key_event(KeyCode::KeyW, false));
        assert!(!keys.is_held(NavKey::Forward));
    }

    #[test]
    fn test_repeat_is_idempotent() {
        let mut keys = KeySet::default();
        assert!(keys.on_key_event(KeyCode::ArrowLeft, true));
        let snapshot = keys.clone();
        assert!(!keys.on_key_event(KeyCode::ArrowLeft, true));
        assert_eq!(keys, snapshot);
    }

    #[test]
    fn test_unmapped_key_is_ignored() {
        let mut keys = KeySet::default();
        assert!(!keys.on_key_event(KeyCode::KeyQ, true));
        assert!(!keys.on_key_event(KeyCode::Space, false));
        assert_eq!(keys, KeySet::default());
    }

    #[test]
    fn test_bindings_are_tracked_separately() {
        let mut keys = KeySet::default();
        keys.on_key_event(KeyCode::KeyD, true);
        keys.on_key_event(KeyCode::ArrowRight, true);
        keys.on_key_event(KeyCode::KeyD, false);
        assert!(keys.is_held(NavKey::Right));
        keys.on_key_event(KeyCode::ArrowRight, false);
        assert!(!keys.is_held(NavKey::Right));
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut keys = KeySet::default();
        keys.on_key_event(KeyCode::KeyW, true);
        keys.on_key_event(KeyCode::ArrowDown, true);
        assert!(keys.any_held());
        keys.clear();
        assert!(!keys.any_held());
    }
}

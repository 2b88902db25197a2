//! Command types for IPC messages.

mod gizmo;

pub use gizmo::*;

use serde::{Deserialize, Serialize};

/// Viewport display commands from the bottom control bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewCommand {
    /// Set the vertical field of view in degrees (clamped to 15..=100)
    SetFov { degrees: f32 },
    /// Nudge the field of view by a signed number of degrees
    AdjustFov { delta: f32 },
    /// Show or hide the construction guide lines
    SetShowGuides { visible: bool },
    ToggleGuides,
    /// Switch the gizmo between move and rotate
    SetTransformMode(TransformMode),
}

/// Commands for the AI insight panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightCommand {
    /// Ask the generative service for a fresh description
    Request,
    /// Close the insight panel
    Dismiss,
}

//! Gizmo command types for transform operations.

use serde::{Deserialize, Serialize};

/// Which kind of edit the gizmo performs on the selected building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    /// Slide along the ground plane
    #[default]
    Translate,
    /// Spin around the vertical axis
    Rotate,
}

impl TransformMode {
    /// Handles exposed in this mode.
    ///
    /// Buildings are never lifted, so translation hides Y; they only turn
    /// about their vertical axis, so rotation shows Y alone.
    pub fn axis_visibility(&self) -> AxisVisibility {
        match self {
            TransformMode::Translate => AxisVisibility {
                x: true,
                y: false,
                z: true,
            },
            TransformMode::Rotate => AxisVisibility {
                x: false,
                y: true,
                z: false,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransformMode::Translate => "Move",
            TransformMode::Rotate => "Rotate",
        }
    }
}

/// Per-axis handle visibility for the transform gizmo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisVisibility {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

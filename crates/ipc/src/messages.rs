//! Main IPC message enums for communication between the scene and UI.

use crate::commands::{InsightCommand, TransformMode, ViewCommand};
use crate::types::{BuildingId, Insight, Transform3D};

/// Messages from the scene to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneToUi {
    /// Selected building changed (None = nothing selected)
    SelectionChanged { selected: Option<BuildingId> },

    /// Gizmo mode changed (for toolbar sync)
    TransformModeChanged { mode: TransformMode },

    /// Guide line visibility changed
    GuidesChanged { visible: bool },

    /// Camera field of view changed
    FovChanged { degrees: f32 },

    /// A gizmo drag finished and left the building at this transform
    BuildingTransformed {
        id: BuildingId,
        transform: Transform3D,
    },

    /// An insight request started or the last pending one finished
    InsightLoading { loading: bool },

    /// Insight content to display (real or fallback, indistinguishable)
    InsightReady { insight: Insight },

    /// Insight panel was closed
    InsightDismissed,
}

/// Messages from the UI to the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum UiToScene {
    /// Viewport display command
    View(ViewCommand),

    /// Insight panel command
    Insight(InsightCommand),
}

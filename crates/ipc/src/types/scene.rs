//! Scene-related types for IPC messages.

use serde::{Deserialize, Serialize};

/// The two selectable buildings in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingId {
    /// The two-storey villa with the cantilevered upper floor and pool
    #[serde(rename = "main")]
    MainVilla,
    /// The smaller stone-and-concrete annex
    Annex,
}

impl BuildingId {
    pub const ALL: [BuildingId; 2] = [BuildingId::MainVilla, BuildingId::Annex];

    /// Stable identifier used in messages and entity names
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildingId::MainVilla => "main",
            BuildingId::Annex => "annex",
        }
    }

    /// Human-readable label for the editing status pill
    pub fn label(&self) -> &'static str {
        match self {
            BuildingId::MainVilla => "Main Villa",
            BuildingId::Annex => "Annex",
        }
    }
}

/// 3D transform with position, rotation, and scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub position: [f32; 3],
    pub rotation: [f32; 4], // Quaternion (x, y, z, w)
    pub scale: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_building_ids_serialize_to_short_names() {
        let json = serde_json::to_string(&BuildingId::MainVilla).unwrap();
        assert_eq!(json, "\"main\"");
        let json = serde_json::to_string(&BuildingId::Annex).unwrap();
        assert_eq!(json, "\"annex\"");
        for id in BuildingId::ALL {
            assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{}\"", id.as_str()));
        }
    }
}

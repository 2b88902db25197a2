//! IPC message protocol for Cantilever
//!
//! Defines the message types exchanged between the scene and the UI layer,
//! plus the small domain types both sides share.

pub mod commands;
pub mod messages;
pub mod types;

pub use commands::*;
pub use messages::{SceneToUi, UiToScene};
pub use types::*;

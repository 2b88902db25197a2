//! Type definitions for IPC messages.

mod insight;
mod scene;

pub use insight::*;
pub use scene::*;

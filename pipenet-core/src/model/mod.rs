//! Data model of the pipe network editor
//!
//! Contains the map view shown to the user and the node/pipe network
//! drawn on top of it.

pub mod map_view;
pub mod network;

// Re-export of the main model structures
pub use map_view::{MapOptions, MapView, TileLayer};
pub use network::{Node, NodeIcon, PathStyle, Pipe};

//! Core of the pipe network editor.
//!
//! Keeps the node/pipe model behind a map widget in sync with user edits,
//! converts it to and from the compact JSON exchange format, and delegates
//! geodesic measurement and elevation lookup to `geo` and a remote service.

pub mod config;
pub mod editor;
pub mod elevation;
pub mod error;
pub mod geometry;
pub mod model;
pub mod prelude;
pub mod serialization;

pub use config::{EditorConfig, ElevationConfig, MapConfig};
pub use editor::{NetworkEditor, NetworkEvent};
pub use elevation::ElevationClient;
pub use error::Error;
pub use model::{MapOptions, MapView, Node, Pipe};
pub use serialization::{ImportReport, SkippedEntry};

/// Identifier of a node, unique among nodes
pub type NodeId = u32;
/// Identifier of a pipe, unique among pipes (independent of node ids)
pub type PipeId = u32;

// Re-export key components
pub use crate::config::{EditorConfig, ElevationConfig, MapConfig};
pub use crate::editor::{NetworkEditor, NetworkEvent};
pub use crate::elevation::ElevationClient;
pub use crate::geometry::{compute_distance, compute_polyline_length};
pub use crate::model::{MapOptions, MapView, Node, NodeIcon, PathStyle, Pipe, TileLayer};
pub use crate::serialization::{ImportReport, NodeRecord, PipeRecord, SkippedEntry};

// Core identifier types
pub use crate::NodeId;
pub use crate::PipeId;

pub use crate::Error;

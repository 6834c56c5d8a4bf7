//! Conversion of the network to and from its JSON exchange format
//!
//! Nodes and pipes travel as two separate JSON arrays. Pipe geometry is
//! carried as an encoded polyline and resolved against the node ids already
//! present in the editor on import.

pub mod codec;
mod de;
mod export;
mod import;
mod records;
mod to_geojson;

use log::warn;
use serde::Serialize;

pub use codec::{POLYLINE_PRECISION, decode_path, encode_path};
pub use records::{NodeRecord, PipeRecord};

/// Outcome of an import: ids created and entries that were left out
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    /// Ids of the created nodes or pipes, in input order
    pub imported: Vec<u32>,
    pub skipped: Vec<SkippedEntry>,
}

/// Input entry that was not imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Position of the entry in the input array
    pub index: usize,
    pub reason: String,
}

impl ImportReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, index: usize, reason: impl Into<String>) {
        let reason = reason.into();
        warn!("Skipping import entry {index}: {reason}");
        self.skipped.push(SkippedEntry { index, reason });
    }
}

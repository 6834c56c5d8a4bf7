use hashbrown::HashSet;
use log::info;
use serde::Deserialize;
use serde_json::Value;

use super::ImportReport;
use super::codec::decode_path;
use super::de::IdField;
use super::records::{RawNodeRecord, RawPipeRecord};
use crate::editor::lowest_unused_id;
use crate::{Error, NetworkEditor, NodeId};

impl NetworkEditor {
    /// Adds every node of an exported node array.
    ///
    /// Ids, labels, positions and the ESR flag are restored. A missing id
    /// is allocated, a missing label defaults to `"Node{id}"`. Allocation
    /// skips every id requested by another entry of the same array, so entry
    /// order does not decide which node ends up with an id. Entries without
    /// usable coordinates, with an unusable id or with an id already present
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] when the input is not a JSON array
    pub fn import_nodes(&mut self, json: &str) -> Result<ImportReport, Error> {
        let entries: Vec<Value> = serde_json::from_str(json)?;
        let records: Vec<_> = entries.into_iter().map(RawNodeRecord::deserialize).collect();
        let requested: HashSet<NodeId> = records
            .iter()
            .filter_map(|record| record.as_ref().ok()?.nodeid.explicit())
            .collect();
        let mut report = ImportReport::default();

        for (index, record) in records.into_iter().enumerate() {
            let raw = match record {
                Ok(raw) => raw,
                Err(e) => {
                    report.skip(index, format!("malformed node entry: {e}"));
                    continue;
                }
            };
            if let IdField::Invalid(value) = &raw.nodeid {
                report.skip(index, format!("unusable node id {value}"));
                continue;
            }
            let (Some(lat), Some(lng)) = (raw.latitude, raw.longitude) else {
                report.skip(index, "missing or non-numeric coordinates");
                continue;
            };
            let id = raw.nodeid.explicit().unwrap_or_else(|| {
                lowest_unused_id(
                    self.nodes()
                        .iter()
                        .map(|node| node.id)
                        .chain(requested.iter().copied()),
                )
            });
            match self.insert_node(lat, lng, raw.nodename.as_deref(), Some(id), raw.isesr) {
                Ok(id) => report.imported.push(id),
                Err(e) => report.skip(index, e.to_string()),
            }
        }

        info!(
            "Imported {} nodes ({} skipped)",
            report.imported.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Adds every pipe of an exported pipe array whose endpoints exist.
    ///
    /// Endpoints are resolved against the nodes currently in the editor, so
    /// nodes must be imported first. Entries with unknown endpoints or an
    /// undecodable path are skipped and listed in the report.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] when the input is not a JSON array
    pub fn import_pipes(&mut self, json: &str) -> Result<ImportReport, Error> {
        let entries: Vec<Value> = serde_json::from_str(json)?;
        let mut report = ImportReport::default();

        for (index, entry) in entries.into_iter().enumerate() {
            let raw = match RawPipeRecord::deserialize(entry) {
                Ok(raw) => raw,
                Err(e) => {
                    report.skip(index, format!("malformed pipe entry: {e}"));
                    continue;
                }
            };

            let Some(origin) = raw.originid.filter(|&id| self.node(id).is_some()) else {
                report.skip(index, format!("unknown origin node {:?}", raw.originid));
                continue;
            };
            let Some(destination) = raw.destinationid.filter(|&id| self.node(id).is_some()) else {
                report.skip(
                    index,
                    format!("unknown destination node {:?}", raw.destinationid),
                );
                continue;
            };

            let path = match raw.encodedpath.as_deref().map(decode_path) {
                Some(Ok(path)) => Some(path),
                Some(Err(e)) => {
                    report.skip(index, e.to_string());
                    continue;
                }
                None => None,
            };

            match self.add_pipe(origin, destination, path) {
                Ok(id) => report.imported.push(id),
                Err(e) => report.skip(index, e.to_string()),
            }
        }

        info!(
            "Imported {} pipes ({} skipped)",
            report.imported.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}

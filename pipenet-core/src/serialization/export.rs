use super::codec::encode_path;
use super::records::{NodeRecord, PipeRecord};
use crate::{Error, NetworkEditor};

impl NetworkEditor {
    /// Node records in collection order
    pub fn node_records(&self) -> Vec<NodeRecord> {
        self.nodes()
            .iter()
            .map(|node| NodeRecord {
                nodeid: node.id,
                nodename: node.name.clone(),
                latitude: node.lat(),
                longitude: node.lng(),
                isesr: node.is_esr,
            })
            .collect()
    }

    /// Pipe records in collection order
    ///
    /// # Errors
    ///
    /// Returns [`Error::Polyline`] if a path cannot be encoded
    pub fn pipe_records(&self) -> Result<Vec<PipeRecord>, Error> {
        self.pipes()
            .iter()
            .map(|pipe| {
                Ok(PipeRecord {
                    encodedpath: encode_path(&pipe.geometry)?,
                    originid: pipe.origin,
                    destinationid: pipe.destination,
                    length: pipe.length(),
                })
            })
            .collect()
    }

    /// JSON array of `{nodeid, nodename, latitude, longitude, isesr}`
    pub fn export_nodes(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(&self.node_records())?)
    }

    /// JSON array of `{encodedpath, originid, destinationid, length}`
    pub fn export_pipes(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(&self.pipe_records()?)?)
    }
}

use serde::{Deserialize, Serialize};

use super::de::{
    IdField, deserialize_id_field, deserialize_lenient_bool, deserialize_lenient_f64,
    deserialize_lenient_id,
};
use crate::NodeId;

/// Exported node entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub nodeid: NodeId,
    pub nodename: String,
    pub latitude: f64,
    pub longitude: f64,
    pub isesr: bool,
}

/// Exported pipe entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeRecord {
    /// Waypoints as an encoded polyline
    pub encodedpath: String,
    pub originid: NodeId,
    pub destinationid: NodeId,
    /// Geodesic length in meters
    pub length: f64,
}

// Import side: every field optional, numbers may arrive as strings.

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(super) struct RawNodeRecord {
    #[serde(deserialize_with = "deserialize_id_field")]
    pub nodeid: IdField,
    pub nodename: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_bool")]
    pub isesr: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(super) struct RawPipeRecord {
    pub encodedpath: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_id")]
    pub originid: Option<NodeId>,
    #[serde(deserialize_with = "deserialize_lenient_id")]
    pub destinationid: Option<NodeId>,
}

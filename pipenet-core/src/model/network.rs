//! Network components - nodes, pipes and how they are drawn

use geo::{LineString, Point};
use serde::{Deserialize, Serialize};

use crate::geometry::compute_polyline_length;
use crate::{NodeId, PipeId};

const ICON_SIZE: [u32; 2] = [100, 24];
const ICON_CLASS: &str = "custom-div-icon";
const PIPE_COLOR: &str = "blue";
const PIPE_WEIGHT: u32 = 2;

/// Network node, drawn as a draggable labelled marker
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Label shown on the marker
    pub name: String,
    /// Node coordinates (x = longitude, y = latitude)
    pub geometry: Point<f64>,
    /// Elevated service reservoir flag
    pub is_esr: bool,
    /// Pipes ending at this node
    pub in_pipes: Vec<PipeId>,
    /// Pipes starting at this node
    pub out_pipes: Vec<PipeId>,
    pub icon: NodeIcon,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: Option<&str>, geometry: Point<f64>, is_esr: bool) -> Self {
        let name = name.map_or_else(|| Self::default_name(id), str::to_string);
        Node {
            id,
            icon: NodeIcon::labelled(&name),
            name,
            geometry,
            is_esr,
            in_pipes: Vec::new(),
            out_pipes: Vec::new(),
        }
    }

    pub fn default_name(id: NodeId) -> String {
        format!("Node{id}")
    }

    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    pub fn lng(&self) -> f64 {
        self.geometry.x()
    }

    pub(crate) fn rename(&mut self, name: &str) {
        self.name = name.to_string();
        self.icon = NodeIcon::labelled(name);
    }
}

/// Marker icon carrying the node label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIcon {
    pub html: String,
    pub size: [u32; 2],
    pub class_name: String,
    pub draggable: bool,
}

impl NodeIcon {
    pub fn labelled(label: &str) -> Self {
        let html = format!(
            "<div style=\"white-space:nowrap;padding:2px 4px;border-radius:3px;\
             background:rgba(255,255,255,0.9);border:1px solid #777;font-size:12px;\">{}</div>",
            escape_html(label)
        );
        NodeIcon {
            html,
            size: ICON_SIZE,
            class_name: ICON_CLASS.to_string(),
            draggable: true,
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Directed pipe between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub id: PipeId,
    /// Waypoints from origin to destination (x = longitude, y = latitude)
    pub geometry: LineString<f64>,
    pub origin: NodeId,
    pub destination: NodeId,
    pub style: PathStyle,
}

impl Pipe {
    /// Geodesic length of the pipe in meters
    pub fn length(&self) -> f64 {
        compute_polyline_length(&self.geometry)
    }

    /// Waypoints as `(lat, lng)` pairs
    pub fn waypoints(&self) -> Vec<(f64, f64)> {
        self.geometry.coords().map(|c| (c.y, c.x)).collect()
    }
}

/// Stroke used to draw pipes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStyle {
    pub color: String,
    pub weight: u32,
}

impl Default for PathStyle {
    fn default() -> Self {
        PathStyle {
            color: PIPE_COLOR.to_string(),
            weight: PIPE_WEIGHT,
        }
    }
}

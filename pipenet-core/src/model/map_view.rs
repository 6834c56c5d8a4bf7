//! Map surface the network is drawn on

use log::warn;
use serde::{Deserialize, Serialize};

use crate::geometry::{is_valid_latitude, is_valid_longitude};

pub const DEFAULT_LATITUDE: f64 = 20.5937;
pub const DEFAULT_LONGITUDE: f64 = 78.9629;
pub const DEFAULT_ZOOM: u8 = 6;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
pub const OSM_MAX_ZOOM: u8 = 19;

/// Requested initial view. Missing values fall back to the defaults above.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub zoom: Option<u8>,
}

/// Base raster layer of the map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url_template: String,
    pub max_zoom: u8,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: OSM_TILE_URL.to_string(),
            max_zoom: OSM_MAX_ZOOM,
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

/// Initialized map state: view center, zoom and base layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
    pub tile_layer: TileLayer,
}

impl MapView {
    /// Sets up a world base layer with the view centered at the requested
    /// (or default) coordinates.
    ///
    /// A center value that is not a valid coordinate is replaced by its
    /// default.
    pub fn initialize(options: &MapOptions) -> Self {
        let tile_layer = TileLayer::default();
        Self {
            latitude: center_or_default(options.latitude, is_valid_latitude, DEFAULT_LATITUDE),
            longitude: center_or_default(options.longitude, is_valid_longitude, DEFAULT_LONGITUDE),
            zoom: options.zoom.unwrap_or(DEFAULT_ZOOM).min(tile_layer.max_zoom),
            tile_layer,
        }
    }

    #[must_use]
    pub fn with_tile_layer(mut self, tile_layer: TileLayer) -> Self {
        self.zoom = self.zoom.min(tile_layer.max_zoom);
        self.tile_layer = tile_layer;
        self
    }
}

fn center_or_default(value: Option<f64>, is_valid: fn(f64) -> bool, default: f64) -> f64 {
    match value {
        Some(value) if is_valid(value) => value,
        Some(value) => {
            warn!("Ignoring invalid map center coordinate {value}, using {default}");
            default
        }
        None => default,
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::initialize(&MapOptions::default())
    }
}

//! Editor configuration
//!
//! Every field has a default, so an empty document is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::model::map_view::{OSM_ATTRIBUTION, OSM_MAX_ZOOM, OSM_TILE_URL};
use crate::model::{MapOptions, TileLayer};

pub const DEFAULT_ELEVATION_ENDPOINT: &str = "https://api.open-elevation.com/api/v1/lookup";
pub const DEFAULT_ELEVATION_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub map: MapConfig,
    pub elevation: ElevationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub zoom: Option<u8>,
    pub tile_url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            zoom: None,
            tile_url: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            max_zoom: OSM_MAX_ZOOM,
        }
    }
}

impl MapConfig {
    pub fn options(&self) -> MapOptions {
        MapOptions {
            latitude: self.latitude,
            longitude: self.longitude,
            zoom: self.zoom,
        }
    }

    pub fn tile_layer(&self) -> TileLayer {
        TileLayer {
            url_template: self.tile_url.clone(),
            max_zoom: self.max_zoom,
            attribution: self.attribution.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ELEVATION_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_ELEVATION_TIMEOUT_SECS,
        }
    }
}

impl EditorConfig {
    /// Checks value ranges that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first offending field
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(lat) = self.map.latitude
            && !(-90.0..=90.0).contains(&lat)
        {
            return Err(Error::Config(format!(
                "map.latitude must be within -90..90, got {lat}"
            )));
        }
        if let Some(lng) = self.map.longitude
            && !(-180.0..=180.0).contains(&lng)
        {
            return Err(Error::Config(format!(
                "map.longitude must be within -180..180, got {lng}"
            )));
        }
        if self.map.tile_url.is_empty() {
            return Err(Error::Config("map.tile_url must not be empty".to_string()));
        }
        if self.elevation.endpoint.is_empty() {
            return Err(Error::Config(
                "elevation.endpoint must not be empty".to_string(),
            ));
        }
        if self.elevation.timeout_secs == 0 {
            return Err(Error::Config(
                "elevation.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.elevation.endpoint, DEFAULT_ELEVATION_ENDPOINT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"map": {"zoom": 9}, "elevation": {"timeout_secs": 3}}"#)
                .unwrap();
        assert_eq!(config.map.zoom, Some(9));
        assert_eq!(config.map.tile_url, OSM_TILE_URL);
        assert_eq!(config.elevation.timeout_secs, 3);
        assert_eq!(config.map.options().zoom, Some(9));
        assert_eq!(config.map.tile_layer().max_zoom, OSM_MAX_ZOOM);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut config = EditorConfig::default();
        config.map.latitude = Some(120.0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = EditorConfig::default();
        config.elevation.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}

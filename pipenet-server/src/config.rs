use std::path::Path;

use pipenet_core::{EditorConfig, Error};
use serde::Deserialize;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Server settings, read from a TOML file
///
/// ```toml
/// bind = "0.0.0.0:8080"
/// request_timeout_secs = 30
///
/// [editor.map]
/// latitude = 19.07
/// longitude = 72.87
/// zoom = 11
///
/// [editor.elevation]
/// endpoint = "https://api.open-elevation.com/api/v1/lookup"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
    /// Allow browser pages from any origin
    pub permissive_cors: bool,
    pub editor: EditorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            request_timeout_secs: 30,
            max_concurrent_requests: 64,
            permissive_cors: true,
            editor: EditorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration file, or returns defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to read config '{}': {}", path.display(), e),
            )
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(Error::Config(
                "max_concurrent_requests must be positive".to_string(),
            ));
        }
        self.editor.validate()
    }
}

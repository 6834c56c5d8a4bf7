use std::sync::{Arc, Mutex, MutexGuard};

use axum::http::StatusCode;
use pipenet_core::prelude::*;

use crate::config::ServerConfig;

/// Shared state of the service: one editor, mutated one request at a time
#[derive(Clone)]
pub(crate) struct AppState {
    editor: Arc<Mutex<NetworkEditor>>,
    pub(crate) elevation: ElevationClient,
}

impl AppState {
    pub(crate) fn new(config: &ServerConfig) -> Result<Self, Error> {
        let mut editor = NetworkEditor::from_config(&config.editor);
        editor.subscribe(|event| tracing::debug!(?event, "network changed"));

        Ok(Self {
            editor: Arc::new(Mutex::new(editor)),
            elevation: ElevationClient::new(&config.editor.elevation)?,
        })
    }

    pub(crate) fn editor(&self) -> Result<MutexGuard<'_, NetworkEditor>, (StatusCode, String)> {
        self.editor.lock().map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "editor state is poisoned".to_string(),
            )
        })
    }
}

/// Maps editor errors onto HTTP statuses
pub(crate) fn map_core_error(err: Error) -> (StatusCode, String) {
    let status = match &err {
        Error::UnknownNode(_) | Error::UnknownPipe(_) => StatusCode::NOT_FOUND,
        Error::DuplicateNodeId(_) => StatusCode::CONFLICT,
        Error::InvalidPath(_) | Error::InvalidData(_) | Error::Json(_) | Error::Polyline(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::Elevation(_) => StatusCode::BAD_GATEWAY,
        Error::GeoJsonError(_) | Error::Config(_) | Error::IoError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status.is_server_error() {
        tracing::error!("{err}");
    }
    (status, err.to_string())
}

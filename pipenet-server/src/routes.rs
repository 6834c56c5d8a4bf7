use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use geo::Point;
use pipenet_core::geometry::path_from_lat_lng;
use pipenet_core::prelude::*;
use serde::{Deserialize, Serialize};

use crate::state::{AppState, map_core_error};

type ApiResult<T> = Result<T, (StatusCode, String)>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NodeView {
    id: NodeId,
    name: String,
    latitude: f64,
    longitude: f64,
    is_esr: bool,
    in_pipes: Vec<PipeId>,
    out_pipes: Vec<PipeId>,
    icon: NodeIcon,
}

impl From<&Node> for NodeView {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            name: node.name.clone(),
            latitude: node.lat(),
            longitude: node.lng(),
            is_esr: node.is_esr,
            in_pipes: node.in_pipes.clone(),
            out_pipes: node.out_pipes.clone(),
            icon: node.icon.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PipeView {
    id: PipeId,
    origin: NodeId,
    destination: NodeId,
    /// `[lat, lng]` pairs
    waypoints: Vec<[f64; 2]>,
    length: f64,
    style: PathStyle,
}

impl From<&Pipe> for PipeView {
    fn from(pipe: &Pipe) -> Self {
        Self {
            id: pipe.id,
            origin: pipe.origin,
            destination: pipe.destination,
            waypoints: pipe
                .waypoints()
                .into_iter()
                .map(|(lat, lng)| [lat, lng])
                .collect(),
            length: pipe.length(),
            style: pipe.style.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NodeCreateRequest {
    latitude: f64,
    longitude: f64,
    name: Option<String>,
    id: Option<NodeId>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NodeUpdateRequest {
    name: Option<String>,
    is_esr: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PositionRequest {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct MoveResponse {
    node: NodeView,
    /// Pipes whose ends followed the node
    pipes: Vec<PipeView>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PipeCreateRequest {
    origin: NodeId,
    destination: NodeId,
    waypoints: Option<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SelectionRequest {
    node: Option<NodeId>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SelectionResponse {
    node: Option<NodeId>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConnectRequest {
    destination: NodeId,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ElevationRequest {
    /// `[lat, lng]` pairs
    points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ElevationResponse {
    elevations: Vec<f64>,
}

fn to_path(waypoints: &[[f64; 2]]) -> geo::LineString<f64> {
    let pairs: Vec<(f64, f64)> = waypoints.iter().map(|&[lat, lng]| (lat, lng)).collect();
    path_from_lat_lng(&pairs)
}

fn json_text(body: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], body)
}

pub(crate) async fn health() -> &'static str {
    "ok"
}

pub(crate) async fn get_map(State(state): State<AppState>) -> ApiResult<Json<MapView>> {
    Ok(Json(state.editor()?.map_view().clone()))
}

pub(crate) async fn list_nodes(State(state): State<AppState>) -> ApiResult<Json<Vec<NodeView>>> {
    let editor = state.editor()?;
    Ok(Json(editor.nodes().iter().map(NodeView::from).collect()))
}

pub(crate) async fn create_node(
    State(state): State<AppState>,
    Json(payload): Json<NodeCreateRequest>,
) -> ApiResult<(StatusCode, Json<NodeView>)> {
    let mut editor = state.editor()?;
    let id = editor
        .add_node(
            payload.latitude,
            payload.longitude,
            payload.name.as_deref(),
            payload.id,
        )
        .map_err(map_core_error)?;
    let node = editor
        .node(id)
        .ok_or_else(|| map_core_error(Error::UnknownNode(id)))?;
    Ok((StatusCode::CREATED, Json(NodeView::from(node))))
}

pub(crate) async fn update_node(
    State(state): State<AppState>,
    Path(id): Path<NodeId>,
    Json(payload): Json<NodeUpdateRequest>,
) -> ApiResult<Json<NodeView>> {
    let mut editor = state.editor()?;
    if let Some(name) = payload.name.as_deref() {
        editor.set_node_name(id, name).map_err(map_core_error)?;
    }
    if let Some(is_esr) = payload.is_esr {
        editor.set_node_esr(id, is_esr).map_err(map_core_error)?;
    }
    let node = editor
        .node(id)
        .ok_or_else(|| map_core_error(Error::UnknownNode(id)))?;
    Ok(Json(NodeView::from(node)))
}

/// Drag-end of a marker
pub(crate) async fn move_node(
    State(state): State<AppState>,
    Path(id): Path<NodeId>,
    Json(payload): Json<PositionRequest>,
) -> ApiResult<Json<MoveResponse>> {
    let mut editor = state.editor()?;
    let touched = editor
        .move_node(id, payload.latitude, payload.longitude)
        .map_err(map_core_error)?;
    let node = editor
        .node(id)
        .ok_or_else(|| map_core_error(Error::UnknownNode(id)))?;
    let pipes = touched
        .iter()
        .filter_map(|&pipe| editor.pipe(pipe))
        .map(PipeView::from)
        .collect();
    Ok(Json(MoveResponse {
        node: NodeView::from(node),
        pipes,
    }))
}

pub(crate) async fn list_pipes(State(state): State<AppState>) -> ApiResult<Json<Vec<PipeView>>> {
    let editor = state.editor()?;
    Ok(Json(editor.pipes().iter().map(PipeView::from).collect()))
}

pub(crate) async fn create_pipe(
    State(state): State<AppState>,
    Json(payload): Json<PipeCreateRequest>,
) -> ApiResult<(StatusCode, Json<PipeView>)> {
    let mut editor = state.editor()?;
    let path = payload.waypoints.as_deref().map(to_path);
    let id = editor
        .add_pipe(payload.origin, payload.destination, path)
        .map_err(map_core_error)?;
    let pipe = editor
        .pipe(id)
        .ok_or_else(|| map_core_error(Error::UnknownPipe(id)))?;
    Ok((StatusCode::CREATED, Json(PipeView::from(pipe))))
}

pub(crate) async fn get_selection(State(state): State<AppState>) -> ApiResult<Json<SelectionResponse>> {
    let node = state.editor()?.selected_source();
    Ok(Json(SelectionResponse { node }))
}

pub(crate) async fn set_selection(
    State(state): State<AppState>,
    Json(payload): Json<SelectionRequest>,
) -> ApiResult<Json<SelectionResponse>> {
    let mut editor = state.editor()?;
    match payload.node {
        Some(node) => editor.select_source(node).map_err(map_core_error)?,
        None => editor.clear_selection(),
    }
    Ok(Json(SelectionResponse {
        node: editor.selected_source(),
    }))
}

/// Completes click-to-connect from the selected source
pub(crate) async fn connect_selected(
    State(state): State<AppState>,
    Json(payload): Json<ConnectRequest>,
) -> ApiResult<(StatusCode, Json<PipeView>)> {
    let mut editor = state.editor()?;
    let Some(id) = editor
        .connect_selected(payload.destination)
        .map_err(map_core_error)?
    else {
        return Err((
            StatusCode::CONFLICT,
            "no source node is selected".to_string(),
        ));
    };
    let pipe = editor
        .pipe(id)
        .ok_or_else(|| map_core_error(Error::UnknownPipe(id)))?;
    Ok((StatusCode::CREATED, Json(PipeView::from(pipe))))
}

pub(crate) async fn export_nodes(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let body = state.editor()?.export_nodes().map_err(map_core_error)?;
    Ok(json_text(body))
}

pub(crate) async fn export_pipes(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let body = state.editor()?.export_pipes().map_err(map_core_error)?;
    Ok(json_text(body))
}

pub(crate) async fn import_nodes(
    State(state): State<AppState>,
    body: String,
) -> ApiResult<Json<ImportReport>> {
    let report = state.editor()?.import_nodes(&body).map_err(map_core_error)?;
    tracing::info!(
        imported = report.imported.len(),
        skipped = report.skipped.len(),
        "nodes imported"
    );
    Ok(Json(report))
}

pub(crate) async fn import_pipes(
    State(state): State<AppState>,
    body: String,
) -> ApiResult<Json<ImportReport>> {
    let report = state.editor()?.import_pipes(&body).map_err(map_core_error)?;
    tracing::info!(
        imported = report.imported.len(),
        skipped = report.skipped.len(),
        "pipes imported"
    );
    Ok(Json(report))
}

pub(crate) async fn network_geojson(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let body = state.editor()?.to_geojson_string().map_err(map_core_error)?;
    Ok(([(header::CONTENT_TYPE, "application/geo+json")], body))
}

pub(crate) async fn lookup_elevation(
    State(state): State<AppState>,
    Json(payload): Json<ElevationRequest>,
) -> ApiResult<Json<ElevationResponse>> {
    let points: Vec<Point<f64>> = payload
        .points
        .iter()
        .map(|&[lat, lng]| Point::new(lng, lat))
        .collect();
    let client = state.elevation.clone();

    let elevations = tokio::task::spawn_blocking(move || client.lookup(&points))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("elevation task failed: {e}"),
            )
        })?
        .map_err(map_core_error)?;

    Ok(Json(ElevationResponse { elevations }))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/map", get(get_map))
        .route("/nodes", get(list_nodes).post(create_node))
        .route("/nodes/{id}", put(update_node))
        .route("/nodes/{id}/position", put(move_node))
        .route("/pipes", get(list_pipes).post(create_pipe))
        .route("/selection", get(get_selection).put(set_selection))
        .route("/selection/connect", post(connect_selected))
        .route("/export/nodes", get(export_nodes))
        .route("/export/pipes", get(export_pipes))
        .route("/import/nodes", post(import_nodes))
        .route("/import/pipes", post(import_pipes))
        .route("/network.geojson", get(network_geojson))
        .route("/elevation", post(lookup_elevation))
}

use pipenet_core::geometry::path_from_lat_lng;
use pipenet_core::prelude::*;

use pyo3::prelude::*;
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pymethods};

/// NetworkEditor
///
/// Node/pipe network drawn on a map widget (for example ipyleaflet).
///
/// Nodes are draggable labelled markers, pipes are paths between them.
/// Call `move_node` from the marker's drag-end handler: it moves the node
/// and returns the ids of the pipes whose ends followed it, so only those
/// paths need to be redrawn.
///
/// Example:
///
/// .. code-block:: python
///
///     editor = NetworkEditor()
///     a = editor.add_node(20.0, 78.0)
///     b = editor.add_node(21.0, 79.0, "Reservoir")
///     pipe = editor.add_pipe(a, b)
///     nodes_json, pipes_json = editor.export_nodes(), editor.export_pipes()
#[gen_stub_pyclass]
#[pyclass(name = "NetworkEditor")]
pub struct PyNetworkEditor {
    pub(crate) editor: NetworkEditor,
}

pub(crate) fn to_py_err(e: Error) -> PyErr {
    match e {
        Error::UnknownNode(_)
        | Error::UnknownPipe(_)
        | Error::DuplicateNodeId(_)
        | Error::InvalidPath(_)
        | Error::InvalidData(_)
        | Error::Json(_) => PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()),
        _ => PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()),
    }
}

#[gen_stub_pymethods]
#[pymethods]
impl PyNetworkEditor {
    /// Initializes the map view; missing or invalid values use the default
    /// view centered on India at zoom 6.
    #[new]
    #[pyo3(signature = (latitude=None, longitude=None, zoom=None))]
    pub fn new(latitude: Option<f64>, longitude: Option<f64>, zoom: Option<u8>) -> Self {
        let options = MapOptions {
            latitude,
            longitude,
            zoom,
        };
        PyNetworkEditor {
            editor: NetworkEditor::initialize(&options),
        }
    }

    /// Map center and zoom as `(lat, lng, zoom)`
    pub fn map_view(&self) -> (f64, f64, u8) {
        let view = self.editor.map_view();
        (view.latitude, view.longitude, view.zoom)
    }

    /// Base layer as `(url_template, max_zoom, attribution)`
    pub fn tile_layer(&self) -> (String, u8, String) {
        let layer = &self.editor.map_view().tile_layer;
        (
            layer.url_template.clone(),
            layer.max_zoom,
            layer.attribution.clone(),
        )
    }

    pub fn node_count(&self) -> usize {
        self.editor.nodes().len()
    }

    pub fn pipe_count(&self) -> usize {
        self.editor.pipes().len()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.editor.nodes().iter().map(|node| node.id).collect()
    }

    pub fn pipe_ids(&self) -> Vec<PipeId> {
        self.editor.pipes().iter().map(|pipe| pipe.id).collect()
    }

    pub fn allocate_node_id(&self) -> NodeId {
        self.editor.allocate_node_id()
    }

    pub fn allocate_pipe_id(&self) -> PipeId {
        self.editor.allocate_pipe_id()
    }

    #[pyo3(signature = (lat, lng, name=None, node_id=None))]
    pub fn add_node(
        &mut self,
        lat: f64,
        lng: f64,
        name: Option<String>,
        node_id: Option<NodeId>,
    ) -> PyResult<NodeId> {
        self.editor
            .add_node(lat, lng, name.as_deref(), node_id)
            .map_err(to_py_err)
    }

    /// Node label, position and ESR flag as `(name, lat, lng, is_esr)`
    pub fn node(&self, node_id: NodeId) -> PyResult<(String, f64, f64, bool)> {
        let node = self
            .editor
            .node(node_id)
            .ok_or_else(|| to_py_err(Error::UnknownNode(node_id)))?;
        Ok((node.name.clone(), node.lat(), node.lng(), node.is_esr))
    }

    /// HTML of the label marker for the node
    pub fn node_icon_html(&self, node_id: NodeId) -> PyResult<String> {
        self.editor
            .node(node_id)
            .map(|node| node.icon.html.clone())
            .ok_or_else(|| to_py_err(Error::UnknownNode(node_id)))
    }

    /// Moves a node and returns the ids of the pipes that followed it
    pub fn move_node(&mut self, node_id: NodeId, lat: f64, lng: f64) -> PyResult<Vec<PipeId>> {
        self.editor.move_node(node_id, lat, lng).map_err(to_py_err)
    }

    pub fn sync_pipes_for_node(&mut self, node_id: NodeId) -> PyResult<Vec<PipeId>> {
        self.editor.sync_pipes_for_node(node_id).map_err(to_py_err)
    }

    pub fn set_node_name(&mut self, node_id: NodeId, name: &str) -> PyResult<()> {
        self.editor.set_node_name(node_id, name).map_err(to_py_err)
    }

    pub fn set_node_esr(&mut self, node_id: NodeId, is_esr: bool) -> PyResult<()> {
        self.editor.set_node_esr(node_id, is_esr).map_err(to_py_err)
    }

    /// Adds a pipe; `waypoints` is a list of `(lat, lng)` pairs
    #[pyo3(signature = (origin, destination, waypoints=None))]
    pub fn add_pipe(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        waypoints: Option<Vec<(f64, f64)>>,
    ) -> PyResult<PipeId> {
        let path = waypoints.as_deref().map(path_from_lat_lng);
        self.editor
            .add_pipe(origin, destination, path)
            .map_err(to_py_err)
    }

    /// Pipe waypoints as `(lat, lng)` pairs
    pub fn pipe_waypoints(&self, pipe_id: PipeId) -> PyResult<Vec<(f64, f64)>> {
        self.editor
            .pipe(pipe_id)
            .map(Pipe::waypoints)
            .ok_or_else(|| to_py_err(Error::UnknownPipe(pipe_id)))
    }

    /// Pipe endpoints as `(origin, destination)`
    pub fn pipe_endpoints(&self, pipe_id: PipeId) -> PyResult<(NodeId, NodeId)> {
        self.editor
            .pipe(pipe_id)
            .map(|pipe| (pipe.origin, pipe.destination))
            .ok_or_else(|| to_py_err(Error::UnknownPipe(pipe_id)))
    }

    pub fn set_pipe_waypoints(&mut self, pipe_id: PipeId, waypoints: Vec<(f64, f64)>) -> PyResult<()> {
        self.editor
            .set_pipe_path(pipe_id, path_from_lat_lng(&waypoints))
            .map_err(to_py_err)
    }

    pub fn select_source(&mut self, node_id: NodeId) -> PyResult<()> {
        self.editor.select_source(node_id).map_err(to_py_err)
    }

    pub fn selected_source(&self) -> Option<NodeId> {
        self.editor.selected_source()
    }

    pub fn clear_selection(&mut self) {
        self.editor.clear_selection();
    }

    /// Connects the selected source node to `destination`, if one is selected
    pub fn connect_selected(&mut self, destination: NodeId) -> PyResult<Option<PipeId>> {
        self.editor.connect_selected(destination).map_err(to_py_err)
    }

    pub fn export_nodes(&self) -> PyResult<String> {
        self.editor.export_nodes().map_err(to_py_err)
    }

    pub fn export_pipes(&self) -> PyResult<String> {
        self.editor.export_pipes().map_err(to_py_err)
    }

    /// Imports exported nodes.
    ///
    /// Returns `(imported_ids, skipped)` where `skipped` lists
    /// `(index, reason)` for every entry that was left out.
    pub fn import_nodes(&mut self, json: &str) -> PyResult<(Vec<NodeId>, Vec<(usize, String)>)> {
        let report = self.editor.import_nodes(json).map_err(to_py_err)?;
        Ok(report_to_tuple(report))
    }

    /// Imports exported pipes against the nodes already present.
    ///
    /// Returns `(imported_ids, skipped)` like `import_nodes`.
    pub fn import_pipes(&mut self, json: &str) -> PyResult<(Vec<PipeId>, Vec<(usize, String)>)> {
        let report = self.editor.import_pipes(json).map_err(to_py_err)?;
        Ok(report_to_tuple(report))
    }

    /// Network as a GeoJSON FeatureCollection string
    pub fn to_geojson(&self) -> PyResult<String> {
        self.editor.to_geojson_string().map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "NetworkEditor with {} nodes and {} pipes",
            self.editor.nodes().len(),
            self.editor.pipes().len()
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

fn report_to_tuple(report: ImportReport) -> (Vec<u32>, Vec<(usize, String)>) {
    let skipped = report
        .skipped
        .into_iter()
        .map(|entry| (entry.index, entry.reason))
        .collect();
    (report.imported, skipped)
}

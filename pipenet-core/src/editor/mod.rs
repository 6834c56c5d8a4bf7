//! Network editor state
//!
//! One [`NetworkEditor`] owns the map view, the node and pipe collections and
//! the transient selection used for click-to-connect. All mutations go through
//! it so that pipe geometry follows node moves in the same call.

mod events;
mod ids;

use std::fmt;

use geo::{Coord, LineString, Point};
use itertools::Itertools;
use log::{debug, trace, warn};

pub use events::NetworkEvent;
pub use ids::lowest_unused_id;

use events::Observer;

use crate::config::EditorConfig;
use crate::geometry::is_valid_position;
use crate::model::{MapOptions, MapView, Node, PathStyle, Pipe};
use crate::{Error, NodeId, PipeId};

pub struct NetworkEditor {
    map: MapView,
    nodes: Vec<Node>,
    pipes: Vec<Pipe>,
    selected_source: Option<NodeId>,
    observers: Vec<Observer>,
}

impl fmt::Debug for NetworkEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkEditor")
            .field("map", &self.map)
            .field("nodes", &self.nodes.len())
            .field("pipes", &self.pipes.len())
            .field("selected_source", &self.selected_source)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for NetworkEditor {
    fn default() -> Self {
        Self::initialize(&MapOptions::default())
    }
}

impl NetworkEditor {
    /// Creates the map state and an empty network.
    ///
    /// This is the only way to obtain an editor, so every node/pipe operation
    /// runs against an initialized map.
    pub fn initialize(options: &MapOptions) -> Self {
        Self::with_map(MapView::initialize(options))
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        let map = MapView::initialize(&config.map.options()).with_tile_layer(config.map.tile_layer());
        Self::with_map(map)
    }

    fn with_map(map: MapView) -> Self {
        debug!(
            "Map initialized at ({}, {}) zoom {}",
            map.latitude, map.longitude, map.zoom
        );
        NetworkEditor {
            map,
            nodes: Vec::new(),
            pipes: Vec::new(),
            selected_source: None,
            observers: Vec::new(),
        }
    }

    pub fn map_view(&self) -> &MapView {
        &self.map
    }

    /// Registers a callback invoked after every change to the network
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&NetworkEvent) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    fn emit(&self, event: NetworkEvent) {
        trace!("{event:?}");
        for observer in &self.observers {
            observer(&event);
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn pipe(&self, id: PipeId) -> Option<&Pipe> {
        self.pipes.iter().find(|pipe| pipe.id == id)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, Error> {
        self.nodes
            .iter_mut()
            .find(|node| node.id == id)
            .ok_or(Error::UnknownNode(id))
    }

    fn pipe_mut(&mut self, id: PipeId) -> Result<&mut Pipe, Error> {
        self.pipes
            .iter_mut()
            .find(|pipe| pipe.id == id)
            .ok_or(Error::UnknownPipe(id))
    }

    fn node_position(&self, id: NodeId) -> Result<Coord<f64>, Error> {
        self.node(id)
            .map(|node| node.geometry.0)
            .ok_or(Error::UnknownNode(id))
    }

    pub fn allocate_node_id(&self) -> NodeId {
        lowest_unused_id(self.nodes.iter().map(|node| node.id))
    }

    pub fn allocate_pipe_id(&self) -> PipeId {
        lowest_unused_id(self.pipes.iter().map(|pipe| pipe.id))
    }

    /// Adds a node at `(lat, lng)`.
    ///
    /// Without `name` the label is `"Node{id}"`. Without `id` (or with `0`)
    /// the lowest unused id is assigned.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidData`] for coordinates outside the globe,
    /// [`Error::DuplicateNodeId`] when the explicit id is taken.
    pub fn add_node(
        &mut self,
        lat: f64,
        lng: f64,
        name: Option<&str>,
        id: Option<NodeId>,
    ) -> Result<NodeId, Error> {
        self.insert_node(lat, lng, name, id, false)
    }

    pub(crate) fn insert_node(
        &mut self,
        lat: f64,
        lng: f64,
        name: Option<&str>,
        id: Option<NodeId>,
        is_esr: bool,
    ) -> Result<NodeId, Error> {
        if !is_valid_position(lat, lng) {
            return Err(Error::InvalidData(format!(
                "node position ({lat}, {lng}) is not a valid coordinate"
            )));
        }
        let id = match id.filter(|&id| id > 0) {
            Some(id) if self.node(id).is_some() => return Err(Error::DuplicateNodeId(id)),
            Some(id) => id,
            None => self.allocate_node_id(),
        };

        let node = Node::new(id, name, Point::new(lng, lat), is_esr);
        debug!("Added node {} '{}' at ({lat}, {lng})", node.id, node.name);
        self.nodes.push(node);
        self.emit(NetworkEvent::NodeAdded { node: id });
        Ok(id)
    }

    /// Drag-end hook: moves the node and drags the ends of its pipes along.
    ///
    /// Returns the pipes whose geometry changed.
    pub fn move_node(&mut self, id: NodeId, lat: f64, lng: f64) -> Result<Vec<PipeId>, Error> {
        if !is_valid_position(lat, lng) {
            return Err(Error::InvalidData(format!(
                "node position ({lat}, {lng}) is not a valid coordinate"
            )));
        }
        self.node_mut(id)?.geometry = Point::new(lng, lat);
        debug!("Moved node {id} to ({lat}, {lng})");
        self.emit(NetworkEvent::NodeMoved { node: id });
        self.sync_pipes_for_node(id)
    }

    /// Rewrites the last waypoint of every incoming pipe and the first
    /// waypoint of every outgoing pipe to the node's current position.
    /// Interior waypoints are left alone.
    ///
    /// Returns the pipes whose geometry was touched.
    pub fn sync_pipes_for_node(&mut self, id: NodeId) -> Result<Vec<PipeId>, Error> {
        let (position, in_pipes, out_pipes) = {
            let node = self.node(id).ok_or(Error::UnknownNode(id))?;
            (node.geometry.0, node.in_pipes.clone(), node.out_pipes.clone())
        };

        for &pipe_id in &in_pipes {
            if let Some(last) = self.pipe_mut(pipe_id)?.geometry.0.last_mut() {
                *last = position;
            }
        }
        for &pipe_id in &out_pipes {
            if let Some(first) = self.pipe_mut(pipe_id)?.geometry.0.first_mut() {
                *first = position;
            }
        }

        let touched: Vec<PipeId> = in_pipes.into_iter().chain(out_pipes).unique().collect();
        for &pipe in &touched {
            trace!("Synced pipe {pipe} to node {id}");
            self.emit(NetworkEvent::PipePathChanged { pipe });
        }
        Ok(touched)
    }

    pub fn set_node_name(&mut self, id: NodeId, name: &str) -> Result<(), Error> {
        self.node_mut(id)?.rename(name);
        self.emit(NetworkEvent::NodeUpdated { node: id });
        Ok(())
    }

    pub fn set_node_esr(&mut self, id: NodeId, is_esr: bool) -> Result<(), Error> {
        self.node_mut(id)?.is_esr = is_esr;
        self.emit(NetworkEvent::NodeUpdated { node: id });
        Ok(())
    }

    /// Adds a pipe from `origin` to `destination`.
    ///
    /// Without `path` the pipe is a straight segment between the two nodes.
    /// An explicit path keeps its interior waypoints; its ends are pinned to
    /// the node positions. Self-loops and parallel pipes are accepted.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownNode`] for a missing endpoint, [`Error::InvalidPath`]
    /// for a path with fewer than two points or non-finite coordinates.
    pub fn add_pipe(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        path: Option<LineString<f64>>,
    ) -> Result<PipeId, Error> {
        let origin_position = self.node_position(origin)?;
        let destination_position = self.node_position(destination)?;

        let geometry = match path {
            Some(path) => pin_endpoints(path, origin_position, destination_position)?,
            None => LineString::new(vec![origin_position, destination_position]),
        };

        if origin == destination {
            warn!("Pipe from node {origin} loops back to itself");
        } else if self
            .pipes
            .iter()
            .any(|pipe| pipe.origin == origin && pipe.destination == destination)
        {
            debug!("Adding parallel pipe between nodes {origin} and {destination}");
        }

        let id = self.allocate_pipe_id();
        self.pipes.push(Pipe {
            id,
            geometry,
            origin,
            destination,
            style: PathStyle::default(),
        });
        self.node_mut(origin)?.out_pipes.push(id);
        self.node_mut(destination)?.in_pipes.push(id);

        debug!("Added pipe {id} from node {origin} to node {destination}");
        self.emit(NetworkEvent::PipeAdded { pipe: id });
        Ok(id)
    }

    /// Replaces the waypoints of a pipe, keeping its ends on its nodes
    pub fn set_pipe_path(&mut self, id: PipeId, path: LineString<f64>) -> Result<(), Error> {
        let (origin, destination) = {
            let pipe = self.pipe(id).ok_or(Error::UnknownPipe(id))?;
            (pipe.origin, pipe.destination)
        };
        let geometry = pin_endpoints(
            path,
            self.node_position(origin)?,
            self.node_position(destination)?,
        )?;
        self.pipe_mut(id)?.geometry = geometry;
        self.emit(NetworkEvent::PipePathChanged { pipe: id });
        Ok(())
    }

    /// Marks `id` as the origin of the next click-to-connect pipe
    pub fn select_source(&mut self, id: NodeId) -> Result<(), Error> {
        if self.node(id).is_none() {
            return Err(Error::UnknownNode(id));
        }
        self.selected_source = Some(id);
        Ok(())
    }

    pub fn selected_source(&self) -> Option<NodeId> {
        self.selected_source
    }

    pub fn clear_selection(&mut self) {
        self.selected_source = None;
    }

    /// Connects the selected source to `destination` with a straight pipe.
    ///
    /// Returns `None` when nothing is selected. The selection is cleared once
    /// the pipe is created.
    pub fn connect_selected(&mut self, destination: NodeId) -> Result<Option<PipeId>, Error> {
        let Some(origin) = self.selected_source else {
            return Ok(None);
        };
        let pipe = self.add_pipe(origin, destination, None)?;
        self.selected_source = None;
        Ok(Some(pipe))
    }
}

fn pin_endpoints(
    mut path: LineString<f64>,
    origin: Coord<f64>,
    destination: Coord<f64>,
) -> Result<LineString<f64>, Error> {
    if path.0.len() < 2 {
        return Err(Error::InvalidPath(format!(
            "a pipe needs at least 2 waypoints, got {}",
            path.0.len()
        )));
    }
    if let Some((index, c)) = path
        .coords()
        .enumerate()
        .find(|(_, c)| !is_valid_position(c.y, c.x))
    {
        return Err(Error::InvalidPath(format!(
            "waypoint {index} ({}, {}) is not a valid coordinate",
            c.y, c.x
        )));
    }
    if let Some(first) = path.0.first_mut() {
        *first = origin;
    }
    if let Some(last) = path.0.last_mut() {
        *last = destination;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::geometry::path_from_lat_lng;

    fn editor_with_two_nodes() -> (NetworkEditor, NodeId, NodeId) {
        let mut editor = NetworkEditor::default();
        let a = editor.add_node(20.0, 78.0, None, None).unwrap();
        let b = editor.add_node(21.0, 79.0, None, None).unwrap();
        (editor, a, b)
    }

    #[test]
    fn node_ids_fill_gaps() {
        let mut editor = NetworkEditor::default();
        editor.add_node(1.0, 1.0, None, Some(1)).unwrap();
        editor.add_node(1.0, 1.0, None, Some(2)).unwrap();
        editor.add_node(1.0, 1.0, None, Some(4)).unwrap();
        assert_eq!(editor.allocate_node_id(), 3);
        assert_eq!(editor.add_node(1.0, 1.0, None, None).unwrap(), 3);
        assert_eq!(editor.allocate_node_id(), 5);
    }

    #[test]
    fn node_and_pipe_ids_are_independent() {
        let (mut editor, a, b) = editor_with_two_nodes();
        let pipe = editor.add_pipe(a, b, None).unwrap();
        assert_eq!(pipe, 1);
        assert_eq!(a, 1);
        assert_eq!(editor.allocate_pipe_id(), 2);
    }

    #[test]
    fn explicit_duplicate_id_is_rejected() {
        let (mut editor, a, _) = editor_with_two_nodes();
        let err = editor.add_node(0.0, 0.0, None, Some(a)).unwrap_err();
        assert!(matches!(err, Error::DuplicateNodeId(id) if id == a));
        assert_eq!(editor.nodes().len(), 2);
    }

    #[test]
    fn zero_id_means_auto() {
        let (mut editor, _, _) = editor_with_two_nodes();
        assert_eq!(editor.add_node(0.0, 0.0, None, Some(0)).unwrap(), 3);
    }

    #[test]
    fn invalid_position_is_rejected() {
        let mut editor = NetworkEditor::default();
        assert!(matches!(
            editor.add_node(f64::NAN, 0.0, None, None),
            Err(Error::InvalidData(_))
        ));
        assert!(editor.nodes().is_empty());
    }

    #[test]
    fn default_pipe_is_straight_segment() {
        let (mut editor, a, b) = editor_with_two_nodes();
        let id = editor.add_pipe(a, b, None).unwrap();
        let pipe = editor.pipe(id).unwrap();
        assert_eq!(pipe.waypoints(), vec![(20.0, 78.0), (21.0, 79.0)]);
        assert_eq!(editor.node(a).unwrap().out_pipes, vec![id]);
        assert_eq!(editor.node(b).unwrap().in_pipes, vec![id]);
    }

    #[test]
    fn explicit_path_is_pinned_to_nodes() {
        let (mut editor, a, b) = editor_with_two_nodes();
        let path = path_from_lat_lng(&[(20.1, 78.1), (20.5, 78.2), (20.9, 78.9)]);
        let id = editor.add_pipe(a, b, Some(path)).unwrap();
        assert_eq!(
            editor.pipe(id).unwrap().waypoints(),
            vec![(20.0, 78.0), (20.5, 78.2), (21.0, 79.0)]
        );
    }

    #[test]
    fn pipe_requires_known_nodes_and_two_points() {
        let (mut editor, a, b) = editor_with_two_nodes();
        assert!(matches!(
            editor.add_pipe(a, 99, None),
            Err(Error::UnknownNode(99))
        ));
        assert!(matches!(
            editor.add_pipe(a, b, Some(path_from_lat_lng(&[(20.0, 78.0)]))),
            Err(Error::InvalidPath(_))
        ));
        assert!(editor.pipes().is_empty());
    }

    #[test]
    fn moving_a_node_drags_pipe_ends_only() {
        let (mut editor, a, b) = editor_with_two_nodes();
        let c = editor.add_node(22.0, 80.0, None, None).unwrap();
        let incoming = editor
            .add_pipe(a, b, Some(path_from_lat_lng(&[(20.0, 78.0), (20.5, 78.5), (21.0, 79.0)])))
            .unwrap();
        let outgoing = editor
            .add_pipe(b, c, Some(path_from_lat_lng(&[(21.0, 79.0), (21.5, 79.5), (22.0, 80.0)])))
            .unwrap();

        editor.move_node(b, 21.2, 79.3).unwrap();

        assert_eq!(
            editor.pipe(incoming).unwrap().waypoints(),
            vec![(20.0, 78.0), (20.5, 78.5), (21.2, 79.3)]
        );
        assert_eq!(
            editor.pipe(outgoing).unwrap().waypoints(),
            vec![(21.2, 79.3), (21.5, 79.5), (22.0, 80.0)]
        );
    }

    #[test]
    fn self_loop_follows_its_node() {
        let (mut editor, a, _) = editor_with_two_nodes();
        let pipe = editor.add_pipe(a, a, None).unwrap();
        let touched = editor.sync_pipes_for_node(a).unwrap();
        assert_eq!(touched, vec![pipe]);

        editor.move_node(a, 10.0, 10.0).unwrap();
        assert_eq!(
            editor.pipe(pipe).unwrap().waypoints(),
            vec![(10.0, 10.0), (10.0, 10.0)]
        );
    }

    #[test]
    fn observers_see_changes_in_order() {
        let (mut editor, a, b) = editor_with_two_nodes();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        editor.subscribe(move |event| sink.lock().unwrap().push(*event));

        let pipe = editor.add_pipe(a, b, None).unwrap();
        editor.move_node(a, 20.5, 78.5).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                NetworkEvent::PipeAdded { pipe },
                NetworkEvent::NodeMoved { node: a },
                NetworkEvent::PipePathChanged { pipe },
            ]
        );
    }

    #[test]
    fn rename_and_esr_flag() {
        let (mut editor, a, _) = editor_with_two_nodes();
        editor.set_node_name(a, "Tank").unwrap();
        editor.set_node_esr(a, true).unwrap();
        let node = editor.node(a).unwrap();
        assert_eq!(node.name, "Tank");
        assert!(node.is_esr);
        assert!(matches!(
            editor.set_node_esr(42, true),
            Err(Error::UnknownNode(42))
        ));
    }

    #[test]
    fn click_to_connect() {
        let (mut editor, a, b) = editor_with_two_nodes();
        assert_eq!(editor.connect_selected(b).unwrap(), None);

        editor.select_source(a).unwrap();
        assert_eq!(editor.selected_source(), Some(a));
        let pipe = editor.connect_selected(b).unwrap().unwrap();
        assert_eq!(editor.pipe(pipe).unwrap().origin, a);
        assert_eq!(editor.selected_source(), None);

        assert!(editor.select_source(77).is_err());
    }

    #[test]
    fn out_of_range_waypoints_are_rejected() {
        let (mut editor, a, b) = editor_with_two_nodes();
        let bad = path_from_lat_lng(&[(20.0, 78.0), (95.0, 200.0), (21.0, 79.0)]);
        assert!(matches!(
            editor.add_pipe(a, b, Some(bad.clone())),
            Err(Error::InvalidPath(_))
        ));
        assert!(editor.pipes().is_empty());

        let id = editor.add_pipe(a, b, None).unwrap();
        assert!(matches!(
            editor.set_pipe_path(id, bad),
            Err(Error::InvalidPath(_))
        ));
        assert_eq!(
            editor.pipe(id).unwrap().waypoints(),
            vec![(20.0, 78.0), (21.0, 79.0)]
        );
        assert!(editor.export_pipes().is_ok());
    }

    #[test]
    fn set_pipe_path_keeps_ends() {
        let (mut editor, a, b) = editor_with_two_nodes();
        let id = editor.add_pipe(a, b, None).unwrap();
        editor
            .set_pipe_path(id, path_from_lat_lng(&[(0.0, 0.0), (20.4, 78.6), (0.0, 0.0)]))
            .unwrap();
        assert_eq!(
            editor.pipe(id).unwrap().waypoints(),
            vec![(20.0, 78.0), (20.4, 78.6), (21.0, 79.0)]
        );
    }
}

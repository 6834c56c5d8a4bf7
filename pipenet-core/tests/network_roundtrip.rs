use pipenet_core::geometry::{compute_distance, compute_polyline_length, path_from_lat_lng};
use pipenet_core::prelude::*;
use pretty_assertions::assert_eq;

const TOLERANCE: f64 = 1e-5;

fn sample_network() -> NetworkEditor {
    let mut editor = NetworkEditor::initialize(&MapOptions::default());
    // Inserted out of id order on purpose.
    editor.add_node(21.0, 79.0, Some("Pump"), Some(4)).unwrap();
    editor.add_node(20.0, 78.0, Some("Source"), Some(1)).unwrap();
    let esr = editor.add_node(20.5, 78.75, None, None).unwrap();
    editor.set_node_esr(esr, true).unwrap();

    editor.add_pipe(1, 4, None).unwrap();
    editor
        .add_pipe(
            4,
            esr,
            Some(path_from_lat_lng(&[
                (21.0, 79.0),
                (20.912345, 78.987654),
                (20.654321, 78.812345),
                (20.5, 78.75),
            ])),
        )
        .unwrap();
    editor
}

#[test]
fn scenario_two_nodes_one_pipe() {
    let mut editor = NetworkEditor::initialize(&MapOptions::default());
    let a = editor.add_node(20.0, 78.0, None, None).unwrap();
    let b = editor.add_node(21.0, 79.0, None, None).unwrap();
    editor.add_pipe(a, b, None).unwrap();

    let exported: Vec<PipeRecord> = serde_json::from_str(&editor.export_pipes().unwrap()).unwrap();
    assert_eq!(exported[0].originid, a);
    assert_eq!(exported[0].destinationid, b);
    assert!(exported[0].length > 0.0);
}

#[test]
fn nodes_round_trip() {
    let source = sample_network();
    let mut target = NetworkEditor::default();
    let report = target.import_nodes(&source.export_nodes().unwrap()).unwrap();

    assert!(report.is_complete());
    assert_eq!(target.node_records(), source.node_records());
}

#[test]
fn pipes_round_trip_within_codec_precision() {
    let source = sample_network();
    let mut target = NetworkEditor::default();
    target.import_nodes(&source.export_nodes().unwrap()).unwrap();
    let report = target.import_pipes(&source.export_pipes().unwrap()).unwrap();

    assert!(report.is_complete());
    assert_eq!(target.pipes().len(), source.pipes().len());
    for (original, restored) in source.pipes().iter().zip(target.pipes()) {
        assert_eq!(restored.origin, original.origin);
        assert_eq!(restored.destination, original.destination);
        let original_points = original.waypoints();
        let restored_points = restored.waypoints();
        assert_eq!(restored_points.len(), original_points.len());
        for (a, b) in original_points.iter().zip(&restored_points) {
            assert!((a.0 - b.0).abs() <= TOLERANCE, "{a:?} vs {b:?}");
            assert!((a.1 - b.1).abs() <= TOLERANCE, "{a:?} vs {b:?}");
        }
    }
}

#[test]
fn imported_pipes_are_attached_to_nodes() {
    let source = sample_network();
    let mut target = NetworkEditor::default();
    target.import_nodes(&source.export_nodes().unwrap()).unwrap();
    target.import_pipes(&source.export_pipes().unwrap()).unwrap();

    let pump = target.node(4).unwrap();
    assert_eq!(pump.in_pipes.len(), 1);
    assert_eq!(pump.out_pipes.len(), 1);

    // Moving the imported node keeps both pipes attached.
    target.move_node(4, 21.1, 79.1).unwrap();
    let incoming = target.pipe(pump_in(&target)).unwrap();
    assert_eq!(incoming.waypoints().last(), Some(&(21.1, 79.1)));
}

fn pump_in(editor: &NetworkEditor) -> PipeId {
    editor.node(4).unwrap().in_pipes[0]
}

#[test]
fn dangling_destination_is_dropped() {
    let mut editor = sample_network();
    let before = editor.pipes().len();
    let json = r#"[{"encodedpath": "_p~iF~ps|U_ulLnnqC", "originid": 1, "destinationid": 404, "length": 10.0}]"#;

    let report = editor.import_pipes(json).unwrap();

    assert_eq!(editor.pipes().len(), before);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 0);
}

#[test]
fn drag_updates_only_adjacent_waypoints() {
    let mut editor = sample_network();
    let before: Vec<Vec<(f64, f64)>> = editor.pipes().iter().map(|p| p.waypoints()).collect();

    editor.move_node(4, 21.3, 79.4).unwrap();

    let incoming = editor.pipes()[0].waypoints();
    let outgoing = editor.pipes()[1].waypoints();
    assert_eq!(incoming[0], before[0][0]);
    assert_eq!(incoming[1], (21.3, 79.4));
    assert_eq!(outgoing[0], (21.3, 79.4));
    assert_eq!(&outgoing[1..], &before[1][1..]);
}

#[test]
fn two_point_length_equals_distance() {
    let path = path_from_lat_lng(&[(12.97, 77.59), (13.08, 80.27)]);
    let length = compute_polyline_length(&path);
    let distance = compute_distance(12.97, 77.59, 13.08, 80.27);
    assert!((length - distance).abs() < 1e-6);
}

#[test]
fn geojson_reflects_network() {
    let editor = sample_network();
    let collection = editor.to_geojson().unwrap();
    assert_eq!(collection.features.len(), 5);
}

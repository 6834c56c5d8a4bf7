use pipenet_core::geometry::path_from_lat_lng;
use pyo3::prelude::*;
use pyo3_stub_gen::derive::gen_stub_pyfunction;

/// Great-circle distance in meters between two points
#[gen_stub_pyfunction]
#[pyfunction]
pub fn compute_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    pipenet_core::geometry::compute_distance(lat1, lng1, lat2, lng2)
}

/// Length in meters along a list of `(lat, lng)` waypoints
#[gen_stub_pyfunction]
#[pyfunction]
#[allow(clippy::needless_pass_by_value)]
pub fn compute_polyline_length(waypoints: Vec<(f64, f64)>) -> f64 {
    pipenet_core::geometry::compute_polyline_length(&path_from_lat_lng(&waypoints))
}

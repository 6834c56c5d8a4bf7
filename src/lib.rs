use pyo3::prelude::*;
use pyo3_stub_gen::define_stub_info_gatherer;

use editor::PyNetworkEditor;
use elevation::{get_elevations, get_elevations_with};
use geometry::{compute_distance, compute_polyline_length};

pub mod editor;
pub mod elevation;
pub mod geometry;

/// A Python module implemented in Rust.
#[pymodule]
fn pipenet(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyNetworkEditor>()?;

    m.add_function(wrap_pyfunction!(compute_distance, m)?)?;
    m.add_function(wrap_pyfunction!(compute_polyline_length, m)?)?;
    m.add_function(wrap_pyfunction!(get_elevations, m)?)?;
    m.add_function(wrap_pyfunction!(get_elevations_with, m)?)?;
    Ok(())
}

define_stub_info_gatherer!(stub_info);

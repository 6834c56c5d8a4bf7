use geo::Point;
use pipenet_core::config::{DEFAULT_ELEVATION_ENDPOINT, DEFAULT_ELEVATION_TIMEOUT_SECS};
use pipenet_core::prelude::*;
use pyo3::prelude::*;
use pyo3_stub_gen::derive::gen_stub_pyfunction;

use crate::editor::to_py_err;

/// Elevations in meters for a list of `(lat, lng)` points
///
/// Issues a single request to an Open-Elevation compatible service.
///
/// Parameters
/// ----------
/// points : list[tuple[float, float]]
///     Points as `(lat, lng)` pairs
/// endpoint : str, optional
///     Lookup URL, defaults to the public Open-Elevation API
/// timeout_secs : int, default=10
///     Request timeout
///
/// Returns
/// -------
/// list[float]
///     One elevation per point, or an empty list if the service returned none
///
/// Raises
/// ------
/// RuntimeError
///     If the request fails or times out
///
/// Notes
/// -----
/// The GIL is released while waiting for the service.
#[gen_stub_pyfunction]
#[pyfunction]
#[pyo3(signature = (points, endpoint=None, timeout_secs=DEFAULT_ELEVATION_TIMEOUT_SECS))]
pub fn get_elevations(
    py: Python<'_>,
    points: Vec<(f64, f64)>,
    endpoint: Option<String>,
    timeout_secs: u64,
) -> PyResult<Vec<f64>> {
    py.detach(|| {
        let config = ElevationConfig {
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ELEVATION_ENDPOINT.to_string()),
            timeout_secs,
        };
        let points: Vec<Point<f64>> = points
            .iter()
            .map(|&(lat, lng)| Point::new(lng, lat))
            .collect();
        ElevationClient::new(&config)?.lookup(&points)
    })
    .map_err(to_py_err)
}

/// Background form of `get_elevations`
///
/// Returns immediately. The lookup runs on a worker thread and
/// `callback(elevations, error)` is called exactly once: with the list of
/// elevations and `None` on success, or with `None` and the error message on
/// failure (including timeouts).
///
/// Parameters
/// ----------
/// points : list[tuple[float, float]]
///     Points as `(lat, lng)` pairs
/// callback : Callable[[list[float] | None, str | None], None]
///     Receives the outcome; exceptions it raises are printed
/// endpoint : str, optional
///     Lookup URL, defaults to the public Open-Elevation API
/// timeout_secs : int, default=10
///     Request timeout
///
/// Raises
/// ------
/// RuntimeError
///     If the HTTP client cannot be created
#[gen_stub_pyfunction]
#[pyfunction]
#[pyo3(signature = (points, callback, endpoint=None, timeout_secs=DEFAULT_ELEVATION_TIMEOUT_SECS))]
pub fn get_elevations_with(
    points: Vec<(f64, f64)>,
    callback: Py<PyAny>,
    endpoint: Option<String>,
    timeout_secs: u64,
) -> PyResult<()> {
    let config = ElevationConfig {
        endpoint: endpoint.unwrap_or_else(|| DEFAULT_ELEVATION_ENDPOINT.to_string()),
        timeout_secs,
    };
    let client = ElevationClient::new(&config).map_err(to_py_err)?;
    let points: Vec<Point<f64>> = points
        .iter()
        .map(|&(lat, lng)| Point::new(lng, lat))
        .collect();

    // The worker is not joined; the callback reports completion.
    client.lookup_with(points, move |result| {
        Python::attach(|py| {
            let args = match result {
                Ok(elevations) => (Some(elevations), None),
                Err(e) => (None, Some(e.to_string())),
            };
            if let Err(err) = callback.call1(py, args) {
                err.print(py);
            }
        });
    });
    Ok(())
}

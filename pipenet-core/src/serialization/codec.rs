//! Encoded polyline form of pipe geometry

use geo::LineString;

use crate::Error;

/// Decimal places kept by the encoding (about 1 m at the equator)
pub const POLYLINE_PRECISION: u32 = 5;

/// Encodes the path as a polyline string (latitude first per point)
pub fn encode_path(path: &LineString<f64>) -> Result<String, Error> {
    polyline::encode_coordinates(path.coords().copied(), POLYLINE_PRECISION)
        .map_err(|e| Error::Polyline(e.to_string()))
}

pub fn decode_path(encoded: &str) -> Result<LineString<f64>, Error> {
    polyline::decode_polyline(encoded, POLYLINE_PRECISION)
        .map_err(|e| Error::Polyline(e.to_string()))
}

//! Elevation lookup against an Open-Elevation compatible service
//!
//! One request per batch: `GET {endpoint}?locations=lat,lon|lat,lon|...`,
//! answered with `{"results": [{"elevation": ...}, ...]}` in request order.

use std::thread::JoinHandle;
use std::time::Duration;

use geo::Point;
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::Error;
use crate::config::ElevationConfig;

#[derive(Debug, Clone)]
pub struct ElevationClient {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Option<Vec<LookupResult>>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    #[serde(default)]
    elevation: Option<f64>,
}

impl ElevationClient {
    /// # Errors
    ///
    /// Returns [`Error::Elevation`] if the HTTP client cannot be built
    pub fn new(config: &ElevationConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Elevation(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Elevations in meters for `points` (x = longitude, y = latitude), in
    /// input order. An answer without `results` yields an empty list, a
    /// result without an elevation fails with the index of its point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Elevation`] on network failure, timeout, a non-success
    /// status or an unreadable body.
    pub fn lookup(&self, points: &[Point<f64>]) -> Result<Vec<f64>, Error> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let locations = format_locations(points);
        debug!("Requesting elevation for {} points", points.len());

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("locations", locations.as_str())])
            .send()
            .map_err(|e| Error::Elevation(format!("request error: {e}")))?;
        if !response.status().is_success() {
            return Err(Error::Elevation(format!(
                "elevation service responded with {}",
                response.status()
            )));
        }
        let body = response
            .text()
            .map_err(|e| Error::Elevation(format!("failed to read response: {e}")))?;

        parse_lookup_response(&body)
    }

    /// Runs [`Self::lookup`] on a worker thread and hands the outcome to
    /// `callback`, which is called exactly once.
    pub fn lookup_with<F>(&self, points: Vec<Point<f64>>, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<Vec<f64>, Error>) + Send + 'static,
    {
        let client = self.clone();
        std::thread::spawn(move || callback(client.lookup(&points)))
    }
}

/// `lat,lon` pairs joined by `|`
pub(crate) fn format_locations(points: &[Point<f64>]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", point.y(), point.x()))
        .collect::<Vec<_>>()
        .join("|")
}

pub(crate) fn parse_lookup_response(body: &str) -> Result<Vec<f64>, Error> {
    let response: LookupResponse = serde_json::from_str(body)
        .map_err(|e| Error::Elevation(format!("invalid response body: {e}")))?;
    response
        .results
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            result.elevation.ok_or_else(|| {
                Error::Elevation(format!("service returned no elevation for point {index}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn locations_are_lat_first() {
        let points = [Point::new(78.5, 20.25), Point::new(-0.1, 51.5)];
        assert_eq!(format_locations(&points), "20.25,78.5|51.5,-0.1");
    }

    #[test]
    fn parses_results_in_order() {
        let body = r#"{"results": [
            {"latitude": 20.25, "longitude": 78.5, "elevation": 312.0},
            {"latitude": 51.5, "longitude": -0.1, "elevation": 11.5}
        ]}"#;
        assert_eq!(parse_lookup_response(body).unwrap(), vec![312.0, 11.5]);
    }

    #[test]
    fn missing_results_means_no_elevations() {
        assert!(parse_lookup_response("{}").unwrap().is_empty());
        assert!(parse_lookup_response(r#"{"results": null}"#).unwrap().is_empty());
    }

    #[test]
    fn missing_elevation_names_the_point() {
        let body = r#"{"results": [{"elevation": 312.0}, {"elevation": null}, {}]}"#;
        let Err(Error::Elevation(message)) = parse_lookup_response(body) else {
            panic!("expected an elevation error");
        };
        assert!(message.contains("point 1"), "{message}");
    }

    #[test]
    fn unreadable_body_is_an_error() {
        assert!(matches!(
            parse_lookup_response("<html>"),
            Err(Error::Elevation(_))
        ));
    }

    #[test]
    fn empty_batch_skips_the_request() {
        let client = ElevationClient::new(&ElevationConfig {
            endpoint: "http://127.0.0.1:9/unreachable".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        assert!(client.lookup(&[]).unwrap().is_empty());
    }

    #[test]
    fn network_failure_reaches_the_callback() {
        // Port 9 (discard) is closed on test machines, so the connection is refused.
        let client = ElevationClient::new(&ElevationConfig {
            endpoint: "http://127.0.0.1:9/api/v1/lookup".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        let (tx, rx) = mpsc::channel();
        client
            .lookup_with(vec![Point::new(78.0, 20.0)], move |result| {
                tx.send(result.is_err()).unwrap();
            })
            .join()
            .unwrap();
        assert!(rx.recv().unwrap());
    }
}

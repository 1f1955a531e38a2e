use std::time::Duration;

use serde::Deserialize;

use geoavp_core::gateways::geocode::{GeocodeError, GeocodingGateway};
use geoavp_entities::geo::MapPoint;

const API_URL: &str = "https://api.opencagedata.com/geocode/v1/json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Primary geocoding provider (OpenCage forward geocoding API).
pub struct OpenCage {
    api_key: String,
    client: reqwest::blocking::Client,
}

impl OpenCage {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { api_key, client })
    }
}

impl GeocodingGateway for OpenCage {
    fn resolve_query_lat_lng(&self, query: &str) -> Result<MapPoint, GeocodeError> {
        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("q", query),
                ("key", self.api_key.as_str()),
                ("limit", "1"),
                ("no_annotations", "1"),
            ])
            .send()
            .map_err(|err| GeocodeError::Provider(err.to_string()))?;
        if !response.status().is_success() {
            return Err(GeocodeError::Provider(format!(
                "response status: {}",
                response.status()
            )));
        }
        let body: GeocodeResponse = response
            .json()
            .map_err(|err| GeocodeError::MalformedResponse(err.to_string()))?;
        first_position(body)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

fn first_position(body: GeocodeResponse) -> Result<MapPoint, GeocodeError> {
    let first = body.results.into_iter().next().ok_or(GeocodeError::NoResults)?;
    let Geometry { lat, lng } = first.geometry;
    MapPoint::try_from_lat_lng_deg(lat, lng)
        .ok_or_else(|| GeocodeError::MalformedResponse(format!("coordinates out of range: {lat},{lng}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_result_payload() {
        let body: GeocodeResponse = serde_json::from_str(
            r#"{
                "results": [
                    {
                        "confidence": 9,
                        "formatted": "Avenida Carlos Pellegrini 1500, Rosario, Argentina",
                        "geometry": { "lat": -32.953843, "lng": -60.650631 }
                    }
                ],
                "status": { "code": 200, "message": "OK" }
            }"#,
        )
        .unwrap();
        let pos = first_position(body).unwrap();
        assert_eq!(pos.to_lat_lng_deg(), (-32.953843, -60.650631));
    }

    #[test]
    fn empty_results_fail_with_no_results() {
        let body: GeocodeResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(matches!(
            first_position(body),
            Err(GeocodeError::NoResults)
        ));
    }

    #[test]
    fn out_of_range_coordinates_are_malformed() {
        let body: GeocodeResponse = serde_json::from_str(
            r#"{"results": [{"geometry": {"lat": -132.0, "lng": -60.6}}]}"#,
        )
        .unwrap();
        assert!(matches!(
            first_position(body),
            Err(GeocodeError::MalformedResponse(_))
        ));
    }
}

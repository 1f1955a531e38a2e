use std::{cell::RefCell, time::Duration};

use serde::Deserialize;

use geoavp_core::gateways::geocode::{GeocodeError, GeocodingGateway};
use geoavp_entities::geo::MapPoint;

const TOKEN_URL: &str = "https://www.arcgis.com/sharing/rest/generateToken";
const GEOCODE_URL: &str =
    "https://geocode-api.arcgis.com/arcgis/rest/services/World/GeocodeServer/findAddressCandidates";
const REFERER: &str = "https://www.arcgis.com";
const TOKEN_EXPIRATION_MIN: &str = "120";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Secondary geocoding provider (ESRI ArcGIS world geocoder).
///
/// A session token is requested once per run with the account
/// credentials; if that fails the configured API key is used as the
/// request token instead.
pub struct Esri {
    username: String,
    password: String,
    api_key: String,
    client: reqwest::blocking::Client,
    token: RefCell<Option<String>>,
}

impl Esri {
    pub fn new(username: String, password: String, api_key: String) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            username,
            password,
            api_key,
            client,
            token: RefCell::new(None),
        })
    }

    fn token(&self) -> String {
        if let Some(token) = self.token.borrow().as_ref() {
            return token.clone();
        }
        let token = match self.request_token() {
            Ok(token) => token,
            Err(err) => {
                log::debug!("Could not obtain an ArcGIS session token: {err}");
                self.api_key.clone()
            }
        };
        *self.token.borrow_mut() = Some(token.clone());
        token
    }

    fn request_token(&self) -> Result<String, GeocodeError> {
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
                ("referer", REFERER),
                ("expiration", TOKEN_EXPIRATION_MIN),
                ("f", "json"),
            ])
            .send()
            .map_err(|err| GeocodeError::Provider(err.to_string()))?;
        let body: TokenResponse = response
            .json()
            .map_err(|err| GeocodeError::MalformedResponse(err.to_string()))?;
        body.token
            .ok_or_else(|| GeocodeError::Provider("token response without token".to_string()))
    }
}

impl GeocodingGateway for Esri {
    fn resolve_query_lat_lng(&self, query: &str) -> Result<MapPoint, GeocodeError> {
        let token = self.token();
        let response = self
            .client
            .get(GEOCODE_URL)
            .query(&[
                ("singleLine", query),
                ("maxLocations", "1"),
                ("outFields", "none"),
                ("token", token.as_str()),
                ("f", "json"),
            ])
            .send()
            .map_err(|err| GeocodeError::Provider(err.to_string()))?;
        if !response.status().is_success() {
            return Err(GeocodeError::Provider(format!(
                "response status: {}",
                response.status()
            )));
        }
        let body: CandidatesResponse = response
            .json()
            .map_err(|err| GeocodeError::MalformedResponse(err.to_string()))?;
        first_position(body)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidatesResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    location: Location,
}

// ArcGIS responses carry the longitude as `x` and the latitude as `y`.
#[derive(Debug, Deserialize)]
struct Location {
    x: f64,
    y: f64,
}

fn first_position(body: CandidatesResponse) -> Result<MapPoint, GeocodeError> {
    let first = body
        .candidates
        .into_iter()
        .next()
        .ok_or(GeocodeError::NoResults)?;
    let Location { x, y } = first.location;
    MapPoint::try_from_lat_lng_deg(y, x)
        .ok_or_else(|| GeocodeError::MalformedResponse(format!("coordinates out of range: {y},{x}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_candidates_payload() {
        let body: CandidatesResponse = serde_json::from_str(
            r#"{
                "spatialReference": { "wkid": 4326 },
                "candidates": [
                    {
                        "address": "Bulevar Nicasio Oroño 100, Rosario",
                        "location": { "x": -60.654221, "y": -32.939731 },
                        "score": 98.1
                    }
                ]
            }"#,
        )
        .unwrap();
        let pos = first_position(body).unwrap();
        assert_eq!(pos.to_lat_lng_deg(), (-32.939731, -60.654221));
    }

    #[test]
    fn empty_candidates_fail_with_no_results() {
        let body: CandidatesResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(first_position(body), Err(GeocodeError::NoResults)));
    }

    #[test]
    fn token_errors_come_without_token() {
        let body: TokenResponse = serde_json::from_str(
            r#"{"error": {"code": 400, "message": "Unable to generate token."}}"#,
        )
        .unwrap();
        assert!(body.token.is_none());
    }
}

use geoavp_entities::geo::MapPoint;
use thiserror::Error;

/// A per-record geocoding failure. Never aborts a batch: the caller
/// logs it at debug level and leaves the record's coordinates missing.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("the provider returned no results")]
    NoResults,
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("provider request failed: {0}")]
    Provider(String),
}

pub trait GeocodingGateway {
    fn resolve_query_lat_lng(&self, query: &str) -> Result<MapPoint, GeocodeError>;
}

use geoavp_entities::{geo::MapPoint, record::RecordId};
use thiserror::Error;

/// A single marker on the verification map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub id: RecordId,
    /// Popup text, `"<id>: <original address>"`.
    pub label: String,
    pub pos: MapPoint,
    /// Marked as wrongly geocoded by the operator.
    pub flagged: bool,
}

#[derive(Debug, Error)]
pub enum RenderError {
    // Records without coordinates must be filtered out before they
    // reach the renderer; this is an invariant violation.
    #[error("record {0} has no coordinates to render")]
    MissingCoordinates(String),
    #[error("could not render the map template: {0}")]
    Template(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub trait MapGateway {
    /// Rewrites the viewable map artifact with one marker per record.
    fn render_markers(&self, markers: &[MapMarker]) -> Result<(), RenderError>;
}

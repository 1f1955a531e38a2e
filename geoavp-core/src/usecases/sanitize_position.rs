use lazy_static::lazy_static;

use geoavp_entities::geo::MapPoint;

// Low-confidence default location some providers return instead of
// failing when they cannot resolve a query.
const GENERIC_FALLBACK_LAT_DEG: f64 = -32.946_820;
const GENERIC_FALLBACK_LNG_DEG: f64 = -60.639_32;
const GENERIC_EPSILON_DEG: f64 = 1e-6;

lazy_static! {
    static ref GENERIC_FALLBACK_POS: MapPoint =
        MapPoint::try_from_lat_lng_deg(GENERIC_FALLBACK_LAT_DEG, GENERIC_FALLBACK_LNG_DEG)
            .expect("valid generic fallback coordinates");
}

/// Discards results at the provider's generic fallback location.
///
/// Such results are indistinguishable from failures downstream: both
/// leave the record's coordinates missing.
pub fn sanitize_position(pos: MapPoint) -> Option<MapPoint> {
    if pos.is_close_to(*GENERIC_FALLBACK_POS, GENERIC_EPSILON_DEG) {
        None
    } else {
        Some(pos)
    }
}

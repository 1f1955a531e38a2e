const LAT_DEG_MIN: f64 = -90.0;
const LAT_DEG_MAX: f64 = 90.0;
const LNG_DEG_MIN: f64 = -180.0;
const LNG_DEG_MAX: f64 = 180.0;

/// A geographical position on a (flat) map in decimal degrees.
///
/// Invariant: both components are finite and within the valid
/// latitude/longitude ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    lat: f64,
    lng: f64,
}

impl MapPoint {
    pub fn try_from_lat_lng_deg(lat: f64, lng: f64) -> Option<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        if !(LAT_DEG_MIN..=LAT_DEG_MAX).contains(&lat) {
            return None;
        }
        if !(LNG_DEG_MIN..=LNG_DEG_MAX).contains(&lng) {
            return None;
        }
        Some(Self { lat, lng })
    }

    pub const fn lat(self) -> f64 {
        self.lat
    }

    pub const fn lng(self) -> f64 {
        self.lng
    }

    pub fn to_lat_lng_deg(self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    /// Component-wise closeness test, used to detect sentinel positions
    /// that providers return for unresolvable queries.
    pub fn is_close_to(self, other: MapPoint, epsilon_deg: f64) -> bool {
        (self.lat - other.lat).abs() <= epsilon_deg && (self.lng - other.lng).abs() <= epsilon_deg
    }
}

impl std::fmt::Display for MapPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

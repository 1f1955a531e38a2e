/// Which geocoding provider ultimately supplied a record's coordinates.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Provenance {
    #[default]
    Unresolved,
    OpenCage,
    Esri,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn lowercase_tags() {
        assert_eq!(Provenance::Unresolved.to_string(), "unresolved");
        assert_eq!(Provenance::OpenCage.to_string(), "opencage");
        assert_eq!(Provenance::Esri.to_string(), "esri");
    }

    #[test]
    fn parse_tags() {
        assert_eq!(
            Provenance::from_str("opencage").unwrap(),
            Provenance::OpenCage
        );
        assert!(Provenance::from_str("google").is_err());
    }
}

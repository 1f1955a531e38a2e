use std::{borrow::Borrow, fmt, str::FromStr};

use crate::{geo::MapPoint, provenance::Provenance};

/// Stable public identifier of a single incident record.
///
/// Ids are numeric strings of a fixed width that is equal across a
/// batch (year + month + zero-padded row id).
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RecordId(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseRecordIdError {
    #[error("record ids must not be empty")]
    Empty,
    #[error("record ids must contain digits only")]
    NotNumeric,
}

impl RecordId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for RecordId {
    type Err = ParseRecordIdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseRecordIdError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseRecordIdError::NotNumeric);
        }
        Ok(Self(s.to_owned()))
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        self.as_ref()
    }
}

impl From<RecordId> for String {
    fn from(from: RecordId) -> Self {
        from.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str(self.as_ref())
    }
}

/// A single incident record as it moves through the pipeline.
///
/// Created once from an input row and never deleted; normalization sets
/// the query, the geocoding/verification stages set or clear the
/// position and provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    /// The address as it appeared in the input (`direccion_orig`).
    pub raw_address: Option<String>,
    /// The normalized geocoding query (`direccion_avp`).
    pub query: Option<String>,
    pub pos: Option<MapPoint>,
    pub provenance: Provenance,
}

impl Record {
    pub fn new(id: RecordId, raw_address: Option<String>) -> Self {
        Self {
            id,
            raw_address,
            query: None,
            pos: None,
            provenance: Provenance::Unresolved,
        }
    }

    pub fn has_address(&self) -> bool {
        self.raw_address
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty())
    }

    /// Drops the coordinates again, e.g. after an operator rejection or
    /// a generic-coordinate discard.
    pub fn clear_pos(&mut self) {
        self.pos = None;
        self.provenance = Provenance::Unresolved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_record_id() {
        assert!("2023060001".parse::<RecordId>().is_ok());
        assert_eq!(
            "".parse::<RecordId>().unwrap_err(),
            ParseRecordIdError::Empty
        );
        assert_eq!(
            "20230x0001".parse::<RecordId>().unwrap_err(),
            ParseRecordIdError::NotNumeric
        );
        assert_eq!(
            "-123".parse::<RecordId>().unwrap_err(),
            ParseRecordIdError::NotNumeric
        );
    }

    #[test]
    fn blank_address_counts_as_missing() {
        let id = "2023060001".parse().unwrap();
        let r = Record::new(id, Some("   ".into()));
        assert!(!r.has_address());
    }

    #[test]
    fn clear_pos_resets_provenance() {
        let id = "2023060001".parse().unwrap();
        let mut r = Record::new(id, Some("urquiza 1200".into()));
        r.pos = MapPoint::try_from_lat_lng_deg(-32.9, -60.7);
        r.provenance = Provenance::OpenCage;
        r.clear_pos();
        assert!(r.pos.is_none());
        assert_eq!(r.provenance, Provenance::Unresolved);
    }
}

mod error;
mod normalize_addresses;
mod sanitize_position;
mod verify_geocoding;

pub use self::{
    error::Error, normalize_addresses::*, sanitize_position::*, verify_geocoding::*,
};

//! # geoavp-core
//!
//! Gateway abstractions and usecases of the AVP geocoding pipeline:
//! address normalization, coordinate sanitation and the interactive
//! verification loop. Everything here is synchronous and free of I/O;
//! concrete gateways live in `geoavp-gateways`.

pub mod gateways;
pub mod usecases;

pub use geoavp_entities as entities;

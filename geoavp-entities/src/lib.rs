#![deny(missing_debug_implementations)]
#![cfg_attr(test, deny(warnings))]

//! # geoavp-entities
//!
//! Agnostic domain entities for the AVP geocoding pipeline.
//!
//! The entities only contain generic functionality that does not reveal any
//! application-specific business logic.

pub mod geo;
pub mod provenance;
pub mod record;

//! # geoavp-gateways
//!
//! Concrete implementations of the gateway traits declared in
//! `geoavp-core`: the two geocoding providers, the HTML map renderer
//! and the operator console.

pub mod console;
pub mod esri;
pub mod leaflet;
pub mod opencage;

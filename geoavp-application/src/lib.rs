//! # geoavp-application
//!
//! The fallback orchestrator that sequences normalization, the two
//! provider stages and their verification sessions, plus the CSV
//! dataset adapter that feeds and persists a run.

mod dataset;
mod geocode_batch;

pub mod error;

pub use self::{dataset::*, geocode_batch::*};

pub type Result<T> = std::result::Result<T, error::AppError>;

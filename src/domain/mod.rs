//! Domain layer for the enrichment loop
//!
//! This module contains the candidate models, the error type, and the port
//! traits the pipeline depends on.

pub mod error;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use error::{EnrichmentError, EnrichmentResult};

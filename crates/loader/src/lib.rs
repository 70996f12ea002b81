//! # Fundpipe Observation Loader
//!
//! This crate reads heterogeneously-formatted source files and normalizes
//! them into the canonical records the metric engine consumes. It is the
//! system's only reader of raw input.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Adapter:** This crate is an adapter that encapsulates all
//!   source-format knowledge (delimiters, header names, JSON shapes). The
//!   rest of the application only ever sees `FundMetadata` and
//!   `FundObservation`.
//! - **Validate At The Boundary:** Malformed rows, non-integral months,
//!   duplicate periods and duplicate fund ids are rejected here, before they
//!   can reach the engine. The engine receives each fund's observations
//!   already sorted ascending by period key.
//!
//! ## Public API
//!
//! - `load_metadata`: Reads the pipe-delimited fund metadata file.
//! - `load_observations`: Reads the per-fund series sources (CSV or JSON)
//!   and partitions them by fund id.
//! - `SeriesSource` / `SeriesFormat`: Describe one per-fund input file.
//! - `LoaderError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod metadata;
pub mod series;

// Re-export the key components to create a clean, public-facing API.
pub use error::LoaderError;
pub use metadata::load_metadata;
pub use series::{load_observations, SeriesFormat, SeriesSource};

//! # Fundpipe Metric Engine
//!
//! This crate derives the monthly performance metrics for a fund from its
//! ordered price/dividend history. It acts as the computational core of the
//! pipeline.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Per-Fund Reduction:** The `MetricsEngine` folds one fund's ordered
//!   observation stream into `PerformanceRecord`s. State never crosses fund
//!   boundaries, so callers are free to run funds concurrently.
//!
//! ## Public API
//!
//! - `MetricsEngine`: The main struct that contains the calculation logic.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;

// Re-export the key components to create a clean, public-facing API.
pub use engine::MetricsEngine;
pub use error::AnalyticsError;

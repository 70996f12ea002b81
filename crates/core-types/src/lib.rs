pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use structs::{FundMetadata, FundObservation, PerformanceRecord, NOMINAL_INITIAL_PRICE};

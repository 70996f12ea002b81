//! # Fundpipe Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database. It is the pipeline's storage sink.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate is an adapter that encapsulates all database-specific
//!   logic. It provides a clean, abstract API to the rest of the application, hiding
//!   the underlying SQL and database implementation details. Its only contract with
//!   the core is the shape of `FundMetadata` and `PerformanceRecord`.
//! - **Atomic Writes:** Each collection is written inside a single transaction, so a
//!   sink failure rolls back cleanly and never partially persists the engine's output.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses a
//!   connection pool (`PgPool`) for high-performance database access.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: A utility to apply database migrations, ensuring the schema is up-to-date.
//! - `DbRepository`: The main struct that holds the connection pool and provides all
//!   the high-level data access methods (e.g., `save_performance_records`).
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;

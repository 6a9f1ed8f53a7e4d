//! Test suite for catalog-gateway
//!
//! ## Test Categories
//!
//! ### 1. Common Utilities (`common/`)
//! - In-memory SQLite database helpers
//! - Record fixtures and engine factories
//!
//! ### 2. Integration Tests (`integration/`)
//! - SeaORM store adapter against a migrated SQLite database
//! - Batch engine over the SQLite store and the in-process cache
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all tests
//! cargo test
//!
//! # Run only unit tests
//! cargo test --lib
//!
//! # Run integration tests
//! cargo test --test lib
//! ```

pub mod common;
pub mod integration;

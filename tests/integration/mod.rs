//! Integration tests for catalog-gateway
//!
//! These tests run the store adapter and the batch engine against a real in-memory SQLite
//! database, without mocks.

pub mod batch_engine_tests;
pub mod database_tests;

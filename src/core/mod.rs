//! Core functionality for the Gateway
//!
//! This module contains the record model, the adapter traits, the batch engine and the audit
//! event sink.

pub mod audit;
pub mod batch;
pub mod models;
pub mod traits;

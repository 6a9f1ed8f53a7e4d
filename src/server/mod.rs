//! HTTP server implementation
//!
//! This module provides the HTTP server and the batch routes.

pub mod routes;
pub mod server;
pub mod state;
mod utils;

pub use server::HttpServer;
pub use state::AppState;

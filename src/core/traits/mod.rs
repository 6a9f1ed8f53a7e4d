//! Core traits module
//!
//! Collaborator interfaces the batch engine depends on. Concrete adapters live in
//! `crate::storage` and `crate::core::audit`.

pub mod cache;
pub mod events;
pub mod store;

pub use cache::*;
pub use events::*;
pub use store::*;

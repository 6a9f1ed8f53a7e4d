//! Batch processing for user records
//!
//! Chunked create, lookup, update and soft-delete with per-item failure reporting, plus the
//! chunk planner, validation stage and generic chunk processors they are built from.

pub mod chunking;
mod engine;
pub mod processor;
mod types;
pub mod validation;


// Re-export all public types
pub use chunking::{ChunkPlanner, split};
pub use engine::{BatchEngine, WarmupReport};
pub use processor::{process_chunks_bounded, process_in_chunks};
pub use types::{
    ALREADY_EXISTS, BatchOperationResult, BatchOptionsRequest, BatchProcessingOptions, BatchStats,
    CONFLICT, CREDENTIAL_POLICY_VIOLATION, DUPLICATE_IN_REQUEST, EMPTY_UPDATE, FailedItem,
    FailurePolicy, INVALID_ID_FORMAT, NOT_FOUND, processing_stopped,
};
pub use validation::{NewUserValidator, UserPatchValidator, ValidationResult, Validator, parse_id};

//! Record cache adapters
//!
//! - `memory` - In-process cache backed by moka, with TTL and capacity bounds
//! - `noop` - Cache that never hits, used when caching is disabled

mod memory;
mod noop;

pub use memory::MokaRecordCache;
pub use noop::NoopCache;

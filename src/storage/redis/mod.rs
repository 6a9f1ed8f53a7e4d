//! Redis record cache
//!
//! - `pool` - Connection management, health checks and URL sanitizing
//! - `records` - Record cache over MGET, pipelined SET EX and DEL

mod pool;
mod records;
#[cfg(test)]
mod tests;

pub use pool::{RedisConnection, RedisPool};
pub use records::RedisRecordCache;

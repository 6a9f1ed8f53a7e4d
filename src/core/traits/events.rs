//! Side-effect emitter

use crate::core::models::UserEvent;
use crate::utils::error::Result;

/// Fire-and-forget sink for audit and security events.
///
/// `emit` must not block; an `Err` means the event was dropped and callers only log it.
#[cfg_attr(test, mockall::automock)]
pub trait EventEmitter: Send + Sync {
    fn emit(&self, event: UserEvent) -> Result<()>;
}

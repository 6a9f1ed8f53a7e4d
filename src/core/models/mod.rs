//! Core data models for the Gateway
//!
//! This module defines all the core data structures used throughout the gateway.

pub mod events;
pub mod user;

// Re-export commonly used types
pub use events::{UserEvent, UserEventKind};
pub use user::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Common metadata for all models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Unique identifier
    pub id: Uuid,
    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last update timestamp
    pub updated_at: chrono::DateTime<chrono::Utc>,
    /// Version for optimistic locking
    pub version: i64,
}

impl Default for Metadata {
    fn default() -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }
}

impl Metadata {
    /// Create new metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the timestamp and increment version
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
        self.version += 1;
    }
}

/// One page of a keyset-paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records in ascending id order
    pub items: Vec<T>,
    /// Id to pass as `after` for the next page; `None` once the listing is exhausted
    pub next_cursor: Option<Uuid>,
}

impl<T> Page<T> {
    /// Build a page, deriving the cursor from the last item when the page is full
    pub fn from_items(items: Vec<T>, limit: usize, id_of: impl Fn(&T) -> Uuid) -> Self {
        let next_cursor = if limit > 0 && items.len() >= limit {
            items.last().map(id_of)
        } else {
            None
        };
        Self { items, next_cursor }
    }

    /// An empty, exhausted page
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_touch_bumps_version() {
        let mut metadata = Metadata::new();
        let created = metadata.updated_at;
        metadata.touch();
        assert_eq!(metadata.version, 2);
        assert!(metadata.updated_at >= created);
    }

    #[test]
    fn test_page_cursor_only_when_full() {
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

        let full = Page::from_items(ids.clone(), 3, |id| *id);
        assert_eq!(full.next_cursor, Some(ids[2]));

        let partial = Page::from_items(ids[..2].to_vec(), 3, |id| *id);
        assert_eq!(partial.next_cursor, None);

        let empty: Page<Uuid> = Page::empty();
        assert!(empty.items.is_empty());
    }
}

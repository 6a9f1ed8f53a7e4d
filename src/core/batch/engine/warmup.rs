//! Cache warm-up

use super::BatchEngine;
use crate::core::batch::types::BatchProcessingOptions;
use crate::utils::error::Result;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of a warm-up pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WarmupReport {
    /// Pages read from the store
    pub pages: usize,
    /// Records read from the store
    pub records: usize,
    /// Pages whose cache write failed
    pub cache_failures: usize,
}

impl BatchEngine {
    /// Page through every active record and load it into the cache.
    ///
    /// Store errors stop the pass and are returned; cache errors are counted and skipped.
    pub async fn warm_cache(&self, options: &BatchProcessingOptions) -> Result<WarmupReport> {
        let start = Instant::now();
        let mut report = WarmupReport::default();
        let mut after = None;

        loop {
            let page = self.store.list_page(after, options.chunk_size()).await?;
            if page.items.is_empty() {
                break;
            }

            report.pages += 1;
            report.records += page.items.len();

            if let Err(e) = self.cache.multi_set(&page.items).await {
                warn!(page = report.pages, error = %e, "Cache warm-up write failed");
                report.cache_failures += 1;
            }

            match page.next_cursor {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        info!(
            pages = report.pages,
            records = report.records,
            cache_failures = report.cache_failures,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Cache warm-up finished"
        );
        Ok(report)
    }
}

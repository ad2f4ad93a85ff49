//! Memoized block summaries, kept outside the block data.
//!
//! Entries are keyed by [`BlockKey`] and carry a fingerprint of the block
//! they were computed from; a summary whose block has since changed is not
//! returned.

use crate::types::block::ActivityBlock;
use crate::types::daily::DailyReport;
use crate::types::summary::ShadowAuditSummary;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockKey(String);

impl BlockKey {
    /// The block's own id, or its position within the report. Reports
    /// without an id are told apart by the file they came from.
    pub fn for_block(report: &DailyReport, index: usize, block: &ActivityBlock) -> Self {
        if let Some(id) = &block.id {
            return Self(id.clone());
        }
        let owner = report
            .id
            .as_deref()
            .or(report.source.as_deref())
            .unwrap_or("report");
        Self(format!("{owner}#{index}"))
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SHA-256 of the block's serialized content.
pub fn fingerprint(block: &ActivityBlock) -> String {
    let bytes = serde_json::to_vec(block).unwrap_or_default();
    let digest = Sha256::digest(&bytes);
    format!("{digest:x}")
}

#[derive(Debug, Clone)]
struct CachedSummary {
    fingerprint: String,
    summary: ShadowAuditSummary,
}

#[derive(Debug, Clone, Default)]
pub struct SummaryCache {
    entries: HashMap<BlockKey, CachedSummary>,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: BlockKey, block: &ActivityBlock, summary: ShadowAuditSummary) {
        self.entries.insert(
            key,
            CachedSummary {
                fingerprint: fingerprint(block),
                summary,
            },
        );
    }

    /// The cached summary for `key`, provided `block` is unchanged since it
    /// was stored.
    pub fn get(&self, key: &BlockKey, block: &ActivityBlock) -> Option<&ShadowAuditSummary> {
        let cached = self.entries.get(key)?;
        if cached.fingerprint == fingerprint(block) {
            Some(&cached.summary)
        } else {
            tracing::debug!(block = %key, "cached summary is stale; recomputing");
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

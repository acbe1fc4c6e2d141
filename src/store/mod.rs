//! Read-side storage abstraction for the report pipeline.
//!
//! The [`SightingStore`] trait is the only way the aggregator touches the
//! relational store, so the pipeline can run against SQLite in production
//! and against [`memory::InMemoryStore`] in tests.
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`periods`](SightingStore::periods) | All reporting periods, oldest first |
//! | [`active_rows`](SightingStore::active_rows) | Sighting rows for one period |
//! | [`vacant_locations`](SightingStore::vacant_locations) | Anti-join: locations without a row |
//! | [`alternate_names`](SightingStore::alternate_names) | Visible alternate names per location |

pub mod memory;
pub mod sqlite;

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{LocationRow, ReportingPeriod, SightingRow};

#[async_trait]
pub trait SightingStore: Send + Sync {
    /// All reporting periods ordered by date ascending.
    async fn periods(&self) -> Result<Vec<ReportingPeriod>>;

    async fn active_rows(&self, period_num: i64) -> Result<Vec<SightingRow>>;

    async fn vacant_locations(&self, period_num: i64) -> Result<Vec<LocationRow>>;

    async fn alternate_names(&self) -> Result<AltNameIndex>;
}

/// Synchronous alternate-name lookup used while projecting rows.
pub trait AltNameLookup {
    fn alternate_names(&self, location_id: i64) -> Vec<String>;
}

/// Alternate names grouped by location, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AltNameIndex {
    names: HashMap<i64, Vec<String>>,
}

impl AltNameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location_id: i64, name: impl Into<String>) {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.names
            .entry(location_id)
            .or_default()
            .push(name.to_string());
    }

    pub fn len(&self) -> usize {
        self.names.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl AltNameLookup for AltNameIndex {
    fn alternate_names(&self, location_id: i64) -> Vec<String> {
        self.names.get(&location_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alt_index_skips_blank_and_keeps_order() {
        let mut index = AltNameIndex::new();
        index.insert(7, "Riverside");
        index.insert(7, "  ");
        index.insert(7, "The Flats ");
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.alternate_names(7),
            vec!["Riverside".to_string(), "The Flats".to_string()]
        );
        assert!(index.alternate_names(8).is_empty());
    }
}

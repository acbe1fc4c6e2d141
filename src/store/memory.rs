//! In-memory [`SightingStore`] for tests.
//!
//! Holds periods, location rows, sightings keyed by period, and alternate
//! names. The vacancy set is computed the same way the SQL anti-join does:
//! every location without a sighting for the period.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::models::{LocationRow, ReportingPeriod, SightingRow};

use super::{AltNameIndex, SightingStore};

#[derive(Default)]
pub struct InMemoryStore {
    periods: Vec<ReportingPeriod>,
    locations: BTreeMap<i64, LocationRow>,
    sightings: BTreeMap<i64, Vec<SightingRow>>,
    alternates: Vec<(i64, String)>,
    unreachable: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every read fails, like a missing database file.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn add_period(&mut self, period: ReportingPeriod) {
        self.periods.push(period);
        self.periods.sort_by_key(|p| p.date);
    }

    pub fn add_location(&mut self, location: LocationRow) {
        self.locations.insert(location.location_id, location);
    }

    /// Record a sighting; location columns are taken from the row itself.
    pub fn add_sighting(&mut self, period_num: i64, row: SightingRow) {
        self.sightings.entry(period_num).or_default().push(row);
    }

    pub fn add_alternate(&mut self, location_id: i64, name: &str) {
        self.alternates.push((location_id, name.to_string()));
    }

    fn check(&self) -> Result<()> {
        if self.unreachable {
            bail!("store unreachable");
        }
        Ok(())
    }
}

#[async_trait]
impl SightingStore for InMemoryStore {
    async fn periods(&self) -> Result<Vec<ReportingPeriod>> {
        self.check()?;
        Ok(self.periods.clone())
    }

    async fn active_rows(&self, period_num: i64) -> Result<Vec<SightingRow>> {
        self.check()?;
        Ok(self.sightings.get(&period_num).cloned().unwrap_or_default())
    }

    async fn vacant_locations(&self, period_num: i64) -> Result<Vec<LocationRow>> {
        self.check()?;
        let active = self.sightings.get(&period_num);
        Ok(self
            .locations
            .values()
            .filter(|loc| {
                !active
                    .map(|rows| rows.iter().any(|r| r.location_id == loc.location_id))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn alternate_names(&self) -> Result<AltNameIndex> {
        self.check()?;
        let mut index = AltNameIndex::new();
        for (location_id, name) in &self.alternates {
            index.insert(*location_id, name.as_str());
        }
        Ok(index)
    }
}

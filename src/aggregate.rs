//! Aggregation of one reporting period into grouped views.
//!
//! Builds three derived views from the flat rows:
//!
//! - [`AggregatedView::active`]: geography → display name → [`Sighting`]
//! - [`AggregatedView::vacant`]: geography → display name → [`Vacancy`]
//! - [`SpeciesSummary`]: species label → location → status, plus a
//!   per-species notable marker
//!
//! Maps are `BTreeMap`s so every downstream iteration is already in
//! report order.

use std::collections::BTreeMap;

use crate::error::ReportError;
use crate::models::{Confirmation, GeoKey, LocationRow, ReportingPeriod, Sighting, SightingRow, Vacancy};
use crate::project::{project, project_vacancy};
use crate::store::{AltNameLookup, SightingStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedView {
    pub active: BTreeMap<GeoKey, BTreeMap<String, Sighting>>,
    pub vacant: BTreeMap<GeoKey, BTreeMap<String, Vacancy>>,
}

impl AggregatedView {
    pub fn active_count(&self) -> usize {
        self.active.values().map(BTreeMap::len).sum()
    }

    pub fn vacant_count(&self) -> usize {
        self.vacant.values().map(BTreeMap::len).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryStatus {
    pub confirmation: Confirmation,
    pub restricted: bool,
}

/// Every location one species was seen at this period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesEntry {
    pub locations: BTreeMap<String, SummaryStatus>,
    pub notable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesSummary {
    pub species: BTreeMap<String, SpeciesEntry>,
}

impl SpeciesSummary {
    pub fn record(&mut self, sighting: &Sighting) {
        let entry = self.species.entry(sighting.label.clone()).or_default();
        entry.locations.insert(
            sighting.display_name().to_string(),
            SummaryStatus {
                confirmation: sighting.confirmation,
                restricted: sighting.restricted,
            },
        );
        if sighting.is_notable() {
            entry.notable = true;
        }
    }

    pub fn get(&self, label: &str) -> Option<&SpeciesEntry> {
        self.species.get(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpeciesEntry)> {
        self.species.iter()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub view: AggregatedView,
    pub summary: SpeciesSummary,
    /// Rows dropped as malformed.
    pub skipped: usize,
}

/// Query the store for one period and aggregate it.
pub async fn aggregate(
    store: &dyn SightingStore,
    period: &ReportingPeriod,
    notable_label: &str,
) -> Result<Aggregation, ReportError> {
    let rows = store
        .active_rows(period.num)
        .await
        .map_err(ReportError::lookup)?;
    let vacancies = store
        .vacant_locations(period.num)
        .await
        .map_err(ReportError::lookup)?;
    let alternates = store
        .alternate_names()
        .await
        .map_err(ReportError::lookup)?;

    tracing::debug!(
        period = %period.date,
        active_rows = rows.len(),
        vacant_rows = vacancies.len(),
        alternate_names = alternates.len(),
        "loaded period rows"
    );

    let lookup = (!alternates.is_empty()).then_some(&alternates as &dyn AltNameLookup);
    Ok(build(&rows, &vacancies, lookup, notable_label))
}

/// Aggregate already-fetched rows. Later rows for the same geography and
/// display name replace earlier ones.
pub fn build(
    rows: &[SightingRow],
    vacancies: &[LocationRow],
    alternates: Option<&dyn AltNameLookup>,
    notable_label: &str,
) -> Aggregation {
    let mut agg = Aggregation::default();

    for row in rows {
        match project(row, alternates, notable_label) {
            Ok(sighting) => {
                agg.summary.record(&sighting);
                agg.view
                    .active
                    .entry(sighting.geo())
                    .or_default()
                    .insert(sighting.display_name().to_string(), sighting);
            }
            Err(e) => skip(&mut agg, e),
        }
    }

    for row in vacancies {
        match project_vacancy(row) {
            Ok(vacancy) => {
                agg.view
                    .vacant
                    .entry(vacancy.geo.clone())
                    .or_default()
                    .insert(vacancy.name.clone(), vacancy);
            }
            Err(e) => skip(&mut agg, e),
        }
    }

    agg
}

fn skip(agg: &mut Aggregation, err: ReportError) {
    tracing::warn!("skipping row: {}", err);
    agg.skipped += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;
    use crate::store::memory::InMemoryStore;
    use chrono::NaiveDate;

    fn sighting_row(id: i64, name: &str, species: &str, sub: Option<&str>, area: Option<&str>) -> SightingRow {
        SightingRow {
            location_id: id,
            species: Some(species.to_string()),
            confirmation: Some(1),
            official_name: Some(name.to_string()),
            sub_area: sub.map(str::to_string),
            area: area.map(str::to_string),
            ..Default::default()
        }
    }

    fn location_row(id: i64, name: &str, sub: Option<&str>) -> LocationRow {
        LocationRow {
            location_id: id,
            official_name: Some(name.to_string()),
            sub_area: sub.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_grouping_uses_three_tier_key() {
        let rows = vec![
            sighting_row(1, "Elm Park", "Pikachu", Some("Elmwood"), Some("North")),
            sighting_row(2, "Pine Park", "Eevee", Some("Pinecrest"), None),
            sighting_row(3, "Lost Park", "Ditto", None, Some("North")),
        ];
        let agg = build(&rows, &[], None, "Legendary");
        let keys: Vec<&GeoKey> = agg.view.active.keys().collect();
        assert_eq!(
            keys,
            vec![
                &GeoKey::Known("North".to_string()),
                &GeoKey::KnownSubAreaOnly("Pinecrest".to_string()),
                &GeoKey::Unknown,
            ]
        );
    }

    #[test]
    fn test_duplicate_geography_and_name_last_write_wins() {
        let rows = vec![
            sighting_row(1, "Elm Park", "Pikachu", Some("Elmwood"), Some("North")),
            sighting_row(1, "Elm Park", "Eevee", Some("Elmwood"), Some("North")),
        ];
        let agg = build(&rows, &[], None, "Legendary");
        let north = &agg.view.active[&GeoKey::Known("North".to_string())];
        assert_eq!(north.len(), 1);
        assert_eq!(north["Elm Park"].label, "Eevee");
    }

    #[test]
    fn test_grouping_stable_under_permutation() {
        let rows = vec![
            sighting_row(1, "Elm Park", "Pikachu", Some("Elmwood"), Some("North")),
            sighting_row(2, "Pine Park", "Eevee", Some("Pinecrest"), None),
            sighting_row(3, "Oak Park", "Pikachu", Some("Oakdale"), Some("North")),
            sighting_row(4, "Lost Park", "Ditto", None, None),
        ];
        let vacancies = vec![
            location_row(5, "Birch Field", Some("Elmwood")),
            location_row(6, "Cedar Lot", None),
        ];
        let forward = build(&rows, &vacancies, None, "Legendary");

        let mut rev_rows = rows.clone();
        rev_rows.reverse();
        let mut rev_vac = vacancies.clone();
        rev_vac.reverse();
        let backward = build(&rev_rows, &rev_vac, None, "Legendary");

        assert_eq!(forward.view, backward.view);
        assert_eq!(forward.summary, backward.summary);
    }

    #[test]
    fn test_summary_spans_locations_and_marks_notable() {
        let mut legendary = sighting_row(2, "Oak Park", "Mewtwo", Some("Oakdale"), Some("North"));
        legendary.category_type = Some("Legendary".to_string());
        legendary.confirmation = None;
        let rows = vec![
            sighting_row(1, "Elm Park", "Mewtwo", Some("Elmwood"), Some("North")),
            legendary,
            sighting_row(3, "Pine Park", "Eevee", Some("Pinecrest"), None),
        ];
        let agg = build(&rows, &[], None, "Legendary");

        let mewtwo = agg.summary.get("Mewtwo").unwrap();
        assert!(mewtwo.notable);
        assert_eq!(mewtwo.locations.len(), 2);
        assert_eq!(
            mewtwo.locations["Oak Park"].confirmation,
            Confirmation::Unconfirmed
        );
        assert!(!agg.summary.get("Eevee").unwrap().notable);
        assert_eq!(
            agg.view.active[&GeoKey::Known("North".to_string())]["Oak Park"].tag,
            Tag::Notable
        );
    }

    #[test]
    fn test_malformed_rows_are_counted() {
        let mut broken = sighting_row(2, "Oak Park", "Eevee", Some("Oakdale"), None);
        broken.species = None;
        let rows = vec![sighting_row(1, "Elm Park", "Pikachu", Some("Elmwood"), None), broken];
        let vacancies = vec![LocationRow {
            location_id: 9,
            ..Default::default()
        }];
        let agg = build(&rows, &vacancies, None, "Legendary");
        assert_eq!(agg.skipped, 2);
        assert_eq!(agg.view.active_count(), 1);
        assert_eq!(agg.view.vacant_count(), 0);
    }

    fn period(num: i64, day: u32) -> ReportingPeriod {
        ReportingPeriod {
            num,
            date: NaiveDate::from_ymd_opt(2019, 3, day).unwrap(),
            special_note: None,
        }
    }

    #[tokio::test]
    async fn test_aggregate_from_store_uses_anti_join_and_alternates() {
        let mut store = InMemoryStore::new();
        store.add_period(period(1, 7));
        store.add_location(location_row(1, "Elm Park", Some("Elmwood")));
        store.add_location(location_row(2, "Oak Park", Some("Elmwood")));
        store.add_sighting(1, sighting_row(1, "Elm Park", "Pikachu", Some("Elmwood"), None));
        store.add_alternate(1, "Elm Green");

        let agg = aggregate(&store, &period(1, 7), "Legendary").await.unwrap();
        let elmwood = GeoKey::KnownSubAreaOnly("Elmwood".to_string());
        assert_eq!(agg.view.active[&elmwood]["Elm Park"].alternates_joined(), "Elm Green");
        assert_eq!(agg.view.vacant[&elmwood].len(), 1);
        assert!(agg.view.vacant[&elmwood].contains_key("Oak Park"));
    }

    #[tokio::test]
    async fn test_aggregate_reports_lookup_failure() {
        let store = InMemoryStore::unreachable();
        let err = aggregate(&store, &period(1, 7), "Legendary").await.unwrap_err();
        assert!(matches!(err, ReportError::LookupFailure(_)));
    }
}

//! Listing of stored rotations, used by `nests periods`.

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::db;
use crate::models::ReportingPeriod;
use crate::store::sqlite::SqliteStore;
use crate::store::SightingStore;

#[derive(Debug, Clone, Serialize)]
pub struct PeriodOverview {
    #[serde(flatten)]
    pub period: ReportingPeriod,
    pub active: usize,
    pub vacant: usize,
}

pub async fn list_periods(store: &dyn SightingStore) -> Result<Vec<PeriodOverview>> {
    let mut out = Vec::new();
    for period in store.periods().await? {
        let active = store.active_rows(period.num).await?.len();
        let vacant = store.vacant_locations(period.num).await?.len();
        out.push(PeriodOverview {
            period,
            active,
            vacant,
        });
    }
    Ok(out)
}

pub async fn run_periods(config: &Config, json: bool) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    let listed = list_periods(&store).await;
    store.close().await;
    let periods = listed?;

    if json {
        println!("{}", serde_json::to_string_pretty(&periods)?);
        return Ok(());
    }

    if periods.is_empty() {
        println!("No rotations stored. Run `nests rotate` to create one.");
        return Ok(());
    }

    println!("{:>5}  {:<10}  {:>6}  {:>6}  NOTE", "NUM", "DATE", "NESTS", "EMPTY");
    println!("{}", "-".repeat(48));
    for p in &periods {
        println!(
            "{:>5}  {:<10}  {:>6}  {:>6}  {}",
            p.period.num,
            p.period.date,
            p.active,
            p.vacant,
            p.period.special_note.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocationRow, SightingRow};
    use crate::store::memory::InMemoryStore;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_counts_per_period() {
        let mut store = InMemoryStore::new();
        for (num, d) in [(1, 7), (2, 21)] {
            store.add_period(ReportingPeriod {
                num,
                date: NaiveDate::from_ymd_opt(2019, 3, d).unwrap(),
                special_note: None,
            });
        }
        for id in 1..=3 {
            store.add_location(LocationRow {
                location_id: id,
                official_name: Some(format!("Park {}", id)),
                ..Default::default()
            });
        }
        store.add_sighting(
            2,
            SightingRow {
                location_id: 1,
                species: Some("Pikachu".to_string()),
                official_name: Some("Park 1".to_string()),
                ..Default::default()
            },
        );

        let listed = list_periods(&store).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!((listed[0].active, listed[0].vacant), (0, 3));
        assert_eq!((listed[1].active, listed[1].vacant), (1, 2));

        let json = serde_json::to_value(&listed[1]).unwrap();
        assert_eq!(json["date"], "2019-03-21");
        assert_eq!(json["active"], 1);
    }
}

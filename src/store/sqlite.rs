//! SQLite-backed [`SightingStore`].
//!
//! Maps each read to the joins over `species_list`, `nest_locations`,
//! `neighborhoods` (sub-area), `regions` (area), and `species_info`
//! (category lookup).

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use crate::models::{LocationRow, ReportingPeriod, SightingRow};

use super::{AltNameIndex, SightingStore};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SightingStore for SqliteStore {
    async fn periods(&self) -> Result<Vec<ReportingPeriod>> {
        let rows = sqlx::query("SELECT num, date, special_note FROM rotation_dates ORDER BY date ASC, num ASC")
            .fetch_all(&self.pool)
            .await?;

        let mut periods = Vec::with_capacity(rows.len());
        for row in &rows {
            let num: i64 = row.get("num");
            let raw: String = row.get("date");
            match parse_period_date(&raw) {
                Some(date) => periods.push(ReportingPeriod {
                    num,
                    date,
                    special_note: row.get("special_note"),
                }),
                None => tracing::warn!(period = num, date = %raw, "skipping rotation with unparseable date"),
            }
        }
        periods.sort_by_key(|p| p.date);
        Ok(periods)
    }

    async fn active_rows(&self, period_num: i64) -> Result<Vec<SightingRow>> {
        let rows = sqlx::query(
            r#"
            SELECT
                nl.nest_id,
                sl.species_txt,
                sl.confirmation,
                COALESCE(sl.species_no, si.dex) AS category_code,
                nl.official_name,
                nl.short_name,
                nl.notes,
                nl.private,
                n.name AS sub_area,
                r.name AS area,
                si.category_type,
                si.category_subtype
            FROM species_list sl
                JOIN nest_locations nl ON sl.nestid = nl.nest_id
                LEFT OUTER JOIN neighborhoods n ON nl.location = n.id
                LEFT OUTER JOIN regions r ON n.region = r.id
                LEFT OUTER JOIN species_info si ON si.name = sl.species_txt
            WHERE sl.rotation_num = ?
            ORDER BY nl.nest_id
            "#,
        )
        .bind(period_num)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| SightingRow {
                location_id: row.get("nest_id"),
                species: row.get("species_txt"),
                confirmation: row.get("confirmation"),
                official_name: row.get("official_name"),
                short_name: row.get("short_name"),
                notes: row.get("notes"),
                private: row.get("private"),
                sub_area: row.get("sub_area"),
                area: row.get("area"),
                category_code: row.get("category_code"),
                category_type: row.get("category_type"),
                category_subtype: row.get("category_subtype"),
            })
            .collect())
    }

    async fn vacant_locations(&self, period_num: i64) -> Result<Vec<LocationRow>> {
        let rows = sqlx::query(
            r#"
            SELECT
                nl.nest_id,
                nl.official_name,
                nl.short_name,
                nl.notes,
                nl.private,
                n.name AS sub_area,
                r.name AS area
            FROM nest_locations nl
                LEFT OUTER JOIN neighborhoods n ON nl.location = n.id
                LEFT OUTER JOIN regions r ON n.region = r.id
            WHERE NOT EXISTS (
                SELECT 1 FROM species_list sl
                WHERE sl.rotation_num = ? AND sl.nestid = nl.nest_id
            )
            ORDER BY nl.nest_id
            "#,
        )
        .bind(period_num)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| LocationRow {
                location_id: row.get("nest_id"),
                official_name: row.get("official_name"),
                short_name: row.get("short_name"),
                notes: row.get("notes"),
                private: row.get("private"),
                sub_area: row.get("sub_area"),
                area: row.get("area"),
            })
            .collect())
    }

    async fn alternate_names(&self) -> Result<AltNameIndex> {
        let rows = sqlx::query(
            "SELECT main_entry, name FROM alt_names \
             WHERE hideme IS NULL OR hideme = 0 \
             ORDER BY main_entry, rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut index = AltNameIndex::new();
        for row in &rows {
            let location_id: i64 = row.get("main_entry");
            let name: String = row.get("name");
            index.insert(location_id, name);
        }
        Ok(index)
    }
}

/// Rotation dates are stored as `YYYY-MM-DD`, sometimes with a time suffix.
pub(crate) fn parse_period_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().split([' ', 'T']).next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

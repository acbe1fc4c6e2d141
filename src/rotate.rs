//! Rotation creation.
//!
//! Adds a `rotation_dates` row for a new nest shift and seeds it with every
//! location's permanent species, marked confirmed.

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    Created { num: i64, seeded: u64 },
    AlreadyExists { num: i64 },
}

pub async fn create_rotation(pool: &SqlitePool, date: NaiveDate) -> Result<RotationOutcome> {
    let day = date.format("%Y-%m-%d").to_string();
    let mut tx = pool.begin().await?;

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT num FROM rotation_dates WHERE date LIKE ? || '%' LIMIT 1")
            .bind(&day)
            .fetch_optional(&mut *tx)
            .await?;
    if let Some(num) = existing {
        tx.rollback().await?;
        return Ok(RotationOutcome::AlreadyExists { num });
    }

    let num = sqlx::query("INSERT INTO rotation_dates (date) VALUES (?)")
        .bind(&day)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    let seeded = sqlx::query(
        r#"
        INSERT INTO species_list (rotation_num, nestid, species_txt, confirmation)
        SELECT ?, nest_id, permanent_species, 1
        FROM nest_locations
        WHERE permanent_species IS NOT NULL AND TRIM(permanent_species) <> ''
        "#,
    )
    .bind(num)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;
    Ok(RotationOutcome::Created { num, seeded })
}

/// CLI entry point for `nests rotate`.
pub async fn run_rotate(config: &Config, date: NaiveDate) -> Result<()> {
    let pool = db::connect(config).await?;
    let outcome = create_rotation(&pool, date).await;
    pool.close().await;

    match outcome? {
        RotationOutcome::Created { num, seeded } => {
            tracing::info!(rotation = num, seeded, "rotation created");
            println!("Added rotation {} on {} ({} permanent nests)", num, date, seeded);
        }
        RotationOutcome::AlreadyExists { num } => {
            println!("Rotation already exists for {} (#{})", date, num);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::apply_schema;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        apply_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_seeds_permanent_species_once() {
        let pool = memory_pool().await;
        sqlx::query(
            "INSERT INTO nest_locations (official_name, permanent_species) VALUES \
             ('Elm Park', 'Pikachu'), ('Oak Park', NULL), ('Pine Park', '  ')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let date = NaiveDate::from_ymd_opt(2019, 3, 21).unwrap();
        let first = create_rotation(&pool, date).await.unwrap();
        let num = match first {
            RotationOutcome::Created { num, seeded } => {
                assert_eq!(seeded, 1);
                num
            }
            other => panic!("unexpected outcome: {:?}", other),
        };

        let again = create_rotation(&pool, date).await.unwrap();
        assert_eq!(again, RotationOutcome::AlreadyExists { num });

        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT species_txt, confirmation FROM species_list WHERE rotation_num = ?",
        )
        .bind(num)
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(rows, vec![("Pikachu".to_string(), 1)]);
    }
}

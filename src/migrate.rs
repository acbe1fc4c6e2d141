use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create every table the report pipeline reads. Idempotent.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS regions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS neighborhoods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            region INTEGER,
            lat REAL,
            lon REAL,
            FOREIGN KEY (region) REFERENCES regions(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS nest_locations (
            nest_id INTEGER PRIMARY KEY AUTOINCREMENT,
            official_name TEXT NOT NULL,
            short_name TEXT,
            location INTEGER,
            address TEXT,
            notes TEXT,
            private INTEGER,
            permanent_species TEXT,
            lat REAL,
            lon REAL,
            size INTEGER,
            density INTEGER,
            FOREIGN KEY (location) REFERENCES neighborhoods(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rotation_dates (
            num INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            special_note TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // At most one species per nest per rotation.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS species_list (
            rotation_num INTEGER NOT NULL,
            nestid INTEGER NOT NULL,
            species_txt TEXT,
            species_no INTEGER,
            confirmation INTEGER,
            PRIMARY KEY (rotation_num, nestid),
            FOREIGN KEY (rotation_num) REFERENCES rotation_dates(num),
            FOREIGN KEY (nestid) REFERENCES nest_locations(nest_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alt_names (
            name TEXT NOT NULL,
            main_entry INTEGER NOT NULL,
            hideme INTEGER,
            FOREIGN KEY (main_entry) REFERENCES nest_locations(nest_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS species_info (
            dex INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            category_type TEXT,
            category_subtype TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_rotation_dates_date ON rotation_dates(date)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_alt_names_main_entry ON alt_names(main_entry)")
        .execute(pool)
        .await?;

    Ok(())
}

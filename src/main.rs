//! # Nest Report CLI (`nests`)
//!
//! ## Usage
//!
//! ```bash
//! nests --config ./config/nests.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `nests init` | Create the SQLite database and schema |
//! | `nests rotate` | Start a rotation, seeding permanent nests |
//! | `nests periods` | List stored rotations with nest counts |
//! | `nests report` | Render and deliver a post for one rotation |
//!
//! ## Examples
//!
//! ```bash
//! # Long-form post for the rotation current today
//! nests report --style dense
//!
//! # Chat post as of a given date, written to files instead of stdout
//! nests report --style discord --date 2019-03-25 --out-dir ./out
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nest_report::report::{DeliveryOptions, Style};
use nest_report::{config, migrate, periods, report, rotate};

/// Nest Report: render rotating nest sightings into size-bounded posts.
#[derive(Parser)]
#[command(
    name = "nests",
    about = "Render rotating nest sightings from SQLite into size-bounded posts",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/nests.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent; running it multiple times is safe.
    Init,

    /// Create a rotation for a nest shift date.
    ///
    /// Every nest with a permanent species is copied into the new rotation
    /// as a confirmed sighting. Does nothing if the date already exists.
    Rotate {
        /// Date of the nest shift (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List stored rotations.
    Periods {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Render the nest list for a rotation and deliver it.
    ///
    /// Uses the most recent rotation on or before `--date`; if the date is
    /// earlier than every rotation, the oldest one is used with a warning.
    Report {
        /// Generate the list as of this date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Output style: `dense` (fb) or `blocks` (discord).
        #[arg(long, value_enum)]
        style: Style,

        /// Write segments to `part-NN.txt` files in this directory.
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Deliver all segments without waiting for enter between them.
        #[arg(long)]
        no_pause: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nest_report=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Rotate { date } => {
            rotate::run_rotate(&cfg, date.unwrap_or(today)).await?;
        }
        Commands::Periods { json } => {
            periods::run_periods(&cfg, json).await?;
        }
        Commands::Report {
            date,
            style,
            out_dir,
            no_pause,
        } => {
            let delivery = DeliveryOptions { out_dir, no_pause };
            report::run_report(&cfg, style, date.unwrap_or(today), &delivery).await?;
        }
    }

    Ok(())
}

//! End-to-end report assembly for the `nests report` command.
//!
//! ```text
//! store ──▶ period::resolve ──▶ aggregate ──▶ render ──▶ chunk ──▶ dispatch
//! ```
//!
//! [`build_report`] is the pure-ish core (store reads only) and returns
//! typed [`ReportError`]s; [`run_report`] owns the database handle, the
//! sink, and every user-facing message.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::ValueEnum;

use crate::aggregate::aggregate;
use crate::chunk::{chunk_blocks, target_length, Segment};
use crate::config::{Config, PlatformConfig};
use crate::db;
use crate::dispatch::{dispatch, Acknowledge, DirectorySink, NoPause, SegmentSink, StdinAck, StdoutSink};
use crate::error::ReportError;
use crate::glyphs::GlyphTable;
use crate::period::{self, ResolvedPeriod};
use crate::render::{render_blocks, render_dense, Preamble, RenderOptions};
use crate::store::sqlite::SqliteStore;
use crate::store::SightingStore;

/// Output style, one per posting surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Style {
    /// Single long post with summary and no-report roster.
    #[value(aliases = ["fb", "facebook", "f"])]
    Dense,
    /// Per-geography blocks split into size-bounded parts.
    #[value(aliases = ["discord", "disc", "d"])]
    Blocks,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Dense => "dense",
            Style::Blocks => "blocks",
        }
    }

    pub fn platform(&self, config: &Config) -> PlatformConfig {
        match self {
            Style::Dense => config.platforms.dense,
            Style::Blocks => config.platforms.blocks,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub period: ResolvedPeriod,
    pub style: Style,
    pub segments: Vec<Segment>,
    pub active: usize,
    pub vacant: usize,
    pub skipped: usize,
    /// Non-fatal problems for the caller to surface.
    pub warnings: Vec<String>,
}

pub async fn build_report(
    store: &dyn SightingStore,
    config: &Config,
    style: Style,
    date: NaiveDate,
    generated_on: NaiveDate,
) -> Result<Report, ReportError> {
    let mut warnings = Vec::new();

    let periods = store.periods().await.map_err(ReportError::lookup)?;
    let resolved = period::resolve(&periods, date)?;
    if let Some(reason) = &resolved.fallback {
        warnings.push(format!(
            "{}. Using the oldest available rotation ({}) instead.",
            reason, resolved.period.date
        ));
    }

    let agg = aggregate(store, &resolved.period, &config.report.notable_label).await?;

    let platform = style.platform(config);
    let glyphs = GlyphTable::from(&config.glyphs);
    let opts = RenderOptions {
        glyphs: &glyphs,
        important_species: &config.report.important_species,
        unknown_geography: &config.report.unknown_geography,
        hashtags: &config.report.hashtags,
        ceiling: platform.ceiling,
    };
    let preamble = Preamble {
        period_date: resolved.period.date,
        generated_on,
        special_note: resolved.period.special_note.clone(),
    };

    let segments = match style {
        Style::Dense => {
            let post = render_dense(&agg.view, &agg.summary, &preamble, &opts)?;
            let text = post.text();
            let len = text.chars().count();
            if len > platform.ceiling {
                warnings.push(format!(
                    "Dense post is {} characters, over the {} character limit.",
                    len, platform.ceiling
                ));
            }
            vec![Segment { text, len }]
        }
        Style::Blocks => {
            let post = render_blocks(&agg.view, &agg.summary, &preamble, &opts)?;
            let target = platform
                .target
                .unwrap_or_else(|| target_length(&post.blocks, platform.ceiling));
            chunk_blocks(&post.blocks, post.important.as_ref(), platform.ceiling, target)?
        }
    };

    Ok(Report {
        period: resolved,
        style,
        segments,
        active: agg.view.active_count(),
        vacant: agg.view.vacant_count(),
        skipped: agg.skipped,
        warnings,
    })
}

/// Where finished segments go.
#[derive(Debug, Clone, Default)]
pub struct DeliveryOptions {
    pub out_dir: Option<PathBuf>,
    pub no_pause: bool,
}

/// CLI entry point: build the report, then deliver it segment by segment.
pub async fn run_report(
    config: &Config,
    style: Style,
    date: NaiveDate,
    delivery: &DeliveryOptions,
) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);

    tracing::info!(requested = %date, style = style.as_str(), "gathering nests");
    let generated_on = chrono::Local::now().date_naive();
    let built = build_report(&store, config, style, date, generated_on).await;
    store.close().await;
    let report = built?;

    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }
    tracing::info!(
        period = %report.period.period.date,
        active = report.active,
        vacant = report.vacant,
        segments = report.segments.len(),
        "using the nest list from the {} rotation",
        report.period.period.date
    );

    let mut stdout_sink = StdoutSink;
    let mut dir_sink = match &delivery.out_dir {
        Some(dir) => Some(DirectorySink::new(dir)?),
        None => None,
    };
    let sink: &mut dyn SegmentSink = match dir_sink.as_mut() {
        Some(sink) => sink,
        None => &mut stdout_sink,
    };

    let mut stdin_ack = StdinAck;
    let mut no_pause = NoPause;
    let ack: &mut dyn Acknowledge = if delivery.no_pause || delivery.out_dir.is_some() {
        &mut no_pause
    } else {
        &mut stdin_ack
    };

    dispatch(&report.segments, sink, ack)?;

    if let Some(dir_sink) = &dir_sink {
        for path in dir_sink.written() {
            eprintln!("Wrote {}", path.display());
        }
    }
    if report.skipped > 0 {
        tracing::warn!(skipped = report.skipped, "skipped {} malformed row(s)", report.skipped);
    }

    Ok(())
}

//! Dense single-post style for long-form feeds.
//!
//! ```text
//! #Nests #Tracking #Migration
//! * = Unconfirmed
//! 2019-03-21 nest shift
//! Last updated: 23 Mar 2019
//!
//! [-- Summary --]
//! Pikachu: Elm Park, Oak Park*
//!
//! ---==< • >==---
//!
//! {~(Downtown)~}
//! 🔒Elm Park/Elm Green (north lot): Pikachu
//!
//! [-- No Reports --]
//! • Downtown: Birch Field, Cedar Lot
//! ```

use std::fmt::Write;

use crate::aggregate::{AggregatedView, SpeciesSummary};
use crate::error::ReportError;
use crate::models::{Confirmation, Sighting};

use super::{decorate, ensure_fits, Preamble, RenderOptions, RenderedBlock, RenderedPost};

const UNCONFIRMED_MARK: &str = "*";

pub fn render_dense(
    view: &AggregatedView,
    summary: &SpeciesSummary,
    preamble: &Preamble,
    opts: &RenderOptions<'_>,
) -> Result<RenderedPost, ReportError> {
    let mut blocks = vec![
        RenderedBlock::new("preamble", render_preamble(preamble, opts)),
        RenderedBlock::new("summary", render_summary(summary, opts)),
    ];

    let mut sections = String::new();
    for (geo, sightings) in &view.active {
        let label = geo.label(opts.unknown_geography);
        let mut section = decorate(label, "{~()~}");
        section.push('\n');
        for sighting in sightings.values() {
            section.push_str(&render_entry(sighting, opts));
            section.push('\n');
        }
        section.push('\n');

        let block = RenderedBlock::new(label, section);
        ensure_fits(&block, opts.ceiling)?;
        sections.push_str(&block.text);
    }
    blocks.push(RenderedBlock::new("sections", sections));

    if !view.vacant.is_empty() {
        let mut roster = decorate("No Reports", "[--  --]");
        roster.push('\n');
        for (geo, vacancies) in &view.vacant {
            let names: Vec<String> = vacancies
                .values()
                .map(|v| restricted_prefix(v.restricted, opts) + &v.name)
                .collect();
            let _ = writeln!(
                roster,
                "• {}: {}",
                geo.label(opts.unknown_geography),
                names.join(", ")
            );
        }
        blocks.push(RenderedBlock::new("roster", roster));
    }

    Ok(RenderedPost {
        blocks,
        important: None,
    })
}

fn render_preamble(preamble: &Preamble, opts: &RenderOptions<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", opts.hashtags);
    let _ = writeln!(out, "{} = Unconfirmed", UNCONFIRMED_MARK);
    let _ = writeln!(out, "{} nest shift", preamble.period_date);
    if let Some(note) = &preamble.special_note {
        let _ = writeln!(out, "{}", note);
    }
    let _ = writeln!(out, "Last updated: {}", preamble.generated());
    out.push('\n');
    out
}

fn render_summary(summary: &SpeciesSummary, opts: &RenderOptions<'_>) -> String {
    let mut out = decorate("Summary", "[--  --]");
    for (label, entry) in summary.iter() {
        let locations: Vec<String> = entry
            .locations
            .iter()
            .map(|(name, status)| {
                let mut loc = restricted_prefix(status.restricted, opts) + name;
                if status.confirmation != Confirmation::Confirmed {
                    loc.push_str(UNCONFIRMED_MARK);
                }
                loc
            })
            .collect();
        let _ = write!(out, "\n{}: {}", label, locations.join(", "));
    }
    out.push_str("\n\n");
    out.push_str(&decorate(" • ", "---==<>==---"));
    out.push_str("\n\n");
    out
}

fn render_entry(sighting: &Sighting, opts: &RenderOptions<'_>) -> String {
    let mut line = restricted_prefix(sighting.restricted, opts);
    let listed = opts.important_species.iter().any(|s| s == &sighting.label);
    line.push_str(opts.glyphs.for_label(&sighting.label, sighting.is_notable(), listed));
    line.push_str(sighting.display_name());
    if !sighting.alternate_names.is_empty() {
        line.push('/');
        line.push_str(&sighting.alternates_joined());
    }
    if let Some(note) = &sighting.note {
        line.push(' ');
        line.push_str(&decorate(note, "()"));
    }
    line.push_str(": ");
    line.push_str(&sighting.label);
    if sighting.confirmation != Confirmation::Confirmed {
        line.push_str(UNCONFIRMED_MARK);
    }
    line
}

fn restricted_prefix(restricted: bool, opts: &RenderOptions<'_>) -> String {
    if restricted {
        opts.glyphs.restricted.clone()
    } else {
        String::new()
    }
}

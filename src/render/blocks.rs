//! Per-geography chat style.
//!
//! Produces a leading empty anchor block, the preamble, one block per
//! geography, and a separate notable-species block that is sent last.
//! Confirmed species are **bold**, everything else _italic_.

use std::fmt::Write;

use crate::aggregate::{AggregatedView, SpeciesSummary};
use crate::error::ReportError;
use crate::models::Confirmation;

use super::{decorate, ensure_fits, Preamble, RenderOptions, RenderedBlock, RenderedPost};

const ANCHOR_LABEL: &str = "anchor";

pub fn render_blocks(
    view: &AggregatedView,
    summary: &SpeciesSummary,
    preamble: &Preamble,
    opts: &RenderOptions<'_>,
) -> Result<RenderedPost, ReportError> {
    let mut blocks = vec![
        RenderedBlock::new(ANCHOR_LABEL, ""),
        RenderedBlock::new("preamble", render_preamble(preamble)),
    ];

    for (geo, sightings) in &view.active {
        let label = geo.label(opts.unknown_geography);
        let mut text = decorate(label, "__****__");
        text.push('\n');
        for sighting in sightings.values() {
            text.push_str(sighting.display_name());
            if !sighting.alternate_names.is_empty() {
                text.push('/');
                text.push_str(&sighting.alternates_joined());
            }
            let _ = writeln!(
                text,
                ": {}",
                emphasis(&sighting.label, sighting.confirmation)
            );
        }

        let block = RenderedBlock::new(label, text);
        ensure_fits(&block, opts.ceiling)?;
        blocks.push(block);
    }

    Ok(RenderedPost {
        blocks,
        important: render_important(summary, opts),
    })
}

fn emphasis(text: &str, confirmation: Confirmation) -> String {
    match confirmation {
        Confirmation::Confirmed => decorate(text, "****"),
        _ => decorate(text, "__"),
    }
}

fn render_preamble(preamble: &Preamble) -> String {
    let mut out = decorate(&preamble.period_date.to_string(), "``");
    out.push_str(" nest shift\n");
    if let Some(note) = &preamble.special_note {
        let _ = writeln!(out, "{}", note);
    }
    let _ = writeln!(out, "Last updated: {}", preamble.generated());
    out.push('\n');
    out.push_str("**Bold** species are confirmed; _italic_ are single-reported\n\n");
    out
}

/// Species on the allow-list or tagged notable, with every location they
/// were seen at. `None` when no species qualifies.
fn render_important(summary: &SpeciesSummary, opts: &RenderOptions<'_>) -> Option<RenderedBlock> {
    let mut lines = String::new();
    for (label, entry) in summary.iter() {
        let listed = opts.important_species.iter().any(|s| s == label);
        if !(listed || entry.notable) {
            continue;
        }
        let locations: Vec<String> = entry
            .locations
            .iter()
            .map(|(name, status)| match status.confirmation {
                Confirmation::Confirmed => name.clone(),
                _ => decorate(name, "__"),
            })
            .collect();
        let _ = writeln!(lines, "{}: {}", label, locations.join(", "));
    }

    if lines.is_empty() {
        return None;
    }
    let mut text = decorate("Notable species", "__****__");
    text.push('\n');
    text.push_str(&lines);
    Some(RenderedBlock::new("notable", text))
}

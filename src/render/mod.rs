//! Platform renderers.
//!
//! Both renderers are pure functions from an aggregated period to an ordered
//! list of [`RenderedBlock`]s. A block is the unit the chunker never splits:
//! one geography, the preamble, or a summary section.
//!
//! | Style | Module | Output |
//! |-------|--------|--------|
//! | dense | [`dense`] | one long post: preamble, summary, all geographies, no-report roster |
//! | blocks | [`blocks`] | anchor, preamble, one block per geography, trailing notable block |

pub mod blocks;
pub mod dense;

use chrono::NaiveDate;

use crate::error::ReportError;
use crate::glyphs::GlyphTable;

pub use blocks::render_blocks;
pub use dense::render_dense;

/// An atomic unit of rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    /// Geography name or section name, used in error reports.
    pub label: String,
    pub text: String,
}

impl RenderedBlock {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Length in characters, the unit platform limits are expressed in.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedPost {
    pub blocks: Vec<RenderedBlock>,
    /// High-priority species listed after the main post.
    pub important: Option<RenderedBlock>,
}

impl RenderedPost {
    pub fn text(&self) -> String {
        let mut out: String = self.blocks.iter().map(|b| b.text.as_str()).collect();
        if let Some(important) = &self.important {
            out.push_str(&important.text);
        }
        out
    }
}

/// Header metadata for a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    pub period_date: NaiveDate,
    pub generated_on: NaiveDate,
    pub special_note: Option<String>,
}

impl Preamble {
    fn generated(&self) -> String {
        self.generated_on.format("%d %b %Y").to_string()
    }
}

pub struct RenderOptions<'a> {
    pub glyphs: &'a GlyphTable,
    pub important_species: &'a [String],
    pub unknown_geography: &'a str,
    pub hashtags: &'a str,
    /// Largest segment the target platform accepts.
    pub ceiling: usize,
}

/// Insert `text` halfway into `decor`: `decorate("x", "[--  --]")` → `[-- x --]`.
pub(crate) fn decorate(text: &str, decor: &str) -> String {
    let chars: Vec<char> = decor.chars().collect();
    let half = chars.len() / 2;
    let mut out: String = chars[..half].iter().collect();
    out.push_str(text);
    out.extend(&chars[half..]);
    out
}

pub(crate) fn ensure_fits(block: &RenderedBlock, ceiling: usize) -> Result<(), ReportError> {
    let len = block.len();
    if len > ceiling {
        return Err(ReportError::OversizedSection {
            geography: block.label.clone(),
            len,
            ceiling,
        });
    }
    Ok(())
}

//! Per-deployment glyph table used by the dense renderer.
//!
//! Table glyphs mark notable species and species on the important-species
//! allow-list. Other labels stay bare even when tabulated.

use std::collections::BTreeMap;

use crate::config::GlyphConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphTable {
    pub restricted: String,
    pub notable_fallback: String,
    by_label: BTreeMap<String, String>,
}

impl GlyphTable {
    pub fn new(
        restricted: impl Into<String>,
        notable_fallback: impl Into<String>,
        by_label: BTreeMap<String, String>,
    ) -> Self {
        Self {
            restricted: restricted.into(),
            notable_fallback: notable_fallback.into(),
            by_label,
        }
    }

    /// Glyphs for a species label: the table entry on an exact match when the
    /// species is notable or `listed`, the fallback for an untabulated
    /// notable species, nothing otherwise.
    pub fn for_label(&self, label: &str, notable: bool, listed: bool) -> &str {
        match self.by_label.get(label) {
            Some(glyphs) if notable || listed => glyphs,
            Some(_) => "",
            None if notable => &self.notable_fallback,
            None => "",
        }
    }
}

impl From<&GlyphConfig> for GlyphTable {
    fn from(cfg: &GlyphConfig) -> Self {
        Self::new(&cfg.restricted, &cfg.notable_fallback, cfg.species.clone())
    }
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::from(&GlyphConfig::default())
    }
}

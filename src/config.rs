use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub glyphs: GlyphConfig,
    #[serde(default)]
    pub platforms: PlatformsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_notable_label")]
    pub notable_label: String,
    #[serde(default)]
    pub important_species: Vec<String>,
    #[serde(default = "default_unknown_geography")]
    pub unknown_geography: String,
    #[serde(default = "default_hashtags")]
    pub hashtags: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            notable_label: default_notable_label(),
            important_species: Vec::new(),
            unknown_geography: default_unknown_geography(),
            hashtags: default_hashtags(),
        }
    }
}

fn default_notable_label() -> String {
    "Legendary".to_string()
}
fn default_unknown_geography() -> String {
    "No location information".to_string()
}
fn default_hashtags() -> String {
    "#Nests #Tracking #Migration".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct GlyphConfig {
    #[serde(default = "default_restricted_glyph")]
    pub restricted: String,
    #[serde(default = "default_notable_glyph")]
    pub notable_fallback: String,
    #[serde(default)]
    pub species: BTreeMap<String, String>,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            restricted: default_restricted_glyph(),
            notable_fallback: default_notable_glyph(),
            species: BTreeMap::new(),
        }
    }
}

fn default_restricted_glyph() -> String {
    "🔒".to_string()
}
fn default_notable_glyph() -> String {
    "⭐".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlatformsConfig {
    #[serde(default = "default_dense_platform")]
    pub dense: PlatformConfig,
    #[serde(default = "default_blocks_platform")]
    pub blocks: PlatformConfig,
}

impl Default for PlatformsConfig {
    fn default() -> Self {
        Self {
            dense: default_dense_platform(),
            blocks: default_blocks_platform(),
        }
    }
}

/// Size limits for one posting surface.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PlatformConfig {
    pub ceiling: usize,
    /// Overrides the computed average segment length.
    #[serde(default)]
    pub target: Option<usize>,
}

fn default_dense_platform() -> PlatformConfig {
    PlatformConfig {
        ceiling: 63206,
        target: None,
    }
}
fn default_blocks_platform() -> PlatformConfig {
    PlatformConfig {
        ceiling: 2000,
        target: None,
    }
}

impl Config {
    /// Config used by tests and by commands run without a config file.
    pub fn minimal(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db: DbConfig {
                path: db_path.into(),
            },
            report: ReportConfig::default(),
            glyphs: GlyphConfig::default(),
            platforms: PlatformsConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.report.notable_label.trim().is_empty() {
        anyhow::bail!("report.notable_label must not be empty");
    }

    for (name, platform) in [
        ("dense", &config.platforms.dense),
        ("blocks", &config.platforms.blocks),
    ] {
        if platform.ceiling == 0 {
            anyhow::bail!("platforms.{}.ceiling must be > 0", name);
        }
        if let Some(target) = platform.target {
            if target == 0 || target > platform.ceiling {
                anyhow::bail!(
                    "platforms.{}.target must be in 1..={} (got {})",
                    name,
                    platform.ceiling,
                    target
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_tables() {
        let config: Config = toml::from_str("[db]\npath = \"nests.sqlite\"\n").unwrap();
        assert!(validate(&config).is_ok());
        assert_eq!(config.platforms.blocks.ceiling, 2000);
        assert_eq!(config.report.notable_label, "Legendary");
        assert!(config.glyphs.species.is_empty());
    }

    #[test]
    fn test_glyph_table_parses() {
        let config: Config = toml::from_str(
            r#"
            [db]
            path = "nests.sqlite"

            [glyphs]
            restricted = "(P)"
            [glyphs.species]
            "Dratini" = "🐉"
            "#,
        )
        .unwrap();
        assert_eq!(config.glyphs.restricted, "(P)");
        assert_eq!(config.glyphs.notable_fallback, "⭐");
        assert_eq!(config.glyphs.species.get("Dratini").unwrap(), "🐉");
    }

    #[test]
    fn test_target_above_ceiling_rejected() {
        let config: Config = toml::from_str(
            r#"
            [db]
            path = "nests.sqlite"

            [platforms.blocks]
            ceiling = 2000
            target = 2500
            "#,
        )
        .unwrap();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        let config: Config = toml::from_str(
            r#"
            [db]
            path = "nests.sqlite"

            [platforms.dense]
            ceiling = 0
            "#,
        )
        .unwrap();
        assert!(validate(&config).is_err());
    }
}

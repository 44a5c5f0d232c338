//! Site configuration module.
//!
//! Handles loading, validating, and merging the site's `config.toml`. Stock
//! defaults are serialized to a TOML table and the user file is merged on top,
//! so a config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! url = "https://example.org"   # Absolute base URL, used by the feed
//! title = "Quire"
//! description = ""
//! language = "en-us"
//! default_author = ""           # Author for documents that name none
//! team_name = ""                # Author string linked as a whole to team_url
//! team_url = ""
//! whitepaper_url = ""           # Value of the {{WHITEPAPER_URL}} placeholder
//!
//! [content]
//! posts_dir = "posts"
//! contributors_file = "contributors.json"
//!
//! [home]
//! exclude_slugs = ["about"]     # Built, but not listed on the home page
//!
//! [open_questions]
//! featured_sequence = "quickstart"
//!
//! [feed]
//! max_items = 20
//!
//! [processing]
//! max_processes = 4             # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name of the site configuration, relative to the site root.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity: URL, title, authorship defaults.
    pub site: SiteInfo,
    /// Where content lives relative to the site root.
    pub content: ContentConfig,
    /// Home index settings.
    pub home: HomeConfig,
    /// Open-questions page settings.
    pub open_questions: OpenQuestionsConfig,
    /// Syndication feed settings.
    pub feed: FeedConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.site.url.starts_with("http://") || self.site.url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "site.url must be an absolute http(s) URL".into(),
            ));
        }
        if self.feed.max_items == 0 {
            return Err(ConfigError::Validation(
                "feed.max_items must be at least 1".into(),
            ));
        }
        if self.content.posts_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "content.posts_dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Site URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.site.url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub url: String,
    pub title: String,
    pub description: String,
    pub language: String,
    /// Author used when a document names none; hidden on the home index.
    pub default_author: String,
    pub team_name: String,
    pub team_url: String,
    pub whitepaper_url: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            url: "https://example.org".to_string(),
            title: "Quire".to_string(),
            description: String::new(),
            language: "en-us".to_string(),
            default_author: String::new(),
            team_name: String::new(),
            team_url: String::new(),
            whitepaper_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Directory holding Markdown documents and sequence descriptions.
    pub posts_dir: String,
    /// JSON contributor directory (optional file).
    pub contributors_file: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_dir: "posts".to_string(),
            contributors_file: "contributors.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConfig {
    /// Slugs that are built but not listed on the home page.
    pub exclude_slugs: Vec<String>,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            exclude_slugs: vec!["about".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenQuestionsConfig {
    /// Sequence whose first page is the page's call-to-action target.
    pub featured_sequence: String,
}

impl Default for OpenQuestionsConfig {
    fn default() -> Self {
        Self {
            featured_sequence: "quickstart".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Number of most recent documents in the feed.
    pub max_items: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { max_items: 20 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the site root, on top of stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Quire Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Absolute base URL of the published site (feed links are built from it).
url = "https://example.org"
title = "Quire"
description = ""
# Feed language tag.
language = "en-us"
# Author for documents without an `author` field. Not repeated on the home page.
default_author = ""
# An author string equal to team_name links to team_url as a whole.
team_name = ""
team_url = ""
# Substituted for {{WHITEPAPER_URL}} in every document body.
whitepaper_url = ""

# ---------------------------------------------------------------------------
# Content locations (relative to the site root)
# ---------------------------------------------------------------------------
[content]
posts_dir = "posts"
contributors_file = "contributors.json"

# ---------------------------------------------------------------------------
# Home page
# ---------------------------------------------------------------------------
[home]
# Slugs that are built but not listed.
exclude_slugs = ["about"]

# ---------------------------------------------------------------------------
# Open questions page
# ---------------------------------------------------------------------------
[open_questions]
# Sequence whose first page the call-to-action links to.
featured_sequence = "quickstart"

# ---------------------------------------------------------------------------
# Feed
# ---------------------------------------------------------------------------
[feed]
# Number of most recent documents listed in feed.xml.
max_items = 20

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.content.posts_dir, "posts");
        assert_eq!(config.home.exclude_slugs, vec!["about"]);
        assert_eq!(config.open_questions.featured_sequence, "quickstart");
        assert_eq!(config.feed.max_items, 20);
        assert!(config.processing.max_processes.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(
            r#"
[site]
title = "Learning Mechanics"
"#,
        )
        .unwrap();
        assert_eq!(config.site.title, "Learning Mechanics");
        // Defaults preserved
        assert_eq!(config.site.language, "en-us");
        assert_eq!(config.feed.max_items, 20);
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let mut config = SiteConfig::default();
        config.site.url = "https://a.example/".into();
        assert_eq!(config.base_url(), "https://a.example");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.url, "https://example.org");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[site]
url = "https://analytic.example"
team_name = "The Team"

[feed]
max_items = 5
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.url, "https://analytic.example");
        assert_eq!(config.site.team_name, "The Team");
        assert_eq!(config.feed.max_items, 5);
        // Unspecified values should be defaults
        assert_eq!(config.content.posts_dir, "posts");
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[site]\ntitel = \"typo\"\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[bogus]\nx = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[site\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_relative_url() {
        let mut config = SiteConfig::default();
        config.site.url = "example.org".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_zero_feed_items() {
        let mut config = SiteConfig::default();
        config.feed.max_items = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[content]\nposts_dir = \"\"\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_nested_tables() {
        let base: toml::Value = toml::from_str("[site]\ntitle = \"A\"\nurl = \"u\"").unwrap();
        let overlay: toml::Value = toml::from_str("[site]\ntitle = \"B\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["site"]["title"].as_str(), Some("B"));
        assert_eq!(merged["site"]["url"].as_str(), Some("u"));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str("[home]\nexclude_slugs = [\"about\"]").unwrap();
        let overlay: toml::Value = toml::from_str("[home]\nexclude_slugs = []").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["home"]["exclude_slugs"].as_array().map(Vec::len), Some(0));
    }

    // =========================================================================
    // Processing
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(100_000),
        };
        assert_eq!(effective_threads(&config), cores);
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let parsed: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(parsed.site.url, defaults.site.url);
        assert_eq!(parsed.site.title, defaults.site.title);
        assert_eq!(parsed.content.posts_dir, defaults.content.posts_dir);
        assert_eq!(parsed.home.exclude_slugs, defaults.home.exclude_slugs);
        assert_eq!(
            parsed.open_questions.featured_sequence,
            defaults.open_questions.featured_sequence
        );
        assert_eq!(parsed.feed.max_items, defaults.feed.max_items);
        assert_eq!(parsed.processing.max_processes, None);
    }

    #[test]
    fn stock_defaults_value_is_table() {
        let value = stock_defaults_value().unwrap();
        for section in ["site", "content", "home", "open_questions", "feed", "processing"] {
            assert!(value.get(section).is_some(), "missing section {section}");
        }
    }
}

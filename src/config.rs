//! Page configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! are the base layer; a `config.toml` in the config directory overrides
//! any subset of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [page]
//! width = 1000                 # Page width in px; also scales dropped images
//! lang = "ko"                  # <html lang>
//! title = ""                   # Document title; empty = "<product> - <brand>"
//! fonts = ["https://fonts.googleapis.com/css2?family=Noto+Sans+KR:wght@300;400;500;700&display=swap"]
//!
//! [sections]
//! placeholder_height = 200.0   # Height of empty sections and spacers
//! min_height = 50.0            # Floor for resized sections (never below 50)
//!
//! [zoom]
//! step = 0.1                   # Scale change per wheel notch
//! min = 0.1
//! max = 5.0
//!
//! [tracking]
//! threshold = 0.3              # Visible ratio that makes a section active
//!
//! [text]
//! content = "Enter text"       # Defaults for newly added text boxes
//! top = 50.0
//! left = 50.0
//! width = 200.0
//! height = 50.0
//! font_size = 16.0
//! font_family = "Noto Sans KR"
//! color = "#000000"
//! font_weight = "normal"
//! text_align = "left"
//!
//! [colors]
//! background = "#ffffff"
//! text = "#333333"
//! text_muted = "#6b7280"
//! accent = "#111111"
//! drop_zone = "#f9fafb"
//! drop_zone_border = "#d1d5db"
//!
//! [generation]
//! max_attempts = 3             # Attempts for the master image
//! backoff_ms = 250             # First retry delay, doubled per attempt
//! # max_threads = 4            # Omit for auto = CPU cores
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::overlay::TextAlign;
use crate::registry::MIN_SECTION_HEIGHT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Page configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub page: PageSettings,
    pub sections: SectionsConfig,
    pub zoom: ZoomConfig,
    pub tracking: TrackingConfig,
    pub text: TextConfig,
    pub colors: ColorConfig,
    pub generation: GenerationConfig,
}

impl PageConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page.width == 0 {
            return Err(ConfigError::Validation("page.width must be non-zero".into()));
        }
        if self.sections.min_height < MIN_SECTION_HEIGHT {
            return Err(ConfigError::Validation(format!(
                "sections.min_height must be at least {MIN_SECTION_HEIGHT}"
            )));
        }
        if self.sections.placeholder_height < self.sections.min_height {
            return Err(ConfigError::Validation(
                "sections.placeholder_height must not be below sections.min_height".into(),
            ));
        }
        let zoom = &self.zoom;
        if !(zoom.step > 0.0) {
            return Err(ConfigError::Validation("zoom.step must be positive".into()));
        }
        if !(zoom.min > 0.0 && zoom.min <= 1.0 && zoom.max >= 1.0) {
            return Err(ConfigError::Validation(
                "zoom range must satisfy 0 < min <= 1 <= max".into(),
            ));
        }
        if !(self.tracking.threshold > 0.0 && self.tracking.threshold <= 1.0) {
            return Err(ConfigError::Validation(
                "tracking.threshold must be in (0, 1]".into(),
            ));
        }
        if self.text.width <= 0.0 || self.text.height <= 0.0 || self.text.font_size <= 0.0 {
            return Err(ConfigError::Validation(
                "text width, height and font_size must be positive".into(),
            ));
        }
        if self.generation.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "generation.max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Document-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageSettings {
    /// Page width in CSS pixels.
    pub width: u32,
    /// Value of `<html lang>`.
    pub lang: String,
    /// Document title. Empty derives it from the hero copy.
    pub title: String,
    /// Font stylesheet URLs linked from `<head>`.
    pub fonts: Vec<String>,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            width: 1000,
            lang: "ko".to_string(),
            title: String::new(),
            fonts: vec![
                "https://fonts.googleapis.com/css2?family=Noto+Sans+KR:wght@300;400;500;700&display=swap"
                    .to_string(),
            ],
        }
    }
}

/// Section sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionsConfig {
    /// Height of empty image sections and spacers without an override.
    pub placeholder_height: f64,
    /// Floor for interactive resizing.
    pub min_height: f64,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            placeholder_height: 200.0,
            min_height: MIN_SECTION_HEIGHT,
        }
    }
}

/// Wheel zoom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoomConfig {
    pub step: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            min: 0.1,
            max: 5.0,
        }
    }
}

/// Active-section tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackingConfig {
    /// Visible ratio at which a section becomes active.
    pub threshold: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self { threshold: 0.3 }
    }
}

/// Defaults for newly added text boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    pub content: String,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
    pub font_weight: String,
    pub text_align: TextAlign,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            content: "Enter text".to_string(),
            top: 50.0,
            left: 50.0,
            width: 200.0,
            height: 50.0,
            font_size: 16.0,
            font_family: "Noto Sans KR".to_string(),
            color: "#000000".to_string(),
            font_weight: "normal".to_string(),
            text_align: TextAlign::Left,
        }
    }
}

/// Page colors, emitted as CSS custom properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    pub text: String,
    /// Labels, captions and drop-zone hints.
    pub text_muted: String,
    pub accent: String,
    pub drop_zone: String,
    pub drop_zone_border: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#333333".to_string(),
            text_muted: "#6b7280".to_string(),
            accent: "#111111".to_string(),
            drop_zone: "#f9fafb".to_string(),
            drop_zone_border: "#d1d5db".to_string(),
        }
    }
}

/// Generation retry and parallelism settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Attempts for the required master image.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for each following one.
    pub backoff_ms: u64,
    /// Maximum parallel generation workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 250,
            max_threads: None,
        }
    }
}

impl GenerationConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &GenerationConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.clamp(1, cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PageConfig::default()).expect("default config must serialize")
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
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
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
) -> Result<PageConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PageConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<PageConfig, ConfigError> {
    let overlay = load_raw_config(dir)?;
    if overlay.is_some() {
        tracing::debug!(dir = %dir.display(), "loaded config.toml");
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# detailgen Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as config.toml in the directory passed to --config-dir.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Document
# ---------------------------------------------------------------------------
[page]
# Page width in CSS pixels. Dropped images get height = width * h / w.
width = 1000

# Value of <html lang>.
lang = "ko"

# Document title. Leave empty to use "<product name> - <brand line>".
title = ""

# Font stylesheets linked from <head>. These are the only external
# references in an exported page.
fonts = ["https://fonts.googleapis.com/css2?family=Noto+Sans+KR:wght@300;400;500;700&display=swap"]

# ---------------------------------------------------------------------------
# Sections
# ---------------------------------------------------------------------------
[sections]
# Height of empty image sections and spacers that have no explicit height.
placeholder_height = 200.0

# Floor for interactive resizing. Cannot be set below 50.
min_height = 50.0

# ---------------------------------------------------------------------------
# Pan / zoom
# ---------------------------------------------------------------------------
[zoom]
# Scale change per wheel notch.
step = 0.1
min = 0.1
max = 5.0

# ---------------------------------------------------------------------------
# Active-section tracking
# ---------------------------------------------------------------------------
[tracking]
# Fraction of a section that must be visible for it to become active.
threshold = 0.3

# ---------------------------------------------------------------------------
# New text boxes
# ---------------------------------------------------------------------------
[text]
content = "Enter text"
top = 50.0
left = 50.0
width = 200.0
height = 50.0
font_size = 16.0
font_family = "Noto Sans KR"
color = "#000000"
font_weight = "normal"
text_align = "left"     # left, center or right

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#ffffff"
text = "#333333"
text_muted = "#6b7280"   # Section labels, drop-zone hints
accent = "#111111"
drop_zone = "#f9fafb"
drop_zone_border = "#d1d5db"

# ---------------------------------------------------------------------------
# Generation
# ---------------------------------------------------------------------------
[generation]
# Attempts for the master image before the batch is abandoned.
max_attempts = 3

# Delay before the first retry in milliseconds, doubled for each retry.
backoff_ms = 250

# Maximum parallel generation workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4
"##
}

/// Generate CSS custom properties from page and color config.
pub fn generate_page_css(config: &PageConfig) -> String {
    format!(
        r#":root {{
    --page-width: {width}px;
    --placeholder-height: {placeholder}px;
    --color-bg: {bg};
    --color-text: {text};
    --color-text-muted: {muted};
    --color-accent: {accent};
    --color-drop-zone: {drop_zone};
    --color-drop-zone-border: {drop_zone_border};
}}"#,
        width = config.page.width,
        placeholder = config.sections.placeholder_height,
        bg = config.colors.background,
        text = config.colors.text,
        muted = config.colors.text_muted,
        accent = config.colors.accent,
        drop_zone = config.colors.drop_zone,
        drop_zone_border = config.colors.drop_zone_border,
    )
}

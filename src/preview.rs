//! Live-preview support: a fingerprint cache around the compositor and the
//! navigation minimap model.
//!
//! Every interaction recomposes the page. Most events (pointer moves during
//! a text drag, menu opens) do not change the compose inputs, so the cache
//! keys the last rendered document by a SHA-256 fingerprint of everything
//! the compositor reads and returns it unchanged on a match.
//!
//! The fingerprint covers the config, the flags, the hero copy, the asset
//! store, the section order, the section states and the text overlays. Any
//! change to one of them produces a different fingerprint.

use crate::compose::{self, ComposeFlags, PageInputs};
use crate::config::PageConfig;
use crate::session::PageState;
use crate::types::{GalleryType, HERO_KEY, SectionKind};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 of the compose inputs, as a hex string.
pub fn fingerprint(
    config: &PageConfig,
    inputs: &PageInputs<'_>,
    flags: ComposeFlags,
) -> Result<String, serde_json::Error> {
    let mut hasher = Sha256::new();
    feed(&mut hasher, b"config\0", config)?;
    feed(&mut hasher, b"flags\0", &flags)?;
    feed(&mut hasher, b"hero\0", inputs.hero)?;
    feed(&mut hasher, b"images\0", inputs.images)?;
    feed(&mut hasher, b"order\0", inputs.order)?;
    if let Some(sections) = inputs.layout.sections {
        feed(&mut hasher, b"sections\0", sections.states())?;
    }
    if let Some(texts) = inputs.layout.texts {
        feed(&mut hasher, b"texts\0", texts)?;
    }
    Ok(format!("{:x}", hasher.finalize()))
}

fn feed<T: Serialize + ?Sized>(
    hasher: &mut Sha256,
    tag: &[u8],
    value: &T,
) -> Result<(), serde_json::Error> {
    hasher.update(tag);
    serde_json::to_writer(&mut *hasher, value)
}

/// Counts of reused and freshly composed documents.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PreviewStats {
    pub reused: u32,
    pub rendered: u32,
}

impl fmt::Display for PreviewStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reused > 0 {
            write!(
                f,
                "{} reused, {} rendered ({} total)",
                self.reused,
                self.rendered,
                self.reused + self.rendered
            )
        } else {
            write!(f, "{} rendered", self.rendered)
        }
    }
}

/// The last composed document and its fingerprint.
#[derive(Debug, Default)]
pub struct PreviewCache {
    fingerprint: Option<String>,
    html: String,
    stats: PreviewStats,
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose the page, reusing the previous document when the inputs
    /// have not changed.
    pub fn render(&mut self, config: &PageConfig, state: &PageState, flags: ComposeFlags) -> &str {
        let inputs = state.inputs();
        let current = match fingerprint(config, &inputs, flags) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(error = %e, "could not fingerprint compose inputs");
                None
            }
        };

        if current.is_some() && current == self.fingerprint {
            self.stats.reused += 1;
            return &self.html;
        }

        self.html = compose::compose_page(config, &inputs, flags);
        self.fingerprint = current;
        self.stats.rendered += 1;
        &self.html
    }

    /// Drop the cached document.
    pub fn invalidate(&mut self) {
        self.fingerprint = None;
    }

    pub fn stats(&self) -> PreviewStats {
        self.stats
    }
}

// ============================================================================
// Minimap
// ============================================================================

/// One row of the navigation minimap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimapEntry<'a> {
    pub key: &'a str,
    pub label: String,
    /// Thumbnail URL, when the section has a real image.
    pub preview: Option<&'a str>,
    pub active: bool,
    pub held: bool,
}

/// Short uppercase label for a section.
pub fn section_label(key: &str) -> String {
    match SectionKind::of(key) {
        SectionKind::Hero => "HERO".to_string(),
        SectionKind::Gallery(gallery) => gallery.banner().to_string(),
        SectionKind::Spacer => "SPACER".to_string(),
        SectionKind::Image => key.to_uppercase(),
    }
}

/// Minimap rows in section order.
///
/// The hero has no image of its own; it shows the first product photo, or
/// the first model shot when there are no products.
pub fn minimap_entries(state: &PageState) -> Vec<MinimapEntry<'_>> {
    let assets = state.assets();
    state
        .order()
        .iter()
        .map(|key| {
            let preview = if key == HERO_KEY {
                assets
                    .first_preview(GalleryType::Products.asset_key())
                    .or_else(|| assets.first_preview(GalleryType::ModelShots.asset_key()))
            } else {
                assets.first_preview(key)
            };
            MinimapEntry {
                key,
                label: section_label(key),
                preview,
                active: state.active_section() == key,
                held: state.registry().is_held(key),
            }
        })
        .collect()
}

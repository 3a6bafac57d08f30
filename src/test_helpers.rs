//! Shared test utilities for the detailgen test suite.
//!
//! Provides sample page states, lookup helpers that panic with the list of
//! what *is* available, and assertions over composed HTML.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let state = sample_state();
//! let html = compose_page(&PageConfig::default(), &state.inputs(), ComposeFlags::export());
//!
//! assert_sections_in_order(&html, &["hero", "products", "models", "closeup"]);
//! assert_eq!(count_images(&html), 4);
//! ```

use crate::content::HeroField;
use crate::overlay::TextElement;
use crate::session::PageState;
use crate::types::{Asset, GalleryType};

// =========================================================================
// Sample states
// =========================================================================

/// Default layout with two products, one model shot and one closeup.
pub fn sample_state() -> PageState {
    let mut state = PageState::with_default_layout();
    state.set_hero_field(HeroField::ProductName, Some("Trail Runner".into()));
    state.set_gallery(
        GalleryType::Products,
        vec![
            Asset::Url("data:image/png;base64,cHJvZHVjdDE=".into()),
            Asset::Url("data:image/png;base64,cHJvZHVjdDI=".into()),
        ],
    );
    state.set_gallery(
        GalleryType::ModelShots,
        vec![Asset::shot("data:image/png;base64,bWFzdGVy", "Master")],
    );
    state.set_gallery(
        GalleryType::CloseupShots,
        vec![Asset::shot("data:image/png;base64,c2lkZQ==", "Side")],
    );
    state
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Section keys in render order.
pub fn order_of(state: &PageState) -> Vec<&str> {
    state.order().iter().map(String::as_str).collect()
}

/// Find a text element by ID. Panics if not found.
pub fn find_text<'a>(state: &'a PageState, id: &str) -> &'a TextElement {
    state.texts().get(id).unwrap_or_else(|| {
        let ids: Vec<&str> = state.texts().iter().map(|t| t.id.as_str()).collect();
        panic!("text '{id}' not found. Available: {ids:?}")
    })
}

/// URLs of a gallery in stored order. Panics if the key holds no gallery.
pub fn gallery_urls<'a>(state: &'a PageState, key: &str) -> Vec<&'a str> {
    let gallery = state.assets().gallery(key);
    if gallery.is_empty() && !state.assets().contains(key) {
        let keys: Vec<&str> = state.assets().keys().collect();
        panic!("gallery '{key}' not found. Available: {keys:?}");
    }
    gallery.iter().map(Asset::url).collect()
}

// =========================================================================
// HTML assertions
// =========================================================================

/// Byte offset of a section's root block. Panics if the section is absent.
pub fn section_offset(html: &str, key: &str) -> usize {
    let needle = format!(r#"data-section="{key}""#);
    html.find(&needle)
        .unwrap_or_else(|| panic!("section '{key}' not rendered"))
}

/// Assert that the given sections appear in this exact relative order.
pub fn assert_sections_in_order(html: &str, keys: &[&str]) {
    let offsets: Vec<usize> = keys.iter().map(|k| section_offset(html, k)).collect();
    for pair in offsets.windows(2) {
        assert!(
            pair[0] < pair[1],
            "sections out of order: expected {keys:?}, offsets {offsets:?}"
        );
    }
}

/// Number of `<img` tags in the document.
pub fn count_images(html: &str) -> usize {
    html.matches("<img ").count()
}

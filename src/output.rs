//! CLI output formatting.
//!
//! # Section Inventory
//!
//! Output is **section-centric**: every line starts from the section's
//! position in the page, with its kind and image count as detail and its
//! layout overrides as indented context lines.
//!
//! ```text
//! Sections
//! 001 hero (hero)
//!     Product: Trail Runner
//! 002 products (gallery, 2 images)
//! 003 custom-1700000000 (image, empty) [held]
//!     Height: 400px
//!     Zoom: 1.5
//!     Texts: 1
//!
//! Texts: 1 element
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::content::HeroField;
use crate::session::PageState;
use crate::types::{AssetEntry, SectionKind};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Renderable images held by a section.
fn image_count(state: &PageState, key: &str) -> usize {
    match state.assets().get(key) {
        Some(AssetEntry::Gallery(items)) => items.iter().filter(|a| !a.is_placeholder()).count(),
        Some(AssetEntry::Single(asset)) => usize::from(!asset.is_placeholder()),
        None => 0,
    }
}

/// Section header: index, key, kind and image count.
///
/// ```text
/// 002 products (gallery, 2 images)
/// 003 custom-1 (image, empty) [held]
/// ```
fn section_header(index: usize, state: &PageState, key: &str) -> String {
    let kind = SectionKind::of(key);
    let detail = match (kind, image_count(state, key)) {
        (SectionKind::Hero, _) => kind.name().to_string(),
        (_, 0) => format!("{}, empty", kind.name()),
        (_, n) => format!("{}, {}", kind.name(), plural(n, "image")),
    };
    let held = if state.registry().is_held(key) { " [held]" } else { "" };
    format!("{} {} ({}){}", format_index(index), key, detail, held)
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(state: &PageState) -> Vec<String> {
    let mut lines = vec!["Sections".to_string()];
    for (i, key) in state.order().iter().enumerate() {
        lines.push(section_header(i + 1, state, key));
        if SectionKind::of(key) == SectionKind::Hero {
            lines.push(format!(
                "{}Product: {}",
                indent(1),
                state.hero().resolve(HeroField::ProductName)
            ));
        }
        let layout = state.registry().state(key);
        if let Some(height) = layout.height_px {
            lines.push(format!("{}Height: {}px", indent(1), height));
        }
        if !layout.transform.is_identity() {
            lines.push(format!("{}Zoom: {}", indent(1), layout.transform.scale));
        }
        let texts = state.texts().for_section(key).count();
        if texts > 0 {
            lines.push(format!("{}Texts: {}", indent(1), texts));
        }
    }

    lines.push(String::new());
    lines.push(format!("Texts: {}", plural(state.texts().len(), "element")));

    let orphans: Vec<&str> = state
        .texts()
        .iter()
        .filter(|t| !state.registry().contains(&t.section_id))
        .map(|t| t.id.as_str())
        .collect();
    if !orphans.is_empty() {
        lines.push(format!(
            "{}Unplaced: {} (section missing)",
            indent(1),
            orphans.join(", ")
        ));
    }
    lines
}

pub fn print_check_output(state: &PageState) {
    for line in format_check_output(state) {
        println!("{}", line);
    }
}

// ============================================================================
// Init / compose / hero
// ============================================================================

pub fn format_init_output(state: &PageState, path: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, key) in state.order().iter().enumerate() {
        lines.push(section_header(i + 1, state, key));
    }
    lines.push(format!("Session → {}", path.display()));
    lines
}

pub fn print_init_output(state: &PageState, path: &Path) {
    for line in format_init_output(state, path) {
        println!("{}", line);
    }
}

pub fn format_compose_output(state: &PageState, path: &Path, bytes: usize) -> Vec<String> {
    let images: usize = state.order().iter().map(|k| image_count(state, k)).sum();
    vec![format!(
        "Composed {}, {} → {} ({} bytes)",
        plural(state.order().len(), "section"),
        plural(images, "image"),
        path.display(),
        bytes
    )]
}

pub fn print_compose_output(state: &PageState, path: &Path, bytes: usize) {
    for line in format_compose_output(state, path, bytes) {
        println!("{}", line);
    }
}

pub fn format_hero_output(state: &PageState, path: &Path) -> Vec<String> {
    vec![format!(
        "Hero {} → {}",
        state.hero().resolve(HeroField::ProductName),
        path.display()
    )]
}

pub fn print_hero_output(state: &PageState, path: &Path) {
    for line in format_hero_output(state, path) {
        println!("{}", line);
    }
}

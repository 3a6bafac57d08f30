//! # detailgen
//!
//! A composer for single-page product detail layouts. A page is a hero
//! block (brand line, product name, copy, spec grid, size guide) followed
//! by image sections in a user-chosen order. The whole page is one value,
//! [`session::PageState`], and every output is a pure function of it.
//!
//! # Architecture
//!
//! ```text
//!   import ──▶ ┌────────────┐ ──▶ compose ──▶ standalone HTML
//!              │ PageState  │
//! interaction ▶│  hero      │ ──▶ preview (fingerprint cache, minimap)
//!              │  assets    │
//! generation ─▶│  registry  │ ──▶ session.json
//!              │  overlays  │
//!              └────────────┘
//! ```
//!
//! Inputs (imported photos, pointer gestures, generated copy and shots)
//! only ever reach the page through methods on `PageState`, so the rules
//! that span stores (placeholder seeding, cascade deletes, the pinned hero)
//! live in one place.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Shared value types: assets, galleries, section kinds, transforms |
//! | [`content`] | Hero copy fields, defaults and tolerant parsing of generated copy |
//! | [`assets`] | Section key → image data, with clamping mutations |
//! | [`registry`] | Section order and per-section layout state |
//! | [`overlay`] | Free text boxes positioned inside sections |
//! | [`session`] | `PageState`, `Action` dispatch and the session file |
//! | [`compose`] | Page state → node tree → HTML (Maud) |
//! | [`preview`] | Fingerprinted compose cache and the navigation minimap |
//! | [`interaction`] | Gestures, scroll tracking, context menu, reorder, file drop |
//! | [`generation`] | Copy and image generation over a pluggable client |
//! | [`import`] | Local photos → data URLs with dimensions |
//! | [`config`] | `config.toml` loading, validation, merging and CSS generation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Node Tree, One Serializer
//!
//! The compositor first builds a typed tree ([`compose::tree::Node`]) and a
//! single Maud serializer turns it into markup. Exports and the live
//! preview share both; only [`compose::ComposeFlags`] differ. Text is
//! escaped by Maud, so hero copy and overlay content can never break out
//! of their elements.
//!
//! ## Never Fail on Content
//!
//! Missing data degrades instead of erroring: blank hero fields fall back
//! to stock copy, empty or placeholder images become drop zones, malformed
//! generated copy becomes the fallback copy, out-of-range gallery writes
//! clamp. Errors are reserved for structural misuse (duplicate section
//! keys, removing the hero, a reorder that is not a permutation) and I/O.
//!
//! ## Headless Interaction
//!
//! Gestures are a state machine over plain events with a
//! [`interaction::LayoutMeasure`] trait for the only geometry they need.
//! Whatever hosts the preview feeds events in and recomposes; tests drive
//! the same code with a `HashMap` of rectangles.
//!
//! ## Partial Generation Results
//!
//! Variation batches return a [`generation::BatchResult`] of successes and
//! failures instead of silently dropping failed shots. The master shot is
//! retried with exponential backoff; its failure aborts the set.

pub mod assets;
pub mod compose;
pub mod config;
pub mod content;
pub mod generation;
pub mod import;
pub mod interaction;
pub mod output;
pub mod overlay;
pub mod preview;
pub mod registry;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

//! Page state: the single application-state value.
//!
//! [`PageState`] owns the hero copy, the asset store, the section registry,
//! the text overlays and the active section. Every mutation goes through a
//! method on it (or through [`PageState::dispatch`] with an [`Action`]), so
//! cross-store rules live in one place:
//!
//! - appending a section seeds a placeholder asset for it,
//! - removing a section deletes its asset entry, its layout state and every
//!   text element bound to it,
//! - the hero section can never be removed.
//!
//! The state serializes to the session JSON file used by the CLI.

use crate::assets::AssetStore;
use crate::config::PageConfig;
use crate::content::{HeroField, HeroTextContent};
use crate::overlay::{TextEdit, TextOverlayStore};
use crate::registry::{RegistryError, SectionRegistry};
use crate::types::{Asset, GalleryType, HERO_KEY, ImageTransform};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("invalid session: {0}")]
    Invalid(String),
}

/// A request to change the page state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AppendSection(String),
    /// Add a `custom-<stamp>` image section at the end.
    AddImageSection { stamp: u64 },
    /// Add a `spacer-<stamp>` section right after the hero.
    AddSpacer { stamp: u64 },
    RemoveSection(String),
    Reorder(Vec<String>),
    UpdateImage { key: String, index: usize, url: String },
    DeleteShot { key: String, index: usize },
    DuplicateShot { key: String, index: usize },
    SetSectionHeight { key: String, height: f64 },
    ClearSectionHeight(String),
    SetImageTransform { key: String, transform: ImageTransform },
    ToggleHold(String),
    SetActiveSection(String),
    /// Add a text box to `section`, or to the active section when `None`.
    AddText { section: Option<String> },
    UpdateText { id: String, edit: TextEdit },
    DeleteText(String),
    SetHeroField { field: HeroField, value: Option<String> },
    MergeHeroCopy(HeroTextContent),
}

/// What a dispatched action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    /// A section or text element was created under this key/ID.
    Created(String),
    /// The target did not exist; nothing changed.
    Unchanged,
}

impl Outcome {
    fn from_flag(changed: bool) -> Self {
        if changed {
            Outcome::Changed
        } else {
            Outcome::Unchanged
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    #[serde(default)]
    hero_text_content: HeroTextContent,
    #[serde(default)]
    image_urls: AssetStore,
    #[serde(flatten)]
    registry: SectionRegistry,
    #[serde(default)]
    text_elements: TextOverlayStore,
    #[serde(default = "default_active_section")]
    active_section: String,
}

fn default_active_section() -> String {
    HERO_KEY.to_string()
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

impl PageState {
    /// A page holding only the hero section.
    pub fn new() -> Self {
        Self {
            hero_text_content: HeroTextContent::default(),
            image_urls: AssetStore::new(),
            registry: SectionRegistry::new(),
            text_elements: TextOverlayStore::new(),
            active_section: default_active_section(),
        }
    }

    /// Hero followed by the three galleries, each seeded with a placeholder.
    pub fn with_default_layout() -> Self {
        let mut state = Self::new();
        for gallery in GalleryType::ALL {
            // Fresh state: the gallery keys cannot collide.
            let _ = state.append_section(gallery.section_key());
        }
        state
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn hero(&self) -> &HeroTextContent {
        &self.hero_text_content
    }

    pub fn assets(&self) -> &AssetStore {
        &self.image_urls
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn order(&self) -> &[String] {
        self.registry.order()
    }

    pub fn texts(&self) -> &TextOverlayStore {
        &self.text_elements
    }

    pub fn active_section(&self) -> &str {
        &self.active_section
    }

    // =========================================================================
    // Hero copy
    // =========================================================================

    pub fn set_hero_field(&mut self, field: HeroField, value: Option<String>) {
        self.hero_text_content.set(field, value);
    }

    pub fn set_hero(&mut self, hero: HeroTextContent) {
        self.hero_text_content = hero;
    }

    pub fn merge_hero(&mut self, copy: &HeroTextContent) {
        self.hero_text_content.merge(copy);
    }

    // =========================================================================
    // Sections
    // =========================================================================

    /// Append a section and seed a placeholder asset for it.
    pub fn append_section(&mut self, key: &str) -> Result<(), RegistryError> {
        self.registry.append(key)?;
        self.image_urls.seed_placeholder(key);
        Ok(())
    }

    /// Append a fresh `custom-<stamp>` image section. Returns its key.
    pub fn add_image_section(&mut self, stamp: u64) -> Result<String, RegistryError> {
        let key = self.registry.custom_key(stamp);
        self.append_section(&key)?;
        Ok(key)
    }

    /// Insert a fresh `spacer-<stamp>` right after the hero. Returns its key.
    pub fn add_spacer(&mut self, stamp: u64) -> Result<String, RegistryError> {
        let key = self.registry.spacer_key(stamp);
        self.registry.insert_after(key.as_str(), HERO_KEY)?;
        self.image_urls.seed_placeholder(&key);
        Ok(key)
    }

    /// Remove a section with everything bound to it.
    /// Returns the number of text elements that went with it.
    pub fn remove_section(&mut self, key: &str) -> Result<usize, RegistryError> {
        self.registry.remove(key)?;
        self.image_urls.remove(key);
        let texts = self.text_elements.remove_section(key);
        if self.active_section == key {
            self.active_section = default_active_section();
        }
        tracing::debug!(key, texts, "removed section");
        Ok(texts)
    }

    pub fn reorder(&mut self, order: Vec<String>) -> Result<(), RegistryError> {
        self.registry.reorder(order)
    }

    /// Store a height override, floored only at the registry's hard minimum.
    pub fn set_section_height(&mut self, key: &str, height: f64) -> Result<f64, RegistryError> {
        self.registry.set_height(key, height)
    }

    /// Store a height override floored at `sections.min_height`. User
    /// edits (actions, resizes, drops) go through here.
    pub fn resize_section(
        &mut self,
        key: &str,
        height: f64,
        config: &PageConfig,
    ) -> Result<f64, RegistryError> {
        self.registry.set_height(key, height.max(config.sections.min_height))
    }

    pub fn clear_section_height(&mut self, key: &str) -> Result<(), RegistryError> {
        self.registry.clear_height(key)
    }

    pub fn set_image_transform(
        &mut self,
        key: &str,
        transform: ImageTransform,
    ) -> Result<(), RegistryError> {
        self.registry.set_transform(key, transform)
    }

    pub fn reset_image_transform(&mut self, key: &str) -> Result<(), RegistryError> {
        self.registry.reset_transform(key)
    }

    pub fn toggle_hold(&mut self, key: &str) -> Result<bool, RegistryError> {
        self.registry.toggle_hold(key)
    }

    /// Make `key` the active section. Unknown keys are ignored.
    pub fn set_active_section(&mut self, key: &str) -> bool {
        if !self.registry.contains(key) || self.active_section == key {
            return false;
        }
        self.active_section = key.to_string();
        true
    }

    /// True when the section has no renderable image.
    pub fn is_placeholder_section(&self, key: &str) -> bool {
        self.image_urls.is_empty_section(key)
    }

    // =========================================================================
    // Assets
    // =========================================================================

    pub fn update_image(&mut self, key: &str, index: usize, url: &str) {
        self.image_urls.update_image(key, index, url);
    }

    pub fn delete_shot(&mut self, key: &str, index: usize) -> bool {
        self.image_urls.delete_shot(key, index)
    }

    pub fn duplicate_shot(&mut self, key: &str, index: usize) -> bool {
        self.image_urls.duplicate_shot(key, index)
    }

    pub fn replace_shot(&mut self, key: &str, index: usize, asset: Asset) -> bool {
        self.image_urls.replace_shot(key, index, asset)
    }

    pub fn set_gallery(&mut self, gallery: GalleryType, assets: Vec<Asset>) {
        self.image_urls.set_gallery(gallery.asset_key(), assets);
    }

    // =========================================================================
    // Text overlays
    // =========================================================================

    /// Add a text box. An explicit section must exist; without one the box
    /// goes to the active section. Returns the new ID, or `None` when the
    /// explicit target is unknown.
    pub fn add_text(&mut self, section: Option<&str>, config: &PageConfig) -> Option<String> {
        let target = match section {
            Some(key) if self.registry.contains(key) => key.to_string(),
            Some(_) => return None,
            None if self.registry.contains(&self.active_section) => self.active_section.clone(),
            None => default_active_section(),
        };
        Some(self.text_elements.add(&target, &config.text))
    }

    pub fn update_text(&mut self, id: &str, edit: TextEdit) -> bool {
        self.text_elements.update(id, edit)
    }

    pub fn remove_text(&mut self, id: &str) -> bool {
        self.text_elements.remove(id)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Apply one [`Action`].
    ///
    /// Registry misuse (duplicate keys, removing the hero, a reorder that is
    /// not a permutation) is returned as an error and leaves the state
    /// untouched. Actions on missing targets return [`Outcome::Unchanged`].
    pub fn dispatch(&mut self, action: Action, config: &PageConfig) -> Result<Outcome, SessionError> {
        let outcome = match action {
            Action::AppendSection(key) => {
                self.append_section(&key)?;
                Outcome::Created(key)
            }
            Action::AddImageSection { stamp } => Outcome::Created(self.add_image_section(stamp)?),
            Action::AddSpacer { stamp } => Outcome::Created(self.add_spacer(stamp)?),
            Action::RemoveSection(key) => {
                self.remove_section(&key)?;
                Outcome::Changed
            }
            Action::Reorder(order) => {
                self.reorder(order)?;
                Outcome::Changed
            }
            Action::UpdateImage { key, index, url } => {
                self.update_image(&key, index, &url);
                Outcome::Changed
            }
            Action::DeleteShot { key, index } => Outcome::from_flag(self.delete_shot(&key, index)),
            Action::DuplicateShot { key, index } => {
                Outcome::from_flag(self.duplicate_shot(&key, index))
            }
            Action::SetSectionHeight { key, height } => {
                Outcome::from_flag(self.resize_section(&key, height, config).is_ok())
            }
            Action::ClearSectionHeight(key) => {
                Outcome::from_flag(self.clear_section_height(&key).is_ok())
            }
            Action::SetImageTransform { key, transform } => {
                Outcome::from_flag(self.set_image_transform(&key, transform).is_ok())
            }
            Action::ToggleHold(key) => Outcome::from_flag(self.toggle_hold(&key).is_ok()),
            Action::SetActiveSection(key) => Outcome::from_flag(self.set_active_section(&key)),
            Action::AddText { section } => match self.add_text(section.as_deref(), config) {
                Some(id) => Outcome::Created(id),
                None => Outcome::Unchanged,
            },
            Action::UpdateText { id, edit } => Outcome::from_flag(self.update_text(&id, edit)),
            Action::DeleteText(id) => Outcome::from_flag(self.remove_text(&id)),
            Action::SetHeroField { field, value } => {
                self.set_hero_field(field, value);
                Outcome::Changed
            }
            Action::MergeHeroCopy(copy) => {
                self.merge_hero(&copy);
                Outcome::Changed
            }
        };
        Ok(outcome)
    }

    // =========================================================================
    // Session file
    // =========================================================================

    /// Check the structural invariants of a loaded session.
    pub fn validate(&self) -> Result<(), SessionError> {
        let (heroes, duplicate) = self.registry.integrity();
        if heroes != 1 {
            return Err(SessionError::Invalid(format!(
                "section order must contain \"{HERO_KEY}\" exactly once (found {heroes})"
            )));
        }
        if let Some(key) = duplicate {
            return Err(SessionError::Invalid(format!(
                "duplicate section key: {key}"
            )));
        }
        Ok(())
    }

    /// Read and validate a session file.
    ///
    /// An active section that is no longer in the order falls back to the
    /// hero. Text elements bound to missing sections are kept; they simply
    /// do not render.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let content = fs::read_to_string(path)?;
        let mut state: PageState = serde_json::from_str(&content)?;
        state.validate()?;
        if !state.registry.contains(&state.active_section) {
            state.active_section = default_active_section();
        }
        let orphans = state
            .text_elements
            .iter()
            .filter(|t| !state.registry.contains(&t.section_id))
            .count();
        if orphans > 0 {
            tracing::warn!(orphans, "text elements bound to sections not in the order");
        }
        tracing::info!(
            path = %path.display(),
            sections = state.registry.len(),
            "loaded session"
        );
        Ok(state)
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        tracing::info!(path = %path.display(), "saved session");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn config() -> PageConfig {
        PageConfig::default()
    }

    #[test]
    fn default_layout_order_and_placeholders() {
        let state = PageState::with_default_layout();
        assert_eq!(order_of(&state), vec!["hero", "products", "models", "closeup"]);
        assert!(state.is_placeholder_section("products"));
        assert_eq!(state.assets().gallery("modelShots").len(), 1);
    }

    #[test]
    fn add_image_section_seeds_single_placeholder() {
        let mut state = PageState::new();
        let key = state.add_image_section(1700).unwrap();
        assert_eq!(key, "custom-1700");
        assert!(state.assets().single(&key).is_some());
        assert!(state.is_placeholder_section(&key));
    }

    #[test]
    fn height_action_uses_configured_floor() {
        let mut cfg = config();
        cfg.sections.min_height = 80.0;
        let mut state = PageState::new();
        let key = state.add_image_section(1).unwrap();

        let action = Action::SetSectionHeight {
            key: key.clone(),
            height: 60.0,
        };
        assert_eq!(state.dispatch(action, &cfg).unwrap(), Outcome::Changed);
        assert_eq!(state.registry().state(&key).height_px, Some(80.0));

        // The direct setter only knows the hard floor.
        state.set_section_height(&key, 60.0).unwrap();
        assert_eq!(state.registry().state(&key).height_px, Some(60.0));
    }

    #[test]
    fn spacer_goes_after_hero() {
        let mut state = PageState::with_default_layout();
        let key = state.add_spacer(5).unwrap();
        assert_eq!(state.order()[1], key);
    }

    #[test]
    fn remove_section_cascades() {
        let mut state = PageState::with_default_layout();
        let key = state.add_image_section(1).unwrap();
        state.set_section_height(&key, 400.0).unwrap();
        state.set_active_section(&key);
        state.add_text(None, &config()).unwrap();
        state.add_text(Some("hero"), &config()).unwrap();

        assert_eq!(state.remove_section(&key), Ok(1));
        assert!(!state.registry().contains(&key));
        assert!(!state.assets().contains(&key));
        assert!(state.registry().states().is_empty());
        assert_eq!(state.texts().len(), 1);
        assert_eq!(state.active_section(), "hero");
    }

    #[test]
    fn hero_removal_rejected_through_dispatch() {
        let mut state = PageState::with_default_layout();
        let result = state.dispatch(Action::RemoveSection("hero".into()), &config());
        assert!(matches!(
            result,
            Err(SessionError::Registry(RegistryError::HeroIsPinned))
        ));
        assert_eq!(state.order().len(), 4);
    }

    #[test]
    fn add_text_targets_active_section() {
        let mut state = PageState::with_default_layout();
        state.set_active_section("models");
        let id = state.add_text(None, &config()).unwrap();
        assert_eq!(state.texts().get(&id).unwrap().section_id, "models");
    }

    #[test]
    fn add_text_to_unknown_section_is_noop() {
        let mut state = PageState::new();
        assert_eq!(state.add_text(Some("ghost"), &config()), None);
        assert!(state.texts().is_empty());
    }

    #[test]
    fn set_active_section_ignores_unknown() {
        let mut state = PageState::new();
        assert!(!state.set_active_section("ghost"));
        assert_eq!(state.active_section(), "hero");
    }

    #[test]
    fn dispatch_reports_outcomes() {
        let mut state = PageState::with_default_layout();
        let cfg = config();
        assert_eq!(
            state.dispatch(Action::AddImageSection { stamp: 9 }, &cfg).unwrap(),
            Outcome::Created("custom-9".into())
        );
        assert_eq!(
            state
                .dispatch(Action::ToggleHold("custom-9".into()), &cfg)
                .unwrap(),
            Outcome::Changed
        );
        assert_eq!(
            state.dispatch(Action::ToggleHold("ghost".into()), &cfg).unwrap(),
            Outcome::Unchanged
        );
        assert_eq!(
            state
                .dispatch(Action::DeleteText("text-1".into()), &cfg)
                .unwrap(),
            Outcome::Unchanged
        );
        assert_eq!(
            state
                .dispatch(
                    Action::SetHeroField {
                        field: HeroField::ProductName,
                        value: Some("X".into()),
                    },
                    &cfg,
                )
                .unwrap(),
            Outcome::Changed
        );
        assert_eq!(state.hero().resolve(HeroField::ProductName), "X");
    }

    #[test]
    fn dispatch_reorder_validates() {
        let mut state = PageState::with_default_layout();
        let bad = Action::Reorder(vec!["hero".into(), "products".into()]);
        assert!(state.dispatch(bad, &config()).is_err());
        assert_eq!(order_of(&state), vec!["hero", "products", "models", "closeup"]);
    }

    #[test]
    fn json_uses_session_field_names() {
        let state = PageState::with_default_layout();
        let value = serde_json::to_value(&state).unwrap();
        for field in [
            "heroTextContent",
            "imageUrls",
            "sectionOrder",
            "sections",
            "textElements",
            "activeSection",
        ] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");

        let mut state = PageState::with_default_layout();
        state.update_image("products", 0, "data:image/png;base64,AAAA");
        state.set_hero_field(HeroField::BrandLine, Some("ACME".into()));
        state.add_text(Some("products"), &config());
        state.save(&path).unwrap();

        let loaded = PageState::load(&path).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn load_rejects_missing_hero() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(&path, r#"{"sectionOrder":["products"]}"#).unwrap();
        assert!(matches!(
            PageState::load(&path),
            Err(SessionError::Invalid(_))
        ));
    }

    #[test]
    fn load_rejects_duplicate_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(&path, r#"{"sectionOrder":["hero","products","products"]}"#).unwrap();
        assert!(matches!(
            PageState::load(&path),
            Err(SessionError::Invalid(_))
        ));
    }

    #[test]
    fn load_resets_stale_active_section() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(
            &path,
            r#"{"sectionOrder":["hero"],"activeSection":"custom-1"}"#,
        )
        .unwrap();
        assert_eq!(PageState::load(&path).unwrap().active_section(), "hero");
    }
}

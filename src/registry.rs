//! Section registry: the ordered list of section keys plus per-section
//! layout state.
//!
//! The order is the only source of render order. The `hero` key is pinned:
//! it can be moved but never removed. Every mutation that would break key
//! uniqueness is rejected with a [`RegistryError`] and leaves the registry
//! untouched.

use crate::types::{CUSTOM_PREFIX, HERO_KEY, ImageTransform, SPACER_PREFIX};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Hard floor for section heights, in pixels.
pub const MIN_SECTION_HEIGHT: f64 = 50.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("section already exists: {0}")]
    DuplicateKey(String),
    #[error("unknown section: {0}")]
    UnknownKey(String),
    #[error("the hero section cannot be removed")]
    HeroIsPinned,
    #[error(
        "new order is not a permutation of the current sections \
         (missing: {missing:?}, unexpected: {unexpected:?})"
    )]
    NotAPermutation {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
}

/// Layout state of one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_px: Option<f64>,
    #[serde(skip_serializing_if = "ImageTransform::is_identity")]
    pub transform: ImageTransform,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub held: bool,
}

impl SectionState {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRegistry {
    section_order: Vec<String>,
    #[serde(default)]
    sections: BTreeMap<String, SectionState>,
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionRegistry {
    /// A registry holding only the hero section.
    pub fn new() -> Self {
        Self {
            section_order: vec![HERO_KEY.to_string()],
            sections: BTreeMap::new(),
        }
    }

    /// Build from an explicit order, rejecting duplicates.
    pub fn from_order<I, S>(keys: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self {
            section_order: Vec::new(),
            sections: BTreeMap::new(),
        };
        for key in keys {
            registry.append(key.into())?;
        }
        Ok(registry)
    }

    pub fn order(&self) -> &[String] {
        &self.section_order
    }

    pub fn contains(&self, key: &str) -> bool {
        self.section_order.iter().any(|k| k == key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.section_order.iter().position(|k| k == key)
    }

    pub fn len(&self) -> usize {
        self.section_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.section_order.is_empty()
    }

    pub fn append(&mut self, key: impl Into<String>) -> Result<(), RegistryError> {
        let key = key.into();
        if self.contains(&key) {
            return Err(RegistryError::DuplicateKey(key));
        }
        self.section_order.push(key);
        Ok(())
    }

    /// Insert right after `after`, or append when `after` is not present.
    pub fn insert_after(
        &mut self,
        key: impl Into<String>,
        after: &str,
    ) -> Result<(), RegistryError> {
        let key = key.into();
        if self.contains(&key) {
            return Err(RegistryError::DuplicateKey(key));
        }
        match self.position(after) {
            Some(pos) => self.section_order.insert(pos + 1, key),
            None => self.section_order.push(key),
        }
        Ok(())
    }

    /// Remove a section and its layout state.
    pub fn remove(&mut self, key: &str) -> Result<(), RegistryError> {
        if key == HERO_KEY {
            return Err(RegistryError::HeroIsPinned);
        }
        let pos = self
            .position(key)
            .ok_or_else(|| RegistryError::UnknownKey(key.to_string()))?;
        self.section_order.remove(pos);
        self.sections.remove(key);
        Ok(())
    }

    /// Replace the order wholesale. The new order must contain exactly the
    /// current keys, each once.
    pub fn reorder(&mut self, new_order: Vec<String>) -> Result<(), RegistryError> {
        let current: BTreeSet<&str> = self.section_order.iter().map(String::as_str).collect();
        let mut seen = BTreeSet::new();
        let mut unexpected = Vec::new();
        for key in &new_order {
            if !current.contains(key.as_str()) || !seen.insert(key.as_str()) {
                unexpected.push(key.clone());
            }
        }
        let missing: Vec<String> = current
            .iter()
            .filter(|key| !seen.contains(*key))
            .map(|key| key.to_string())
            .collect();

        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(RegistryError::NotAPermutation {
                missing,
                unexpected,
            });
        }
        self.section_order = new_order;
        Ok(())
    }

    /// Mint a `custom-<stamp>` key, bumping the stamp until it is unused.
    pub fn custom_key(&self, stamp: u64) -> String {
        self.mint(CUSTOM_PREFIX, stamp)
    }

    /// Mint a `spacer-<stamp>` key, bumping the stamp until it is unused.
    pub fn spacer_key(&self, stamp: u64) -> String {
        self.mint(SPACER_PREFIX, stamp)
    }

    fn mint(&self, prefix: &str, mut stamp: u64) -> String {
        loop {
            let key = format!("{prefix}{stamp}");
            if !self.contains(&key) {
                return key;
            }
            stamp = stamp.wrapping_add(1);
        }
    }

    /// Layout state of a section; default when never touched.
    pub fn state(&self, key: &str) -> SectionState {
        self.sections.get(key).copied().unwrap_or_default()
    }

    fn state_mut(&mut self, key: &str) -> Result<&mut SectionState, RegistryError> {
        if !self.contains(key) {
            return Err(RegistryError::UnknownKey(key.to_string()));
        }
        Ok(self.sections.entry(key.to_string()).or_default())
    }

    fn prune(&mut self, key: &str) {
        if self.sections.get(key).is_some_and(SectionState::is_default) {
            self.sections.remove(key);
        }
    }

    /// Store a height override, floored at [`MIN_SECTION_HEIGHT`].
    /// Returns the stored height.
    pub fn set_height(&mut self, key: &str, px: f64) -> Result<f64, RegistryError> {
        let height = if px.is_finite() {
            px.max(MIN_SECTION_HEIGHT)
        } else {
            MIN_SECTION_HEIGHT
        };
        self.state_mut(key)?.height_px = Some(height);
        Ok(height)
    }

    pub fn clear_height(&mut self, key: &str) -> Result<(), RegistryError> {
        self.state_mut(key)?.height_px = None;
        self.prune(key);
        Ok(())
    }

    pub fn set_transform(
        &mut self,
        key: &str,
        transform: ImageTransform,
    ) -> Result<(), RegistryError> {
        self.state_mut(key)?.transform = transform;
        self.prune(key);
        Ok(())
    }

    pub fn reset_transform(&mut self, key: &str) -> Result<(), RegistryError> {
        self.set_transform(key, ImageTransform::IDENTITY)
    }

    /// Flip the hold flag. Returns the new value.
    pub fn toggle_hold(&mut self, key: &str) -> Result<bool, RegistryError> {
        let state = self.state_mut(key)?;
        state.held = !state.held;
        let held = state.held;
        self.prune(key);
        Ok(held)
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.state(key).held
    }

    /// All non-default section states, keyed by section.
    pub fn states(&self) -> &BTreeMap<String, SectionState> {
        &self.sections
    }

    /// Count of `hero` entries and the first duplicated key, if any.
    pub(crate) fn integrity(&self) -> (usize, Option<&str>) {
        let heroes = self.section_order.iter().filter(|k| *k == HERO_KEY).count();
        let mut seen = BTreeSet::new();
        let duplicate = self
            .section_order
            .iter()
            .find(|k| !seen.insert(k.as_str()))
            .map(String::as_str);
        (heroes, duplicate)
    }
}

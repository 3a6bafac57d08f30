//! Asset store: section key → image data.
//!
//! Gallery sections keep an ordered array of assets, every other section a
//! single asset. Keys are resolved through [`asset_key_for`], so callers may
//! pass either the section key (`models`) or the array key (`modelShots`).
//!
//! Mutations never panic on bad indices. Out-of-range writes clamp to the
//! last slot and never grow a gallery; out-of-range deletes and duplicates
//! are no-ops.

use crate::types::{Asset, AssetEntry, GalleryType, asset_key_for};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffix appended to the pose of a duplicated shot.
const COPY_SUFFIX: &str = " (Copy)";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetStore {
    entries: BTreeMap<String, AssetEntry>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AssetEntry> {
        self.entries.get(asset_key_for(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(asset_key_for(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, key: &str, entry: AssetEntry) {
        self.entries.insert(asset_key_for(key).to_string(), entry);
    }

    pub fn set_gallery(&mut self, key: &str, assets: Vec<Asset>) {
        self.insert(key, AssetEntry::Gallery(assets));
    }

    pub fn set_single(&mut self, key: &str, asset: Asset) {
        self.insert(key, AssetEntry::Single(asset));
    }

    pub fn remove(&mut self, key: &str) -> Option<AssetEntry> {
        self.entries.remove(asset_key_for(key))
    }

    /// Entries of a gallery; empty for missing or single-asset keys.
    pub fn gallery(&self, key: &str) -> &[Asset] {
        match self.get(key) {
            Some(AssetEntry::Gallery(items)) => items,
            _ => &[],
        }
    }

    /// Asset of a single-image section.
    pub fn single(&self, key: &str) -> Option<&Asset> {
        match self.get(key) {
            Some(AssetEntry::Single(asset)) => Some(asset),
            _ => None,
        }
    }

    /// True when the key has no renderable image.
    pub fn is_empty_section(&self, key: &str) -> bool {
        self.get(key).is_none_or(AssetEntry::is_empty)
    }

    /// Seed a fresh placeholder for a newly appended section.
    ///
    /// Gallery keys get a one-slot placeholder gallery, others a single
    /// placeholder. An existing entry is left untouched.
    pub fn seed_placeholder(&mut self, key: &str) {
        if self.contains(key) {
            return;
        }
        let entry = if GalleryType::from_key(key).is_some() {
            AssetEntry::Gallery(vec![Asset::placeholder()])
        } else {
            AssetEntry::Single(Asset::placeholder())
        };
        self.insert(key, entry);
    }

    /// Replace the image at `index`.
    ///
    /// For galleries the index clamps to the last slot and an empty gallery
    /// receives the URL as its only entry. Single entries ignore the index.
    /// A missing key becomes a single asset.
    pub fn update_image(&mut self, key: &str, index: usize, url: &str) {
        let asset_key = asset_key_for(key).to_string();
        match self.entries.get_mut(&asset_key) {
            Some(AssetEntry::Gallery(items)) => {
                if items.is_empty() {
                    items.push(Asset::Url(url.to_string()));
                    return;
                }
                let slot = index.min(items.len() - 1);
                if slot != index {
                    tracing::debug!(key, index, slot, "gallery index out of range, clamping");
                }
                items[slot] = items[slot].with_url(url);
            }
            Some(AssetEntry::Single(asset)) => {
                *asset = asset.with_url(url);
            }
            None => {
                self.entries
                    .insert(asset_key, AssetEntry::Single(Asset::Url(url.to_string())));
            }
        }
    }

    /// Remove a gallery shot. The last remaining shot becomes a placeholder.
    ///
    /// Returns `false` when nothing changed.
    pub fn delete_shot(&mut self, key: &str, index: usize) -> bool {
        match self.entries.get_mut(asset_key_for(key)) {
            Some(AssetEntry::Gallery(items)) if index < items.len() => {
                if items.len() <= 1 {
                    items[index] = Asset::placeholder();
                } else {
                    items.remove(index);
                }
                true
            }
            _ => false,
        }
    }

    /// Insert a copy of a gallery shot right after it.
    pub fn duplicate_shot(&mut self, key: &str, index: usize) -> bool {
        match self.entries.get_mut(asset_key_for(key)) {
            Some(AssetEntry::Gallery(items)) if index < items.len() => {
                let copy = match &items[index] {
                    Asset::Shot {
                        url,
                        generating_params,
                    } => Asset::shot(url.clone(), format!("{}{COPY_SUFFIX}", generating_params.pose)),
                    plain => plain.clone(),
                };
                items.insert(index + 1, copy);
                true
            }
            _ => false,
        }
    }

    /// Swap the shot at `index` for a new asset, pose included.
    pub fn replace_shot(&mut self, key: &str, index: usize, asset: Asset) -> bool {
        match self.entries.get_mut(asset_key_for(key)) {
            Some(AssetEntry::Gallery(items)) if index < items.len() => {
                items[index] = asset;
                true
            }
            _ => false,
        }
    }

    /// First non-placeholder URL of a section, for thumbnails.
    pub fn first_preview(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            AssetEntry::Single(asset) => (!asset.is_placeholder()).then(|| asset.url()),
            AssetEntry::Gallery(items) => items
                .iter()
                .find(|asset| !asset.is_placeholder())
                .map(Asset::url),
        }
    }
}

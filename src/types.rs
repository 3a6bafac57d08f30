//! Shared types used across the page state, the compositor, and the
//! interaction layer.
//!
//! Asset values are serialized exactly as the editor stores them: a gallery
//! slot is either a bare URL string or an object carrying the URL plus the
//! generation parameters that produced it.

use serde::{Deserialize, Serialize};

/// Reserved key of the hero copy block.
pub const HERO_KEY: &str = "hero";

/// Prefix of user-added image sections (`custom-<timestamp>`).
pub const CUSTOM_PREFIX: &str = "custom-";

/// Prefix of blank spacer sections (`spacer-<timestamp>`).
pub const SPACER_PREFIX: &str = "spacer-";

/// Pose recorded on the canonical placeholder asset.
pub const PLACEHOLDER_POSE: &str = "placeholder";

/// Inline SVG shown for empty slots. The URL itself carries the word
/// `placeholder`, so it is caught by [`is_placeholder_url`].
pub const PLACEHOLDER_URL: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' id='placeholder' viewBox='0 0 100 133'%3E%3Crect width='100%25' height='100%25' fill='%23eee'/%3E%3Ctext x='50%25' y='50%25' text-anchor='middle' font-size='12'%3EEmpty%3C/text%3E%3C/svg%3E";

/// An asset URL is empty/placeholder iff it is blank or mentions `placeholder`.
pub fn is_placeholder_url(url: &str) -> bool {
    url.trim().is_empty() || url.contains("placeholder")
}

/// Parameters the generation client was asked for when producing a shot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratingParams {
    #[serde(default)]
    pub pose: String,
}

/// A single image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Asset {
    /// Plain data URL or remote URL (uploaded product photos).
    Url(String),
    /// Generated shot with the parameters that produced it.
    Shot {
        url: String,
        #[serde(rename = "generatingParams", default)]
        generating_params: GeneratingParams,
    },
}

impl Asset {
    pub fn url(&self) -> &str {
        match self {
            Asset::Url(url) => url,
            Asset::Shot { url, .. } => url,
        }
    }

    pub fn shot(url: impl Into<String>, pose: impl Into<String>) -> Self {
        Asset::Shot {
            url: url.into(),
            generating_params: GeneratingParams { pose: pose.into() },
        }
    }

    /// The canonical empty slot.
    pub fn placeholder() -> Self {
        Self::shot(PLACEHOLDER_URL, PLACEHOLDER_POSE)
    }

    pub fn is_placeholder(&self) -> bool {
        is_placeholder_url(self.url())
    }

    pub fn pose(&self) -> Option<&str> {
        match self {
            Asset::Url(_) => None,
            Asset::Shot {
                generating_params, ..
            } => Some(&generating_params.pose),
        }
    }

    /// Same shape, new URL. A shot keeps its generation parameters.
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        match self {
            Asset::Url(_) => Asset::Url(url.into()),
            Asset::Shot {
                generating_params, ..
            } => Asset::Shot {
                url: url.into(),
                generating_params: generating_params.clone(),
            },
        }
    }
}

/// Value stored per key in the asset store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetEntry {
    Gallery(Vec<Asset>),
    Single(Asset),
}

impl AssetEntry {
    /// True when nothing in the entry would render as an image.
    pub fn is_empty(&self) -> bool {
        match self {
            AssetEntry::Single(asset) => asset.is_placeholder(),
            AssetEntry::Gallery(items) => items.iter().all(Asset::is_placeholder),
        }
    }
}

/// Pan/zoom applied to a section's image, independent of the section height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageTransform {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
}

impl ImageTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// CSS `transform` value. Scale first, so translation is in scaled pixels.
    pub fn to_css(&self) -> String {
        format!(
            "scale({}) translate({}px, {}px)",
            self.scale, self.x, self.y
        )
    }
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The three multi-shot galleries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GalleryType {
    Products,
    ModelShots,
    CloseupShots,
}

impl GalleryType {
    pub const ALL: [GalleryType; 3] = [
        GalleryType::Products,
        GalleryType::ModelShots,
        GalleryType::CloseupShots,
    ];

    /// Key of the gallery array in the asset store.
    pub fn asset_key(self) -> &'static str {
        match self {
            GalleryType::Products => "products",
            GalleryType::ModelShots => "modelShots",
            GalleryType::CloseupShots => "closeupShots",
        }
    }

    /// Key of the page section that shows this gallery.
    pub fn section_key(self) -> &'static str {
        match self {
            GalleryType::Products => "products",
            GalleryType::ModelShots => "models",
            GalleryType::CloseupShots => "closeup",
        }
    }

    /// Label strip shown above the gallery.
    pub fn label(self) -> &'static str {
        match self {
            GalleryType::Products => "Product Details",
            GalleryType::ModelShots => "Model Styling",
            GalleryType::CloseupShots => "Detail View",
        }
    }

    /// Text of the empty-state banner.
    pub fn banner(self) -> &'static str {
        match self {
            GalleryType::Products => "PRODUCT",
            GalleryType::ModelShots => "MODEL",
            GalleryType::CloseupShots => "DETAIL",
        }
    }

    /// Accepts either the section key or the asset key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "products" => Some(GalleryType::Products),
            "models" | "modelShots" => Some(GalleryType::ModelShots),
            "closeup" | "closeupShots" => Some(GalleryType::CloseupShots),
            _ => None,
        }
    }
}

/// What a section is, derived from its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Hero,
    Gallery(GalleryType),
    Image,
    Spacer,
}

impl SectionKind {
    pub fn of(key: &str) -> Self {
        if key == HERO_KEY {
            SectionKind::Hero
        } else if let Some(gallery) = GalleryType::from_key(key) {
            SectionKind::Gallery(gallery)
        } else if key.starts_with(SPACER_PREFIX) {
            SectionKind::Spacer
        } else {
            SectionKind::Image
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::Gallery(_) => "gallery",
            SectionKind::Image => "image",
            SectionKind::Spacer => "spacer",
        }
    }
}

/// Asset-store key holding the data of a section.
///
/// Gallery sections are stored under their array name (`models` →
/// `modelShots`); every other section is stored under its own key.
pub fn asset_key_for(section_key: &str) -> &str {
    match GalleryType::from_key(section_key) {
        Some(gallery) => gallery.asset_key(),
        None => section_key,
    }
}

/// A point in the coordinate space of the preview surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Measured box of a rendered section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_detection() {
        assert!(is_placeholder_url(""));
        assert!(is_placeholder_url("   "));
        assert!(is_placeholder_url("https://via.placeholder.com/600"));
        assert!(is_placeholder_url(PLACEHOLDER_URL));
        assert!(!is_placeholder_url("data:image/png;base64,AAAA"));
    }

    #[test]
    fn canonical_placeholder_is_detected() {
        let asset = Asset::placeholder();
        assert!(asset.is_placeholder());
        assert_eq!(asset.pose(), Some(PLACEHOLDER_POSE));
    }

    #[test]
    fn asset_parses_both_shapes() {
        let plain: Asset = serde_json::from_str(r#""data:a""#).unwrap();
        assert_eq!(plain, Asset::Url("data:a".into()));

        let shot: Asset =
            serde_json::from_str(r#"{"url":"data:b","generatingParams":{"pose":"Walk"}}"#)
                .unwrap();
        assert_eq!(shot.url(), "data:b");
        assert_eq!(shot.pose(), Some("Walk"));
    }

    #[test]
    fn shot_without_params_parses() {
        let shot: Asset = serde_json::from_str(r#"{"url":"data:b"}"#).unwrap();
        assert_eq!(shot.pose(), Some(""));
    }

    #[test]
    fn entry_distinguishes_gallery_from_single() {
        let gallery: AssetEntry = serde_json::from_str(r#"["data:a", "data:b"]"#).unwrap();
        assert!(matches!(gallery, AssetEntry::Gallery(ref v) if v.len() == 2));

        let single: AssetEntry = serde_json::from_str(r#""data:a""#).unwrap();
        assert!(matches!(single, AssetEntry::Single(_)));
    }

    #[test]
    fn with_url_keeps_generation_params() {
        let shot = Asset::shot("data:old", "Cross");
        let updated = shot.with_url("data:new");
        assert_eq!(updated.url(), "data:new");
        assert_eq!(updated.pose(), Some("Cross"));

        let plain = Asset::Url("data:old".into()).with_url("data:new");
        assert_eq!(plain, Asset::Url("data:new".into()));
    }

    #[test]
    fn section_kind_from_key() {
        assert_eq!(SectionKind::of("hero"), SectionKind::Hero);
        assert_eq!(
            SectionKind::of("models"),
            SectionKind::Gallery(GalleryType::ModelShots)
        );
        assert_eq!(
            SectionKind::of("closeupShots"),
            SectionKind::Gallery(GalleryType::CloseupShots)
        );
        assert_eq!(SectionKind::of("spacer-17"), SectionKind::Spacer);
        assert_eq!(SectionKind::of("custom-17"), SectionKind::Image);
        assert_eq!(SectionKind::of("conceptShot"), SectionKind::Image);
    }

    #[test]
    fn gallery_sections_map_to_array_keys() {
        assert_eq!(asset_key_for("models"), "modelShots");
        assert_eq!(asset_key_for("closeup"), "closeupShots");
        assert_eq!(asset_key_for("products"), "products");
        assert_eq!(asset_key_for("custom-1"), "custom-1");
    }

    #[test]
    fn transform_css() {
        let t = ImageTransform {
            scale: 1.5,
            x: -20.0,
            y: 10.0,
        };
        assert_eq!(t.to_css(), "scale(1.5) translate(-20px, 10px)");
        assert!(ImageTransform::default().is_identity());
    }
}

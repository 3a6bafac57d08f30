//! Template compositor.
//!
//! Turns hero copy, the asset store and a section order into one
//! self-contained HTML document. Composition is a pure function of its
//! inputs: the same inputs give byte-identical output, nothing is mutated
//! and no state is kept between calls.
//!
//! ## Rendering rules
//!
//! - Only keys in the order render, in that order. Data for keys outside the
//!   order is ignored.
//! - `hero` renders the fixed copy block; blank fields fall back to their
//!   defaults.
//! - Gallery sections render one `<img>` per non-placeholder entry, tagged
//!   with `data-gallery-type` and the stored slot in `data-index`.
//! - Image and spacer sections render their image with the pan/zoom
//!   transform inline, or a drop zone when empty. Unknown keys are image
//!   sections and therefore never fail: without data they become drop zones.
//! - Text overlays are positioned inside their own section.
//!
//! ## Output
//!
//! A full document with one inline `<style>` (config custom properties plus
//! `static/page.css`) and the configured font stylesheet links. No script.

pub mod render;
pub mod tree;

use crate::assets::AssetStore;
use crate::config::{self, PageConfig};
use crate::content::{HeroField, HeroTextContent};
use crate::overlay::{TextElement, TextOverlayStore};
use crate::registry::{SectionRegistry, SectionState};
use crate::session::PageState;
use render::DocumentHead;
use serde::Serialize;

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComposeFlags {
    /// Live-preview affordances: hold badges, drop hints, resize handles.
    pub editable: bool,
    /// Type-specific banner in place of an empty gallery.
    pub empty_gallery_banners: bool,
    /// Label strip above each gallery.
    pub section_labels: bool,
}

impl ComposeFlags {
    /// Flags for the exported page.
    pub fn export() -> Self {
        Self::default()
    }

    /// Flags for the live preview.
    pub fn preview() -> Self {
        Self {
            editable: true,
            empty_gallery_banners: true,
            section_labels: true,
        }
    }
}

/// Per-section layout state and text overlays. Both are optional so the
/// plain [`compose`] call can pass nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Layout<'a> {
    pub sections: Option<&'a SectionRegistry>,
    pub texts: Option<&'a TextOverlayStore>,
}

impl<'a> Layout<'a> {
    pub fn new(sections: &'a SectionRegistry, texts: &'a TextOverlayStore) -> Self {
        Self {
            sections: Some(sections),
            texts: Some(texts),
        }
    }

    pub fn state(&self, key: &str) -> SectionState {
        self.sections.map(|r| r.state(key)).unwrap_or_default()
    }

    pub fn texts_for(&self, key: &str) -> Vec<&'a TextElement> {
        self.texts
            .map(|store| store.iter().filter(|e| e.section_id == key).collect())
            .unwrap_or_default()
    }
}

/// Everything the compositor reads, borrowed.
#[derive(Debug, Clone, Copy)]
pub struct PageInputs<'a> {
    pub hero: &'a HeroTextContent,
    pub images: &'a AssetStore,
    pub order: &'a [String],
    pub layout: Layout<'a>,
}

impl PageState {
    /// Borrow this state as compositor inputs, layout included.
    pub fn inputs(&self) -> PageInputs<'_> {
        PageInputs {
            hero: self.hero(),
            images: self.assets(),
            order: self.order(),
            layout: Layout::new(self.registry(), self.texts()),
        }
    }
}

/// Compose with stock config and no layout state.
pub fn compose(
    hero: &HeroTextContent,
    images: &AssetStore,
    section_order: &[String],
    flags: ComposeFlags,
) -> String {
    compose_with_layout(hero, images, section_order, Layout::default(), flags)
}

/// Compose with stock config and explicit layout state.
pub fn compose_with_layout(
    hero: &HeroTextContent,
    images: &AssetStore,
    section_order: &[String],
    layout: Layout<'_>,
    flags: ComposeFlags,
) -> String {
    let inputs = PageInputs {
        hero,
        images,
        order: section_order,
        layout,
    };
    compose_page(&PageConfig::default(), &inputs, flags)
}

/// Compose a full page.
pub fn compose_page(config: &PageConfig, inputs: &PageInputs<'_>, flags: ComposeFlags) -> String {
    let nodes = tree::build_sections(config, inputs, flags);
    let title = page_title(config, inputs.hero);
    let body_class = if flags.editable {
        "detail-page editing"
    } else {
        "detail-page"
    };
    render_document(config, &title, body_class, &nodes)
}

/// The hero block as a document of its own.
pub fn compose_hero_document(config: &PageConfig, hero: &HeroTextContent) -> String {
    let mut block = tree::hero_block(hero);
    block.section = Some(crate::types::HERO_KEY.to_string());
    let title = page_title(config, hero);
    render_document(config, &title, "detail-page hero-only", &[tree::Node::Block(block)])
}

/// File name for a standalone hero download: `<productName>_section.html`,
/// or `hero_section.html` when the product name is blank.
pub fn export_file_name(hero: &HeroTextContent) -> String {
    let name: String = hero
        .get(HeroField::ProductName)
        .unwrap_or_default()
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '\0'))
        .collect();
    let name = name.trim();
    if name.is_empty() {
        "hero_section.html".to_string()
    } else {
        format!("{name}_section.html")
    }
}

fn page_title(config: &PageConfig, hero: &HeroTextContent) -> String {
    if !config.page.title.trim().is_empty() {
        return config.page.title.clone();
    }
    format!(
        "{} - {}",
        hero.resolve(HeroField::ProductName),
        hero.resolve(HeroField::BrandLine)
    )
}

fn render_document(config: &PageConfig, title: &str, body_class: &str, nodes: &[tree::Node]) -> String {
    let css = format!("{}\n\n{}", config::generate_page_css(config), render::PAGE_CSS);
    let head = DocumentHead {
        lang: &config.page.lang,
        title,
        page_width: config.page.width,
        fonts: &config.page.fonts,
        css: &css,
    };
    render::document(&head, body_class, nodes).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::{Asset, ImageTransform, PLACEHOLDER_URL};

    fn order(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn compose_is_deterministic() {
        let state = sample_state();
        let a = compose_page(&PageConfig::default(), &state.inputs(), ComposeFlags::preview());
        let b = compose_page(&PageConfig::default(), &state.inputs(), ComposeFlags::preview());
        assert_eq!(a, b);
    }

    #[test]
    fn sections_render_in_order() {
        let state = sample_state();
        let html = compose_page(&PageConfig::default(), &state.inputs(), ComposeFlags::export());
        assert_sections_in_order(&html, &["hero", "products", "models", "closeup"]);
    }

    #[test]
    fn keys_outside_order_are_not_rendered() {
        let mut images = AssetStore::new();
        images.set_gallery("modelShots", vec![Asset::shot("data:model", "Walk")]);
        let html = compose(
            &HeroTextContent::default(),
            &images,
            &order(&["hero"]),
            ComposeFlags::export(),
        );
        assert!(!html.contains("data:model"));
        assert!(!html.contains(r#"data-section="models""#));
    }

    #[test]
    fn default_hero_renders_defaults() {
        let html = compose(
            &HeroTextContent::default(),
            &AssetStore::new(),
            &order(&["hero"]),
            ComposeFlags::export(),
        );
        for field in HeroField::ALL {
            let escaped = field.default_text().replace('&', "&amp;");
            assert!(html.contains(&escaped), "missing default for {}", field.name());
        }
    }

    #[test]
    fn placeholders_never_become_images() {
        let mut images = AssetStore::new();
        images.set_gallery("products", vec![Asset::Url(String::new()), Asset::placeholder()]);
        images.set_single("custom-1", Asset::Url(String::new()));
        let html = compose(
            &HeroTextContent::default(),
            &images,
            &order(&["hero", "products", "custom-1"]),
            ComposeFlags::export(),
        );
        assert!(!html.contains(r#"src="""#));
        assert!(!html.contains(PLACEHOLDER_URL));
        assert_eq!(count_images(&html), 0);
        assert!(html.contains(r#"data-drop-zone="custom-1""#));
    }

    #[test]
    fn unknown_key_without_data_is_a_drop_zone() {
        let html = compose(
            &HeroTextContent::default(),
            &AssetStore::new(),
            &order(&["hero", "mystery"]),
            ComposeFlags::export(),
        );
        assert!(html.contains(r#"data-drop-zone="mystery""#));
    }

    #[test]
    fn gallery_index_is_the_stored_slot() {
        let mut images = AssetStore::new();
        images.set_gallery(
            "closeupShots",
            vec![
                Asset::placeholder(),
                Asset::shot("data:side", "Side"),
                Asset::shot("data:top", "Top"),
            ],
        );
        let html = compose(
            &HeroTextContent::default(),
            &images,
            &order(&["closeup"]),
            ComposeFlags::export(),
        );
        assert!(html.contains(r#"data-gallery-type="closeupShots" data-index="1""#));
        assert!(html.contains(r#"data-gallery-type="closeupShots" data-index="2""#));
        assert_eq!(count_images(&html), 2);
    }

    #[test]
    fn empty_gallery_banner_only_with_flag() {
        let images = AssetStore::new();
        let keys = order(&["models"]);
        let plain = compose(&HeroTextContent::default(), &images, &keys, ComposeFlags::export());
        assert!(!plain.contains(r#"class="empty-banner"#));

        let flags = ComposeFlags {
            empty_gallery_banners: true,
            ..ComposeFlags::default()
        };
        let with_banner = compose(&HeroTextContent::default(), &images, &keys, flags);
        assert!(with_banner.contains("MODEL"));
        assert_eq!(count_images(&with_banner), 0);
    }

    #[test]
    fn section_labels_flag() {
        let keys = order(&["products"]);
        let flags = ComposeFlags {
            section_labels: true,
            ..ComposeFlags::default()
        };
        let html = compose(&HeroTextContent::default(), &AssetStore::new(), &keys, flags);
        assert!(html.contains("Product Details"));
    }

    #[test]
    fn image_section_transform_and_height() {
        let mut state = PageState::new();
        let key = state.add_image_section(1).unwrap();
        state.update_image(&key, 0, "data:img");
        state.set_section_height(&key, 640.0).unwrap();
        state
            .set_image_transform(
                &key,
                ImageTransform {
                    scale: 1.5,
                    x: 10.0,
                    y: -4.0,
                },
            )
            .unwrap();

        let html = compose_page(&PageConfig::default(), &state.inputs(), ComposeFlags::export());
        assert!(html.contains(r#"data-section-image="custom-1""#));
        assert!(html.contains("transform: scale(1.5) translate(10px, -4px);"));
        assert!(html.contains("height: 640px;"));
    }

    #[test]
    fn gallery_section_renders_its_layout_state() {
        use crate::interaction::{GestureController, NoLayout, PointerEvent, StateChange};

        let config = PageConfig::default();
        let mut state = PageState::with_default_layout();
        state.set_gallery(
            crate::types::GalleryType::Products,
            vec![Asset::Url("data:p1".into()), Asset::Url("data:p2".into())],
        );
        state.set_section_height("products", 640.0).unwrap();
        let mut gestures = GestureController::new(&config);
        let wheel = PointerEvent::Wheel {
            section: "products".into(),
            delta_y: -1.0,
        };
        assert_eq!(gestures.handle(wheel, &mut state, &NoLayout), StateChange::Committed);
        state.toggle_hold("products").unwrap();

        let preview = compose_page(&config, &state.inputs(), ComposeFlags::preview());
        assert!(preview.contains("height: 640px;"));
        assert_eq!(preview.matches("transform: scale(1.1) translate(0px, 0px);").count(), 2);
        assert!(preview.contains("section gallery gallery-products held"));
        assert!(preview.contains("LOCKED"));

        let export = compose_page(&config, &state.inputs(), ComposeFlags::export());
        assert!(export.contains("height: 640px;"));
        assert!(!export.contains(r#"class="hold-badge""#));
    }

    #[test]
    fn default_hero_has_height_spec() {
        let html = compose_hero_document(&PageConfig::default(), &HeroTextContent::default());
        assert!(html.contains("Height Spec"));
        for value in ["3 CM", "1.5 CM", "4.5 CM"] {
            assert!(html.contains(value), "missing {value}");
        }
    }

    #[test]
    fn empty_image_section_uses_placeholder_height() {
        let mut state = PageState::new();
        state.add_image_section(1).unwrap();
        let html = compose_page(&PageConfig::default(), &state.inputs(), ComposeFlags::export());
        assert!(html.contains("height: 200px;"));
    }

    #[test]
    fn editable_adds_affordances() {
        let mut state = PageState::new();
        let key = state.add_image_section(1).unwrap();
        state.toggle_hold(&key).unwrap();

        let export = compose_page(&PageConfig::default(), &state.inputs(), ComposeFlags::export());
        assert!(!export.contains(r#"class="hold-badge""#));
        assert!(!export.contains("data-resize-handle"));

        let preview = compose_page(&PageConfig::default(), &state.inputs(), ComposeFlags::preview());
        assert!(preview.contains("LOCKED"));
        assert!(preview.contains(r#"data-resize-handle="custom-1""#));
        assert!(preview.contains(r#"class="drop-zone-hint""#));
    }

    #[test]
    fn overlays_render_inside_their_section_only() {
        let mut state = PageState::with_default_layout();
        let cfg = PageConfig::default();
        let id = state.add_text(Some("models"), &cfg).unwrap();
        state.update_text(&id, crate::overlay::TextEdit::Content("On sale".into()));

        let html = compose_page(&cfg, &state.inputs(), ComposeFlags::export());
        assert!(html.contains(r#"data-text-id="text-1""#));
        assert!(html.contains("On sale"));

        let hero_only = compose_with_layout(
            state.hero(),
            state.assets(),
            &order(&["hero"]),
            state.inputs().layout,
            ComposeFlags::export(),
        );
        assert!(!hero_only.contains("On sale"));
    }

    #[test]
    fn document_is_self_contained() {
        let html = compose(
            &HeroTextContent::default(),
            &AssetStore::new(),
            &order(&["hero"]),
            ComposeFlags::export(),
        );
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="ko">"#));
        assert!(html.contains("--page-width: 1000px;"));
        assert!(!html.contains("<script"));
        assert_eq!(html.matches("<style>").count(), 1);
    }

    #[test]
    fn title_from_hero_or_config() {
        let mut hero = HeroTextContent::default();
        hero.set(HeroField::ProductName, Some("Runner".into()));
        let mut config = PageConfig::default();
        let html = compose_hero_document(&config, &hero);
        assert!(html.contains("<title>Runner - BRAND NAME</title>"));

        config.page.title = "Custom".into();
        let html = compose_hero_document(&config, &hero);
        assert!(html.contains("<title>Custom</title>"));
    }

    #[test]
    fn hero_document_has_only_the_hero() {
        let html = compose_hero_document(&PageConfig::default(), &HeroTextContent::default());
        assert!(html.contains(r#"data-section="hero""#));
        assert!(!html.contains("data-drop-zone"));
        assert!(!html.contains("data-gallery-type"));
    }

    #[test]
    fn export_file_names() {
        let mut hero = HeroTextContent::default();
        assert_eq!(export_file_name(&hero), "hero_section.html");
        hero.set(HeroField::ProductName, Some("  ".into()));
        assert_eq!(export_file_name(&hero), "hero_section.html");
        hero.set(HeroField::ProductName, Some("Trek/Master".into()));
        assert_eq!(export_file_name(&hero), "TrekMaster_section.html");
    }
}

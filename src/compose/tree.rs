//! Typed page tree.
//!
//! Section builders produce [`Node`] values; nothing here emits markup.
//! The single serializer in [`super::render`] turns the tree into HTML, so
//! escaping and attribute naming are decided in one place.

use super::{ComposeFlags, PageInputs};
use crate::config::PageConfig;
use crate::content::{HeroField, HeroTextContent};
use crate::overlay::TextElement;
use crate::registry::SectionState;
use crate::types::{Asset, AssetEntry, GalleryType, HERO_KEY, SectionKind};

/// Element used for a container block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Div,
    Section,
    Header,
    H1,
}

/// Element used for a text leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTag {
    H2,
    H3,
    P,
    Span,
    Strong,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub tag: BlockTag,
    pub class: String,
    /// Rendered as `data-section`.
    pub section: Option<String>,
    pub style: Option<String>,
    pub children: Vec<Node>,
}

impl Block {
    fn new(tag: BlockTag, class: impl Into<String>) -> Self {
        Self {
            tag,
            class: class.into(),
            section: None,
            style: None,
            children: Vec::new(),
        }
    }

    fn div(class: impl Into<String>) -> Self {
        Self::new(BlockTag::Div, class)
    }

    fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    fn into_node(self) -> Node {
        Node::Block(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    pub src: String,
    pub alt: String,
    /// Rendered as `data-gallery-type` / `data-index`.
    pub gallery: Option<(GalleryType, usize)>,
    /// Rendered as `data-section-image`.
    pub section_image: Option<String>,
    pub style: Option<String>,
}

/// Editor-only markers, emitted when `ComposeFlags::editable` is set.
#[derive(Debug, Clone, PartialEq)]
pub enum Affordance {
    HoldBadge,
    ResizeHandle(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Block(Block),
    Text {
        tag: TextTag,
        class: &'static str,
        text: String,
    },
    Image(ImageNode),
    /// Label/value pairs laid out as a two-column grid.
    Grid {
        class: &'static str,
        cells: Vec<(&'static str, String)>,
    },
    DropZone {
        key: String,
        label: &'static str,
        hint: Option<&'static str>,
    },
    /// Text split on newlines, joined with `<br>`.
    LineBreaks {
        class: &'static str,
        lines: Vec<String>,
    },
    Banner {
        gallery: GalleryType,
    },
    Overlay {
        id: String,
        style: String,
        content: String,
    },
    Affordance(Affordance),
}

fn text(tag: TextTag, class: &'static str, value: impl Into<String>) -> Node {
    Node::Text {
        tag,
        class,
        text: value.into(),
    }
}

const DROP_HINT: &str = "Drop an image file here";
const IMAGE_DROP_LABEL: &str = "IMAGE";
const SPACER_DROP_LABEL: &str = "SPACER";

// ============================================================================
// Page
// ============================================================================

/// Build one node per rendered section, in section order.
pub fn build_sections(config: &PageConfig, inputs: &PageInputs<'_>, flags: ComposeFlags) -> Vec<Node> {
    inputs
        .order
        .iter()
        .map(|key| build_section(config, inputs, key, flags))
        .collect()
}

fn build_section(config: &PageConfig, inputs: &PageInputs<'_>, key: &str, flags: ComposeFlags) -> Node {
    let state = inputs.layout.state(key);
    let mut block = match SectionKind::of(key) {
        SectionKind::Hero => hero_block(inputs.hero),
        SectionKind::Gallery(gallery) => gallery_block(inputs, gallery, &state, flags),
        SectionKind::Image => image_block(config, inputs, key, &state, IMAGE_DROP_LABEL, flags),
        SectionKind::Spacer => image_block(config, inputs, key, &state, SPACER_DROP_LABEL, flags),
    };
    block.section = Some(key.to_string());

    block
        .children
        .extend(inputs.layout.texts_for(key).into_iter().map(overlay_node));

    if flags.editable && key != HERO_KEY {
        block
            .children
            .push(Node::Affordance(Affordance::ResizeHandle(key.to_string())));
    }
    block.into_node()
}

fn overlay_node(element: &TextElement) -> Node {
    Node::Overlay {
        id: element.id.clone(),
        style: element.style(),
        content: element.content.clone(),
    }
}

// ============================================================================
// Hero
// ============================================================================

/// Fixed-structure hero block. Every field goes through default resolution.
pub fn hero_block(hero: &HeroTextContent) -> Block {
    let title = Block::new(BlockTag::H1, "product-title").with_children(vec![
        text(TextTag::Span, "product-name", hero.resolve(HeroField::ProductName)),
        text(TextTag::Span, "title-dash", "\u{2014}"),
        text(TextTag::Span, "sub-name", hero.resolve(HeroField::SubName)),
    ]);

    let header = Block::new(BlockTag::Header, "hero-header").with_children(vec![
        text(TextTag::H2, "brand-line", hero.resolve(HeroField::BrandLine)),
        title.into_node(),
    ]);

    let body = Block::new(BlockTag::Section, "hero-body").with_children(vec![
        text(TextTag::P, "description-main", hero.resolve(HeroField::DescriptionMain)),
        Block::div("craftsmanship")
            .with_children(vec![
                text(TextTag::Strong, "block-title", "DETAIL & CRAFTSMANSHIP"),
                text(TextTag::P, "", hero.resolve(HeroField::Craftsmanship)),
            ])
            .into_node(),
        Block::div("styling")
            .with_children(vec![
                text(TextTag::Strong, "block-title", "STYLING & MATCH"),
                text(TextTag::P, "styling-text", hero.resolve(HeroField::StylingMatch)),
            ])
            .into_node(),
        Block::div("technology")
            .with_children(vec![
                text(TextTag::H3, "block-title", "Technology"),
                text(TextTag::P, "", hero.resolve(HeroField::Technology)),
            ])
            .into_node(),
    ]);

    let cells = HeroField::ALL
        .iter()
        .filter_map(|field| Some((field.spec_label()?, hero.resolve(*field).to_string())))
        .collect();
    let spec = Block::new(BlockTag::Section, "hero-spec").with_children(vec![
        text(TextTag::H3, "block-title", "Product Spec"),
        Node::Grid {
            class: "spec-grid",
            cells,
        },
    ]);

    let height_cells = HeroField::ALL
        .iter()
        .filter_map(|field| Some((field.height_label()?, format!("{} CM", hero.resolve(*field)))))
        .collect();
    let height = Block::new(BlockTag::Section, "hero-height").with_children(vec![
        text(TextTag::H3, "block-title", "Height Spec"),
        Node::Grid {
            class: "height-grid",
            cells: height_cells,
        },
    ]);

    let size_guide = Block::new(BlockTag::Section, "size-guide").with_children(vec![
        text(TextTag::H3, "block-title", "SIZE GUIDE"),
        Node::LineBreaks {
            class: "size-guide-text",
            lines: hero
                .resolve(HeroField::SizeGuide)
                .lines()
                .map(str::to_string)
                .collect(),
        },
    ]);

    Block::div("section hero").with_children(vec![
        header.into_node(),
        body.into_node(),
        spec.into_node(),
        height.into_node(),
        size_guide.into_node(),
    ])
}

// ============================================================================
// Galleries
// ============================================================================

/// Inline transform for a section's pan/zoom state, `None` at identity.
fn transform_style(state: &SectionState) -> Option<String> {
    (!state.transform.is_identity()).then(|| format!("transform: {};", state.transform.to_css()))
}

fn gallery_block(
    inputs: &PageInputs<'_>,
    gallery: GalleryType,
    state: &SectionState,
    flags: ComposeFlags,
) -> Block {
    let mut children = Vec::new();
    if flags.section_labels {
        children.push(text(TextTag::Span, "section-label", gallery.label()));
    }

    let items = inputs.images.gallery(gallery.asset_key());
    let images: Vec<Node> = items
        .iter()
        .enumerate()
        .filter(|(_, asset)| !asset.is_placeholder())
        .map(|(index, asset)| gallery_image(gallery, index, asset, transform_style(state)))
        .collect();

    if images.is_empty() {
        if flags.empty_gallery_banners {
            children.push(Node::Banner { gallery });
        }
    } else {
        children.push(Block::div("gallery-grid").with_children(images).into_node());
    }

    if flags.editable && state.held {
        children.push(Node::Affordance(Affordance::HoldBadge));
    }

    let mut class = format!("section gallery gallery-{}", gallery.section_key());
    if state.held {
        class.push_str(" held");
    }
    let mut block = Block::div(class).with_children(children);
    block.style = state.height_px.map(|height| format!("height: {height}px;"));
    block
}

fn gallery_image(gallery: GalleryType, index: usize, asset: &Asset, style: Option<String>) -> Node {
    Block::div("gallery-item")
        .with_children(vec![Node::Image(ImageNode {
            src: asset.url().to_string(),
            alt: format!("{} {}", gallery.label(), index + 1),
            gallery: Some((gallery, index)),
            section_image: None,
            style,
        })])
        .into_node()
}

// ============================================================================
// Image and spacer sections
// ============================================================================

fn image_block(
    config: &PageConfig,
    inputs: &PageInputs<'_>,
    key: &str,
    state: &SectionState,
    drop_label: &'static str,
    flags: ComposeFlags,
) -> Block {
    let asset = match inputs.images.get(key) {
        Some(AssetEntry::Single(asset)) => Some(asset),
        Some(AssetEntry::Gallery(items)) => items.iter().find(|a| !a.is_placeholder()),
        None => None,
    }
    .filter(|asset| !asset.is_placeholder());

    let mut class = match SectionKind::of(key) {
        SectionKind::Spacer => String::from("section spacer"),
        _ => String::from("section image-section"),
    };
    if state.held {
        class.push_str(" held");
    }

    let mut block = Block::div(class);
    block.style = match (state.height_px, asset) {
        (Some(height), _) => Some(format!("height: {height}px;")),
        (None, None) => Some(format!("height: {}px;", config.sections.placeholder_height)),
        (None, Some(_)) => None,
    };

    match asset {
        Some(asset) => {
            let style = transform_style(state);
            let image = Node::Image(ImageNode {
                src: asset.url().to_string(),
                alt: String::new(),
                gallery: None,
                section_image: Some(key.to_string()),
                style,
            });
            block
                .children
                .push(Block::div("image-frame").with_children(vec![image]).into_node());
        }
        None => block.children.push(Node::DropZone {
            key: key.to_string(),
            label: drop_label,
            hint: flags.editable.then_some(DROP_HINT),
        }),
    }

    if flags.editable && state.held {
        block.children.push(Node::Affordance(Affordance::HoldBadge));
    }
    block
}

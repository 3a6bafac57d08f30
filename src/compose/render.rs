//! The one serializer from [`Node`] trees to markup.
//!
//! Uses [maud](https://maud.lambda.xyz/): all text and attribute values are
//! escaped automatically. The only pre-escaped content is the stylesheet,
//! which is assembled from the embedded base CSS and config values.

use super::tree::{Affordance, Block, BlockTag, ImageNode, Node, TextTag};
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Base styles, embedded at compile time. Config-driven custom properties
/// are prepended by the caller.
pub const PAGE_CSS: &str = include_str!("../../static/page.css");

pub struct DocumentHead<'a> {
    pub lang: &'a str,
    pub title: &'a str,
    pub page_width: u32,
    pub fonts: &'a [String],
    pub css: &'a str,
}

/// Full standalone document around the rendered sections.
pub fn document(head: &DocumentHead<'_>, body_class: &str, nodes: &[Node]) -> Markup {
    let viewport = format!("width={}", head.page_width);
    html! {
        (DOCTYPE)
        html lang=(head.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content=(viewport);
                title { (head.title) }
                @for font in head.fonts {
                    link rel="stylesheet" href=(font);
                }
                style { (PreEscaped(head.css)) }
            }
            body class=(body_class) {
                div.page-container {
                    @for node in nodes {
                        (render_node(node))
                    }
                }
            }
        }
    }
}

pub fn render_node(node: &Node) -> Markup {
    match node {
        Node::Block(block) => render_block(block),
        Node::Text { tag, class, text } => render_text(*tag, class, text),
        Node::Image(image) => render_image(image),
        Node::Grid { class, cells } => html! {
            dl class=(class) {
                @for (label, value) in cells {
                    div.spec-row {
                        dt { (label) }
                        dd { (value) }
                    }
                }
            }
        },
        Node::DropZone { key, label, hint } => html! {
            div.drop-zone data-drop-zone=(key) {
                span.drop-zone-label { (label) }
                @if let Some(hint) = hint {
                    span.drop-zone-hint { (hint) }
                }
            }
        },
        Node::LineBreaks { class, lines } => html! {
            p class=(class) {
                @for (i, line) in lines.iter().enumerate() {
                    @if i > 0 { br; }
                    (line)
                }
            }
        },
        Node::Banner { gallery } => html! {
            div class={ "empty-banner banner-" (gallery.section_key()) } {
                span { (gallery.banner()) }
            }
        },
        Node::Overlay { id, style, content } => html! {
            div.text-overlay data-text-id=(id) style=(style) { (content) }
        },
        Node::Affordance(Affordance::HoldBadge) => html! {
            span.hold-badge { "LOCKED" }
        },
        Node::Affordance(Affordance::ResizeHandle(key)) => html! {
            div.resize-handle data-resize-handle=(key) {}
        },
    }
}

fn render_block(block: &Block) -> Markup {
    let class = (!block.class.is_empty()).then_some(block.class.as_str());
    let section = block.section.as_deref();
    let style = block.style.as_deref();
    let children = html! {
        @for child in &block.children {
            (render_node(child))
        }
    };
    match block.tag {
        BlockTag::Div => html! {
            div class=[class] data-section=[section] style=[style] { (children) }
        },
        BlockTag::Section => html! {
            section class=[class] data-section=[section] style=[style] { (children) }
        },
        BlockTag::Header => html! {
            header class=[class] data-section=[section] style=[style] { (children) }
        },
        BlockTag::H1 => html! {
            h1 class=[class] data-section=[section] style=[style] { (children) }
        },
    }
}

fn render_text(tag: TextTag, class: &str, text: &str) -> Markup {
    let class = (!class.is_empty()).then_some(class);
    match tag {
        TextTag::H2 => html! { h2 class=[class] { (text) } },
        TextTag::H3 => html! { h3 class=[class] { (text) } },
        TextTag::P => html! { p class=[class] { (text) } },
        TextTag::Span => html! { span class=[class] { (text) } },
        TextTag::Strong => html! { strong class=[class] { (text) } },
    }
}

fn render_image(image: &ImageNode) -> Markup {
    let gallery_type = image.gallery.map(|(gallery, _)| gallery.asset_key());
    let index = image.gallery.map(|(_, index)| index);
    html! {
        img src=(image.src)
            alt=(image.alt)
            data-gallery-type=[gallery_type]
            data-index=[index]
            data-section-image=[image.section_image.as_deref()]
            style=[image.style.as_deref()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GalleryType;

    #[test]
    fn text_is_escaped() {
        let html = render_node(&Node::Text {
            tag: TextTag::P,
            class: "",
            text: "<script>alert('x')</script>".into(),
        })
        .into_string();
        assert_eq!(html, "<p>&lt;script&gt;alert('x')&lt;/script&gt;</p>");
    }

    #[test]
    fn empty_class_is_omitted() {
        let html = render_node(&Node::Text {
            tag: TextTag::Span,
            class: "",
            text: "x".into(),
        })
        .into_string();
        assert_eq!(html, "<span>x</span>");
    }

    #[test]
    fn line_breaks_join_with_br() {
        let html = render_node(&Node::LineBreaks {
            class: "size-guide-text",
            lines: vec!["a".into(), "b".into(), "c".into()],
        })
        .into_string();
        assert_eq!(html, r#"<p class="size-guide-text">a<br>b<br>c</p>"#);
    }

    #[test]
    fn gallery_image_attributes() {
        let html = render_node(&Node::Image(ImageNode {
            src: "data:x".into(),
            alt: "Model Styling 3".into(),
            gallery: Some((GalleryType::ModelShots, 2)),
            section_image: None,
            style: None,
        }))
        .into_string();
        assert!(html.contains(r#"data-gallery-type="modelShots""#));
        assert!(html.contains(r#"data-index="2""#));
        assert!(!html.contains("data-section-image"));
        assert!(!html.contains("style="));
    }

    #[test]
    fn drop_zone_without_hint() {
        let html = render_node(&Node::DropZone {
            key: "custom-1".into(),
            label: "IMAGE",
            hint: None,
        })
        .into_string();
        assert!(html.contains(r#"data-drop-zone="custom-1""#));
        assert!(html.contains(r#"<span class="drop-zone-label">IMAGE</span>"#));
        assert!(!html.contains("drop-zone-hint"));
    }

    #[test]
    fn banner_uses_gallery_text() {
        let html = render_node(&Node::Banner {
            gallery: GalleryType::CloseupShots,
        })
        .into_string();
        assert!(html.contains("banner-closeup"));
        assert!(html.contains("DETAIL"));
    }

    #[test]
    fn document_has_head_parts() {
        let fonts = vec!["https://fonts.example/css".to_string()];
        let head = DocumentHead {
            lang: "ko",
            title: "T",
            page_width: 1000,
            fonts: &fonts,
            css: "body { color: red; }",
        };
        let html = document(&head, "detail-page", &[]).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="ko">"#));
        assert!(html.contains(r#"content="width=1000""#));
        assert!(html.contains(r#"<link rel="stylesheet" href="https://fonts.example/css">"#));
        assert!(html.contains("<style>body { color: red; }</style>"));
        assert!(!html.contains("<script"));
    }
}

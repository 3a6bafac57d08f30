//! Free-floating text boxes drawn over sections.
//!
//! Text elements are created only by an explicit add, edited field by field
//! and deleted explicitly. Each one keeps a weak back-reference to its
//! section by key; the compositor skips elements whose section is not
//! rendered. IDs come from a per-store counter (`text-1`, `text-2`, ...),
//! which is rebuilt from the highest existing ID when a session is loaded.

use crate::config::TextConfig;
use serde::{Deserialize, Serialize};

const ID_PREFIX: &str = "text-";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: String,
    pub section_id: String,
    pub content: String,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
    pub font_weight: String,
    #[serde(default)]
    pub text_align: TextAlign,
}

impl TextElement {
    /// Inline style positioning the box inside its section.
    pub fn style(&self) -> String {
        format!(
            "top: {}px; left: {}px; width: {}px; height: {}px; font-size: {}px; \
             font-family: {}; color: {}; font-weight: {}; text-align: {};",
            self.top,
            self.left,
            self.width,
            self.height,
            self.font_size,
            css_font_family(&self.font_family),
            self.color,
            self.font_weight,
            self.text_align.as_css(),
        )
    }
}

/// Quote a single family name unless it is already a quoted or
/// comma-separated list.
fn css_font_family(family: &str) -> String {
    if family.contains(',') || family.contains('\'') || family.contains('"') {
        family.to_string()
    } else {
        format!("'{family}'")
    }
}

/// A single-field change to a text element.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEdit {
    Content(String),
    Position { top: f64, left: f64 },
    Size { width: f64, height: f64 },
    FontSize(f64),
    FontFamily(String),
    Color(String),
    FontWeight(String),
    Align(TextAlign),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TextElement>", into = "Vec<TextElement>")]
pub struct TextOverlayStore {
    elements: Vec<TextElement>,
    next_id: u64,
}

impl Default for TextOverlayStore {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<TextElement>> for TextOverlayStore {
    fn from(elements: Vec<TextElement>) -> Self {
        let next_id = elements
            .iter()
            .filter_map(|e| e.id.strip_prefix(ID_PREFIX)?.parse::<u64>().ok())
            .max()
            .map_or(1, |n| n + 1);
        Self { elements, next_id }
    }
}

impl From<TextOverlayStore> for Vec<TextElement> {
    fn from(store: TextOverlayStore) -> Self {
        store.elements
    }
}

impl TextOverlayStore {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a text box in `section_id` with the configured defaults.
    /// Returns the new element's ID.
    pub fn add(&mut self, section_id: &str, defaults: &TextConfig) -> String {
        let n = self.next_id;
        self.next_id = n + 1;
        let id = format!("{ID_PREFIX}{n}");
        self.elements.push(TextElement {
            id: id.clone(),
            section_id: section_id.to_string(),
            content: defaults.content.clone(),
            top: defaults.top,
            left: defaults.left,
            width: defaults.width,
            height: defaults.height,
            font_size: defaults.font_size,
            font_family: defaults.font_family.clone(),
            color: defaults.color.clone(),
            font_weight: defaults.font_weight.clone(),
            text_align: defaults.text_align,
        });
        id
    }

    pub fn get(&self, id: &str) -> Option<&TextElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Apply one edit. Returns `false` when the ID is unknown.
    pub fn update(&mut self, id: &str, edit: TextEdit) -> bool {
        let Some(element) = self.elements.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        match edit {
            TextEdit::Content(content) => element.content = content,
            TextEdit::Position { top, left } => {
                element.top = top;
                element.left = left;
            }
            TextEdit::Size { width, height } => {
                element.width = width.max(1.0);
                element.height = height.max(1.0);
            }
            TextEdit::FontSize(size) => element.font_size = size.max(1.0),
            TextEdit::FontFamily(family) => element.font_family = family,
            TextEdit::Color(color) => element.color = color,
            TextEdit::FontWeight(weight) => element.font_weight = weight,
            TextEdit::Align(align) => element.text_align = align,
        }
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.id != id);
        self.elements.len() != before
    }

    /// Delete every element bound to `section_id`. Returns how many went.
    pub fn remove_section(&mut self, section_id: &str) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| e.section_id != section_id);
        before - self.elements.len()
    }

    pub fn for_section<'a>(&'a self, section_id: &'a str) -> impl Iterator<Item = &'a TextElement> {
        self.elements.iter().filter(move |e| e.section_id == section_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

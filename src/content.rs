//! Hero copy: the text fields of the fixed hero block.
//!
//! Every field is optional in storage. Rendering goes through
//! [`HeroTextContent::resolve`], which substitutes the field's default when
//! the stored value is absent or blank. The defaults live in exactly one
//! place, [`HeroField::default_text`].
//!
//! Copy produced by the generation client arrives as free text that should
//! contain a JSON object. [`parse_copy`] extracts it and falls back to
//! [`fallback_copy`] when the text cannot be parsed.

use serde::{Deserialize, Serialize};

/// One named text slot of the hero block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroField {
    BrandLine,
    ProductName,
    SubName,
    DescriptionMain,
    StylingMatch,
    Craftsmanship,
    Technology,
    SpecColor,
    SpecUpper,
    SpecLining,
    SpecOutsole,
    SpecOrigin,
    HeelHeight,
    HeightOutsole,
    HeightInsole,
    HeightTotal,
    SizeGuide,
}

impl HeroField {
    pub const ALL: [HeroField; 17] = [
        HeroField::BrandLine,
        HeroField::ProductName,
        HeroField::SubName,
        HeroField::DescriptionMain,
        HeroField::StylingMatch,
        HeroField::Craftsmanship,
        HeroField::Technology,
        HeroField::SpecColor,
        HeroField::SpecUpper,
        HeroField::SpecLining,
        HeroField::SpecOutsole,
        HeroField::SpecOrigin,
        HeroField::HeelHeight,
        HeroField::HeightOutsole,
        HeroField::HeightInsole,
        HeroField::HeightTotal,
        HeroField::SizeGuide,
    ];

    /// JSON name of the field.
    pub fn name(self) -> &'static str {
        match self {
            HeroField::BrandLine => "brandLine",
            HeroField::ProductName => "productName",
            HeroField::SubName => "subName",
            HeroField::DescriptionMain => "descriptionMain",
            HeroField::StylingMatch => "stylingMatch",
            HeroField::Craftsmanship => "craftsmanship",
            HeroField::Technology => "technology",
            HeroField::SpecColor => "specColor",
            HeroField::SpecUpper => "specUpper",
            HeroField::SpecLining => "specLining",
            HeroField::SpecOutsole => "specOutsole",
            HeroField::SpecOrigin => "specOrigin",
            HeroField::HeelHeight => "heelHeight",
            HeroField::HeightOutsole => "heightOutsole",
            HeroField::HeightInsole => "heightInsole",
            HeroField::HeightTotal => "heightTotal",
            HeroField::SizeGuide => "sizeGuide",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn default_text(self) -> &'static str {
        match self {
            HeroField::BrandLine => "BRAND NAME",
            HeroField::ProductName => "Sample Product",
            HeroField::SubName => "Color / Model",
            HeroField::DescriptionMain => "Product description goes here.",
            HeroField::StylingMatch => "Styling match description goes here.",
            HeroField::Craftsmanship => "Craftsmanship and material description goes here.",
            HeroField::Technology => "Core technology description goes here.",
            HeroField::SpecColor => "Matte Black",
            HeroField::SpecUpper => "Suede",
            HeroField::SpecLining => "Textile",
            HeroField::SpecOutsole => "Rubber",
            HeroField::SpecOrigin => "Made in KOREA",
            HeroField::HeelHeight => "3.5cm",
            HeroField::HeightOutsole => "3",
            HeroField::HeightInsole => "1.5",
            HeroField::HeightTotal => "4.5",
            HeroField::SizeGuide => "No size guide provided.",
        }
    }

    /// Label used in the product spec grid, for the six spec fields.
    pub fn spec_label(self) -> Option<&'static str> {
        match self {
            HeroField::SpecColor => Some("Color"),
            HeroField::SpecUpper => Some("Upper"),
            HeroField::SpecLining => Some("Lining"),
            HeroField::SpecOutsole => Some("Outsole"),
            HeroField::SpecOrigin => Some("Origin"),
            HeroField::HeelHeight => Some("Heel Height"),
            _ => None,
        }
    }

    /// Label of the height spec cell, for the three height fields. Values
    /// are centimetres.
    pub fn height_label(self) -> Option<&'static str> {
        match self {
            HeroField::HeightOutsole => Some("Outsole"),
            HeroField::HeightInsole => Some("Insole"),
            HeroField::HeightTotal => Some("Total"),
            _ => None,
        }
    }
}

/// Stored hero copy. `None` and blank strings both mean "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroTextContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_main: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styling_match: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub craftsmanship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_upper: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_lining: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_outsole: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heel_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_outsole: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_insole: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_guide: Option<String>,
}

impl HeroTextContent {
    fn slot(&self, field: HeroField) -> &Option<String> {
        match field {
            HeroField::BrandLine => &self.brand_line,
            HeroField::ProductName => &self.product_name,
            HeroField::SubName => &self.sub_name,
            HeroField::DescriptionMain => &self.description_main,
            HeroField::StylingMatch => &self.styling_match,
            HeroField::Craftsmanship => &self.craftsmanship,
            HeroField::Technology => &self.technology,
            HeroField::SpecColor => &self.spec_color,
            HeroField::SpecUpper => &self.spec_upper,
            HeroField::SpecLining => &self.spec_lining,
            HeroField::SpecOutsole => &self.spec_outsole,
            HeroField::SpecOrigin => &self.spec_origin,
            HeroField::HeelHeight => &self.heel_height,
            HeroField::HeightOutsole => &self.height_outsole,
            HeroField::HeightInsole => &self.height_insole,
            HeroField::HeightTotal => &self.height_total,
            HeroField::SizeGuide => &self.size_guide,
        }
    }

    fn slot_mut(&mut self, field: HeroField) -> &mut Option<String> {
        match field {
            HeroField::BrandLine => &mut self.brand_line,
            HeroField::ProductName => &mut self.product_name,
            HeroField::SubName => &mut self.sub_name,
            HeroField::DescriptionMain => &mut self.description_main,
            HeroField::StylingMatch => &mut self.styling_match,
            HeroField::Craftsmanship => &mut self.craftsmanship,
            HeroField::Technology => &mut self.technology,
            HeroField::SpecColor => &mut self.spec_color,
            HeroField::SpecUpper => &mut self.spec_upper,
            HeroField::SpecLining => &mut self.spec_lining,
            HeroField::SpecOutsole => &mut self.spec_outsole,
            HeroField::SpecOrigin => &mut self.spec_origin,
            HeroField::HeelHeight => &mut self.heel_height,
            HeroField::HeightOutsole => &mut self.height_outsole,
            HeroField::HeightInsole => &mut self.height_insole,
            HeroField::HeightTotal => &mut self.height_total,
            HeroField::SizeGuide => &mut self.size_guide,
        }
    }

    /// Stored value, if any, without default substitution.
    pub fn get(&self, field: HeroField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: HeroField, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    /// Value to render: the stored text, or the field default when blank.
    pub fn resolve(&self, field: HeroField) -> &str {
        match self.get(field) {
            Some(value) if !value.trim().is_empty() => value,
            _ => field.default_text(),
        }
    }

    /// Overlay every non-blank field of `other` onto `self`.
    pub fn merge(&mut self, other: &HeroTextContent) {
        for field in HeroField::ALL {
            if let Some(value) = other.get(field) {
                if !value.trim().is_empty() {
                    self.set(field, Some(value.to_string()));
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        HeroField::ALL.iter().all(|field| self.get(*field).is_none())
    }
}

/// Copy used when the generated text cannot be parsed.
pub fn fallback_copy() -> HeroTextContent {
    let mut copy = HeroTextContent::default();
    let values = [
        (HeroField::BrandLine, "HERITAGE LINE"),
        (HeroField::ProductName, "TREK MASTER"),
        (HeroField::SubName, "EARTH BROWN"),
        (
            HeroField::DescriptionMain,
            "A rugged everyday shoe built on a heritage outdoor silhouette.",
        ),
        (
            HeroField::StylingMatch,
            "Pairs naturally with denim, chinos and relaxed outdoor layers.",
        ),
        (
            HeroField::Craftsmanship,
            "Hand-finished suede upper with reinforced stitching at every stress point.",
        ),
        (
            HeroField::Technology,
            "Ortholite insole for all-day cushioning and breathability.",
        ),
        (HeroField::SpecColor, "Earth Brown"),
        (HeroField::SpecUpper, "Suede"),
        (HeroField::SpecLining, "Textile"),
        (HeroField::SpecOutsole, "Rubber"),
        (HeroField::SpecOrigin, "Made in KOREA"),
        (HeroField::HeelHeight, "3.5cm"),
        (
            HeroField::SizeGuide,
            "True to size. With a wide forefoot or thick socks, go half a size up.",
        ),
    ];
    for (field, value) in values {
        copy.set(field, Some(value.to_string()));
    }
    copy
}

/// Extract hero copy from generated text.
///
/// The text is searched for the outermost `{ ... }` span. When that span is
/// a JSON object, string-valued hero fields are taken from it (or from a
/// nested `heroTextContent` object). Anything else yields [`fallback_copy`].
pub fn parse_copy(raw: &str) -> HeroTextContent {
    let Some(object) = extract_object(raw) else {
        tracing::warn!("generated copy contained no JSON object, using fallback copy");
        return fallback_copy();
    };

    let source = object
        .get("heroTextContent")
        .and_then(serde_json::Value::as_object)
        .unwrap_or(&object);

    let mut copy = HeroTextContent::default();
    for field in HeroField::ALL {
        if let Some(value) = source.get(field.name()).and_then(serde_json::Value::as_str) {
            copy.set(field, Some(value.to_string()));
        }
    }
    copy
}

fn extract_object(raw: &str) -> Option<serde_json::Map<String, serde_json::Value>> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(&raw[start..=end]) {
        Ok(serde_json::Value::Object(map)) => Some(map),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "generated copy is not valid JSON");
            None
        }
    }
}

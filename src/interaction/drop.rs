//! Dropping a local image onto a section.
//!
//! An image dropped on a free section replaces its asset outright: the
//! section height follows the image's aspect ratio at page width and any
//! zoom/pan is reset. A held section that already shows an image is not
//! replaced; the drop becomes a request to composite the new image onto
//! the existing one, which the caller forwards to the generation backend.

use crate::config::PageConfig;
use crate::import::LoadedImage;
use crate::session::PageState;
use crate::types::SectionKind;

/// Inputs for a composite of a dropped image onto a held section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeRequest {
    pub section: String,
    /// The image currently in the section.
    pub base_url: String,
    /// The image that was dropped.
    pub overlay_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// The asset was replaced; `height` is the stored section height, when
    /// the image had a usable aspect ratio.
    Replaced { section: String, height: Option<f64> },
    Composite(CompositeRequest),
    /// The target does not take dropped images.
    Ignored,
}

/// Handle `image` dropped on `section`. Only image and spacer sections take
/// drops; the hero and the galleries are edited through their own actions.
/// The new height is computed at `page.width` and floored at
/// `sections.min_height`.
pub fn drop_image(
    state: &mut PageState,
    section: &str,
    image: &LoadedImage,
    config: &PageConfig,
) -> DropOutcome {
    if !state.registry().contains(section) {
        return DropOutcome::Ignored;
    }
    if !matches!(SectionKind::of(section), SectionKind::Image | SectionKind::Spacer) {
        return DropOutcome::Ignored;
    }

    if state.registry().is_held(section) && !state.is_placeholder_section(section) {
        if let Some(base) = state.assets().first_preview(section) {
            tracing::debug!(section, "held section, requesting composite");
            return DropOutcome::Composite(CompositeRequest {
                section: section.to_string(),
                base_url: base.to_string(),
                overlay_url: image.data_url.clone(),
            });
        }
    }

    state.update_image(section, 0, &image.data_url);
    let height = image
        .height_at(f64::from(config.page.width))
        .and_then(|h| state.resize_section(section, h, config).ok());
    // The section is known to exist; a reset cannot fail here.
    let _ = state.reset_image_transform(section);
    DropOutcome::Replaced {
        section: section.to_string(),
        height,
    }
}

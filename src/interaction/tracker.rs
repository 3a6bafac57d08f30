//! Scroll-driven active section.
//!
//! The host reports intersection ratios for sections as they scroll; a
//! section whose ratio reaches the threshold becomes active. When several
//! cross it in one batch the last reported one wins.

use crate::config::PageConfig;
use crate::session::PageState;

/// Visible fraction of one section, `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Visibility {
    pub section: String,
    pub ratio: f64,
}

impl Visibility {
    pub fn new(section: impl Into<String>, ratio: f64) -> Self {
        Self {
            section: section.into(),
            ratio,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveSectionTracker {
    threshold: f64,
}

impl ActiveSectionTracker {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &PageConfig) -> Self {
        Self::new(config.tracking.threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The section that should become active for this batch, if any.
    pub fn pick<'a>(&self, batch: &'a [Visibility]) -> Option<&'a str> {
        batch
            .iter()
            .rev()
            .find(|v| v.ratio >= self.threshold)
            .map(|v| v.section.as_str())
    }

    /// Apply a batch to the state. Sections that are no longer in the
    /// order are skipped. Returns true when the active section changed.
    pub fn observe(&self, batch: &[Visibility], state: &mut PageState) -> bool {
        let candidate = batch
            .iter()
            .rev()
            .filter(|v| v.ratio >= self.threshold)
            .find(|v| state.registry().contains(&v.section));
        match candidate {
            Some(v) => state.set_active_section(&v.section),
            None => false,
        }
    }
}

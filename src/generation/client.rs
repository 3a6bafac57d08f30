//! Generation backend trait.
//!
//! The [`GenerationClient`] trait is the seam to whatever model service
//! produces copy and images. It has four operations; results are data URLs
//! (or raw text for copy). The orchestration in the parent module is
//! backend-agnostic and drives clients from rayon workers, so
//! implementations must be `Sync`.

use super::plan::GenerationMode;
use thiserror::Error;

/// A failed request to the generation backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("response contained no image")]
    NoImage,
}

pub trait GenerationClient: Sync {
    /// Raw copy text for the hero section, usually JSON.
    fn generate_copy(&self, product_urls: &[String]) -> Result<String, ClientError>;

    /// The master model shot: the model wearing the product.
    fn generate_master(
        &self,
        model_url: &str,
        product_urls: &[String],
        mode: GenerationMode,
    ) -> Result<String, ClientError>;

    /// A new pose derived from `base_url`.
    fn generate_variant(&self, base_url: &str, instruction: &str) -> Result<String, ClientError>;

    /// `overlay_url` merged into `base_url`.
    fn composite(&self, base_url: &str, overlay_url: &str) -> Result<String, ClientError>;
}

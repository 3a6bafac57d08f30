//! Generation orchestration.
//!
//! Drives a [`GenerationClient`] to fill a page: hero copy from the product
//! photos, then the model and closeup galleries from one master shot.
//!
//! ```text
//! product photos ──▶ generate_copy ──▶ parse_copy ──▶ HeroTextContent
//!        │
//!        └─ model photo ──▶ master (retry) ──┬─▶ model variants   ─┐
//!                                            └─▶ closeup variants ─┴─▶ ImageSet
//! ```
//!
//! The master strictly precedes every variation; the two variation batches
//! run concurrently (`rayon::join`), and each batch fans its items out over
//! the rayon pool. A failed variation is recorded in the batch result and
//! left out of the gallery. A failed master aborts the set.
//!
//! Nothing here touches [`PageState`] until the caller applies a finished
//! result, so a cancelled or superseded run never leaks into the page.

pub mod batch;
pub mod cancel;
pub mod client;
pub mod plan;
pub mod retry;

pub use batch::{BatchFailure, BatchResult, run_batch};
pub use cancel::{BatchSupervisor, CancellationToken};
pub use client::{ClientError, GenerationClient};
pub use plan::{GenerationMode, ShotPlan, Variant};
pub use retry::{RetryError, RetryPolicy};

use crate::content::{self, HeroTextContent};
use crate::interaction::CompositeRequest;
use crate::session::PageState;
use crate::types::{Asset, GalleryType};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Request(#[from] ClientError),
    #[error("generation cancelled")]
    Cancelled,
    #[error("master image failed after {attempts} attempt(s): {source}")]
    MasterFailed { attempts: u32, source: ClientError },
    #[error("a model photo is required for {0} mode")]
    MissingModelImage(&'static str),
    #[error("no product photos to generate from")]
    NoProductImages,
    #[error("shot {index} of {key} has no image to derive from")]
    NoBaseImage { key: String, index: usize },
}

impl From<RetryError> for GenerationError {
    fn from(e: RetryError) -> Self {
        match e {
            RetryError::Cancelled => GenerationError::Cancelled,
            RetryError::Exhausted { attempts, last } => GenerationError::MasterFailed {
                attempts,
                source: last,
            },
        }
    }
}

/// Generated model and closeup galleries.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSet {
    /// The master first, then the model variations that succeeded.
    pub model_shots: Vec<Asset>,
    pub closeup_shots: Vec<Asset>,
    /// Variations that failed, model batch first.
    pub failed: Vec<BatchFailure<Variant>>,
}

/// Derive one shot per variant from `master_url`.
pub fn generate_variations<C>(
    client: &C,
    master_url: &str,
    variants: &[Variant],
    token: &CancellationToken,
) -> Result<BatchResult<Asset, Variant>, GenerationError>
where
    C: GenerationClient + ?Sized,
{
    run_batch(variants, token, |variant| {
        client
            .generate_variant(master_url, &variant.instruction)
            .map(|url| Asset::shot(url, variant.name.as_str()))
    })
}

/// Master shot with retry, then both variation batches concurrently.
pub fn generate_image_set<C>(
    client: &C,
    model_url: &str,
    product_urls: &[String],
    mode: GenerationMode,
    policy: &RetryPolicy,
    token: &CancellationToken,
) -> Result<ImageSet, GenerationError>
where
    C: GenerationClient + ?Sized,
{
    let Some(plan) = mode.plan() else {
        return Ok(ImageSet {
            model_shots: Vec::new(),
            closeup_shots: Vec::new(),
            failed: Vec::new(),
        });
    };
    tracing::info!(mode = mode.name(), calls = plan.call_count(), "generating image set");

    let master_url = policy.run(token, || client.generate_master(model_url, product_urls, mode))?;
    let master = Asset::shot(master_url.as_str(), plan.master_pose.as_str());

    let (model, closeup) = rayon::join(
        || generate_variations(client, &master_url, &plan.model, token),
        || generate_variations(client, &master_url, &plan.closeup, token),
    );
    let (model, closeup) = (model?, closeup?);
    if token.is_cancelled() {
        return Err(GenerationError::Cancelled);
    }

    tracing::info!(model = %model, closeup = %closeup, "image set finished");
    let mut model_shots = Vec::with_capacity(1 + model.succeeded.len());
    model_shots.push(master);
    model_shots.extend(model.succeeded);
    let mut failed = model.failed;
    failed.extend(closeup.failed);
    Ok(ImageSet {
        model_shots,
        closeup_shots: closeup.succeeded,
        failed,
    })
}

/// Inputs for a full page run.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub product_urls: &'a [String],
    pub model_url: Option<&'a str>,
    pub mode: GenerationMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub copy: HeroTextContent,
    /// `None` in copy-only mode.
    pub images: Option<ImageSet>,
}

/// Copy and images for a page. The copy request runs alongside the image
/// set. Malformed copy falls back to stock content; a failed copy request
/// is an error.
pub fn generate_page<C>(
    client: &C,
    request: &GenerationRequest<'_>,
    policy: &RetryPolicy,
    token: &CancellationToken,
) -> Result<GeneratedPage, GenerationError>
where
    C: GenerationClient + ?Sized,
{
    if request.product_urls.is_empty() {
        return Err(GenerationError::NoProductImages);
    }
    let model_url = match (request.mode.plan(), request.model_url) {
        (None, _) => None,
        (Some(_), Some(url)) => Some(url),
        (Some(_), None) => return Err(GenerationError::MissingModelImage(request.mode.name())),
    };

    let copy = || -> Result<HeroTextContent, GenerationError> {
        if token.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }
        let raw = client.generate_copy(request.product_urls)?;
        Ok(content::parse_copy(&raw))
    };
    let (copy, images) = match model_url {
        Some(model_url) => {
            let (copy, images) = rayon::join(copy, || {
                generate_image_set(
                    client,
                    model_url,
                    request.product_urls,
                    request.mode,
                    policy,
                    token,
                )
            });
            (copy?, Some(images?))
        }
        None => (copy()?, None),
    };
    if token.is_cancelled() {
        return Err(GenerationError::Cancelled);
    }
    Ok(GeneratedPage { copy, images })
}

impl GeneratedPage {
    /// Write the result into the page.
    ///
    /// Copy merges over the current hero text (blank generated fields keep
    /// what is there). Galleries are replaced unless their section is held;
    /// a gallery whose section was removed is appended again.
    pub fn apply_to(&self, state: &mut PageState) {
        state.merge_hero(&self.copy);
        let Some(images) = &self.images else {
            return;
        };
        for (gallery, shots) in [
            (GalleryType::ModelShots, &images.model_shots),
            (GalleryType::CloseupShots, &images.closeup_shots),
        ] {
            let section = gallery.section_key();
            if state.registry().is_held(section) {
                tracing::info!(section, "section held, keeping existing shots");
                continue;
            }
            if !state.registry().contains(section) {
                // Not in the order, so the key cannot collide.
                let _ = state.append_section(section);
            }
            state.set_gallery(gallery, shots.clone());
        }
    }
}

/// Composite a dropped image onto a held section and store the result.
pub fn resolve_composite<C>(
    client: &C,
    state: &mut PageState,
    request: &CompositeRequest,
) -> Result<(), GenerationError>
where
    C: GenerationClient + ?Sized,
{
    let url = client.composite(&request.base_url, &request.overlay_url)?;
    state.update_image(&request.section, 0, &url);
    Ok(())
}

/// Regenerate one gallery shot in a new pose. The pose becomes the shot's
/// label.
pub fn regenerate_shot<C>(
    client: &C,
    state: &mut PageState,
    key: &str,
    index: usize,
    pose: &str,
) -> Result<(), GenerationError>
where
    C: GenerationClient + ?Sized,
{
    let base = match state.assets().gallery(key).get(index) {
        Some(asset) if !asset.is_placeholder() => asset.url().to_string(),
        _ => {
            return Err(GenerationError::NoBaseImage {
                key: key.to_string(),
                index,
            });
        }
    };
    let url = client.generate_variant(&base, pose)?;
    state.replace_shot(key, index, Asset::shot(url, pose));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::client::tests::{MockClient, RecordedCall};
    use super::*;
    use crate::test_helpers::*;

    fn products() -> Vec<String> {
        vec!["data:image/png;base64,cDE=".to_string()]
    }

    fn poses(shots: &[Asset]) -> Vec<&str> {
        shots.iter().filter_map(Asset::pose).collect()
    }

    #[test]
    fn original_set_puts_master_first() {
        let client = MockClient::new();
        let set = generate_image_set(
            &client,
            "data:model",
            &products(),
            GenerationMode::Original,
            &RetryPolicy::once(),
            &CancellationToken::new(),
        )
        .unwrap();

        assert_eq!(poses(&set.model_shots), vec!["Master", "Walk", "Cross"]);
        assert_eq!(poses(&set.closeup_shots), vec!["Side", "Angle", "Top"]);
        assert_eq!(set.model_shots[0].url(), "data:image/png;base64,master-original");
        assert!(set.failed.is_empty());

        let variants_from_master = client
            .get_calls()
            .iter()
            .filter(|c| {
                matches!(c, RecordedCall::Variant { base, .. }
                    if base == "data:image/png;base64,master-original")
            })
            .count();
        assert_eq!(variants_from_master, 5);
    }

    #[test]
    fn failed_variation_is_recorded_not_fatal() {
        let client = MockClient::new().failing("Walking");
        let set = generate_image_set(
            &client,
            "data:model",
            &products(),
            GenerationMode::Original,
            &RetryPolicy::once(),
            &CancellationToken::new(),
        )
        .unwrap();

        assert_eq!(poses(&set.model_shots), vec!["Master", "Cross"]);
        assert_eq!(set.failed.len(), 1);
        assert_eq!(set.failed[0].input.name, "Walk");
    }

    #[test]
    fn master_retries_then_fails() {
        let client = MockClient::new().master_fails(5);
        let err = generate_image_set(
            &client,
            "data:model",
            &products(),
            GenerationMode::Studio,
            &RetryPolicy::new(3, std::time::Duration::ZERO),
            &CancellationToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::MasterFailed { attempts: 3, .. }));
        // No variations after a failed master.
        assert_eq!(client.get_calls().len(), 3);
    }

    #[test]
    fn master_recovers_on_retry() {
        let client = MockClient::new().master_fails(1);
        let set = generate_image_set(
            &client,
            "data:model",
            &products(),
            GenerationMode::Studio,
            &RetryPolicy::new(2, std::time::Duration::ZERO),
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(set.model_shots[0].pose(), Some("Studio Master"));
    }

    #[test]
    fn cancelled_run_makes_no_calls() {
        let client = MockClient::new();
        let token = CancellationToken::new();
        token.cancel();
        let err = generate_image_set(
            &client,
            "data:model",
            &products(),
            GenerationMode::Original,
            &RetryPolicy::once(),
            &token,
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::Cancelled));
        assert!(client.get_calls().is_empty());
    }

    #[test]
    fn page_parses_copy_and_falls_back() {
        let client = MockClient::with_copy(r#"Sure! {"productName": "Cloud Step"} Enjoy."#);
        let request = GenerationRequest {
            product_urls: &products(),
            model_url: None,
            mode: GenerationMode::Frame,
        };
        let page = generate_page(&client, &request, &RetryPolicy::once(), &CancellationToken::new())
            .unwrap();
        assert_eq!(page.copy.product_name.as_deref(), Some("Cloud Step"));
        assert!(page.images.is_none());

        let garbled = MockClient::with_copy("no json here");
        let page = generate_page(&garbled, &request, &RetryPolicy::once(), &CancellationToken::new())
            .unwrap();
        assert_eq!(page.copy, content::fallback_copy());
    }

    #[test]
    fn page_requires_inputs() {
        let client = MockClient::new();
        let empty: Vec<String> = Vec::new();
        let no_products = GenerationRequest {
            product_urls: &empty,
            model_url: Some("data:model"),
            mode: GenerationMode::Original,
        };
        assert!(matches!(
            generate_page(&client, &no_products, &RetryPolicy::once(), &CancellationToken::new()),
            Err(GenerationError::NoProductImages)
        ));

        let urls = products();
        let no_model = GenerationRequest {
            product_urls: &urls,
            model_url: None,
            mode: GenerationMode::Studio,
        };
        assert!(matches!(
            generate_page(&client, &no_model, &RetryPolicy::once(), &CancellationToken::new()),
            Err(GenerationError::MissingModelImage("studio"))
        ));
    }

    #[test]
    fn apply_respects_held_sections() {
        let mut state = sample_state();
        state.toggle_hold("closeup").unwrap();
        state.remove_section("models").unwrap();

        let page = GeneratedPage {
            copy: HeroTextContent {
                brand_line: Some("ACME".into()),
                ..HeroTextContent::default()
            },
            images: Some(ImageSet {
                model_shots: vec![Asset::shot("data:m", "Master")],
                closeup_shots: vec![Asset::shot("data:c", "Side")],
                failed: Vec::new(),
            }),
        };
        page.apply_to(&mut state);

        assert_eq!(state.hero().brand_line.as_deref(), Some("ACME"));
        assert_eq!(state.hero().product_name.as_deref(), Some("Trail Runner"));
        assert_eq!(gallery_urls(&state, "models"), vec!["data:m"]);
        assert_eq!(order_of(&state).last(), Some(&"models"));
        assert_eq!(gallery_urls(&state, "closeup"), vec!["data:image/png;base64,c2lkZQ=="]);
    }

    #[test]
    fn composite_and_regenerate() {
        let client = MockClient::new();
        let mut state = PageState::new();
        let key = state.add_image_section(1).unwrap();
        let request = CompositeRequest {
            section: key.clone(),
            base_url: "data:base".into(),
            overlay_url: "data:overlay".into(),
        };
        resolve_composite(&client, &mut state, &request).unwrap();
        assert_eq!(
            state.assets().first_preview(&key),
            Some("data:image/png;base64,composite")
        );

        let mut state = sample_state();
        regenerate_shot(&client, &mut state, "models", 0, "Running").unwrap();
        let shot = &state.assets().gallery("models")[0];
        assert_eq!(shot.pose(), Some("Running"));
        assert_eq!(shot.url(), "data:image/png;base64,Running");

        let err = regenerate_shot(&client, &mut state, "models", 4, "Jump").unwrap_err();
        assert!(matches!(err, GenerationError::NoBaseImage { index: 4, .. }));
    }
}

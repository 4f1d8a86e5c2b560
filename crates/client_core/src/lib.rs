//! HTTP boundary of the gallery client: talks to the generation endpoint
//! the same way the web page does, including the CSRF and AJAX marker
//! headers the backend keys on.

use anyhow::{Context, Result};
use reqwest::Client;
use shared::{
    domain::CharacterId,
    error::EndpointRejection,
    protocol::{ApiStatus, GalleryListResponse, GenerationForm, GenerationResponse},
};
use tracing::{debug, warn};
use url::Url;

/// Header telling the backend to answer with JSON instead of a full page.
pub const AJAX_MARKER_HEADER: &str = "X-Requested-With";
pub const AJAX_MARKER_VALUE: &str = "XMLHttpRequest";
/// Django-style CSRF protection header attached to every mutating request.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Context the page hands to its interaction layer. Read once at startup;
/// when it is absent the whole interaction layer stays unwired.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub authenticated: bool,
    pub login_url: String,
    pub generate_endpoint: String,
    pub csrf_token: String,
}

/// Terminal result of one generation submission, as consumed by the UI.
/// Exactly one of these is produced per submission, on every exit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success { image_urls: Vec<String> },
    Rejected { message: String },
    TransportFailed,
}

impl GenerationOutcome {
    pub fn from_reply(reply: Result<GenerationResponse>) -> Self {
        match reply {
            Ok(response) => match response.status {
                ApiStatus::Success => Self::Success {
                    image_urls: response.resolved_image_urls(),
                },
                ApiStatus::Error => Self::Rejected {
                    message: response.message.unwrap_or_default(),
                },
            },
            Err(err) => {
                warn!("generation request failed in transport: {err:#}");
                Self::TransportFailed
            }
        }
    }
}

pub struct GalleryClient {
    http: Client,
    context: PageContext,
}

impl GalleryClient {
    pub fn new(context: PageContext) -> Self {
        Self {
            http: Client::new(),
            context,
        }
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }

    /// Lists the caller's previously generated images for one character.
    ///
    /// The backend reports application failures in the JSON body, not the
    /// HTTP status line, so the body is decoded regardless of status code.
    pub async fn fetch_gallery(&self, character_id: CharacterId) -> Result<Vec<String>> {
        let response: GalleryListResponse = self
            .http
            .get(&self.context.generate_endpoint)
            .query(&[("character_id", character_id.0)])
            .header(AJAX_MARKER_HEADER, AJAX_MARKER_VALUE)
            .send()
            .await
            .context("gallery request did not complete")?
            .json()
            .await
            .context("gallery endpoint returned an unreadable body")?;

        match response.status {
            ApiStatus::Success => {
                debug!(
                    character_id = character_id.0,
                    images = response.images.len(),
                    "gallery listing fetched"
                );
                Ok(response.images)
            }
            ApiStatus::Error => Err(EndpointRejection::new(
                response.message.unwrap_or_default(),
            )
            .into()),
        }
    }

    /// Submits one generation request. Returns the decoded reply whatever
    /// its status; only transport and decode problems are `Err`.
    pub async fn submit_generation(
        &self,
        character_id: CharacterId,
        prompt: &str,
    ) -> Result<GenerationResponse> {
        let form = GenerationForm {
            character_id,
            prompt: prompt.to_string(),
        };
        self.http
            .post(&self.context.generate_endpoint)
            .header(CSRF_HEADER, &self.context.csrf_token)
            .header(AJAX_MARKER_HEADER, AJAX_MARKER_VALUE)
            .form(&form)
            .send()
            .await
            .context("generation request did not complete")?
            .json()
            .await
            .context("generation endpoint returned an unreadable body")
    }

    /// Downloads raw image bytes. Server-relative URLs (the common case for
    /// gallery and result images) resolve against the endpoint's origin.
    pub async fn download_image(&self, url: &str) -> Result<Vec<u8>> {
        let resolved = self.resolve_url(url)?;
        let response = self
            .http
            .get(resolved)
            .send()
            .await
            .with_context(|| format!("image download did not complete for '{url}'"))?
            .error_for_status()
            .with_context(|| format!("image download was refused for '{url}'"))?;
        Ok(response.bytes().await?.to_vec())
    }

    pub fn resolve_url(&self, raw: &str) -> Result<Url> {
        let base = Url::parse(&self.context.generate_endpoint)
            .context("generate endpoint is not an absolute URL")?;
        base.join(raw)
            .with_context(|| format!("image URL '{raw}' cannot be resolved"))
    }
}

#[cfg(test)]
mod tests;

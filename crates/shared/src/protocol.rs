use serde::{Deserialize, Serialize};

use crate::domain::CharacterId;

/// Status discriminator used by every endpoint response. The backend only
/// ever emits `"success"` or `"error"`, but anything unrecognized is folded
/// into `Error` so a new server-side status cannot break decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    Success,
    #[serde(other)]
    Error,
}

impl ApiStatus {
    pub fn is_success(self) -> bool {
        matches!(self, ApiStatus::Success)
    }
}

/// Reply to `GET {endpoint}?character_id={id}`: the caller's previously
/// generated images for one character, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryListResponse {
    pub status: ApiStatus,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Form-encoded body of the generation POST.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationForm {
    pub character_id: CharacterId,
    pub prompt: String,
}

/// Reply to the generation POST. A successful reply carries either a list of
/// image URLs or a single `image_url`; older server builds only send the
/// latter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub status: ApiStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GenerationResponse {
    /// The images to render: the list when present, otherwise the single
    /// URL, otherwise nothing.
    pub fn resolved_image_urls(&self) -> Vec<String> {
        match (&self.image_urls, &self.image_url) {
            (Some(urls), _) => urls.clone(),
            (None, Some(url)) => vec![url.clone()],
            (None, None) => Vec::new(),
        }
    }
}

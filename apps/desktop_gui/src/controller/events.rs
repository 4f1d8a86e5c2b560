//! Backend-to-UI events for the gallery desktop client.
//!
//! Gallery and generation completions carry the `CharacterId` they were
//! issued for so the UI can discard responses that arrive after the modal
//! was reopened for a different character.

use client_core::GenerationOutcome;
use shared::domain::CharacterId;

use crate::ui::app::PreviewImage;

pub enum UiEvent {
    Info(String),
    GalleryLoaded {
        character_id: CharacterId,
        images: Vec<String>,
    },
    GenerationFinished {
        character_id: CharacterId,
        outcome: GenerationOutcome,
    },
    ImageLoaded {
        url: String,
        image: PreviewImage,
    },
    ImageFailed {
        url: String,
        reason: String,
    },
}

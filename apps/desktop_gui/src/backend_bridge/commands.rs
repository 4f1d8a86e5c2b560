//! Backend commands queued from UI to backend worker.

use shared::domain::CharacterId;

pub enum BackendCommand {
    FetchGallery {
        character_id: CharacterId,
    },
    SubmitGeneration {
        character_id: CharacterId,
        prompt: String,
    },
    FetchImage {
        url: String,
    },
}

//! The catalog document rendered by the desktop client: hero content plus
//! one entry per character card. Produced server-side; consumed verbatim.

use serde::{Deserialize, Serialize};

use crate::domain::CharacterId;
use crate::error::CatalogError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub hero_title: String,
    #[serde(default)]
    pub hero_description: String,
    #[serde(default)]
    pub hero_slides: Vec<String>,
    #[serde(default)]
    pub characters: Vec<CatalogCharacter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCharacter {
    pub id: CharacterId,
    pub name: String,
    /// Promotional frames for the card carousel, in display order.
    #[serde(default)]
    pub frames: Vec<String>,
    /// Prompt suggestion tags shown as chips in the generation dialog.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CatalogDocument {
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(raw)?)
    }
}

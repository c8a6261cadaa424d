use serde::{Deserialize, Serialize};

use super::ServiceKind;
use crate::errors::{PodNoteError, PodNoteResult};

/// Where to fetch an episode page from, as classified from the raw URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub service: ServiceKind,
    pub host: String,
    pub path: String,
}

/// The page-derived part of an episode record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeFields {
    pub title: String,
    pub description: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastMetadata {
    pub title: String,
    /// May contain raw markup; it is inserted verbatim.
    pub description: String,
    pub image_url: String,
    pub source_url: String,
    pub retrieved_at: String,
}

impl PodcastMetadata {
    /// Builds a complete record. Every field must be non-empty, otherwise
    /// the whole record is rejected.
    pub fn new(
        fields: EpisodeFields,
        source_url: String,
        retrieved_at: String,
    ) -> PodNoteResult<Self> {
        let checks = [
            ("title", &fields.title),
            ("description", &fields.description),
            ("image url", &fields.image_url),
            ("source url", &source_url),
            ("retrieval date", &retrieved_at),
        ];
        for (name, value) in checks {
            if value.trim().is_empty() {
                return Err(PodNoteError::MalformedDocument(name.to_string()));
            }
        }

        Ok(Self {
            title: fields.title,
            description: fields.description,
            image_url: fields.image_url,
            source_url,
            retrieved_at,
        })
    }
}

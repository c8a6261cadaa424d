use crate::document::DocumentQuery;
use crate::domain::{EpisodeFields, ServiceKind};
use crate::errors::PodNoteResult;
use crate::sources::traits::{required, EpisodeSource};

pub const SPOTIFY_HOST: &str = "open.spotify.com";

/// Reads everything from OpenGraph meta tags.
pub struct SpotifySource;

impl SpotifySource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SpotifySource {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodeSource for SpotifySource {
    fn service(&self) -> ServiceKind {
        ServiceKind::Spotify
    }

    fn host(&self) -> &'static str {
        SPOTIFY_HOST
    }

    fn extract(&self, doc: &dyn DocumentQuery) -> PodNoteResult<EpisodeFields> {
        let title = required(doc.meta_content("og:title"), "og:title")?;
        let description = required(doc.meta_content("og:description"), "og:description")?;
        let image_url = required(doc.meta_content("og:image"), "og:image")?;

        Ok(EpisodeFields {
            title,
            description,
            image_url,
        })
    }
}

use chrono::NaiveDateTime;

use crate::document::DocumentQuery;
use crate::domain::{PodcastMetadata, ResolvedRequest, ServiceKind};
use crate::errors::{PodNoteError, PodNoteResult};
use crate::sources::traits::EpisodeSource;
use crate::sources::{apple::ApplePodcastsSource, spotify::SpotifySource};

/// Display format of the retrieval timestamp, independent of locale.
pub const RETRIEVED_AT_FORMAT: &str = "%d-%m-%Y %H:%M";

pub struct SourceRegistry {
    sources: Vec<Box<dyn EpisodeSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            sources: Vec::new(),
        };

        // Registration order is match priority: first host found in the URL wins
        registry.register(Box::new(SpotifySource::new()));
        registry.register(Box::new(ApplePodcastsSource::new()));

        registry
    }

    pub fn register(&mut self, source: Box<dyn EpisodeSource>) {
        self.sources.push(source);
    }

    pub fn sources(&self) -> impl Iterator<Item = &dyn EpisodeSource> {
        self.sources.iter().map(|s| s.as_ref())
    }

    /// Find appropriate source for URL
    pub fn find_source(&self, url: &str) -> Option<&dyn EpisodeSource> {
        self.sources
            .iter()
            .find(|s| s.can_handle(url))
            .map(|s| s.as_ref())
    }

    /// Classify a URL and split it into the host and the path to request.
    /// The path is whatever follows the host, query string included.
    pub fn resolve(&self, url: &str) -> PodNoteResult<ResolvedRequest> {
        let source = self
            .find_source(url)
            .ok_or_else(|| PodNoteError::UnsupportedService(url.to_string()))?;

        let host = source.host();
        let path = url
            .split_once(host)
            .map(|(_, rest)| rest.to_string())
            .unwrap_or_default();

        Ok(ResolvedRequest {
            service: source.service(),
            host: host.to_string(),
            path,
        })
    }

    /// Extract a full metadata record using the strategy for `service`.
    pub fn extract(
        &self,
        doc: &dyn DocumentQuery,
        service: ServiceKind,
        source_url: &str,
        now: NaiveDateTime,
    ) -> PodNoteResult<PodcastMetadata> {
        let source = self
            .sources
            .iter()
            .find(|s| s.service() == service)
            .ok_or_else(|| PodNoteError::UnsupportedService(service.to_string()))?;

        let fields = source.extract(doc)?;
        PodcastMetadata::new(fields, source_url.to_string(), format_retrieved_at(now))
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_retrieved_at(now: NaiveDateTime) -> String {
    now.format(RETRIEVED_AT_FORMAT).to_string()
}

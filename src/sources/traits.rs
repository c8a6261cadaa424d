use crate::document::DocumentQuery;
use crate::domain::{EpisodeFields, ServiceKind};
use crate::errors::{PodNoteError, PodNoteResult};

pub trait EpisodeSource: Send + Sync {
    /// Identifies this service
    fn service(&self) -> ServiceKind;

    /// Host pattern that marks a URL as belonging to this service
    fn host(&self) -> &'static str;

    /// Check if this source can handle the given URL
    fn can_handle(&self, url: &str) -> bool {
        url.contains(self.host())
    }

    /// Pull title, description and artwork out of an episode page
    fn extract(&self, doc: &dyn DocumentQuery) -> PodNoteResult<EpisodeFields>;
}

/// Turns an absent or blank lookup into a `MalformedDocument` naming the field.
pub(crate) fn required(value: Option<String>, field: &str) -> PodNoteResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PodNoteError::MalformedDocument(field.to_string())),
    }
}

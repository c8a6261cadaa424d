pub mod service;
pub mod episode;
pub mod note;

pub use service::ServiceKind;
pub use episode::{EpisodeFields, PodcastMetadata, ResolvedRequest};
pub use note::RenderedNote;

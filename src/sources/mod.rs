pub mod traits;
pub mod spotify;
pub mod apple;
pub mod registry;

pub use traits::EpisodeSource;
pub use registry::{format_retrieved_at, SourceRegistry};

use crate::document::DocumentQuery;
use crate::domain::{EpisodeFields, ServiceKind};
use crate::errors::PodNoteResult;
use crate::sources::traits::{required, EpisodeSource};

pub const APPLE_HOST: &str = "podcasts.apple.com";

const DESCRIPTION_SECTION_CLASS: &str = "product-hero-desc__section";
const ARTWORK_SOURCE_CLASS: &str = "we-artwork__source";

/// Reads the Apple Podcasts episode page layout: OpenGraph title, the hero
/// description section and the artwork `<source>` element.
pub struct ApplePodcastsSource;

impl ApplePodcastsSource {
    pub fn new() -> Self {
        Self
    }

    /// `srcset` holds "url descriptor" pairs; only the first url is kept.
    fn first_srcset_url(srcset: &str) -> Option<String> {
        srcset.split_whitespace().next().map(|url| url.to_string())
    }
}

impl Default for ApplePodcastsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodeSource for ApplePodcastsSource {
    fn service(&self) -> ServiceKind {
        ServiceKind::Apple
    }

    fn host(&self) -> &'static str {
        APPLE_HOST
    }

    fn extract(&self, doc: &dyn DocumentQuery) -> PodNoteResult<EpisodeFields> {
        let title = required(doc.meta_content("og:title"), "og:title")?;
        let description = required(
            doc.class_descendant_inner_html(DESCRIPTION_SECTION_CLASS, "p"),
            "description section",
        )?;
        let srcset = required(doc.class_attr(ARTWORK_SOURCE_CLASS, "srcset"), "artwork srcset")?;
        let image_url = required(Self::first_srcset_url(&srcset), "artwork url")?;

        Ok(EpisodeFields {
            title,
            description,
            image_url,
        })
    }
}

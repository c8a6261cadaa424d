//! Placeholder substitution for note bodies and file names.
//!
//! Each recognised token is replaced once: only its first occurrence in the
//! template. Later occurrences and unknown `{{...}}` tokens pass through as
//! written. Values are inserted verbatim, markup included.

use crate::domain::PodcastMetadata;

pub const TITLE: &str = "{{Title}}";
pub const IMAGE_URL: &str = "{{ImageURL}}";
pub const DESCRIPTION: &str = "{{Description}}";
pub const DATE: &str = "{{Date}}";
pub const PODCAST_URL: &str = "{{PodcastURL}}";

const FILE_NAME_FORBIDDEN: [char; 3] = ['/', '\\', ':'];

/// Render a note body. `{{PodcastURL}}` is bound to `source_url` exactly as
/// the user supplied it.
pub fn render(template: &str, fields: &PodcastMetadata, source_url: &str) -> String {
    substitute(
        template,
        &[
            (TITLE, fields.title.as_str()),
            (IMAGE_URL, fields.image_url.as_str()),
            (DESCRIPTION, fields.description.as_str()),
            (DATE, fields.retrieved_at.as_str()),
            (PODCAST_URL, source_url),
        ],
    )
}

/// Render a file name from `{{Title}}` and `{{Date}}` only, made safe for
/// the filesystem. A blank result falls back to the sanitized title.
pub fn render_file_name(template: &str, title: &str, date: &str) -> String {
    let rendered = substitute(template, &[(TITLE, title), (DATE, date)]);
    let name = sanitize_file_name(&rendered);

    if name.trim().is_empty() {
        sanitize_file_name(title)
    } else {
        name
    }
}

/// Positions are taken from the template alone, so substituted values are
/// never scanned for tokens.
fn substitute(template: &str, bindings: &[(&str, &str)]) -> String {
    let mut spans: Vec<(usize, &str, &str)> = bindings
        .iter()
        .filter_map(|&(token, value)| template.find(token).map(|start| (start, token, value)))
        .collect();
    spans.sort_by_key(|&(start, _, _)| start);

    let mut out = String::with_capacity(template.len());
    let mut cursor = 0;
    for (start, token, value) in spans {
        out.push_str(&template[cursor..start]);
        out.push_str(value);
        cursor = start + token.len();
    }
    out.push_str(&template[cursor..]);
    out
}

pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !FILE_NAME_FORBIDDEN.contains(c))
        .collect()
}

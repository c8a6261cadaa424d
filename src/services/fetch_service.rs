use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use url::Url;

use crate::errors::{PodNoteError, PodNoteResult};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Retrieves the raw body of an episode page.
#[cfg_attr(test, mockall::automock)]
pub trait PageFetcher {
    /// Plain GET of `https://{host}{path}`, resolving with the whole body.
    fn fetch_body(&self, host: &str, path: &str) -> PodNoteResult<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            // No timeout: a slow host stalls only the current run
            client: Client::builder()
                .timeout(None::<std::time::Duration>)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Build the request URL on the resolved host. The path is set on that
    /// URL rather than concatenated, so it can never redirect to another host.
    fn build_url(host: &str, path: &str) -> PodNoteResult<Url> {
        let mut url = Url::parse(&format!("https://{}/", host))
            .map_err(|e| PodNoteError::InvalidUrl(format!("{}: {}", host, e)))?;

        let path = path.split('#').next().unwrap_or_default();
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };

        url.set_path(path);
        url.set_query(query);
        Ok(url)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch_body(&self, host: &str, path: &str) -> PodNoteResult<String> {
        let url = Self::build_url(host, path)?;
        tracing::debug!(%url, "fetching episode page");

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "episode page returned a non-success status");
        }

        let bytes = response.bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

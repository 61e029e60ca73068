use crate::config::Config;
use anyhow::{Context, Result};
use log::debug;
use ureq::{Agent, AgentBuilder, Response};
use urlencoding::encode;

/// Fields requested from the art search so the response carries everything the
/// curation pipeline needs
pub const ARTIC_FIELDS: &[&str] = &[
    "id",
    "title",
    "artist_title",
    "date_display",
    "date_start",
    "date_end",
    "image_id",
    "description",
];

/// Anything that can GET a URL and hand back a JSON body.
///
/// `Ok(None)` means the resource does not exist (HTTP 404); every other
/// non-success status, transport failure or unparseable body is an error.
#[cfg_attr(test, mockall::automock)]
pub trait JsonFetcher: Send + Sync {
    fn get_json(&self, url: &str) -> Result<Option<serde_json::Value>>;
}

/// Blocking HTTP client shared by the three public APIs
pub struct HttpClient {
    agent: Agent,
}

impl HttpClient {
    /// Create a new client with configuration from environment
    pub fn new(config: &Config) -> Self {
        let mut builder = AgentBuilder::new().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }

        HttpClient {
            agent: builder.build(),
        }
    }
}

impl JsonFetcher for HttpClient {
    fn get_json(&self, url: &str) -> Result<Option<serde_json::Value>> {
        debug!("GET {url}");
        read_json_response(url, self.agent.get(url).call())
    }
}

/// Map a finished request to the fetcher contract: 404 is `None`, any other
/// non-success status, transport error or non-JSON body is an error.
fn read_json_response(
    url: &str,
    result: Result<Response, ureq::Error>,
) -> Result<Option<serde_json::Value>> {
    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(404, _)) => return Ok(None),
        Err(ureq::Error::Status(code, response)) => {
            return Err(anyhow::anyhow!(
                "HTTP {} {} from {}",
                code,
                response.status_text(),
                url
            ));
        }
        Err(e) => return Err(anyhow::anyhow!("HTTP request failed: {}", e)),
    };

    let response_text = response.into_string()?;

    let parsed: serde_json::Value = serde_json::from_str(&response_text)
        .with_context(|| format!("Failed to parse JSON response from {url}"))?;

    Ok(Some(parsed))
}

/// Music catalog search for one phrase, scoped to a storefront country
pub fn itunes_search_url(config: &Config, term: &str, country: &str) -> String {
    format!(
        "{}/search?term={}&media=music&entity=musicTrack&country={}&limit={}",
        config.itunes_url,
        encode(term),
        country,
        config.song_result_limit
    )
}

/// Encyclopedia page summary for a title
pub fn wikipedia_summary_url(config: &Config, title: &str) -> String {
    format!("{}/page/summary/{}", config.wikipedia_url, encode(title))
}

/// Art search restricted to works whose date window sits inside `[start, end]`
pub fn artic_search_url(config: &Config, start: i32, end: i32) -> String {
    format!(
        "{}/artworks/search?fields={}&query[range][date_start][gte]={}&query[range][date_end][lte]={}&limit={}",
        config.artic_url,
        ARTIC_FIELDS.join(","),
        start,
        end,
        config.art_candidate_limit
    )
}

/// Full-size image for an art institute image identifier
pub fn artic_image_url(config: &Config, image_id: &str) -> String {
    format!(
        "{}/{}/full/843,/0/default.jpg",
        config.artic_image_url,
        encode(image_id)
    )
}

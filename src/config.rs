use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_ITUNES_URL: &str = "https://itunes.apple.com";
pub const DEFAULT_WIKIPEDIA_URL: &str = "https://es.wikipedia.org/api/rest_v1";
pub const DEFAULT_ARTIC_URL: &str = "https://api.artic.edu/api/v1";
pub const DEFAULT_ARTIC_IMAGE_URL: &str = "https://www.artic.edu/iiif/2";

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub itunes_url: String,
    pub wikipedia_url: String,
    pub artic_url: String,
    pub artic_image_url: String,
    /// Results requested per music search phrase
    pub song_result_limit: u32,
    /// Candidates requested from the art search before local filtering
    pub art_candidate_limit: u32,
    /// Artworks kept after dedup and shuffle
    pub max_artworks: usize,
    pub http_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            itunes_url: DEFAULT_ITUNES_URL.to_string(),
            wikipedia_url: DEFAULT_WIKIPEDIA_URL.to_string(),
            artic_url: DEFAULT_ARTIC_URL.to_string(),
            artic_image_url: DEFAULT_ARTIC_IMAGE_URL.to_string(),
            song_result_limit: 50,
            art_candidate_limit: 100,
            max_artworks: 6,
            http_timeout: None,
        }
    }
}

impl Config {
    /// Build a configuration from a variable lookup, falling back to defaults
    /// for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let url = |key: &str, default: String| -> String {
            lookup(key)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        Ok(Config {
            itunes_url: url("MUSEO_ITUNES_URL", defaults.itunes_url),
            wikipedia_url: url("MUSEO_WIKIPEDIA_URL", defaults.wikipedia_url),
            artic_url: url("MUSEO_ARTIC_URL", defaults.artic_url),
            artic_image_url: url("MUSEO_ARTIC_IMAGE_URL", defaults.artic_image_url),
            song_result_limit: parse_number(&lookup, "MUSEO_SONG_LIMIT")?
                .unwrap_or(defaults.song_result_limit),
            art_candidate_limit: parse_number(&lookup, "MUSEO_ART_LIMIT")?
                .unwrap_or(defaults.art_candidate_limit),
            max_artworks: parse_number(&lookup, "MUSEO_MAX_ARTWORKS")?
                .unwrap_or(defaults.max_artworks),
            http_timeout: parse_number::<u64, _>(&lookup, "MUSEO_HTTP_TIMEOUT_SECS")?
                .map(Duration::from_secs),
        })
    }
}

fn parse_number<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'"))?;
            Ok(Some(value))
        }
        _ => Ok(None),
    }
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    Config::from_lookup(|key| std::env::var(key).ok())
}

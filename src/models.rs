use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Outcome of a lookup against one of the public APIs.
///
/// Request failures are carried as values so that one failing section never
/// takes the others down with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Failed(String),
}

impl<T> Lookup<T> {
    pub fn found(&self) -> Option<&T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Failed(reason) => Lookup::Failed(reason),
        }
    }
}

impl<T> From<anyhow::Result<Option<T>>> for Lookup<T> {
    fn from(result: anyhow::Result<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => Lookup::Found(value),
            Ok(None) => Lookup::NotFound,
            Err(e) => Lookup::Failed(format!("{e:#}")),
        }
    }
}

/// A track picked for a decade, with the search context that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    pub track_name: String,
    pub artist_name: String,
    pub preview_url: Option<String>,
    pub artwork_url: Option<String>,
    pub collection_name: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub view_url: Option<String>,
    pub year: i32,
    pub country: String,
    pub query: String,
}

impl Song {
    /// Year of the release date, when the catalog gave a parseable one
    pub fn release_year(&self) -> Option<i32> {
        let raw = self.release_date.as_deref()?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.year());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }

    /// Catalog artwork is served at 100x100; the same URL scales to other squares
    pub fn artwork_url_sized(&self, px: u32) -> Option<String> {
        self.artwork_url
            .as_ref()
            .filter(|url| !url.is_empty())
            .map(|url| url.replace("100x100", &format!("{px}x{px}")))
    }

    pub fn has_preview(&self) -> bool {
        self.preview_url.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// An artwork ready to display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artwork {
    pub id: i64,
    pub title: String,
    pub artist: Option<String>,
    pub date: String,
    pub image: String,
    pub description: Option<String>,
}

/// Encyclopedia context for a decade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub title: String,
    pub extract: String,
    pub url: Option<String>,
}

/// Response structure for the iTunes search endpoint
#[derive(Debug, Deserialize)]
pub struct ITunesSearchResponse {
    #[serde(default)]
    pub results: Vec<ITunesTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ITunesTrack {
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub artist_name: String,
    pub preview_url: Option<String>,
    pub artwork_url100: Option<String>,
    pub collection_name: Option<String>,
    pub release_date: Option<String>,
    pub primary_genre_name: Option<String>,
    pub track_view_url: Option<String>,
}

impl ITunesTrack {
    pub fn has_preview(&self) -> bool {
        self.preview_url.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Response structure for the Wikipedia page summary endpoint
#[derive(Debug, Deserialize)]
pub struct WikiSummaryResponse {
    pub title: String,
    #[serde(default)]
    pub extract: String,
    pub content_urls: Option<WikiContentUrls>,
}

#[derive(Debug, Deserialize)]
pub struct WikiContentUrls {
    pub desktop: Option<WikiPageUrl>,
}

#[derive(Debug, Deserialize)]
pub struct WikiPageUrl {
    pub page: Option<String>,
}

impl From<WikiSummaryResponse> for HistorySummary {
    fn from(response: WikiSummaryResponse) -> Self {
        HistorySummary {
            title: response.title,
            extract: response.extract,
            url: response
                .content_urls
                .and_then(|urls| urls.desktop)
                .and_then(|desktop| desktop.page),
        }
    }
}

/// Response structure for the Art Institute of Chicago search endpoint
#[derive(Debug, Deserialize)]
pub struct ArticSearchResponse {
    #[serde(default)]
    pub data: Vec<ArticArtwork>,
}

/// Date bounds arrive as numbers, numeric strings or null depending on the record,
/// so they are kept as raw JSON until the pipeline reads them.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticArtwork {
    pub id: i64,
    pub title: Option<String>,
    pub artist_title: Option<String>,
    pub date_display: Option<String>,
    #[serde(default)]
    pub date_start: serde_json::Value,
    #[serde(default)]
    pub date_end: serde_json::Value,
    pub image_id: Option<String>,
    pub description: Option<String>,
}

impl ArticArtwork {
    pub fn start_year(&self) -> Option<i64> {
        numeric_year(&self.date_start)
    }

    pub fn end_year(&self) -> Option<i64> {
        numeric_year(&self.date_end)
    }
}

fn numeric_year(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn song_with(release_date: Option<&str>, artwork: Option<&str>) -> Song {
        Song {
            track_name: "Take On Me".to_string(),
            artist_name: "a-ha".to_string(),
            preview_url: None,
            artwork_url: artwork.map(str::to_string),
            collection_name: None,
            release_date: release_date.map(str::to_string),
            genre: None,
            view_url: None,
            year: 1985,
            country: "US".to_string(),
            query: "top hits 1985".to_string(),
        }
    }

    #[test]
    fn test_release_year_parsing() {
        assert_eq!(song_with(Some("1985-06-01T07:00:00Z"), None).release_year(), Some(1985));
        assert_eq!(song_with(Some("1985-06-01"), None).release_year(), Some(1985));
        assert_eq!(song_with(Some("sometime"), None).release_year(), None);
        assert_eq!(song_with(None, None).release_year(), None);
    }

    #[test]
    fn test_artwork_url_resizing() {
        let song = song_with(None, Some("https://is1.mzstatic.com/a/100x100bb.jpg"));
        assert_eq!(
            song.artwork_url_sized(300).as_deref(),
            Some("https://is1.mzstatic.com/a/300x300bb.jpg")
        );
        assert_eq!(song_with(None, Some("")).artwork_url_sized(300), None);
    }

    #[test]
    fn test_artic_dates_accept_numbers_and_strings() {
        let art: ArticArtwork = serde_json::from_value(json!({
            "id": 7,
            "title": "Nighthawks",
            "date_start": "1942",
            "date_end": 1942.0,
            "image_id": "abc"
        }))
        .unwrap();
        assert_eq!(art.start_year(), Some(1942));
        assert_eq!(art.end_year(), Some(1942));

        let missing: ArticArtwork = serde_json::from_value(json!({
            "id": 8,
            "date_start": null,
            "date_end": "c. 1940"
        }))
        .unwrap();
        assert_eq!(missing.start_year(), None);
        assert_eq!(missing.end_year(), None);
    }

    #[test]
    fn test_wiki_summary_without_content_urls() {
        let response: WikiSummaryResponse =
            serde_json::from_value(json!({"title": "Test Title", "extract": "Test extract"})).unwrap();
        let summary = HistorySummary::from(response);
        assert_eq!(summary.title, "Test Title");
        assert_eq!(summary.extract, "Test extract");
        assert!(summary.url.is_none());
    }

    #[test]
    fn test_lookup_from_result() {
        let found: Lookup<u8> = Ok(Some(1)).into();
        let missing: Lookup<u8> = Ok(None).into();
        let failed: Lookup<u8> = Err(anyhow::anyhow!("boom")).into();
        assert_eq!(found, Lookup::Found(1));
        assert_eq!(missing, Lookup::NotFound);
        assert_eq!(failed, Lookup::Failed("boom".to_string()));
    }
}

use crate::client::{JsonFetcher, itunes_search_url};
use crate::config::Config;
use crate::models::{ITunesSearchResponse, ITunesTrack, Lookup, Song};
use anyhow::{Context, Result};
use log::{debug, warn};
use rand::Rng;
use rand::seq::SliceRandom;

use super::Decade;

/// Storefronts searched at random so each pick draws on a different catalog
pub const COUNTRIES: [&str; 15] = [
    "US", "GB", "AR", "BR", "MX", "ES", "FR", "DE", "IT", "JP", "KR", "CA", "AU", "CL", "CO",
];

/// Random song selection for a decade
pub struct SongPicker;

impl SongPicker {
    /// Search phrases tried in order for a given year
    pub fn candidate_queries(year: i32) -> Vec<String> {
        vec![
            format!("top hits {year}"),
            format!("best of {year}"),
            format!("billboard {year}"),
            format!("{year} music"),
            format!("{year} greatest hits"),
        ]
    }

    /// Pick a random track from a random year of the decade in a random storefront.
    ///
    /// Phrases are tried in order until one yields results. A request failure
    /// ends the search as `Failed`.
    pub fn pick<F, R>(fetcher: &F, config: &Config, decade: Decade, rng: &mut R) -> Lookup<Song>
    where
        F: JsonFetcher + ?Sized,
        R: Rng + ?Sized,
    {
        let year = decade.start() + rng.gen_range(0..10);
        let country = COUNTRIES[rng.gen_range(0..COUNTRIES.len())];

        for query in Self::candidate_queries(year) {
            let results = match Self::search(fetcher, config, &query, country) {
                Ok(results) => results,
                Err(e) => {
                    warn!("Song search for {decade} failed on '{query}' ({country}): {e:#}");
                    return Lookup::Failed(format!("{e:#}"));
                }
            };

            if results.is_empty() {
                debug!("No results for '{query}' in {country}");
                continue;
            }

            if let Some(track) = Self::choose_track(&results, rng) {
                return Lookup::Found(Self::normalize(track, year, country, &query));
            }
        }

        debug!("Every search phrase for {year} in {country} came back empty");
        Lookup::NotFound
    }

    /// Choose uniformly among tracks with a preview, or among all when none has one
    pub fn choose_track<'a, R>(results: &'a [ITunesTrack], rng: &mut R) -> Option<&'a ITunesTrack>
    where
        R: Rng + ?Sized,
    {
        let with_preview: Vec<&ITunesTrack> = results.iter().filter(|t| t.has_preview()).collect();
        if with_preview.is_empty() {
            results.choose(rng)
        } else {
            with_preview.choose(rng).copied()
        }
    }

    fn search<F>(fetcher: &F, config: &Config, query: &str, country: &str) -> Result<Vec<ITunesTrack>>
    where
        F: JsonFetcher + ?Sized,
    {
        let url = itunes_search_url(config, query, country);
        let body = fetcher
            .get_json(&url)?
            .ok_or_else(|| anyhow::anyhow!("HTTP 404 from {url}"))?;
        let parsed: ITunesSearchResponse =
            serde_json::from_value(body).context("Unexpected music search response")?;
        Ok(parsed.results)
    }

    fn normalize(track: &ITunesTrack, year: i32, country: &str, query: &str) -> Song {
        Song {
            track_name: track.track_name.clone(),
            artist_name: track.artist_name.clone(),
            preview_url: track.preview_url.clone().filter(|p| !p.is_empty()),
            artwork_url: track.artwork_url100.clone().filter(|a| !a.is_empty()),
            collection_name: track.collection_name.clone(),
            release_date: track.release_date.clone(),
            genre: track.primary_genre_name.clone(),
            view_url: track.track_view_url.clone(),
            year,
            country: country.to_string(),
            query: query.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockJsonFetcher;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn track(name: &str, preview: Option<&str>) -> serde_json::Value {
        json!({
            "trackName": name,
            "artistName": "Test Artist",
            "previewUrl": preview,
            "artworkUrl100": "https://example.com/artwork/100x100bb.jpg",
            "collectionName": "Test Album",
            "releaseDate": "1983-01-01T00:00:00Z",
            "primaryGenreName": "Rock",
            "trackViewUrl": "https://example.com/track"
        })
    }

    #[test]
    fn test_returns_annotated_song() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .times(1)
            .returning(|_| Ok(Some(json!({"results": [track("Test Song", Some("https://example.com/preview.mp3"))]}))));

        let decade = Decade::new(1980).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let song = match SongPicker::pick(&fetcher, &Config::default(), decade, &mut rng) {
            Lookup::Found(song) => song,
            other => panic!("expected a song, got {other:?}"),
        };

        assert_eq!(song.track_name, "Test Song");
        assert_eq!(song.artist_name, "Test Artist");
        assert_eq!(song.preview_url.as_deref(), Some("https://example.com/preview.mp3"));
        assert_eq!(song.genre.as_deref(), Some("Rock"));
        assert!((1980..=1989).contains(&song.year));
        assert!(COUNTRIES.contains(&song.country.as_str()));
        assert_eq!(song.query, format!("top hits {}", song.year));
    }

    #[test]
    fn test_request_carries_chosen_country_and_year() {
        let urls = Arc::new(Mutex::new(Vec::new()));
        let seen = urls.clone();
        let mut fetcher = MockJsonFetcher::new();
        fetcher.expect_get_json().returning(move |url| {
            seen.lock().unwrap().push(url.to_string());
            Ok(Some(json!({"results": [track("Song", None)]})))
        });

        let mut rng = StdRng::seed_from_u64(42);
        let song = SongPicker::pick(&fetcher, &Config::default(), Decade::new(1990).unwrap(), &mut rng);
        let song = song.found().expect("song");

        let urls = urls.lock().unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].starts_with("https://itunes.apple.com/search?"));
        assert!(urls[0].contains(&format!("country={}", song.country)));
        assert!(urls[0].contains(&format!("term=top%20hits%20{}", song.year)));
    }

    #[test]
    fn test_falls_through_empty_phrases() {
        let calls = Arc::new(Mutex::new(0usize));
        let counter = calls.clone();
        let mut fetcher = MockJsonFetcher::new();
        fetcher.expect_get_json().returning(move |_| {
            let mut n = counter.lock().unwrap();
            *n += 1;
            if *n < 3 {
                Ok(Some(json!({"results": []})))
            } else {
                Ok(Some(json!({"results": [track("Third Time", None)]})))
            }
        });

        let mut rng = StdRng::seed_from_u64(1);
        let result = SongPicker::pick(&fetcher, &Config::default(), Decade::new(1970).unwrap(), &mut rng);
        let song = result.found().expect("song from third phrase");

        assert_eq!(*calls.lock().unwrap(), 3);
        assert_eq!(song.query, format!("billboard {}", song.year));
        assert!(song.preview_url.is_none());
    }

    #[test]
    fn test_not_found_when_every_phrase_is_empty() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .times(5)
            .returning(|_| Ok(Some(json!({"results": []}))));

        let mut rng = StdRng::seed_from_u64(3);
        let result = SongPicker::pick(&fetcher, &Config::default(), Decade::new(1950).unwrap(), &mut rng);
        assert_eq!(result, Lookup::NotFound);
    }

    #[test]
    fn test_request_error_is_failed_not_propagated() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("API Error")));

        let mut rng = StdRng::seed_from_u64(3);
        let result = SongPicker::pick(&fetcher, &Config::default(), Decade::new(1980).unwrap(), &mut rng);
        match result {
            Lookup::Failed(reason) => assert!(reason.contains("API Error")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_search_endpoint_is_failed_after_one_request() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher.expect_get_json().times(1).returning(|_| Ok(None));

        let mut rng = StdRng::seed_from_u64(1);
        let result = SongPicker::pick(&fetcher, &Config::default(), Decade::new(1980).unwrap(), &mut rng);
        match result {
            Lookup::Failed(reason) => assert!(reason.contains("HTTP 404")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_body_is_failed() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .times(1)
            .returning(|_| Ok(Some(json!({"results": "nope"}))));

        let mut rng = StdRng::seed_from_u64(3);
        let result = SongPicker::pick(&fetcher, &Config::default(), Decade::new(1980).unwrap(), &mut rng);
        assert!(matches!(result, Lookup::Failed(_)));
    }

    #[test]
    fn test_prefers_tracks_with_preview() {
        let results: Vec<ITunesTrack> = serde_json::from_value(json!([
            track("No Preview A", None),
            track("Has Preview", Some("https://example.com/p.mp3")),
            track("No Preview B", Some("")),
            track("No Preview C", None),
        ]))
        .unwrap();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pick = SongPicker::choose_track(&results, &mut rng).unwrap();
            assert_eq!(pick.track_name, "Has Preview");
        }
    }

    #[test]
    fn test_uses_whole_pool_without_previews() {
        let results: Vec<ITunesTrack> =
            serde_json::from_value(json!([track("A", None), track("B", None)])).unwrap();

        let mut rng = StdRng::seed_from_u64(9);
        let mut picked = std::collections::HashSet::new();
        for _ in 0..100 {
            picked.insert(SongPicker::choose_track(&results, &mut rng).unwrap().track_name.clone());
        }
        assert_eq!(picked.len(), 2);
        assert!(SongPicker::choose_track(&[], &mut rng).is_none());
    }

    #[test]
    fn test_year_and_country_stay_in_range() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .returning(|_| Ok(Some(json!({"results": [track("Song", None)]}))));

        let decade = Decade::new(2000).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let result = SongPicker::pick(&fetcher, &Config::default(), decade, &mut rng);
            let song = result.found().expect("song");
            assert!(decade.contains(i64::from(song.year)));
            assert!(COUNTRIES.contains(&song.country.as_str()));
        }
    }
}

use crate::client::{JsonFetcher, artic_image_url, artic_search_url};
use crate::config::Config;
use crate::models::{ArticArtwork, ArticSearchResponse, Artwork, Lookup};
use anyhow::{Context, Result};
use log::{debug, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use super::Decade;

/// Artwork curation for a decade
pub struct ArtworkCurator;

impl ArtworkCurator {
    /// Fetch candidates for the decade and curate them down to a small, varied set
    pub fn curate<F, R>(fetcher: &F, config: &Config, decade: Decade, rng: &mut R) -> Lookup<Vec<Artwork>>
    where
        F: JsonFetcher + ?Sized,
        R: Rng + ?Sized,
    {
        let candidates = match Self::search(fetcher, config, decade) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Artwork search for {decade} failed: {e:#}");
                return Lookup::Failed(format!("{e:#}"));
            }
        };

        let artworks = Self::process(candidates, config, decade, rng);
        if artworks.is_empty() {
            Lookup::NotFound
        } else {
            Lookup::Found(artworks)
        }
    }

    /// Filter, dedupe, shuffle and cap the raw search results
    pub fn process<R>(candidates: Vec<ArticArtwork>, config: &Config, decade: Decade, rng: &mut R) -> Vec<Artwork>
    where
        R: Rng + ?Sized,
    {
        let total = candidates.len();

        let in_decade: Vec<ArticArtwork> = candidates
            .into_iter()
            .filter(|art| Self::within_decade(art, decade))
            .filter(|art| art.image_id.as_deref().is_some_and(|id| !id.is_empty()))
            .collect();

        let mut unique = Self::dedupe(in_decade);
        unique.shuffle(rng);
        unique.truncate(config.max_artworks);

        debug!(
            "Curated {} of {} artworks for {}",
            unique.len(),
            total,
            decade
        );

        unique
            .into_iter()
            .filter_map(|art| Self::normalize(art, config))
            .collect()
    }

    /// Both date bounds must be numeric and inside the decade
    pub fn within_decade(art: &ArticArtwork, decade: Decade) -> bool {
        match (art.start_year(), art.end_year()) {
            (Some(start), Some(end)) => decade.contains(start) && decade.contains(end),
            _ => false,
        }
    }

    /// Case-insensitive (title, artist) key
    pub fn dedupe_key(art: &ArticArtwork) -> String {
        format!(
            "{}__{}",
            art.title.as_deref().unwrap_or(""),
            art.artist_title.as_deref().unwrap_or("")
        )
        .to_lowercase()
    }

    /// Keep the first occurrence of each key
    pub fn dedupe(artworks: Vec<ArticArtwork>) -> Vec<ArticArtwork> {
        let mut seen = HashSet::new();
        artworks
            .into_iter()
            .filter(|art| seen.insert(Self::dedupe_key(art)))
            .collect()
    }

    fn search<F>(fetcher: &F, config: &Config, decade: Decade) -> Result<Vec<ArticArtwork>>
    where
        F: JsonFetcher + ?Sized,
    {
        let url = artic_search_url(config, decade.start(), decade.end());
        let body = fetcher
            .get_json(&url)?
            .ok_or_else(|| anyhow::anyhow!("HTTP 404 from {url}"))?;
        let parsed: ArticSearchResponse =
            serde_json::from_value(body).context("Unexpected artwork search response")?;
        Ok(parsed.data)
    }

    fn normalize(art: ArticArtwork, config: &Config) -> Option<Artwork> {
        let image_id = art.image_id.as_deref().filter(|id| !id.is_empty())?;
        let image = artic_image_url(config, image_id);
        let date = match art.date_display.as_deref().filter(|d| !d.is_empty()) {
            Some(display) => display.to_string(),
            None => format!("{}–{}", art.start_year()?, art.end_year()?),
        };

        Some(Artwork {
            id: art.id,
            title: art.title.unwrap_or_default(),
            artist: art.artist_title,
            date,
            image,
            description: art.description.filter(|d| !d.is_empty()),
        })
    }
}

use crate::client::{JsonFetcher, wikipedia_summary_url};
use crate::config::Config;
use crate::models::{HistorySummary, Lookup, WikiSummaryResponse};
use anyhow::{Context, Result};
use log::warn;
use serde::Serialize;

use super::Decade;

/// Historical context shown for a decade
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum HistoryContext {
    Encyclopedia(HistorySummary),
    /// Bundled text used when the encyclopedia has nothing to offer
    Bundled { decade: Decade, text: &'static str },
}

/// Encyclopedia lookups for decade context
pub struct HistoryLookup;

impl HistoryLookup {
    /// Look up the summary page for a title
    pub fn summary<F>(fetcher: &F, config: &Config, title: &str) -> Lookup<HistorySummary>
    where
        F: JsonFetcher + ?Sized,
    {
        let lookup = Lookup::from(Self::fetch(fetcher, config, title));
        if let Lookup::Failed(reason) = &lookup {
            warn!("Summary lookup for '{title}' failed: {reason}");
        }
        lookup
    }

    /// Summary for the decade, falling back to the bundled text when the
    /// encyclopedia lookup does not produce one
    pub fn for_decade<F>(fetcher: &F, config: &Config, decade: Decade) -> Lookup<HistoryContext>
    where
        F: JsonFetcher + ?Sized,
    {
        match Self::summary(fetcher, config, &decade.wiki_title()) {
            Lookup::Found(summary) => Lookup::Found(HistoryContext::Encyclopedia(summary)),
            other => match decade.summary() {
                Some(text) => Lookup::Found(HistoryContext::Bundled { decade, text }),
                None => other.map(HistoryContext::Encyclopedia),
            },
        }
    }

    fn fetch<F>(fetcher: &F, config: &Config, title: &str) -> Result<Option<HistorySummary>>
    where
        F: JsonFetcher + ?Sized,
    {
        let url = wikipedia_summary_url(config, title);
        let Some(body) = fetcher.get_json(&url)? else {
            return Ok(None);
        };
        let parsed: WikiSummaryResponse =
            serde_json::from_value(body).context("Unexpected summary response")?;
        Ok(Some(parsed.into()))
    }
}

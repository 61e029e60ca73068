use crate::client::JsonFetcher;
use crate::config::Config;
use crate::models::{Artwork, Lookup, Song};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::thread;

use super::{ArtworkCurator, Decade, HistoryContext, HistoryLookup, SongPicker};

/// Everything shown for one decade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exhibit {
    pub decade: Decade,
    pub song: Lookup<Song>,
    pub history: Lookup<HistoryContext>,
    pub artworks: Lookup<Vec<Artwork>>,
}

impl Exhibit {
    /// Run the three lookups for a decade concurrently and wait for all of them.
    ///
    /// Each lookup draws from its own generator seeded from `rng`, so a seeded
    /// caller gets the same exhibit regardless of thread scheduling.
    pub fn gather<F, R>(fetcher: &F, config: &Config, decade: Decade, rng: &mut R) -> Exhibit
    where
        F: JsonFetcher + ?Sized,
        R: Rng + ?Sized,
    {
        let mut song_rng = StdRng::seed_from_u64(rng.next_u64());
        let mut art_rng = StdRng::seed_from_u64(rng.next_u64());

        info!("Loading the {decade}...");

        let exhibit = thread::scope(|s| {
            let song = s.spawn(move || SongPicker::pick(fetcher, config, decade, &mut song_rng));
            let artworks =
                s.spawn(move || ArtworkCurator::curate(fetcher, config, decade, &mut art_rng));
            let history = HistoryLookup::for_decade(fetcher, config, decade);

            Exhibit {
                decade,
                song: join_lookup(song.join(), "song"),
                history,
                artworks: join_lookup(artworks.join(), "artwork"),
            }
        });

        debug!(
            "Exhibit for {}: song found={}, history found={}, artworks found={}",
            decade,
            exhibit.song.is_found(),
            exhibit.history.is_found(),
            exhibit.artworks.is_found()
        );
        exhibit
    }
}

fn join_lookup<T>(joined: thread::Result<Lookup<T>>, what: &str) -> Lookup<T> {
    joined.unwrap_or_else(|_| Lookup::Failed(format!("{what} lookup panicked")))
}

/// Proof of which selection a load was started for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    decade: Decade,
}

impl Ticket {
    pub fn decade(&self) -> Decade {
        self.decade
    }
}

/// Selected decade plus whatever has been loaded for it.
///
/// Every selection bumps the generation; results carrying an older ticket are
/// dropped so a slow load can never overwrite a newer decade.
#[derive(Debug, Default)]
pub struct Session {
    decade: Decade,
    generation: u64,
    exhibit: Option<Exhibit>,
}

impl Session {
    pub fn new(decade: Decade) -> Self {
        Session {
            decade,
            ..Session::default()
        }
    }

    pub fn decade(&self) -> Decade {
        self.decade
    }

    pub fn exhibit(&self) -> Option<&Exhibit> {
        self.exhibit.as_ref()
    }

    /// Select a decade and start a load for it
    pub fn select(&mut self, decade: Decade) -> Ticket {
        self.decade = decade;
        self.generation += 1;
        self.exhibit = None;
        self.ticket()
    }

    /// Ticket for work against the current selection that does not reset it
    pub fn ticket(&self) -> Ticket {
        Ticket {
            generation: self.generation,
            decade: self.decade,
        }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation && ticket.decade == self.decade
    }

    /// Accept a loaded exhibit if its ticket is still current
    pub fn deliver(&mut self, ticket: Ticket, exhibit: Exhibit) -> bool {
        if !self.is_current(ticket) || exhibit.decade != self.decade {
            debug!(
                "Discarding stale exhibit for {} (current selection {})",
                exhibit.decade, self.decade
            );
            return false;
        }
        self.exhibit = Some(exhibit);
        true
    }

    /// Swap in a re-rolled song if the ticket is still current
    pub fn replace_song(&mut self, ticket: Ticket, song: Lookup<Song>) -> bool {
        if !self.is_current(ticket) {
            debug!("Discarding stale song for {}", ticket.decade);
            return false;
        }
        match self.exhibit.as_mut() {
            Some(exhibit) => {
                exhibit.song = song;
                true
            }
            None => false,
        }
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::BufRead;

mod client;
mod config;
mod exhibit;
mod models;
mod render;


use crate::client::{HttpClient, JsonFetcher};
use crate::config::{Config, load_config};
use crate::exhibit::{
    ArtworkCurator, DEFAULT_DISPLAY_COUNT, Decade, Exhibit, Gallery, HistoryLookup, Session,
    SongPicker, parse_supported_decade,
};
use crate::models::{Artwork, Lookup};

#[derive(Parser)]
#[command(name = "museo")]
#[command(about = "Museo del Tiempo: a song, a bit of history and artworks for a decade")]
#[command(version)]
struct Args {
    /// Seed for every random choice, makes a run reproducible
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Quiet mode - only warnings and errors are logged
    #[arg(short = 'q', long = "quiet", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show song, history and artworks for a decade
    Show {
        #[arg(short, long, default_value = "1980", value_parser = parse_supported_decade)]
        decade: Decade,

        /// Print the exhibit as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Pick a random song from a decade
    Song {
        #[arg(short, long, default_value = "1980", value_parser = parse_supported_decade)]
        decade: Decade,
    },
    /// Show a random selection of artworks from a decade
    Art {
        #[arg(short, long, default_value = "1980", value_parser = parse_supported_decade)]
        decade: Decade,

        /// Artworks to display per mix
        #[arg(short, long, default_value_t = DEFAULT_DISPLAY_COUNT)]
        max: usize,
    },
    /// Show the historical summary of a decade
    History {
        #[arg(short, long, default_value = "1980", value_parser = parse_supported_decade)]
        decade: Decade,
    },
    /// Explore decades interactively
    Browse {
        #[arg(short, long, default_value = "1980", value_parser = parse_supported_decade)]
        decade: Decade,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Load configuration from .env
    let config = load_config()?;

    let client = HttpClient::new(&config);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let command = args.command.unwrap_or(Command::Browse {
        decade: Decade::default(),
    });

    match command {
        Command::Show { decade, json } => {
            let exhibit = Exhibit::gather(&client, &config, decade, &mut rng);
            if json {
                println!("{}", serde_json::to_string_pretty(&exhibit)?);
            } else {
                let items = artworks_of(&exhibit.artworks);
                let gallery = Gallery::new(items, DEFAULT_DISPLAY_COUNT, &mut rng);
                print_exhibit(&exhibit, &gallery);
            }
        }
        Command::Song { decade } => {
            let song = SongPicker::pick(&client, &config, decade, &mut rng);
            println!("{}", render::song_section(&song));
        }
        Command::Art { decade, max } => {
            let artworks = ArtworkCurator::curate(&client, &config, decade, &mut rng);
            let gallery = Gallery::new(artworks_of(&artworks), max, &mut rng);
            println!("{}", render::gallery_section(&gallery));
        }
        Command::History { decade } => {
            let history = HistoryLookup::for_decade(&client, &config, decade);
            println!("{}", render::history_section(&history));
        }
        Command::Browse { decade } => browse(&client, &config, decade, &mut rng)?,
    }

    Ok(())
}

fn artworks_of(lookup: &Lookup<Vec<Artwork>>) -> Vec<Artwork> {
    lookup.found().cloned().unwrap_or_default()
}

fn print_exhibit(exhibit: &Exhibit, gallery: &Gallery) {
    let decade = exhibit.decade;

    println!("\n=== MUSEO DEL TIEMPO: {decade} ===");

    println!("\nCanción aleatoria de los {decade}");
    println!("{}", "-".repeat(30));
    println!("{}", render::song_section(&exhibit.song));

    println!("\nContexto histórico");
    println!("{}", "-".repeat(30));
    println!("{}", render::history_section(&exhibit.history));

    println!("\nObras icónicas");
    println!("{}", "-".repeat(30));
    println!("{}", render::gallery_section(gallery));
}

/// Commands understood by the interactive browser
#[derive(Debug, PartialEq)]
enum BrowseCommand {
    Select(Decade),
    Reroll,
    Reshuffle,
    Open(usize),
    Next,
    Prev,
    Close,
    Help,
    Quit,
}

const BROWSE_HELP: &str = "Comandos: <década> (1950..2010) | otra | mezclar | ver N | sig | ant | cerrar | ayuda | salir";

fn parse_browse_command(line: &str) -> Result<Option<BrowseCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(None);
    };

    let command = match first.to_lowercase().as_str() {
        "otra" => BrowseCommand::Reroll,
        "mezclar" => BrowseCommand::Reshuffle,
        "sig" => BrowseCommand::Next,
        "ant" => BrowseCommand::Prev,
        "cerrar" => BrowseCommand::Close,
        "ayuda" | "?" => BrowseCommand::Help,
        "salir" | "q" => BrowseCommand::Quit,
        "ver" => {
            let position: usize = words
                .next()
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .ok_or_else(|| "Uso: ver N (N empieza en 1)".to_string())?;
            BrowseCommand::Open(position - 1)
        }
        other if other.starts_with(|c: char| c.is_ascii_digit()) => {
            BrowseCommand::Select(parse_supported_decade(other)?)
        }
        other => return Err(format!("Comando desconocido '{other}'. {BROWSE_HELP}")),
    };
    Ok(Some(command))
}

fn browse<F: JsonFetcher>(
    fetcher: &F,
    config: &Config,
    start: Decade,
    rng: &mut StdRng,
) -> Result<()> {
    let mut session = Session::new(start);
    let mut gallery = Gallery::new(Vec::new(), DEFAULT_DISPLAY_COUNT, rng);

    println!("{BROWSE_HELP}");
    load_decade(fetcher, config, &mut session, &mut gallery, start, rng);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let command = match parse_browse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            BrowseCommand::Select(decade) => {
                load_decade(fetcher, config, &mut session, &mut gallery, decade, rng)
            }
            BrowseCommand::Reroll => {
                let ticket = session.ticket();
                info!("Buscando otra canción de los {}...", ticket.decade());
                let song = SongPicker::pick(fetcher, config, ticket.decade(), rng);
                if session.replace_song(ticket, song) {
                    if let Some(exhibit) = session.exhibit() {
                        println!("{}", render::song_section(&exhibit.song));
                    }
                }
            }
            BrowseCommand::Reshuffle => {
                gallery.reshuffle(rng);
                println!("{}", render::gallery_section(&gallery));
            }
            BrowseCommand::Open(index) => {
                if gallery.open(index) {
                    print_lightbox(&gallery);
                } else {
                    println!("No hay obra en la posición {}", index + 1);
                }
            }
            BrowseCommand::Next => {
                gallery.next();
                print_lightbox(&gallery);
            }
            BrowseCommand::Prev => {
                gallery.prev();
                print_lightbox(&gallery);
            }
            BrowseCommand::Close => {
                gallery.close();
                println!("{}", render::gallery_section(&gallery));
            }
            BrowseCommand::Help => println!("{BROWSE_HELP}"),
            BrowseCommand::Quit => break,
        }
    }

    Ok(())
}

fn load_decade<F: JsonFetcher>(
    fetcher: &F,
    config: &Config,
    session: &mut Session,
    gallery: &mut Gallery,
    decade: Decade,
    rng: &mut StdRng,
) {
    let ticket = session.select(decade);
    let exhibit = Exhibit::gather(fetcher, config, decade, rng);

    if !session.deliver(ticket, exhibit) {
        warn!("Selection changed while loading the {decade}, result dropped");
        return;
    }
    if let Some(exhibit) = session.exhibit() {
        gallery.set_items(artworks_of(&exhibit.artworks), rng);
        print_exhibit(exhibit, gallery);
    }
}

fn print_lightbox(gallery: &Gallery) {
    match render::lightbox(gallery) {
        Some(view) => println!("{view}"),
        None => println!("No hay ninguna obra abierta. Usá 'ver N'."),
    }
}

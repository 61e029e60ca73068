use crate::exhibit::{Gallery, HistoryContext};
use crate::models::{Artwork, Lookup, Song};

pub const NO_SONG: &str = "No se encontró una canción para esta década.";
pub const NO_HISTORY: &str = "No se encontró resumen para esta década.";
pub const NO_ARTWORKS: &str = "No se encontraron obras para esta década.";
const UNKNOWN_ARTIST: &str = "Artista desconocido";

/// Music section
pub fn song_section(song: &Lookup<Song>) -> String {
    let Lookup::Found(song) = song else {
        return NO_SONG.to_string();
    };

    let mut lines = vec![format!("🎵 \"{}\" de {}", song.track_name, song.artist_name)];
    if let Some(album) = &song.collection_name {
        lines.push(format!("   Álbum: {album}"));
    }

    let mut facts = vec![format!("🌍 País: {}", song.country), format!("📅 Año: {}", song.year)];
    if let Some(genre) = &song.genre {
        facts.push(format!("🎼 Género: {genre}"));
    }
    if let Some(released) = song.release_year() {
        facts.push(format!("Lanzamiento: {released}"));
    }
    lines.push(format!("   {}", facts.join(" · ")));

    match &song.preview_url {
        Some(preview) if song.has_preview() => lines.push(format!("   ▶ Vista previa: {preview}")),
        _ => lines.push("   Sin vista previa disponible".to_string()),
    }
    if let Some(cover) = song.artwork_url_sized(300) {
        lines.push(format!("   Portada: {cover}"));
    }
    if let Some(view) = &song.view_url {
        lines.push(format!("   Ver en catálogo: {view}"));
    }
    lines.join("\n")
}

/// Historical context section
pub fn history_section(history: &Lookup<HistoryContext>) -> String {
    match history {
        Lookup::Found(HistoryContext::Encyclopedia(summary)) => {
            let mut out = format!("{}\n{}", summary.title, summary.extract);
            if let Some(url) = &summary.url {
                out.push_str(&format!("\nVer más en Wikipedia: {url}"));
            }
            out
        }
        Lookup::Found(HistoryContext::Bundled { decade, text }) => format!("Los {decade}\n{text}"),
        _ => NO_HISTORY.to_string(),
    }
}

/// One grid entry
pub fn artwork_line(position: usize, artwork: &Artwork) -> String {
    format!(
        "{}. {} | {} | {}",
        position,
        artwork.title,
        artwork.artist.as_deref().unwrap_or(UNKNOWN_ARTIST),
        artwork.date
    )
}

/// Artwork grid with its header line
pub fn gallery_section(gallery: &Gallery) -> String {
    if gallery.count() == 0 {
        return NO_ARTWORKS.to_string();
    }

    let mut header = format!("Mostrando {} obras", gallery.count());
    if gallery.source_len() > gallery.count() {
        header.push_str(&format!(" (de {})", gallery.source_len()));
    }

    let mut lines = vec![header];
    lines.extend(
        gallery
            .displayed()
            .iter()
            .enumerate()
            .map(|(i, artwork)| format!("  {}", artwork_line(i + 1, artwork))),
    );
    lines.join("\n")
}

/// Lightbox view of the selected artwork
pub fn lightbox(gallery: &Gallery) -> Option<String> {
    let index = gallery.selected_index()?;
    let artwork = gallery.selected()?;

    let mut out = format!(
        "[{}/{}] {}\n{}\n{}\n{}",
        index + 1,
        gallery.count(),
        artwork.title,
        artwork.artist.as_deref().unwrap_or(UNKNOWN_ARTIST),
        artwork.date,
        artwork.image
    );
    if let Some(description) = &artwork.description {
        out.push_str(&format!("\n\n{description}"));
    }
    Some(out)
}

use crate::models::Artwork;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Artworks shown per mix by default
pub const DEFAULT_DISPLAY_COUNT: usize = 6;

/// Random sample without replacement.
///
/// Asking for at least as many items as there are returns a shuffled copy of
/// everything; otherwise indices are drawn until `size` distinct ones are taken.
pub fn sample_random<T, R>(items: &[T], size: usize, rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    if size >= items.len() {
        let mut all = items.to_vec();
        all.shuffle(rng);
        return all;
    }

    let mut picked = HashSet::with_capacity(size);
    let mut sample = Vec::with_capacity(size);
    while sample.len() < size && picked.len() < items.len() {
        let idx = rng.gen_range(0..items.len());
        if picked.insert(idx) {
            sample.push(items[idx].clone());
        }
    }
    sample
}

/// Grid of artworks with a lightbox over the displayed subset
#[derive(Debug, Clone)]
pub struct Gallery {
    items: Vec<Artwork>,
    max_items: usize,
    displayed: Vec<Artwork>,
    selected: Option<usize>,
}

impl Gallery {
    pub fn new<R: Rng + ?Sized>(items: Vec<Artwork>, max_items: usize, rng: &mut R) -> Self {
        let mut gallery = Gallery {
            items,
            max_items: max_items.max(1),
            displayed: Vec::new(),
            selected: None,
        };
        gallery.reshuffle(rng);
        gallery
    }

    /// Replace the source list (a new decade), resample and close the lightbox
    pub fn set_items<R: Rng + ?Sized>(&mut self, items: Vec<Artwork>, rng: &mut R) {
        self.items = items;
        self.reshuffle(rng);
    }

    /// Draw a new subset of the source list and close the lightbox
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.displayed = sample_random(&self.items, self.max_items, rng);
        self.selected = None;
    }

    pub fn displayed(&self) -> &[Artwork] {
        &self.displayed
    }

    /// Size of the source list the current subset was drawn from
    pub fn source_len(&self) -> usize {
        self.items.len()
    }

    pub fn count(&self) -> usize {
        self.displayed.len()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Artwork> {
        self.selected.and_then(|i| self.displayed.get(i))
    }

    /// Open the lightbox on a displayed artwork; out-of-range indices are ignored
    pub fn open(&mut self, index: usize) -> bool {
        if index < self.displayed.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) {
        let count = self.count();
        if count == 0 {
            return;
        }
        if let Some(i) = self.selected {
            self.selected = Some((i + 1) % count);
        }
    }

    pub fn prev(&mut self) {
        let count = self.count();
        if count == 0 {
            return;
        }
        if let Some(i) = self.selected {
            self.selected = Some((i + count - 1) % count);
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
    }
}

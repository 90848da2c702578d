//! Plain-text decks: one card per line.

use heads_up::Card;
use rand::{Rng, seq::SliceRandom};
use std::{fs, io, path::Path};

/// Parse a deck, skipping blank lines and trimming surrounding whitespace.
pub fn parse_deck(text: &str) -> Vec<Card> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Card::new)
        .collect()
}

/// Load and shuffle the deck at `path`.
pub fn load_deck<R: Rng + ?Sized>(path: &Path, rng: &mut R) -> io::Result<Vec<Card>> {
    let mut cards = parse_deck(&fs::read_to_string(path)?);
    cards.shuffle(rng);
    log::debug!("Loaded {} cards from {}", cards.len(), path.display());
    Ok(cards)
}

use crate::card::{CardKind, ParseCardKindError};
use crate::simulation::mulligan::OPENING_HAND_SIZE;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid deck format at line {line}: {reason}")]
    InvalidFormat { line: usize, reason: String },
    #[error("Invalid card kind at line {line}: {source}")]
    UnknownKind {
        line: usize,
        #[source]
        source: ParseCardKindError,
    },
    #[error("Deck has {size} cards, need at least 7 to draw an opening hand")]
    TooSmall { size: usize },
    #[error("Deck of {deck_size} cards cannot hold {lands} lands")]
    TooManyLands { lands: usize, deck_size: usize },
}

/// Deck composition: how many lands and spells make up the deck.
/// Always holds at least a full opening hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Deck {
    lands: usize,
    spells: usize,
}

impl Deck {
    pub fn new(lands: usize, spells: usize) -> Result<Self, DeckError> {
        let size = lands + spells;
        if size < OPENING_HAND_SIZE {
            return Err(DeckError::TooSmall { size });
        }
        Ok(Deck { lands, spells })
    }

    /// Deck of `deck_size` cards with `lands` of them lands and the rest spells
    pub fn with_size(deck_size: usize, lands: usize) -> Result<Self, DeckError> {
        if lands > deck_size {
            return Err(DeckError::TooManyLands { lands, deck_size });
        }
        Deck::new(lands, deck_size - lands)
    }

    pub fn lands(&self) -> usize {
        self.lands
    }

    pub fn spells(&self) -> usize {
        self.spells
    }

    pub fn size(&self) -> usize {
        self.lands + self.spells
    }

    pub fn count(&self, kind: CardKind) -> usize {
        match kind {
            CardKind::Land => self.lands,
            CardKind::Spell => self.spells,
        }
    }

    /// Expand the composition into an unshuffled card list
    pub fn cards(&self) -> Vec<CardKind> {
        let mut cards = Vec::with_capacity(self.size());
        cards.extend(std::iter::repeat(CardKind::Land).take(self.lands));
        cards.extend(std::iter::repeat(CardKind::Spell).take(self.spells));
        cards
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cards ({} lands, {} spells)", self.size(), self.lands, self.spells)
    }
}

/// Parse deck text into a composition.
/// Format: "17 Land" / "23 Spells" per line, supports comments with # or //
pub fn parse_deck(content: &str) -> Result<Deck, DeckError> {
    let mut lands = 0;
    let mut spells = 0;

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }

        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        if parts.len() != 2 {
            return Err(DeckError::InvalidFormat {
                line: line_num + 1,
                reason: "Expected format: 'COUNT KIND'".to_string(),
            });
        }

        let count_str = parts[0];
        let count: usize = count_str.parse().map_err(|_| DeckError::InvalidFormat {
            line: line_num + 1,
            reason: format!("'{}' is not a valid number", count_str),
        })?;

        let kind: CardKind = parts[1].parse().map_err(|source| DeckError::UnknownKind {
            line: line_num + 1,
            source,
        })?;

        match kind {
            CardKind::Land => lands += count,
            CardKind::Spell => spells += count,
        }
    }

    Deck::new(lands, spells)
}

/// Parse a deck file and return its composition
pub fn parse_deck_file(path: &str) -> Result<Deck, DeckError> {
    let content = std::fs::read_to_string(path)?;
    parse_deck(&content)
}

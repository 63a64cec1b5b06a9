use crate::card::CardKind;
use crate::rng::GameRng;
use crate::simulation::deck::Deck;
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryError {
    #[error("Library is empty, cannot draw")]
    Empty,
}

/// Library (deck) - ordered stack of cards, drawn from the front
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    cards: VecDeque<CardKind>,
}

impl Library {
    pub fn new() -> Self {
        Library { cards: VecDeque::new() }
    }

    /// Library in exactly the given order (top card first)
    pub fn from_cards(cards: impl IntoIterator<Item = CardKind>) -> Self {
        Library {
            cards: cards.into_iter().collect(),
        }
    }

    /// Fresh library holding every card of `deck` in uniformly random order
    pub fn shuffled(deck: &Deck, rng: &mut GameRng) -> Self {
        let mut cards = deck.cards();
        rng.shuffle(&mut cards);
        Library::from_cards(cards)
    }

    /// Peek at the top card without removing it
    pub fn peek_top(&self) -> Option<CardKind> {
        self.cards.front().copied()
    }

    /// Remove the top card. Every draw in a trial goes through here.
    pub fn draw(&mut self) -> Result<CardKind, LibraryError> {
        self.cards.pop_front().ok_or(LibraryError::Empty)
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn count(&self, kind: CardKind) -> usize {
        self.cards.iter().filter(|c| **c == kind).count()
    }
}

/// Hand - per-category card counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hand {
    pub lands: usize,
    pub spells: usize,
}

impl Hand {
    pub fn new(lands: usize, spells: usize) -> Self {
        Hand { lands, spells }
    }

    pub fn add_card(&mut self, card: CardKind) {
        match card {
            CardKind::Land => self.lands += 1,
            CardKind::Spell => self.spells += 1,
        }
    }

    /// Draw one card from `library` into the hand
    pub fn draw_from(&mut self, library: &mut Library) -> Result<CardKind, LibraryError> {
        let card = library.draw()?;
        self.add_card(card);
        Ok(card)
    }

    /// Remove cards from the hand (put them on the bottom).
    /// Callers only bottom cards the hand actually holds.
    pub fn bottom(&mut self, lands: usize, spells: usize) {
        debug_assert!(lands <= self.lands && spells <= self.spells);
        self.lands -= lands;
        self.spells -= spells;
    }

    pub fn count(&self, kind: CardKind) -> usize {
        match kind {
            CardKind::Land => self.lands,
            CardKind::Spell => self.spells,
        }
    }

    pub fn size(&self) -> usize {
        self.lands + self.spells
    }
}

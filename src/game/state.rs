use crate::card::CardKind;
use crate::game::zones::{Hand, Library, LibraryError};
use crate::simulation::mulligan::KeptHand;

/// State of one simulated game after the mulligan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // Zones
    pub library: Library,
    pub hand: Hand,

    // Game info
    pub turn: u32,
    pub on_the_play: bool,
    pub land_played_this_turn: bool,

    // Tracking
    pub lands_in_play: u32,
    /// Lands ever held in hand: the kept hand plus every land drawn
    pub lands_seen: u32,
    pub cards_drawn: u32,
}

impl GameState {
    pub fn new(hand: Hand, library: Library, on_the_play: bool) -> Self {
        GameState {
            library,
            hand,
            turn: 0,
            on_the_play,
            land_played_this_turn: false,
            lands_in_play: 0,
            lands_seen: hand.lands as u32,
            cards_drawn: 0,
        }
    }

    /// Start a game from the result of the mulligan
    pub fn from_kept(kept: KeptHand, on_the_play: bool) -> Self {
        GameState::new(kept.hand, kept.library, on_the_play)
    }

    /// Draw a card from the library to hand
    pub fn draw_card(&mut self) -> Result<CardKind, LibraryError> {
        let card = self.hand.draw_from(&mut self.library)?;
        self.cards_drawn += 1;
        if card.is_land() {
            self.lands_seen += 1;
        }
        Ok(card)
    }

    /// Play a land from hand, at most one per turn
    pub fn play_land(&mut self) -> bool {
        if self.land_played_this_turn || self.hand.lands == 0 {
            return false;
        }
        self.hand.lands -= 1;
        self.lands_in_play += 1;
        self.land_played_this_turn = true;
        true
    }

    /// Reset turn state
    pub fn reset_turn_state(&mut self) {
        self.land_played_this_turn = false;
    }
}

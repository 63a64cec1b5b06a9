use crate::game::state::GameState;
use crate::game::zones::LibraryError;
use thiserror::Error;

/// When to stop advancing turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCondition {
    /// Keep going until this many lands are in play
    LandsInPlay(u32),
    /// Play exactly `turn` turns, then check for `goal` lands in play
    ByTurn { turn: u32, goal: u32 },
}

impl StopCondition {
    /// Outcome judged on the game as it stood when the library ran out
    pub fn partial_outcome(&self, decked: &Decked) -> TurnOutcome {
        match *self {
            StopCondition::LandsInPlay(_) => TurnOutcome::ReachedLands { turn: decked.turn },
            StopCondition::ByTurn { goal, .. } => TurnOutcome::GoalByTurn {
                hit: decked.lands_in_play >= goal,
                lands_in_play: decked.lands_in_play,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Turn on which the target land count was reached (0 for a target of 0)
    ReachedLands { turn: u32 },
    /// Whether the goal was met by the end of the horizon turn
    GoalByTurn { hit: bool, lands_in_play: u32 },
}

/// The library ran out on a turn that required a draw
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("decked on turn {turn} with {lands_in_play} lands in play")]
pub struct Decked {
    pub turn: u32,
    pub lands_in_play: u32,
}

/// Start a new turn: increment turn counter, reset land drop
pub fn start_turn(state: &mut GameState) {
    state.turn += 1;
    state.reset_turn_state();
}

/// Draw phase: draw 1 card (skip on turn 1 if on play)
pub fn draw_phase(state: &mut GameState) -> Result<(), LibraryError> {
    if state.turn == 1 && state.on_the_play {
        return Ok(());
    }
    state.draw_card()?;
    Ok(())
}

/// Main phase: play a land if one is in hand
pub fn land_phase(state: &mut GameState) -> bool {
    state.play_land()
}

/// Run one full turn
pub fn take_turn(state: &mut GameState) -> Result<(), Decked> {
    start_turn(state);
    draw_phase(state).map_err(|LibraryError::Empty| Decked {
        turn: state.turn,
        lands_in_play: state.lands_in_play,
    })?;
    land_phase(state);
    Ok(())
}

/// Play turns until `target` lands are in play; returns that turn
fn play_until_lands(state: &mut GameState, target: u32) -> Result<u32, Decked> {
    while state.lands_in_play < target {
        take_turn(state)?;
    }
    Ok(state.turn)
}

/// Play through the end of `turn`; returns whether `goal` lands are in play
fn play_through_turn(state: &mut GameState, turn: u32, goal: u32) -> Result<bool, Decked> {
    while state.turn < turn {
        take_turn(state)?;
    }
    Ok(state.lands_in_play >= goal)
}

/// Advance turns until `stop` is satisfied
pub fn advance(state: &mut GameState, stop: StopCondition) -> Result<TurnOutcome, Decked> {
    match stop {
        StopCondition::LandsInPlay(target) => {
            let turn = play_until_lands(state, target)?;
            Ok(TurnOutcome::ReachedLands { turn })
        }
        StopCondition::ByTurn { turn, goal } => {
            let hit = play_through_turn(state, turn, goal)?;
            Ok(TurnOutcome::GoalByTurn {
                hit,
                lands_in_play: state.lands_in_play,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardKind;
    use crate::game::zones::{Hand, Library};

    fn library(cards: &str) -> Library {
        Library::from_cards(cards.chars().map(|c| match c {
            'L' => CardKind::Land,
            _ => CardKind::Spell,
        }))
    }

    #[test]
    fn test_start_turn_increments_turn() {
        let mut state = GameState::new(Hand::default(), Library::new(), true);
        start_turn(&mut state);
        assert_eq!(state.turn, 1);
        assert!(!state.land_played_this_turn);
    }

    #[test]
    fn test_draw_phase_skips_turn_1_on_play() {
        let mut state = GameState::new(Hand::default(), library("S"), true);
        start_turn(&mut state);
        draw_phase(&mut state).expect("no draw needed");
        assert_eq!(state.hand.size(), 0);
        start_turn(&mut state);
        draw_phase(&mut state).expect("library has a card");
        assert_eq!(state.hand.size(), 1);
    }

    #[test]
    fn test_draw_phase_draws_turn_1_on_draw() {
        let mut state = GameState::new(Hand::default(), library("L"), false);
        start_turn(&mut state);
        draw_phase(&mut state).expect("library has a card");
        assert_eq!(state.hand, Hand::new(1, 0));
    }

    #[test]
    fn test_draw_versus_play_by_turn_1() {
        let hand = Hand::new(2, 5);
        let mut play = GameState::new(hand, library("LSLS"), true);
        let mut draw = GameState::new(hand, library("LSLS"), false);
        take_turn(&mut play).expect("turn 1");
        take_turn(&mut draw).expect("turn 1");
        assert_eq!(draw.cards_drawn, play.cards_drawn + 1);
        assert_eq!(draw.library.size() + 1, play.library.size());
    }

    #[test]
    fn test_turn_of_third_land() {
        // Two lands in hand, third arrives on the turn-3 draw (on the play)
        let mut state = GameState::new(Hand::new(2, 5), library("SLS"), true);
        let outcome = advance(&mut state, StopCondition::LandsInPlay(3)).expect("not decked");
        assert_eq!(outcome, TurnOutcome::ReachedLands { turn: 3 });
    }

    #[test]
    fn test_zero_land_target_is_turn_zero() {
        let mut state = GameState::new(Hand::new(0, 7), Library::new(), true);
        let outcome = advance(&mut state, StopCondition::LandsInPlay(0)).expect("nothing to do");
        assert_eq!(outcome, TurnOutcome::ReachedLands { turn: 0 });
    }

    #[test]
    fn test_goal_by_turn() {
        let hand = Hand::new(1, 6);
        let mut play = GameState::new(hand, library("LSS"), true);
        let outcome = advance(&mut play, StopCondition::ByTurn { turn: 2, goal: 2 }).expect("not decked");
        assert_eq!(outcome, TurnOutcome::GoalByTurn { hit: true, lands_in_play: 2 });

        let mut missed = GameState::new(hand, library("SLS"), true);
        let outcome = advance(&mut missed, StopCondition::ByTurn { turn: 3, goal: 3 }).expect("not decked");
        assert_eq!(outcome, TurnOutcome::GoalByTurn { hit: false, lands_in_play: 2 });
        assert_eq!(missed.turn, 3);
    }

    #[test]
    fn test_decked_reports_partial_state() {
        let mut state = GameState::new(Hand::new(1, 6), library("S"), true);
        let decked = advance(&mut state, StopCondition::LandsInPlay(2)).unwrap_err();
        assert_eq!(decked.turn, 3);
        assert_eq!(decked.lands_in_play, 1);
        assert_eq!(state.hand, Hand::new(0, 7));
    }

    #[test]
    fn test_partial_outcome_of_decked_game() {
        let decked = Decked {
            turn: 9,
            lands_in_play: 4,
        };
        assert_eq!(
            StopCondition::LandsInPlay(6).partial_outcome(&decked),
            TurnOutcome::ReachedLands { turn: 9 }
        );
        assert_eq!(
            StopCondition::ByTurn { turn: 12, goal: 4 }.partial_outcome(&decked),
            TurnOutcome::GoalByTurn { hit: true, lands_in_play: 4 }
        );
        assert_eq!(
            StopCondition::ByTurn { turn: 12, goal: 5 }.partial_outcome(&decked),
            TurnOutcome::GoalByTurn { hit: false, lands_in_play: 4 }
        );
    }

    #[test]
    fn test_lands_in_play_invariants() {
        let mut state = GameState::new(Hand::new(1, 4), library("SLLSLLSSLS"), false);
        let mut previous = 0;
        while take_turn(&mut state).is_ok() {
            assert!(state.lands_in_play >= previous);
            assert!(state.lands_in_play <= previous + 1);
            assert!(state.lands_in_play <= state.lands_seen);
            previous = state.lands_in_play;
        }
        assert_eq!(state.lands_in_play, 6);
    }
}

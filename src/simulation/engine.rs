use crate::game::state::GameState;
use crate::game::turns::{advance, StopCondition, TurnOutcome};
use crate::rng::GameRng;
use crate::simulation::deck::Deck;
use crate::simulation::mulligan::resolve_mulligans;
use log::debug;
use serde::{Deserialize, Serialize};

/// Turns observed by the flood check
pub const DEFAULT_FLOOD_DRAWS: u32 = 7;
/// Fewer spells than this after the flood draws counts as flooding
pub const DEFAULT_FLOOD_SPELLS: u32 = 5;

/// Which question a trial answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialKind {
    /// Turn on which the `lands`-th land hits the battlefield
    TurnOfLands { lands: u32 },
    /// Whether `goal` lands are in play by the end of `turn`
    LandsByTurn { turn: u32, goal: u32 },
    /// Whether fewer than `threshold` spells are held after `draws` more cards
    Flood { draws: u32, threshold: u32 },
}

impl TrialKind {
    /// Land drops through `turn`, the usual case of `goal == turn`
    pub fn land_drops(turn: u32) -> Self {
        TrialKind::LandsByTurn { turn, goal: turn }
    }

    pub fn default_flood() -> Self {
        TrialKind::Flood {
            draws: DEFAULT_FLOOD_DRAWS,
            threshold: DEFAULT_FLOOD_SPELLS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialParams {
    pub deck: Deck,
    pub on_the_play: bool,
    pub kind: TrialKind,
}

impl TrialParams {
    pub fn new(deck: Deck, on_the_play: bool, kind: TrialKind) -> Self {
        TrialParams { deck, on_the_play, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TurnOfLands(u32),
    LandsByTurn(bool),
    Flood(bool),
}

impl From<TurnOutcome> for Outcome {
    fn from(outcome: TurnOutcome) -> Self {
        match outcome {
            TurnOutcome::ReachedLands { turn } => Outcome::TurnOfLands(turn),
            TurnOutcome::GoalByTurn { hit, .. } => Outcome::LandsByTurn(hit),
        }
    }
}

/// Result of a single trial.
///
/// When the library ran out (`decked`), `outcome` is judged on the partial
/// game: the turn the draw failed, lands in play so far, or spells held so
/// far. Whether such trials count is up to the aggregator's `DeckedPolicy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialResult {
    pub kept_size: usize,
    pub outcome: Outcome,
    pub decked: bool,
}

/// Run a single trial: mulligan, then play out the game for `params.kind`
pub fn run_trial(params: &TrialParams, rng: &mut GameRng) -> TrialResult {
    let kept = resolve_mulligans(&params.deck, rng);
    let kept_size = kept.kept_size();
    let mut state = GameState::from_kept(kept, params.on_the_play);

    let (outcome, decked) = match params.kind {
        TrialKind::TurnOfLands { lands } => {
            play_out(&mut state, StopCondition::LandsInPlay(lands), rng.stream())
        }
        TrialKind::LandsByTurn { turn, goal } => {
            play_out(&mut state, StopCondition::ByTurn { turn, goal }, rng.stream())
        }
        TrialKind::Flood { draws, threshold } => {
            let decked = flood_draws(&mut state, draws);
            if decked {
                debug!("trial {}: decked after {} flood draws", rng.stream(), state.cards_drawn);
            }
            let flooded = (state.hand.spells as u32) < threshold;
            (Outcome::Flood(flooded), decked)
        }
    };

    TrialResult {
        kept_size,
        outcome,
        decked,
    }
}

/// Advance turns until `stop`; a decked game is judged on its partial state
fn play_out(state: &mut GameState, stop: StopCondition, trial: u64) -> (Outcome, bool) {
    match advance(state, stop) {
        Ok(outcome) => (outcome.into(), false),
        Err(decked) => {
            debug!("trial {}: {}", trial, decked);
            (stop.partial_outcome(&decked).into(), true)
        }
    }
}

/// Draw `draws` cards with no play/draw skip and no land drops.
/// Returns true if the library ran out first.
fn flood_draws(state: &mut GameState, draws: u32) -> bool {
    for _ in 0..draws {
        if state.draw_card().is_err() {
            return true;
        }
    }
    false
}

/// Run trial number `trial` of a batch seeded with `seed`
pub fn run_trial_seeded(params: &TrialParams, seed: u64, trial: u64) -> TrialResult {
    let mut rng = GameRng::for_trial(seed, trial);
    run_trial(params, &mut rng)
}

pub mod analyze;
pub mod deck;
pub mod engine;
pub mod mulligan;
pub mod report;
pub mod stats;
pub mod sweep;

pub use analyze::{run_trials, DeckedPolicy, Tally};
pub use deck::{parse_deck_file, Deck, DeckError};
pub use engine::{run_trial, Outcome, TrialKind, TrialParams, TrialResult};
pub use mulligan::{resolve_mulligans, KeptHand, MulliganStep};
pub use sweep::{ConfigError, SweepConfig, SweepRange};

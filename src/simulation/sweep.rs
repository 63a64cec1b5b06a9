use crate::simulation::analyze::DeckedPolicy;
use crate::simulation::deck::DeckError;
use crate::simulation::engine::{DEFAULT_FLOOD_DRAWS, DEFAULT_FLOOD_SPELLS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;

/// Trials per combination for publishable numbers (about +/- 0.03% on a
/// single proportion)
pub const PRODUCTION_TRIALS: usize = 5_000_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("No default land counts for {deck_size}-card decks, pass --lands")]
    NoLandRange { deck_size: usize },
    #[error("Invalid range '{0}', expected MIN..MAX")]
    InvalidRange(String),
    #[error("Trial count must be positive")]
    ZeroTrials,
    #[error("Nothing to sweep: {0}")]
    Empty(&'static str),
    #[error("Deck error: {0}")]
    DeckError(#[from] DeckError),
}

/// Half-open range of values, written `MIN..MAX` like a Rust range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepRange {
    pub start: usize,
    pub end: usize,
}

impl SweepRange {
    pub const fn new(start: usize, end: usize) -> Self {
        SweepRange { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for SweepRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl FromStr for SweepRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRange(s.to_string());
        let (start, end) = s.split_once("..").ok_or_else(invalid)?;
        let start = start.trim().parse().map_err(|_| invalid())?;
        // Accept an inclusive `..=MAX` as well
        let end = match end.strip_prefix('=') {
            Some(end) => end.trim().parse::<usize>().map_err(|_| invalid())? + 1,
            None => end.trim().parse().map_err(|_| invalid())?,
        };
        Ok(SweepRange::new(start, end))
    }
}

/// Land counts swept for each supported deck size
pub fn default_land_range(deck_size: usize) -> Option<SweepRange> {
    match deck_size {
        40 => Some(SweepRange::new(13, 20)),
        60 => Some(SweepRange::new(21, 31)),
        80 => Some(SweepRange::new(27, 41)),
        99 => Some(SweepRange::new(34, 52)),
        _ => None,
    }
}

/// The flood sweep also covers 20 lands in 40-card decks
pub fn default_flood_land_range(deck_size: usize) -> Option<SweepRange> {
    match deck_size {
        40 => Some(SweepRange::new(13, 21)),
        other => default_land_range(other),
    }
}

/// Parameters of a sweep over deck sizes, land counts and turns.
/// Loaded from JSON with `--config`, missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub trials: usize,
    pub seed: Option<u64>,
    pub deck_sizes: Vec<usize>,
    /// Overrides the per-deck-size land counts
    pub lands: Option<SweepRange>,
    /// Turns (land-drops) or land targets (turn-of-lands)
    pub turns: SweepRange,
    pub decked: DeckedPolicy,
    pub flood_draws: u32,
    pub flood_spells: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            trials: PRODUCTION_TRIALS,
            seed: None,
            deck_sizes: vec![40],
            lands: None,
            turns: SweepRange::new(1, 8),
            decked: DeckedPolicy::Truncate,
            flood_draws: DEFAULT_FLOOD_DRAWS,
            flood_spells: DEFAULT_FLOOD_SPELLS,
        }
    }
}

impl SweepConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        if self.deck_sizes.is_empty() {
            return Err(ConfigError::Empty("no deck sizes"));
        }
        if self.turns.is_empty() {
            return Err(ConfigError::Empty("no turns"));
        }
        if let Some(lands) = self.lands {
            if lands.is_empty() {
                return Err(ConfigError::Empty("no land counts"));
            }
        }
        Ok(())
    }

    pub fn land_range(&self, deck_size: usize) -> Result<SweepRange, ConfigError> {
        self.lands
            .or_else(|| default_land_range(deck_size))
            .ok_or(ConfigError::NoLandRange { deck_size })
    }

    pub fn flood_land_range(&self, deck_size: usize) -> Result<SweepRange, ConfigError> {
        self.lands
            .or_else(|| default_flood_land_range(deck_size))
            .ok_or(ConfigError::NoLandRange { deck_size })
    }
}

/// One point of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combination {
    pub deck_size: usize,
    pub lands: usize,
    /// Turn, land target, or 0 when the sweep has no turn axis
    pub turn: u32,
}

impl Combination {
    /// Key mixed into the run seed so every combination and side of the
    /// table gets its own trials
    pub fn seed_key(&self, on_the_play: bool) -> u64 {
        ((self.deck_size as u64) << 40)
            | ((self.lands as u64) << 24)
            | ((self.turn as u64) << 8)
            | on_the_play as u64
    }
}

/// Land-drop and turn-of-lands sweeps: turn outermost, then deck size, then lands
pub fn turn_combinations(config: &SweepConfig) -> Result<Vec<Combination>, ConfigError> {
    let mut combos = Vec::new();
    for turn in config.turns.range() {
        for &deck_size in &config.deck_sizes {
            for lands in config.land_range(deck_size)?.range() {
                combos.push(Combination {
                    deck_size,
                    lands,
                    turn: turn as u32,
                });
            }
        }
    }
    Ok(combos)
}

/// Flood sweep: deck size, then lands
pub fn flood_combinations(config: &SweepConfig) -> Result<Vec<Combination>, ConfigError> {
    let mut combos = Vec::new();
    for &deck_size in &config.deck_sizes {
        for lands in config.flood_land_range(deck_size)?.range() {
            combos.push(Combination {
                deck_size,
                lands,
                turn: 0,
            });
        }
    }
    Ok(combos)
}

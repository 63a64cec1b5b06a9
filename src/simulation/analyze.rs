//! Trial aggregation
//!
//! Runs batches of independent trials and tallies their outcomes.

use crate::simulation::engine::{run_trial_seeded, Outcome, TrialParams, TrialResult};
use crate::simulation::mulligan::OPENING_HAND_SIZE;
use crate::simulation::stats::{self, StatsError};
use clap::ValueEnum;
use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest hand the mulligan can keep
pub const MIN_KEPT_SIZE: usize = 4;
pub const HAND_SIZE_BUCKETS: usize = OPENING_HAND_SIZE - MIN_KEPT_SIZE + 1;

/// What to do with a trial whose library ran out before a required draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeckedPolicy {
    /// Count the partial outcome (turn reached, lands or spells so far)
    #[default]
    Truncate,
    /// Leave the trial out of every tally except the decked counter
    Exclude,
}

impl fmt::Display for DeckedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckedPolicy::Truncate => write!(f, "truncate"),
            DeckedPolicy::Exclude => write!(f, "exclude"),
        }
    }
}

/// Running totals for a batch of trials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    /// Trials that count towards the statistics
    pub trials: usize,
    /// Counted trials whose land goal was hit, or that flooded
    pub successes: usize,
    /// Trials that ran out of cards, counted or not
    pub decked: usize,
    /// Kept hand sizes 4..=7
    pub hand_sizes: [usize; HAND_SIZE_BUCKETS],
    /// Turn-of-lands outcomes, in no particular order
    pub turns: Vec<u32>,
}

impl Tally {
    pub fn record(&mut self, result: &TrialResult, policy: DeckedPolicy) {
        if result.decked {
            self.decked += 1;
            if policy == DeckedPolicy::Exclude {
                return;
            }
        }

        self.trials += 1;
        if let Some(bucket) = result.kept_size.checked_sub(MIN_KEPT_SIZE) {
            if let Some(count) = self.hand_sizes.get_mut(bucket) {
                *count += 1;
            }
        }

        match result.outcome {
            Outcome::TurnOfLands(turn) => self.turns.push(turn),
            Outcome::LandsByTurn(hit) | Outcome::Flood(hit) => {
                if hit {
                    self.successes += 1;
                }
            }
        }
    }

    /// Combine two tallies (e.g. per-thread partials, or play and draw)
    pub fn merge(mut self, mut other: Tally) -> Tally {
        self.trials += other.trials;
        self.successes += other.successes;
        self.decked += other.decked;
        for (mine, theirs) in self.hand_sizes.iter_mut().zip(other.hand_sizes) {
            *mine += theirs;
        }
        self.turns.append(&mut other.turns);
        self
    }

    fn rate(&self, count: usize) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            count as f64 / self.trials as f64
        }
    }

    pub fn success_rate(&self) -> f64 {
        self.rate(self.successes)
    }

    /// Fraction of counted trials that kept a hand of `size` cards
    pub fn keep_rate(&self, size: usize) -> f64 {
        size.checked_sub(MIN_KEPT_SIZE)
            .and_then(|bucket| self.hand_sizes.get(bucket))
            .map(|count| self.rate(*count))
            .unwrap_or(0.0)
    }

    pub fn mean_hand_size(&self) -> f64 {
        let total: usize = self
            .hand_sizes
            .iter()
            .enumerate()
            .map(|(bucket, count)| (bucket + MIN_KEPT_SIZE) * count)
            .sum();
        self.rate(total)
    }

    pub fn turn_values(&self) -> Vec<f64> {
        self.turns.iter().map(|t| *t as f64).collect()
    }

    pub fn mean_turn(&self) -> Option<f64> {
        stats::mean(&self.turn_values())
    }

    pub fn turn_quartiles(&self) -> Result<[f64; 3], StatsError> {
        stats::quartiles(&self.turn_values())
    }
}

/// Run `trials` independent trials of `params` in parallel.
///
/// Trial `i` draws from stream `i` of `seed`, so the tally does not depend
/// on how rayon schedules the work.
pub fn run_trials(params: &TrialParams, trials: usize, seed: u64, policy: DeckedPolicy) -> Tally {
    let tally = (0..trials as u64)
        .into_par_iter()
        .fold(Tally::default, |mut tally, trial| {
            tally.record(&run_trial_seeded(params, seed, trial), policy);
            tally
        })
        .reduce(Tally::default, Tally::merge);

    if tally.decked > 0 {
        warn!(
            "{} of {} trials ran out of cards ({}, {:?}, on the play: {}), policy: {}",
            tally.decked, trials, params.deck, params.kind, params.on_the_play, policy
        );
    }

    tally
}

//! CSV reports for the parameter sweeps, plus a readable single-deck summary.

use crate::rng::GameRng;
use crate::simulation::analyze::{run_trials, Tally, MIN_KEPT_SIZE};
use crate::simulation::deck::{Deck, DeckError};
use crate::simulation::engine::{TrialKind, TrialParams};
use crate::simulation::mulligan::OPENING_HAND_SIZE;
use crate::simulation::stats::StatsError;
use crate::simulation::sweep::{
    flood_combinations, turn_combinations, Combination, ConfigError, SweepConfig,
};
use indicatif::ProgressBar;
use log::{debug, warn};
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Statistics error: {0}")]
    StatsError(#[from] StatsError),
    #[error("Deck error: {0}")]
    DeckError(#[from] DeckError),
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
}

/// Float formatting that keeps a trailing `.0` on whole numbers,
/// so `1` prints as `1.0` in probability and quartile columns
fn fmt_float(value: f64) -> String {
    let s = value.to_string();
    if s.contains(['.', 'e', 'N', 'i']) {
        s
    } else {
        format!("{}.0", s)
    }
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| fmt_float(*v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Quartile columns for one row, left empty when too few trials counted
/// (e.g. every trial decked under `DeckedPolicy::Exclude`)
fn quartile_columns(tally: &Tally, label: &str, combo: &Combination) -> Result<String, ReportError> {
    match tally.turn_quartiles() {
        Ok(quartiles) => Ok(join(&quartiles)),
        Err(StatsError::NotEnoughData { needed, got }) => {
            warn!(
                "{} {:?}: {} counted trials, quartiles need {}",
                label, combo, got, needed
            );
            Ok(",,".to_string())
        }
        Err(e) => Err(e.into()),
    }
}

/// Play and draw tallies for one sweep point
struct Sides {
    play: Tally,
    draw: Tally,
}

impl Sides {
    fn total(&self) -> Tally {
        self.play.clone().merge(self.draw.clone())
    }
}

fn run_sides(
    deck: &Deck,
    config: &SweepConfig,
    seed: u64,
    combo: &Combination,
    kind: TrialKind,
) -> Sides {
    let run = |on_the_play: bool| {
        let params = TrialParams::new(*deck, on_the_play, kind);
        let side_seed = GameRng::derive_seed(seed, combo.seed_key(on_the_play));
        run_trials(&params, config.trials, side_seed, config.decked)
    };
    Sides {
        play: run(true),
        draw: run(false),
    }
}

/// Probability of hitting every land drop through each turn.
///
/// One line per (deck size, lands, turn):
/// `deck_size,lands,turn,P(play),P(draw),P(total),avg_hand,P(4),P(5),P(6),P(7)`,
/// after a first line holding the trial count.
pub fn write_land_drop_report<W: Write>(
    out: &mut W,
    config: &SweepConfig,
    seed: u64,
    progress: &ProgressBar,
) -> Result<(), ReportError> {
    let combos = turn_combinations(config)?;
    progress.set_length(combos.len() as u64);
    writeln!(out, "{}", config.trials)?;

    for combo in &combos {
        let deck = Deck::with_size(combo.deck_size, combo.lands)?;
        let sides = run_sides(&deck, config, seed, combo, TrialKind::land_drops(combo.turn));
        let total = sides.total();
        let keep_rates: Vec<String> = (MIN_KEPT_SIZE..=OPENING_HAND_SIZE)
            .map(|size| fmt_float(total.keep_rate(size)))
            .collect();

        writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            combo.deck_size,
            combo.lands,
            combo.turn,
            fmt_float(sides.play.success_rate()),
            fmt_float(sides.draw.success_rate()),
            fmt_float(total.success_rate()),
            fmt_float(total.mean_hand_size()),
            keep_rates.join(",")
        )?;
        debug!("land drops {:?}: {:.4}", combo, total.success_rate());
        progress.inc(1);
    }
    Ok(())
}

/// Quartiles of the turn on which the N-th land is played.
///
/// Three lines per (deck size, lands, target):
/// `Total|Play|Draw,deck_size,lands,target,q1,median,q3`.
pub fn write_turn_of_lands_report<W: Write>(
    out: &mut W,
    config: &SweepConfig,
    seed: u64,
    progress: &ProgressBar,
) -> Result<(), ReportError> {
    let combos = turn_combinations(config)?;
    progress.set_length(combos.len() as u64);
    writeln!(out, "{}", config.trials)?;

    for combo in &combos {
        let kind = TrialKind::TurnOfLands { lands: combo.turn };
        let deck = Deck::with_size(combo.deck_size, combo.lands)?;
        let sides = run_sides(&deck, config, seed, combo, kind);
        let rows = [
            ("Total", sides.total()),
            ("Play", sides.play),
            ("Draw", sides.draw),
        ];
        for (label, tally) in &rows {
            writeln!(
                out,
                "{},{},{},{},{}",
                label,
                combo.deck_size,
                combo.lands,
                combo.turn,
                quartile_columns(tally, label, combo)?
            )?;
        }
        progress.inc(1);
    }
    Ok(())
}

/// Chance of flooding for each land count.
///
/// Header lines hold the draws, spell threshold and trial count, then one
/// `for {lands}, chance of flood is {p}` line per land count.
pub fn write_flood_report<W: Write>(
    out: &mut W,
    config: &SweepConfig,
    seed: u64,
    progress: &ProgressBar,
) -> Result<(), ReportError> {
    let combos = flood_combinations(config)?;
    progress.set_length(combos.len() as u64);
    writeln!(out, "{}", config.flood_draws)?;
    writeln!(out, "{}", config.flood_spells)?;
    writeln!(out, "{}", config.trials)?;

    let kind = TrialKind::Flood {
        draws: config.flood_draws,
        threshold: config.flood_spells,
    };
    for combo in &combos {
        let deck = Deck::with_size(combo.deck_size, combo.lands)?;
        // The flood check has no play/draw skip, one side is enough
        let params = TrialParams::new(deck, false, kind);
        let side_seed = GameRng::derive_seed(seed, combo.seed_key(false));
        let tally = run_trials(&params, config.trials, side_seed, config.decked);
        writeln!(
            out,
            "for {}, chance of flood is {}",
            combo.lands,
            fmt_float(tally.success_rate())
        )?;
        progress.inc(1);
    }
    Ok(())
}

/// Readable summary of a single deck: land drops by turn, turn of the
/// N-th land, flood chance and kept hand sizes
pub fn write_deck_summary<W: Write>(
    out: &mut W,
    deck: &Deck,
    config: &SweepConfig,
    seed: u64,
    target_lands: u32,
) -> Result<(), ReportError> {
    writeln!(out, "\n=== Mulligan Simulator ===\n")?;
    writeln!(out, "Deck: {}", deck)?;
    writeln!(out, "Trials: {} per side", config.trials)?;
    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "Decked trials: {}", config.decked)?;
    writeln!(out)?;

    writeln!(out, "Land drops (P of hitting every drop through the turn):")?;
    writeln!(out, "  {:>4} {:>8} {:>8} {:>8}", "Turn", "Play", "Draw", "Total")?;
    let mut hand_sizes = Tally::default();
    for turn in config.turns.range() {
        let combo = Combination {
            deck_size: deck.size(),
            lands: deck.lands(),
            turn: turn as u32,
        };
        let kind = TrialKind::land_drops(turn as u32);
        let sides = run_sides(deck, config, seed, &combo, kind);
        let total = sides.total();
        writeln!(
            out,
            "  {:>4} {:>7.2}% {:>7.2}% {:>7.2}%",
            turn,
            sides.play.success_rate() * 100.0,
            sides.draw.success_rate() * 100.0,
            total.success_rate() * 100.0
        )?;
        if hand_sizes.trials == 0 {
            hand_sizes = total;
        }
    }

    writeln!(out)?;
    let combo = Combination {
        deck_size: deck.size(),
        lands: deck.lands(),
        turn: target_lands,
    };
    let kind = TrialKind::TurnOfLands { lands: target_lands };
    let sides = run_sides(deck, config, GameRng::derive_seed(seed, 1), &combo, kind);
    writeln!(out, "Turn of land #{} (Q1 / median / Q3, mean):", target_lands)?;
    for (label, tally) in [("Play", &sides.play), ("Draw", &sides.draw)] {
        match tally.turn_quartiles() {
            Ok([q1, q2, q3]) => {
                let mean = tally.mean_turn().unwrap_or(0.0);
                writeln!(
                    out,
                    "  {:<5} {} / {} / {}  (mean {:.3})",
                    label,
                    fmt_float(q1),
                    fmt_float(q2),
                    fmt_float(q3),
                    mean
                )?;
            }
            Err(StatsError::NotEnoughData { got, .. }) => {
                warn!("{}: only {} counted trials for land #{}", label, got, target_lands);
                writeln!(out, "  {:<5} n/a ({} counted trials)", label, got)?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    writeln!(out)?;
    let flood = TrialParams::new(
        *deck,
        false,
        TrialKind::Flood {
            draws: config.flood_draws,
            threshold: config.flood_spells,
        },
    );
    let flood_tally = run_trials(&flood, config.trials, GameRng::derive_seed(seed, 2), config.decked);
    writeln!(
        out,
        "Flood (< {} spells after {} draws): {:.2}%",
        config.flood_spells,
        config.flood_draws,
        flood_tally.success_rate() * 100.0
    )?;

    writeln!(out)?;
    writeln!(out, "Kept hand size (expected {:.3}):", hand_sizes.mean_hand_size())?;
    for size in (MIN_KEPT_SIZE..=OPENING_HAND_SIZE).rev() {
        let pct = hand_sizes.keep_rate(size) * 100.0;
        let bar = "█".repeat((pct / 2.0) as usize);
        writeln!(out, "  {}: {:6.2}% {}", size, pct, bar)?;
    }
    Ok(())
}

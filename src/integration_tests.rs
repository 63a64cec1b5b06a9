//! Integration tests for the mulligan simulator
//! Runs full batches with known seeds and checks the numbers are sane

use crate::game::zones::Hand;
use crate::rng::GameRng;
use crate::simulation::analyze::{run_trials, DeckedPolicy};
use crate::simulation::deck::{parse_deck, Deck};
use crate::simulation::engine::{run_trial, Outcome, TrialKind, TrialParams};
use crate::simulation::mulligan::{bottom_for, is_keepable, MulliganStep, OPENING_HAND_SIZE};
use crate::simulation::report::{write_flood_report, write_land_drop_report};
use crate::simulation::sweep::{SweepConfig, SweepRange};
use indicatif::ProgressBar;
use std::collections::HashMap;

fn limited_deck() -> Deck {
    parse_deck("17 Land\n23 Spell\n").expect("Failed to parse deck")
}

fn choose(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Exact kept hands of `deck`: (probability, lands kept, lands left in library)
fn kept_hand_distribution(deck: &Deck) -> Vec<(f64, usize, usize)> {
    let (lands, size) = (deck.lands(), deck.size());
    let mut kept = Vec::new();
    let mut reached = 1.0;
    for step in MulliganStep::ALL {
        let mut rejected = 0.0;
        for drawn in 0..=OPENING_HAND_SIZE.min(lands) {
            let p = choose(lands, drawn) * choose(size - lands, OPENING_HAND_SIZE - drawn)
                / choose(size, OPENING_HAND_SIZE);
            let mut hand = Hand::new(drawn, OPENING_HAND_SIZE - drawn);
            let bottom = bottom_for(step, &hand);
            hand.bottom(bottom.lands, bottom.spells);
            if is_keepable(step, &hand) {
                kept.push((reached * p, hand.lands, lands - drawn));
            } else {
                rejected += p;
            }
        }
        reached *= rejected;
    }
    kept
}

/// Expected turn the `target`-th land is played, by exhaustive recursion
/// over the draws
struct TurnOfLandModel {
    target: usize,
    on_the_play: bool,
    memo: HashMap<(usize, usize, usize, usize, usize), f64>,
}

impl TurnOfLandModel {
    fn expected(&mut self, turn: usize, in_play: usize, held: usize, lib_lands: usize, lib_cards: usize) -> f64 {
        if in_play >= self.target {
            return turn as f64;
        }
        let key = (turn, in_play, held, lib_lands, lib_cards);
        if let Some(value) = self.memo.get(&key) {
            return *value;
        }

        let next = turn + 1;
        let value = if next == 1 && self.on_the_play {
            self.land_drop(next, in_play, held, lib_lands, lib_cards)
        } else {
            let p_land = lib_lands as f64 / lib_cards as f64;
            let mut value = 0.0;
            if lib_lands > 0 {
                value += p_land * self.land_drop(next, in_play, held + 1, lib_lands - 1, lib_cards - 1);
            }
            if lib_lands < lib_cards {
                value += (1.0 - p_land) * self.land_drop(next, in_play, held, lib_lands, lib_cards - 1);
            }
            value
        };
        self.memo.insert(key, value);
        value
    }

    fn land_drop(&mut self, turn: usize, in_play: usize, held: usize, lib_lands: usize, lib_cards: usize) -> f64 {
        if held > 0 {
            self.expected(turn, in_play + 1, held - 1, lib_lands, lib_cards)
        } else {
            self.expected(turn, in_play, held, lib_lands, lib_cards)
        }
    }
}

fn exact_mean_turn_of_lands(deck: &Deck, target: usize, on_the_play: bool) -> f64 {
    let mut model = TurnOfLandModel {
        target,
        on_the_play,
        memo: HashMap::new(),
    };
    let library = deck.size() - OPENING_HAND_SIZE;
    kept_hand_distribution(deck)
        .into_iter()
        .map(|(p, held, lib_lands)| p * model.expected(0, 0, held, lib_lands, library))
        .sum()
}

#[test]
fn test_kept_hand_distribution_sums_to_one() {
    let total: f64 = kept_hand_distribution(&limited_deck()).iter().map(|(p, _, _)| p).sum();
    assert!((total - 1.0).abs() < 1e-12, "total {}", total);
}

#[test]
fn test_third_land_on_the_play() {
    let deck = limited_deck();
    let params = TrialParams::new(deck, true, TrialKind::TurnOfLands { lands: 3 });
    let tally = run_trials(&params, 100_000, 42, DeckedPolicy::Truncate);

    assert_eq!(tally.trials, 100_000);
    assert_eq!(tally.decked, 0, "17 lands in 40 cards never decks before land 3");
    let mean = tally.mean_turn().expect("turns recorded");
    let exact = exact_mean_turn_of_lands(&deck, 3, true);
    assert!(
        (mean - exact).abs() < 0.02,
        "mean turn of third land was {}, exact value {}",
        mean,
        exact
    );

    let [q1, median, q3] = tally.turn_quartiles().expect("enough turns");
    assert!(q1 >= 3.0, "third land can't arrive before turn 3");
    assert!(q1 <= median && median <= q3);
}

#[test]
fn test_same_seed_produces_same_tally() {
    let params = TrialParams::new(limited_deck(), false, TrialKind::land_drops(4));

    let first = run_trials(&params, 2_000, 54321, DeckedPolicy::Truncate);
    let second = run_trials(&params, 2_000, 54321, DeckedPolicy::Truncate);

    assert_eq!(first.successes, second.successes, "Same seed should hit the same drops");
    assert_eq!(first.hand_sizes, second.hand_sizes, "Same seed should keep the same hands");
}

#[test]
fn test_different_seeds_produce_different_trials() {
    let params = TrialParams::new(limited_deck(), true, TrialKind::TurnOfLands { lands: 4 });

    let turns = |seed: u64| -> Vec<Outcome> {
        (0..50)
            .map(|trial| run_trial(&params, &mut GameRng::for_trial(seed, trial)).outcome)
            .collect()
    };
    assert_ne!(turns(111), turns(222), "Different seeds should play out differently");
}

#[test]
fn test_kept_hands_stay_in_range() {
    let deck = limited_deck();
    let mut rng = GameRng::new(Some(7));
    for _ in 0..2_000 {
        let params = TrialParams::new(deck, true, TrialKind::land_drops(3));
        let result = run_trial(&params, &mut rng);
        assert!((4..=7).contains(&result.kept_size), "kept {} cards", result.kept_size);
    }
}

#[test]
fn test_land_drops_get_harder_each_turn() {
    let deck = limited_deck();
    let rate = |turn: u32| {
        let params = TrialParams::new(deck, true, TrialKind::land_drops(turn));
        run_trials(&params, 20_000, 99 + turn as u64, DeckedPolicy::Truncate).success_rate()
    };

    let rates: Vec<f64> = (1..=7).map(rate).collect();
    // Kept hands of five or more cards hold two lands, so only turn 3 on can miss often
    assert!(rates[0] > 0.99 && rates[1] > 0.99, "early drops: {:?}", rates);
    for pair in rates[2..].windows(2) {
        assert!(pair[0] > pair[1], "land drop rates should fall: {:?}", rates);
    }
}

#[test]
fn test_drawing_first_helps_land_drops() {
    let deck = limited_deck();
    let rate = |on_the_play: bool| {
        let params = TrialParams::new(deck, on_the_play, TrialKind::land_drops(5));
        run_trials(&params, 20_000, 2024, DeckedPolicy::Truncate).success_rate()
    };
    assert!(rate(false) > rate(true));
}

#[test]
fn test_flood_chance_grows_with_lands() {
    // One seed for every land count: lands sit at the front of the unshuffled
    // deck, so each extra land turns a spell into a land at the same position
    let rate = |lands: usize| {
        let deck = Deck::with_size(40, lands).expect("valid deck");
        let params = TrialParams::new(deck, false, TrialKind::default_flood());
        run_trials(&params, 200_000, 31337, DeckedPolicy::Truncate).success_rate()
    };

    let rates: Vec<f64> = (13..20).map(rate).collect();
    for p in &rates {
        assert!(*p > 0.0 && *p < 1.0, "flood chances {:?}", rates);
    }
    for pair in rates.windows(2) {
        assert!(pair[0] < pair[1], "flood chances should grow: {:?}", rates);
    }
}

#[test]
fn test_land_drop_report_shape() {
    let config = SweepConfig {
        trials: 200,
        lands: Some(SweepRange::new(16, 18)),
        turns: SweepRange::new(1, 3),
        ..SweepConfig::default()
    };
    let mut out = Vec::new();
    write_land_drop_report(&mut out, &config, 5, &ProgressBar::hidden()).expect("report");

    let text = String::from_utf8(out).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "200");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("40,16,1,"));
    assert!(lines[4].starts_with("40,17,2,"));
    assert!(lines[1..].iter().all(|line| line.split(',').count() == 11));
}

#[test]
fn test_flood_report_shape() {
    let config = SweepConfig {
        trials: 200,
        ..SweepConfig::default()
    };
    let mut out = Vec::new();
    write_flood_report(&mut out, &config, 5, &ProgressBar::hidden()).expect("report");

    let text = String::from_utf8(out).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(&lines[..3], &["7", "5", "200"]);
    // 13 through 20 lands
    assert_eq!(lines.len(), 3 + 8);
    assert!(lines[3].starts_with("for 13, chance of flood is "));
    assert!(lines[10].starts_with("for 20, chance of flood is "));
}

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use mulligan_sim::rng::GameRng;
use mulligan_sim::simulation::deck::{parse_deck_file, Deck};
use mulligan_sim::simulation::report::{
    write_deck_summary, write_flood_report, write_land_drop_report, write_turn_of_lands_report,
    ReportError,
};
use mulligan_sim::simulation::{DeckedPolicy, SweepConfig, SweepRange};
use std::io::{self, Write};

/// Trials per side for the single-deck summary unless --trials or --config say otherwise
const SUMMARY_TRIALS: usize = 100_000;

#[derive(Parser)]
#[command(name = "mulligan-sim")]
#[command(about = "Mulligan and land drop simulator for two-category decks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Seed for random number generator (for reproducibility)
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Trials per combination and side
    #[arg(short = 'n', long, global = true)]
    trials: Option<usize>,

    /// JSON sweep configuration; flags override its values
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// What to do with trials whose library runs out
    #[arg(long, value_enum, global = true)]
    decked: Option<DeckedPolicy>,

    /// Hide the progress bar
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Args)]
struct SweepArgs {
    /// Deck sizes to sweep (repeatable)
    #[arg(long = "deck-size")]
    deck_sizes: Vec<usize>,

    /// Land counts to sweep, MIN..MAX (defaults depend on deck size)
    #[arg(short, long)]
    lands: Option<SweepRange>,

    /// Turns (or land targets) to sweep, MIN..MAX
    #[arg(short, long)]
    turns: Option<SweepRange>,
}

#[derive(Subcommand)]
enum Commands {
    /// CSV: probability of hitting every land drop through each turn
    LandDrops {
        #[command(flatten)]
        sweep: SweepArgs,
    },

    /// CSV: quartiles of the turn the N-th land is played
    TurnOfLands {
        #[command(flatten)]
        sweep: SweepArgs,
    },

    /// Chance of drawing too few spells after the mulligan
    Flood {
        #[command(flatten)]
        sweep: SweepArgs,

        /// Cards drawn after the mulligan
        #[arg(long)]
        draws: Option<u32>,

        /// Fewer spells than this counts as a flood
        #[arg(long)]
        spells: Option<u32>,
    },

    /// Readable summary for a single deck (default)
    Run {
        /// Deck file ("17 Land" / "23 Spell" lines)
        #[arg(short, long)]
        deck: Option<String>,

        /// Deck size when no deck file is given
        #[arg(long, default_value = "40")]
        deck_size: usize,

        /// Land count when no deck file is given
        #[arg(short, long, default_value = "17")]
        lands: usize,

        /// Land count whose arrival turn is reported
        #[arg(long, default_value = "3")]
        target: u32,
    },
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("✗ {}: {}", context, err);
    std::process::exit(1);
}

fn apply_sweep_args(config: &mut SweepConfig, sweep: SweepArgs) {
    if !sweep.deck_sizes.is_empty() {
        config.deck_sizes = sweep.deck_sizes;
    }
    if sweep.lands.is_some() {
        config.lands = sweep.lands;
    }
    if let Some(turns) = sweep.turns {
        config.turns = turns;
    }
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    match ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} combinations (eta {eta})",
    ) {
        Ok(style) => bar.set_style(style),
        Err(e) => debug!("Progress bar template rejected: {}", e),
    }
    bar
}

fn load_config(cli: &Cli) -> SweepConfig {
    let mut config = match &cli.config {
        Some(path) => match SweepConfig::from_file(path) {
            Ok(config) => {
                info!("Loaded sweep configuration from {}", path);
                config
            }
            Err(e) => fail(&format!("Failed to load config '{}'", path), e),
        },
        None => SweepConfig::default(),
    };
    if let Some(trials) = cli.trials {
        config.trials = trials;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(policy) = cli.decked {
        config.decked = policy;
    }
    config
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = load_config(&cli);
    let summary_defaults = cli.trials.is_none() && cli.config.is_none();
    let quiet = cli.quiet;

    let command = cli.command.unwrap_or(Commands::Run {
        deck: None,
        deck_size: 40,
        lands: 17,
        target: 3,
    });

    // Without a seed, pick one and log it so the run can be repeated
    let seed = config
        .seed
        .unwrap_or_else(|| GameRng::new(None).seed());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let start = std::time::Instant::now();

    let result: Result<(), ReportError> = match command {
        Commands::LandDrops { sweep } => {
            apply_sweep_args(&mut config, sweep);
            run_sweep("land-drops", &config, seed, quiet, |bar| {
                write_land_drop_report(&mut out, &config, seed, bar)
            })
        }
        Commands::TurnOfLands { sweep } => {
            apply_sweep_args(&mut config, sweep);
            run_sweep("turn-of-lands", &config, seed, quiet, |bar| {
                write_turn_of_lands_report(&mut out, &config, seed, bar)
            })
        }
        Commands::Flood {
            sweep,
            draws,
            spells,
        } => {
            apply_sweep_args(&mut config, sweep);
            if let Some(draws) = draws {
                config.flood_draws = draws;
            }
            if let Some(spells) = spells {
                config.flood_spells = spells;
            }
            run_sweep("flood", &config, seed, quiet, |bar| {
                write_flood_report(&mut out, &config, seed, bar)
            })
        }
        Commands::Run {
            deck,
            deck_size,
            lands,
            target,
        } => {
            if summary_defaults {
                config.trials = SUMMARY_TRIALS;
            }
            let deck = match deck {
                Some(path) => match parse_deck_file(&path) {
                    Ok(deck) => {
                        info!("Loaded deck from {}: {}", path, deck);
                        deck
                    }
                    Err(e) => fail(&format!("Failed to parse deck file '{}'", path), e),
                },
                None => match Deck::with_size(deck_size, lands) {
                    Ok(deck) => deck,
                    Err(e) => fail("Invalid deck", e),
                },
            };
            if let Err(e) = config.validate() {
                fail("Invalid configuration", e);
            }
            info!(
                "Simulating {} with {} trials per side, seed {}",
                deck, config.trials, seed
            );
            write_deck_summary(&mut out, &deck, &config, seed, target)
        }
    };

    if let Err(e) = result.and_then(|_| out.flush().map_err(ReportError::from)) {
        fail("Simulation failed", e);
    }

    info!("Completed in {:.2?}", start.elapsed());
}

fn run_sweep<F>(name: &str, config: &SweepConfig, seed: u64, quiet: bool, write: F) -> Result<(), ReportError>
where
    F: FnOnce(&ProgressBar) -> Result<(), ReportError>,
{
    if let Err(e) = config.validate() {
        fail("Invalid configuration", e);
    }
    info!(
        "{} sweep started {} (deck sizes {:?}, {} trials per side, seed {})",
        name,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        config.deck_sizes,
        config.trials,
        seed
    );
    let bar = progress_bar(quiet);
    let result = write(&bar);
    bar.finish_and_clear();
    result
}

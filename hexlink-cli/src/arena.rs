//! Arena command - play local games between two policies
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: validate_args(), play_arena(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: seeding and formatting utilities
//!
//! Player A and player B alternate the opening seat: A opens odd-numbered
//! games. Both are random policies unless `--human` puts a person in A.

use anyhow::{bail, Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use hexlink_core::{Colour, GameState, Move, PolicySource, RandomPolicy, Seat, MAX_BOARD_SIZE};

use crate::human::HumanPolicy;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ArenaArgs {
    /// Board side length
    #[arg(long, default_value = "11")]
    pub size: usize,

    /// Number of games to play (will alternate the opener)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Probability that a random player takes the swap when offered
    #[arg(long, default_value = "0.5")]
    pub swap_probability: f64,

    /// Play as player A from the terminal
    #[arg(long)]
    pub human: bool,

    /// Play games in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    a_opened: bool,
    winner: Colour,
    winning_seat: Seat,
    turns: usize,
    swap_used: bool,
    moves: Vec<Move>,
}

impl GameRecord {
    fn a_won(&self) -> bool {
        let a_seat = if self.a_opened { Seat::Opener } else { Seat::Responder };
        self.winning_seat == a_seat
    }
}

/// Aggregated arena results
#[derive(Clone, Debug)]
struct ArenaResults {
    games: Vec<GameRecord>,
    a_wins: usize,
    b_wins: usize,
    red_wins: usize,
    blue_wins: usize,
    opener_wins: usize,
    swaps: usize,
    avg_turns: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run arena command
///
/// 1. Validate arguments
/// 2. Play every game
/// 3. Report results
pub fn run(args: ArenaArgs, seed: Option<u64>) -> Result<()> {
    validate_args(&args)?;

    tracing::info!(
        "Starting arena: {} games on {}x{} (swap probability {})",
        args.games,
        args.size,
        args.size,
        args.swap_probability
    );

    let results = play_arena(&args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn validate_args(args: &ArenaArgs) -> Result<()> {
    if !(1..=MAX_BOARD_SIZE).contains(&args.size) {
        bail!("Board size must be between 1 and {}, got {}", MAX_BOARD_SIZE, args.size);
    }
    if !(0.0..=1.0).contains(&args.swap_probability) {
        bail!(
            "Swap probability must be within [0, 1], got {}",
            args.swap_probability
        );
    }
    if args.human && args.parallel {
        bail!("--human cannot be combined with --parallel");
    }
    Ok(())
}

/// Play all games in the arena
fn play_arena(args: &ArenaArgs, seed: Option<u64>) -> Result<ArenaResults> {
    let seeds = game_seeds(seed, args.games);

    let games = if args.human {
        let mut human = HumanPolicy::stdin();
        seeds
            .iter()
            .enumerate()
            .map(|(i, &(_, b_seed))| {
                let mut b = random_player(b_seed, args.swap_probability);
                play_single_game(args.size, i + 1, &mut human, &mut b)
            })
            .inspect(log_game)
            .collect::<Result<Vec<_>>>()?
    } else if args.parallel {
        seeds
            .par_iter()
            .enumerate()
            .map(|(i, &(a_seed, b_seed))| play_random_game(args, i + 1, a_seed, b_seed))
            .collect::<Result<Vec<_>>>()?
    } else {
        seeds
            .iter()
            .enumerate()
            .map(|(i, &(a_seed, b_seed))| play_random_game(args, i + 1, a_seed, b_seed))
            .inspect(log_game)
            .collect::<Result<Vec<_>>>()?
    };

    Ok(compute_statistics(games))
}

/// Report arena results
fn report_results(results: &ArenaResults, args: &ArenaArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_random_game(args: &ArenaArgs, game_number: usize, a_seed: u64, b_seed: u64) -> Result<GameRecord> {
    let mut a = random_player(a_seed, args.swap_probability);
    let mut b = random_player(b_seed, args.swap_probability);
    play_single_game(args.size, game_number, &mut a, &mut b)
}

/// Play one game to completion; Hex has no draws so a full board always
/// carries a winner
fn play_single_game<A, B>(size: usize, game_number: usize, a: &mut A, b: &mut B) -> Result<GameRecord>
where
    A: PolicySource + ?Sized,
    B: PolicySource + ?Sized,
{
    let a_opened = game_number % 2 == 1;
    let a_seat = if a_opened { Seat::Opener } else { Seat::Responder };

    let mut state = GameState::new(size)?;
    while !state.is_over() {
        let action = if state.active_seat() == a_seat {
            a.select_action(&state)
        } else {
            b.select_action(&state)
        };
        state = state
            .apply_move(action)
            .with_context(|| format!("Game {}: rejected action {}", game_number, action))?;
    }

    let winner = state
        .winner()
        .with_context(|| format!("Game {} ended without a winner", game_number))?;
    let winning_seat = state
        .winning_seat()
        .with_context(|| format!("Game {} has no winning seat", game_number))?;

    Ok(GameRecord {
        game_number,
        a_opened,
        winner,
        winning_seat,
        turns: state.turn_index(),
        swap_used: state.swap_used(),
        moves: state.history().to_vec(),
    })
}

/// Compute aggregate statistics from game records
fn compute_statistics(games: Vec<GameRecord>) -> ArenaResults {
    let a_wins = games.iter().filter(|g| g.a_won()).count();
    let red_wins = games.iter().filter(|g| g.winner == Colour::First).count();
    let opener_wins = games
        .iter()
        .filter(|g| g.winning_seat == Seat::Opener)
        .count();
    let swaps = games.iter().filter(|g| g.swap_used).count();

    let total_turns: usize = games.iter().map(|g| g.turns).sum();
    let avg_turns = if games.is_empty() {
        0.0
    } else {
        total_turns as f32 / games.len() as f32
    };

    ArenaResults {
        a_wins,
        b_wins: games.len() - a_wins,
        red_wins,
        blue_wins: games.len() - red_wins,
        opener_wins,
        swaps,
        avg_turns,
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Per-game (A, B) seeds drawn up front so parallel and sequential runs agree
fn game_seeds(seed: Option<u64>, games: usize) -> Vec<(u64, u64)> {
    let mut rng = create_rng(seed);
    (0..games).map(|_| (rng.gen(), rng.gen())).collect()
}

fn random_player(seed: u64, swap_probability: f64) -> RandomPolicy {
    RandomPolicy::new(seed).with_swap_probability(swap_probability)
}

fn log_game(record: &Result<GameRecord>) {
    if let Ok(record) = record {
        tracing::info!(
            "Game {}: {} wins as {:?} in {} turns{}",
            record.game_number,
            if record.a_won() { "A" } else { "B" },
            record.winning_seat,
            record.turns,
            if record.swap_used { " (swapped)" } else { "" }
        );
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &ArenaResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        opener: &'static str,
        winner: &'static str,
        turns: usize,
        swap_used: bool,
        /// Wire notation, replayable through `parse_move`
        moves: Vec<String>,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        a_wins: usize,
        b_wins: usize,
        red_wins: usize,
        blue_wins: usize,
        opener_wins: usize,
        swaps: usize,
        avg_turns: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        a_wins: results.a_wins,
        b_wins: results.b_wins,
        red_wins: results.red_wins,
        blue_wins: results.blue_wins,
        opener_wins: results.opener_wins,
        swaps: results.swaps,
        avg_turns: results.avg_turns,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                opener: if g.a_opened { "A" } else { "B" },
                winner: if g.a_won() { "A" } else { "B" },
                turns: g.turns,
                swap_used: g.swap_used,
                moves: g.moves.iter().map(Move::to_string).collect(),
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &ArenaResults) {
    let total = results.games.len();

    println!("\n=== Arena Results ===");
    println!("Total games: {}", total);
    println!("A wins:      {} ({:.1}%)", results.a_wins, percent(results.a_wins, total));
    println!("B wins:      {} ({:.1}%)", results.b_wins, percent(results.b_wins, total));
    println!("Red wins:    {} ({:.1}%)", results.red_wins, percent(results.red_wins, total));
    println!("Blue wins:   {} ({:.1}%)", results.blue_wins, percent(results.blue_wins, total));
    println!(
        "Opener wins: {} ({:.1}%)",
        results.opener_wins,
        percent(results.opener_wins, total)
    );
    println!("Swaps:       {}", results.swaps);
    println!("Avg turns:   {:.1}", results.avg_turns);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} opened, {} won ({}) in {} turns",
            game.game_number,
            if game.a_opened { "A" } else { "B" },
            if game.a_won() { "A" } else { "B" },
            game.winner.name(),
            game.turns
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(games: usize, parallel: bool) -> ArenaArgs {
        ArenaArgs {
            size: 5,
            games,
            swap_probability: 0.5,
            human: false,
            parallel,
            json: false,
        }
    }

    fn record(game_number: usize, winning_seat: Seat, swap_used: bool, turns: usize) -> GameRecord {
        let winner = if swap_used {
            match winning_seat {
                Seat::Opener => Colour::Second,
                Seat::Responder => Colour::First,
            }
        } else {
            match winning_seat {
                Seat::Opener => Colour::First,
                Seat::Responder => Colour::Second,
            }
        };
        GameRecord {
            game_number,
            a_opened: game_number % 2 == 1,
            winner,
            winning_seat,
            turns,
            swap_used,
            moves: vec![],
        }
    }

    #[test]
    fn test_compute_statistics_empty() {
        let results = compute_statistics(vec![]);
        assert_eq!(results.a_wins, 0);
        assert_eq!(results.b_wins, 0);
        assert_eq!(results.swaps, 0);
        assert_eq!(results.avg_turns, 0.0);
    }

    #[test]
    fn test_compute_statistics() {
        let games = vec![
            record(1, Seat::Opener, false, 10),
            record(2, Seat::Opener, true, 20),
            record(3, Seat::Responder, false, 30),
        ];

        let results = compute_statistics(games);
        // Game 1: A opened and won. Game 2: B opened and won. Game 3: A opened, B won.
        assert_eq!(results.a_wins, 1);
        assert_eq!(results.b_wins, 2);
        assert_eq!(results.opener_wins, 2);
        assert_eq!(results.red_wins, 1);
        assert_eq!(results.blue_wins, 2);
        assert_eq!(results.swaps, 1);
        assert_eq!(results.avg_turns, 20.0);
    }

    #[test]
    fn test_single_game_alternates_opener() {
        let mut a = RandomPolicy::new(1);
        let mut b = RandomPolicy::new(2);

        let first = play_single_game(4, 1, &mut a, &mut b).unwrap();
        let second = play_single_game(4, 2, &mut a, &mut b).unwrap();
        assert!(first.a_opened);
        assert!(!second.a_opened);
        assert_eq!(first.moves.len(), first.turns);
        assert!(first.turns >= 4);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = play_arena(&args(6, false), Some(42)).unwrap();
        let parallel = play_arena(&args(6, true), Some(42)).unwrap();

        let summary = |r: &ArenaResults| {
            r.games
                .iter()
                .map(|g| (g.game_number, g.winning_seat, g.turns, g.swap_used))
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(&sequential), summary(&parallel));
        assert_eq!(sequential.games.len(), 6);
    }

    #[test]
    fn test_validate_args() {
        assert!(validate_args(&args(1, false)).is_ok());

        let mut bad = args(1, true);
        bad.human = true;
        assert!(validate_args(&bad).is_err());

        let mut bad = args(1, false);
        bad.size = 0;
        assert!(validate_args(&bad).is_err());

        let mut bad = args(1, false);
        bad.size = MAX_BOARD_SIZE + 1;
        assert!(validate_args(&bad).is_err());

        let mut bad = args(1, false);
        bad.swap_probability = 1.5;
        assert!(validate_args(&bad).is_err());
    }

    #[test]
    fn test_game_seeds_deterministic() {
        assert_eq!(game_seeds(Some(7), 3), game_seeds(Some(7), 3));
        assert_ne!(game_seeds(Some(7), 3), game_seeds(Some(8), 3));
    }
}

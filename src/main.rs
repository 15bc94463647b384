use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};

use chess_core::agent::ai::{full_evaluation, EnginePlayer};
use chess_core::config::{Difficulty, GameConfig, SearchLimits};
use chess_core::game_repr::{serialize_line, Position, START_FEN};
use chess_core::orchestrator::Orchestrator;
use chess_core::ChessResult;

#[derive(Parser)]
#[command(name = "chess_core", about = "Chess rules core and search engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count leaf nodes of the legal move tree
    Perft {
        depth: u32,
        #[arg(long, default_value = START_FEN)]
        fen: String,
        /// Print the count below every root move
        #[arg(long)]
        divide: bool,
    },
    /// Static evaluation of a position, positive for White
    Eval {
        #[arg(default_value = START_FEN)]
        fen: String,
    },
    /// Search a position and print the chosen move
    Bestmove {
        #[arg(default_value = START_FEN)]
        fen: String,
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        /// Override the minimum depth of the preset
        #[arg(long)]
        min_depth: Option<u32>,
        /// Override the maximum depth of the preset
        #[arg(long)]
        max_depth: Option<u32>,
        /// Think time in milliseconds
        #[arg(long)]
        movetime: Option<u64>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Let the engine play itself
    Selfplay {
        #[arg(long, default_value = "easy")]
        white: Difficulty,
        #[arg(long, default_value = "easy")]
        black: Difficulty,
        #[arg(long, default_value = START_FEN)]
        fen: String,
        #[arg(long, default_value_t = 200)]
        max_plies: u32,
        /// Seconds per side
        #[arg(long)]
        clock: Option<u64>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse().command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> ChessResult<()> {
    match command {
        Command::Perft { depth, fen, divide } => {
            let position = Position::from_fen(&fen)?;
            let start = Instant::now();
            let nodes = if divide {
                let split = position.divide(depth);
                for (mv, count) in &split {
                    println!("{mv}: {count}");
                }
                split.iter().map(|(_, count)| count).sum()
            } else {
                position.perft(depth)
            };
            let elapsed = start.elapsed();
            println!("Result: {nodes} nodes");
            println!("Time: {:.2}s", elapsed.as_secs_f64());
            println!("Nodes/sec: {:.0}", nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON));
        }
        Command::Eval { fen } => {
            let position = Position::from_fen(&fen)?;
            println!("{:.3}", full_evaluation(&position));
        }
        Command::Bestmove { fen, difficulty, min_depth, max_depth, movetime, seed, threads } => {
            let position = Position::from_fen(&fen)?;
            let preset = difficulty.limits();
            let mut limits = SearchLimits::new(
                min_depth.unwrap_or(preset.min_depth),
                max_depth.unwrap_or(preset.max_depth),
            );
            limits.think_time = movetime.map(Duration::from_millis).or(preset.think_time);

            let mut engine = EnginePlayer::new(limits, seed, format!("AI ({})", difficulty.name()));
            if let Some(threads) = threads {
                engine = engine.with_threads(threads);
            }
            match engine.search(&position, None) {
                Some(outcome) => {
                    println!("bestmove {}", outcome.mv);
                    println!(
                        "value {:.2} depth {} path {} nodes {} time {:?}",
                        outcome.evaluation.value,
                        outcome.evaluation.depth,
                        serialize_line(&outcome.evaluation.path),
                        outcome.nodes,
                        outcome.elapsed
                    );
                }
                None => println!("bestmove (none)"),
            }
        }
        Command::Selfplay { white, black, fen, max_plies, clock, seed } => {
            let mut config = GameConfig::aivai(white, black).with_fen(fen).with_max_plies(max_plies);
            if let Some(secs) = clock {
                config = config.with_time_control(Duration::from_secs(secs));
            }
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }

            let mut game = Orchestrator::from_config(&config)?;
            let result = game.run()?;
            let moves: Vec<String> = game.board().history().iter().map(|mv| mv.to_string()).collect();
            println!("{}", moves.join(" "));
            println!("{:?} ({:?})", result, game.board().status());
            println!("{}", game.board().position().to_fen());
        }
    }
    Ok(())
}

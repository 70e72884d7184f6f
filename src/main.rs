use std::process::ExitCode;
#[cfg(feature = "perft")]
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
#[cfg(feature = "perft")]
use knightwatch::game::perft;
use knightwatch::game::{action::UciMove, position::Position, Game};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Arguments {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shows a position, its status and its legal moves (DEFAULT)
    Show {
        /// Position as a FEN string, the initial position if omitted
        #[arg(short, long)]
        position: Option<String>,
    },
    /// Plays a sequence of moves in long algebraic notation (e2e4, e7e8q)
    Play {
        moves: Vec<String>,
        /// Starting position as a FEN string.
        #[arg(short, long)]
        position: Option<String>,
    },
    /// Runs perft (generating all moves up to a certain depth)
    Perft {
        /// Maximum depth to reach
        depth: u8,
        /// Starting position as a FEN string.
        #[arg(short, long)]
        position: Option<String>,
        /// Shows move count for each move from the starting position
        #[arg(short)]
        divide: bool,
        /// Generates moves for each depth up to the maximum
        #[arg(short)]
        iterative: bool,
        /// Show timing information
        #[arg(long)]
        bench: bool,
        /// Counts legal moves at horizon nodes instead of playing each of them
        #[arg(short)]
        bulk: bool,

        /// Does not show the board and other decorations
        #[arg(long)]
        no_board: bool,
    },
    /// Plays random legal moves until the game ends
    Random {
        /// Maximum number of plies to play
        #[arg(long, default_value_t = 200)]
        plies: usize,
        /// Seed of the move picker, random if omitted
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn parse_position(fen: Option<String>) -> Result<Position, String> {
    match fen {
        Some(fen) => Position::from_fen(&fen).map_err(|err| format!("Invalid FEN: {err}")),
        None => Ok(Position::initial()),
    }
}

fn show(position: Position) {
    let game = Game::from_position(position);
    println!("{game}\n");
    println!("{}", game.position().fen());
    let moves = game.legal_moves();
    println!(
        "{} legal moves: {}",
        moves.len(),
        moves
            .iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );
}

fn play(position: Position, moves: &[String]) -> Result<(), String> {
    let mut game = Game::from_position(position);
    for mv in moves {
        let uci: UciMove = mv.parse().map_err(|err| format!("{mv}: {err}"))?;
        game.play_uci(uci).map_err(|err| format!("{mv}: {err}"))?;
    }
    println!("{game}");
    Ok(())
}

/// Options of the `perft` subcommand.
#[cfg(feature = "perft")]
struct PerftOptions {
    depth: u8,
    divide: bool,
    iterative: bool,
    bench: bool,
    bulk: bool,
    board: bool,
}

#[cfg(feature = "perft")]
fn run_perft(mut position: Position, options: PerftOptions) {
    if options.board {
        println!("{position}\n");
        println!("{}\n", position.fen());
    }

    let first = if options.iterative { 1 } else { options.depth };
    for depth in first..=options.depth {
        let start = Instant::now();
        let nodes = if options.divide {
            let split = perft::divide(&mut position, depth, options.bulk);
            for (mv, nodes) in &split {
                println!("{mv}: {nodes}");
            }
            split.iter().map(|(_, nodes)| nodes).sum::<u64>()
        } else {
            perft::perft(&mut position, depth, options.bulk)
        };
        let elapsed = start.elapsed();
        log::debug!("perft({depth}) of {} done in {elapsed:?}", position.fen());

        println!("depth {depth}: {nodes} nodes");
        if options.bench {
            println!("\ttook {}", timing(nodes, elapsed));
        }
        if options.divide && depth != options.depth {
            println!();
        }
    }
}

/// Elapsed time and nodes per second, scaled to a readable unit.
#[cfg(feature = "perft")]
fn timing(nodes: u64, elapsed: Duration) -> String {
    let nps = nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
    let (scaled, unit) = [(1e9, "G"), (1e6, "M"), (1e3, "K")]
        .into_iter()
        .find(|&(scale, _)| nps >= scale)
        .map_or((nps, ""), |(scale, unit)| (nps / scale, unit));
    format!("{elapsed:.3?} ({scaled:.3}{unit}nps)")
}

fn random(plies: usize, seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let mut game = Game::new();

    for _ in 0..plies {
        let moves = game.legal_moves();
        let Some(&mv) = moves.choose(&mut rng) else {
            break;
        };
        if let Err(err) = game.play(mv) {
            log::error!("Generated move {mv} was rejected: {err}");
            break;
        }
    }

    println!(
        "{}\n",
        game.moves()
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );
    println!("{game}");
}

pub fn main() -> ExitCode {
    let args = Arguments::parse();
    env_logger::init();

    let result = match args
        .command
        .unwrap_or(Command::Show { position: None })
    {
        Command::Show { position } => parse_position(position).map(show),
        Command::Play { moves, position } => {
            parse_position(position).and_then(|position| play(position, &moves))
        }
        #[cfg(feature = "perft")]
        Command::Perft {
            position,
            depth,
            divide,
            iterative,
            bench,
            bulk,
            no_board,
        } => parse_position(position).map(|position| {
            run_perft(
                position,
                PerftOptions {
                    depth,
                    divide,
                    iterative,
                    bench,
                    bulk,
                    board: !no_board,
                },
            )
        }),
        #[cfg(not(feature = "perft"))]
        Command::Perft { .. } => Err(String::from(
            "knightwatch has not been compiled with feature `perft`",
        )),
        Command::Random { plies, seed } => {
            random(plies, seed);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};

use slider_search::state::{CELLS, WIDTH};
use slider_search::{BoardReader, Location, Puzzle, Solver, SolverConfig};

#[derive(Parser)]
#[clap(author, version, about = "Solve the 15-puzzle with best-first search", long_about = None)]
struct Cli {
    /// Sixteen numbers, row by row, 0 for the blank.
    #[clap(short, long, value_parser)]
    board: Option<String>,

    /// Random slides applied to the solved board when no --board is given.
    #[clap(short, long, value_parser, default_value_t = 20)]
    scramble: usize,

    #[clap(long, value_parser)]
    seed: Option<u64>,

    #[clap(long, value_parser)]
    max_iterations: Option<usize>,

    #[clap(long, value_parser, default_value_t = 1000)]
    progress_interval: usize,

    /// Only print the move list, not the board after each move.
    #[clap(short, long, value_parser)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let puzzle = match &cli.board {
        Some(text) => text.parse::<Puzzle>().context("invalid --board")?,
        None => {
            let mut rng = match cli.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut puzzle = Puzzle::new();
            let walk = puzzle.scramble(&mut rng, cli.scramble);
            let slides: Vec<String> = walk.iter().map(|dir| dir.to_string()).collect();
            log::info!("scrambled with {} slides: {}", walk.len(), slides.join(" "));
            puzzle
        }
    };

    if !puzzle.is_solvable() {
        bail!("this board cannot be sorted: tile parity is odd");
    }

    let mut out = io::stdout();
    writeln!(out, "Start:")?;
    render(&mut out, &puzzle)?;

    let mut config = SolverConfig::default().with_progress_interval(cli.progress_interval);
    if let Some(limit) = cli.max_iterations {
        config = config.with_max_iterations(limit);
    }

    let outcome = Solver::new(config).search(&puzzle)?;
    writeln!(
        out,
        "Found solution with {} moves ({} iterations, {} states visited)",
        outcome.solution.len(),
        outcome.stats.iterations,
        outcome.stats.visited
    )?;

    let mut replay = puzzle.clone();
    for (step, item) in outcome.solution.iter().enumerate() {
        writeln!(out, "{:3}. {}", step + 1, item)?;
        if !replay.apply_move(*item) {
            bail!("move {} does not fit the board", item);
        }
        if !cli.quiet {
            render(&mut out, &replay)?;
        }
    }

    if !replay.is_solved() {
        bail!("replayed moves did not sort the board");
    }
    out.flush()?;
    Ok(())
}

/// Prints the grid, tiles already in their home cell in green.
fn render<W: Write>(out: &mut W, puzzle: &Puzzle) -> Result<()> {
    for index in 0..CELLS {
        let piece = puzzle.piece_at(Location::from_index(index));
        let home = (index + 1) % CELLS;

        if piece.is_empty() {
            queue!(out, Print("  . "))?;
        } else if piece.number() as usize == home {
            queue!(
                out,
                SetForegroundColor(Color::Green),
                Print(format!("{:3} ", piece.number())),
                ResetColor
            )?;
        } else {
            queue!(out, Print(format!("{:3} ", piece.number())))?;
        }

        if index % WIDTH == WIDTH - 1 {
            queue!(out, Print("\n"))?;
        }
    }
    queue!(out, Print("\n"))?;
    out.flush()?;
    Ok(())
}

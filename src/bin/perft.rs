use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use othello_engine::board::{BoardState, Color, Game};
use othello_engine::perft::{divide, perft};

#[derive(Parser, Debug)]
#[command(name = "perft", about = "Move generator node counts")]
struct Args {
    /// Depth in plies
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// Transcript from the start position, or "startpos"
    #[arg(value_name = "MOVES", default_value = "startpos")]
    moves: String,
    /// 64-cell board text (B/W/.); overrides MOVES
    #[arg(long)]
    board: Option<String>,
    /// Side to move with --board
    #[arg(long, default_value = "b")]
    side: String,
    /// Number of threads for root-split
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Print per-move counts
    #[arg(long, default_value_t = false)]
    divide: bool,
    /// Report elapsed time and NPS
    #[arg(long, default_value_t = false)]
    nps: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let (board, color) = match &args.board {
        Some(text) => {
            let Some(color) = Color::parse(&args.side) else { bail!("invalid side '{}': use b or w", args.side) };
            (text.parse::<BoardState>()?, color)
        }
        None if args.moves == "startpos" => (BoardState::initial(), Color::Black),
        None => {
            let g = Game::from_transcript(&args.moves)?;
            (g.board(), g.to_move())
        }
    };

    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads.max(1)).build()?;
    let t0 = Instant::now();
    let nodes = pool.install(|| {
        if (args.divide || args.threads > 1) && args.depth > 0 {
            let parts = divide(&board, color, args.depth);
            if args.divide {
                for (mv, n) in &parts { println!("{}: {}", mv, n); }
            }
            if parts.is_empty() { perft(&board, color, args.depth) } else { parts.iter().map(|(_, n)| n).sum() }
        } else {
            perft(&board, color, args.depth)
        }
    });
    let dt = t0.elapsed().as_secs_f64();
    if args.nps { println!("nodes: {nodes} elapsed: {:.3}s nps: {:.1}", dt, nodes as f64 / dt.max(f64::EPSILON)); }
    else { println!("nodes: {nodes}"); }
    Ok(())
}

use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::game::Game;
use crate::board::types::{Color, Position};
use crate::eval::Evaluator;
use crate::search::alphabeta::Searcher;
use crate::search::cache::EvaluationCache;

#[derive(Clone, Debug)]
pub struct SelfPlayParams {
    pub games: usize,
    pub depth: u32,
    /// Uniformly random opening plies before the engines take over.
    pub random_plies: usize,
    pub seed: u64,
    /// Swap colors on odd-numbered games.
    pub alternate_colors: bool,
}

impl Default for SelfPlayParams {
    fn default() -> Self { Self { games: 10, depth: 3, random_plies: 4, seed: 42, alternate_colors: true } }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub index: usize,
    pub black: String,
    pub white: String,
    pub transcript: String,
    pub black_discs: u32,
    pub white_discs: u32,
    pub winner: Option<Color>,
    /// Whether the first engine of a match had black.
    #[serde(default = "default_true")]
    pub first_black: bool,
}

fn default_true() -> bool { true }

/// Match results seen from the first engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
}

fn pick_random(moves: &[Position], rng: &mut SmallRng) -> Option<Position> {
    if moves.is_empty() { None } else { Some(moves[rng.gen_range(0..moves.len())]) }
}

/// Plays one game to the end. Passes are handled by `Game`.
pub fn play_game(
    index: usize,
    black: &dyn Evaluator,
    white: &dyn Evaluator,
    params: &SelfPlayParams,
    cache: Option<Arc<EvaluationCache>>,
) -> GameRecord {
    let mut rng = SmallRng::seed_from_u64(params.seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    let mut game = Game::new();
    let mut searcher = Searcher::new();
    searcher.set_cache(cache);
    while !game.is_finished() {
        let color = game.to_move();
        let mv = if game.move_count() < params.random_plies {
            pick_random(&game.valid_moves(), &mut rng)
        } else {
            let e = if color == Color::Black { black } else { white };
            searcher.solve(&game.board(), color, params.depth, e).best_move
        };
        let Some(pos) = mv else { break };
        if let Err(e) = game.play(pos) {
            log::warn!("game {}: engine produced illegal move {}: {}", index, pos, e);
            break;
        }
    }
    let b = game.board();
    GameRecord {
        index,
        black: black.coefficients().name.clone(),
        white: white.coefficients().name.clone(),
        transcript: game.transcript(),
        black_discs: b.count(Color::Black),
        white_discs: b.count(Color::White),
        winner: game.winner(),
        first_black: true,
    }
}

/// Plays `params.games` games between `first` and `second` on the rayon pool.
/// With `alternate_colors`, `first` has black in even-numbered games.
pub fn generate_games(
    params: &SelfPlayParams,
    first: Arc<dyn Evaluator>,
    second: Arc<dyn Evaluator>,
    cache: Option<Arc<EvaluationCache>>,
    on_done: &(dyn Fn(&GameRecord) + Sync),
) -> Vec<GameRecord> {
    (0..params.games)
        .into_par_iter()
        .map(|i| {
            let swap = params.alternate_colors && i % 2 == 1;
            let (b, w) = if swap { (second.as_ref(), first.as_ref()) } else { (first.as_ref(), second.as_ref()) };
            let mut rec = play_game(i, b, w, params, cache.clone());
            rec.first_black = !swap;
            on_done(&rec);
            rec
        })
        .collect()
}

pub fn tally(games: &[GameRecord]) -> Tally {
    let mut t = Tally::default();
    for g in games {
        let first_color = if g.first_black { Color::Black } else { Color::White };
        match g.winner {
            None => t.draws += 1,
            Some(c) if c == first_color => t.first_wins += 1,
            Some(_) => t.second_wins += 1,
        }
    }
    t
}

/// One JSON object per line.
pub fn write_jsonl<P: AsRef<Path>>(games: &[GameRecord], path: P) -> std::io::Result<()> {
    if let Some(dir) = path.as_ref().parent() {
        if !dir.as_os_str().is_empty() { create_dir_all(dir)?; }
    }
    let mut w = BufWriter::new(File::create(path)?);
    for g in games {
        serde_json::to_writer(&mut w, g)?;
        w.write_all(b"\n")?;
    }
    w.flush()
}

pub fn read_jsonl<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<GameRecord>> {
    let r = BufReader::new(File::open(path)?);
    let mut out = Vec::new();
    for line in r.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        out.push(serde_json::from_str(&line)?);
    }
    Ok(out)
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use othello_engine::eval::coeffs::{preset, EvaluationCoefficients};
use othello_engine::eval::Backend;
use othello_engine::search::cache::EvaluationCache;
use othello_engine::selfplay::{generate_games, tally, write_jsonl, GameRecord, SelfPlayParams};

#[derive(Parser, Debug)]
#[command(name = "othello-selfplay", about = "Play matches between two coefficient sets")]
struct Args {
    /// First engine: preset name or path to a JSON bundle
    #[arg(long, default_value = "V7")]
    first: String,
    /// Second engine: preset name or path to a JSON bundle
    #[arg(long, default_value = "V6")]
    second: String,
    #[arg(long, default_value_t = 20)]
    games: usize,
    #[arg(long, default_value_t = 3)]
    depth: u32,
    /// Random opening plies per game
    #[arg(long, default_value_t = 4)]
    random_plies: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 1)]
    threads: usize,
    #[arg(long, default_value = "reference")]
    backend: Backend,
    /// Shared cache entries; 0 disables the cache
    #[arg(long, default_value_t = 1 << 20)]
    cache_entries: usize,
    /// Write one JSON record per game
    #[arg(long)]
    out: Option<PathBuf>,
}

fn load(spec: &str) -> Result<EvaluationCoefficients> {
    let p = Path::new(spec);
    if p.extension().map_or(false, |e| e == "json") {
        let text = std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
        return EvaluationCoefficients::from_json(&text).with_context(|| format!("parsing {}", p.display()));
    }
    Ok(preset(spec)?)
}

fn main() -> Result<()> {
    env_logger::init();
    let a = Args::parse();
    let first = a.backend.build(load(&a.first)?)?;
    let second = a.backend.build(load(&a.second)?)?;
    let cache = (a.cache_entries > 0).then(|| Arc::new(EvaluationCache::new(a.cache_entries)));
    let params = SelfPlayParams { games: a.games, depth: a.depth, random_plies: a.random_plies, seed: a.seed, alternate_colors: true };

    eprintln!("Playing {} games {} vs {} (depth={}, threads={})", a.games, a.first, a.second, a.depth, a.threads);
    let pb = ProgressBar::new(a.games as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}").context("progress template")?);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(a.threads.max(1)).build()?;
    let games = pool.install(|| generate_games(&params, first, second, cache.clone(), &|_: &GameRecord| pb.inc(1)));
    pb.finish_and_clear();

    let t = tally(&games);
    println!("{}: {} wins, {}: {} wins, {} draws", a.first, t.first_wins, a.second, t.second_wins, t.draws);
    if let Some(c) = &cache {
        let s = c.stats();
        eprintln!("cache: {} entries, hit rate {:.1}%", s.entries, s.hit_rate() * 100.0);
    }
    if let Some(out) = &a.out {
        write_jsonl(&games, out).with_context(|| format!("writing {}", out.display()))?;
        eprintln!("Wrote {} games to {}", games.len(), out.display());
    }
    Ok(())
}

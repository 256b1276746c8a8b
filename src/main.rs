use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use othello_engine::eval::coeffs::{preset, EvaluationCoefficients};
use othello_engine::eval::Backend;
use othello_engine::protocol::Engine;
use othello_engine::search::cache::{EvaluationCache, DEFAULT_CAPACITY};
use othello_engine::search::SearchParams;

#[derive(Parser, Debug)]
#[command(author, version, about = "Line-protocol Othello engine", long_about = None)]
struct Args {
    /// Default search depth for `go` without a depth
    #[arg(long, default_value_t = 6)]
    depth: u32,

    /// Coefficient preset (V1..V7)
    #[arg(long, default_value = "V7")]
    preset: String,

    /// JSON coefficient bundle; overrides --preset
    #[arg(long)]
    coeffs: Option<PathBuf>,

    /// Evaluator backend: reference or batch
    #[arg(long, default_value = "reference")]
    backend: Backend,

    /// Maximum cache entries
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    cache_entries: usize,

    /// Root-split threads
    #[arg(long, default_value_t = 1)]
    threads: usize,
}

fn load_coeffs(preset_name: &str, path: Option<&Path>) -> Result<EvaluationCoefficients> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            EvaluationCoefficients::from_json(&text).with_context(|| format!("parsing {}", p.display()))
        }
        None => Ok(preset(preset_name)?),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let coeffs = load_coeffs(&args.preset, args.coeffs.as_deref())?;
    let evaluator = args.backend.build(coeffs)?;
    let cache = Arc::new(EvaluationCache::new(args.cache_entries));
    let params = SearchParams { depth: args.depth, use_cache: true, threads: args.threads.max(1) };
    let mut engine = Engine::new(evaluator, args.backend, cache, params);
    engine.run_loop().context("protocol loop")?;
    Ok(())
}

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::board::apply::apply_move;
use crate::board::bitboard::BoardState;
use crate::board::game::Game;
use crate::board::movegen::{has_any_moves, valid_moves};
use crate::board::types::{Color, Position};
use crate::board::{BoardError, MoveError};
use crate::eval::coeffs::{preset, CoefficientError};
use crate::eval::{Backend, Evaluator};
use crate::search::alphabeta::{SearchParams, Searcher};
use crate::search::cache::EvaluationCache;
use crate::search::snapshot::PositionSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("malformed command: {0}")]
    Malformed(String),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Coefficients(#[from] CoefficientError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-oriented engine driver. Each input line yields zero or more output
/// lines; errors are reported as `error <message>` and never end the loop.
pub struct Engine {
    board: BoardState,
    to_move: Color,
    backend: Backend,
    evaluator: Arc<dyn Evaluator>,
    cache: Arc<EvaluationCache>,
    searcher: Searcher,
    params: SearchParams,
}

impl Engine {
    pub fn new(evaluator: Arc<dyn Evaluator>, backend: Backend, cache: Arc<EvaluationCache>, params: SearchParams) -> Self {
        let mut searcher = Searcher::with_cache(cache.clone());
        searcher.set_threads(params.threads);
        Self { board: BoardState::initial(), to_move: Color::Black, backend, evaluator, cache, searcher, params }
    }

    pub fn board(&self) -> &BoardState { &self.board }
    pub fn to_move(&self) -> Color { self.to_move }

    pub fn handle_line(&mut self, line: &str) -> (Flow, Vec<String>) {
        match self.dispatch(line.trim()) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("rejected '{}': {}", line.trim(), e);
                (Flow::Continue, vec![format!("error {}", e)])
            }
        }
    }

    fn dispatch(&mut self, line: &str) -> Result<(Flow, Vec<String>), ProtocolError> {
        let mut tokens = line.split_whitespace();
        let Some(cmd) = tokens.next() else { return Ok((Flow::Continue, vec![])) };
        let rest: Vec<&str> = tokens.collect();
        let out = match cmd {
            "isready" => vec!["readyok".to_string()],
            "newgame" => {
                self.board = BoardState::initial();
                self.to_move = Color::Black;
                self.cache.clear();
                vec![]
            }
            "position" => { self.cmd_position(&rest)?; vec![] }
            "coeffs" => self.cmd_coeffs(&rest)?,
            "go" => self.cmd_go(&rest)?,
            "play" => { self.cmd_play(&rest)?; vec![] }
            "eval" => self.cmd_eval(),
            "moves" => {
                let m = valid_moves(&self.board, self.to_move);
                if m.is_empty() { vec!["moves none".to_string()] } else {
                    vec![format!("moves {}", m.iter().map(|p| p.to_algebraic()).collect::<Vec<_>>().join(" "))]
                }
            }
            "show" => {
                let mut lines: Vec<String> = self.board.to_string().lines().map(str::to_string).collect();
                let (b, w) = (self.board.count(Color::Black), self.board.count(Color::White));
                lines.push(format!("to move {} black {} white {}", self.to_move, b, w));
                lines
            }
            "stats" => {
                let s = self.cache.stats();
                vec![format!("cache entries {} hits {} misses {} rejected {}", s.entries, s.hits(), s.misses(), s.rejected)]
            }
            "quit" => return Ok((Flow::Quit, vec![])),
            other => return Err(ProtocolError::UnknownCommand(other.to_string())),
        };
        Ok((Flow::Continue, out))
    }

    fn cmd_position(&mut self, args: &[&str]) -> Result<(), ProtocolError> {
        match args.first().copied() {
            Some("startpos") => {
                let transcript = match args.get(1).copied() {
                    Some("moves") => args[2..].concat(),
                    None => String::new(),
                    Some(other) => return Err(ProtocolError::Malformed(format!("expected 'moves', got '{}'", other))),
                };
                let g = Game::from_transcript(&transcript)?;
                self.board = g.board();
                self.to_move = g.to_move();
            }
            Some("board") => {
                if args.len() < 3 { return Err(ProtocolError::Malformed("position board <cells> <b|w>".into())); }
                let last = args.len() - 1;
                let color = Color::parse(args[last])
                    .ok_or_else(|| ProtocolError::Malformed(format!("bad side '{}'", args[last])))?;
                self.board = args[1..last].concat().parse()?;
                self.to_move = color;
            }
            _ => return Err(ProtocolError::Malformed("position startpos|board ...".into())),
        }
        Ok(())
    }

    fn cmd_coeffs(&mut self, args: &[&str]) -> Result<Vec<String>, ProtocolError> {
        let name = args.first().ok_or_else(|| ProtocolError::Malformed("coeffs <preset>".into()))?;
        let c = preset(name)?;
        let label = format!("coeffs {} v{}", c.name, c.version);
        self.evaluator = self.backend.build(c)?;
        Ok(vec![label])
    }

    fn cmd_go(&mut self, args: &[&str]) -> Result<Vec<String>, ProtocolError> {
        let mut depth = self.params.depth;
        let mut it = args.iter();
        while let Some(&tok) = it.next() {
            match tok {
                "depth" => {
                    depth = it
                        .next()
                        .and_then(|s| s.parse::<u32>().ok())
                        .ok_or_else(|| ProtocolError::Malformed("go depth <n>".into()))?;
                }
                other => return Err(ProtocolError::Malformed(format!("unknown go option '{}'", other))),
            }
        }
        let params = SearchParams { depth, ..self.params };
        let r = self.searcher.search_with_params(&self.board, self.to_move, params, self.evaluator.as_ref());
        let mv = r.best_move.map_or_else(|| "pass".to_string(), |p| p.to_algebraic());
        Ok(vec![format!("bestmove {} score {} nodes {}", mv, r.score, r.nodes)])
    }

    fn cmd_play(&mut self, args: &[&str]) -> Result<(), ProtocolError> {
        let tok = args.first().ok_or_else(|| ProtocolError::Malformed("play <square|pass>".into()))?;
        if *tok == "pass" {
            if has_any_moves(&self.board, self.to_move) {
                return Err(ProtocolError::Malformed(format!("{} has a legal move and cannot pass", self.to_move)));
            }
        } else {
            let pos = Position::from_algebraic(tok)?;
            self.board = apply_move(&self.board, self.to_move, pos)?;
        }
        self.to_move = self.to_move.opponent();
        Ok(())
    }

    fn cmd_eval(&self) -> Vec<String> {
        let snap = PositionSnapshot::new(&self.board);
        let score = self.evaluator.evaluate(&snap, &self.board, self.to_move);
        vec![format!("eval {} terminal {}", score, snap.terminal)]
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let (flow, out) = self.handle_line(&line);
            for l in out { writeln!(output, "{}", l)?; }
            output.flush()?;
            if flow == Flow::Quit { break; }
        }
        Ok(())
    }

    pub fn run_loop(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run(stdin.lock(), stdout.lock())
    }
}

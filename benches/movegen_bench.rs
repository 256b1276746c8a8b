use criterion::{criterion_group, criterion_main, Criterion, black_box};
use othello_engine::board::movegen::{valid_moves_mask, valid_moves_reference};
use othello_engine::board::{BoardState, Color, Game};
use othello_engine::perft::perft;

fn bench_movegen(c: &mut Criterion) {
    let mid = Game::from_transcript("f5d6c3d3c4f4f6f3e6e7d7c5").map(|g| g.board()).unwrap_or_else(|_| BoardState::initial());
    c.bench_function("movegen_flood_midgame", |ben| {
        ben.iter(|| black_box(valid_moves_mask(black_box(&mid), Color::Black)))
    });
    c.bench_function("movegen_reference_midgame", |ben| {
        ben.iter(|| black_box(valid_moves_reference(black_box(&mid), Color::Black)))
    });
    c.bench_function("perft_5_startpos", |ben| {
        ben.iter(|| black_box(perft(black_box(&BoardState::initial()), Color::Black, 5)))
    });
}

criterion_group!(benches, bench_movegen);
criterion_main!(benches);

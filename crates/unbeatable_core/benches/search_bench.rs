use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use unbeatable_core::{Board, Mark, search};

fn bench_search_empty_board() {
    let board = Board::new();
    black_box(search(black_box(&board), Mark::O));
}

fn bench_search_after_opening() {
    let mut board = Board::new();
    board.apply_move(4, Mark::X).unwrap();
    black_box(search(black_box(&board), Mark::O));
}

fn bench_search_mid_game() {
    let board: Board = "X...O...X".parse().unwrap();
    black_box(search(black_box(&board), Mark::O));
}

fn bench_full_game() {
    // X always takes the first free cell, O replies with the search.
    let mut board = Board::new();
    let mut mark = Mark::X;
    loop {
        let next = match mark {
            Mark::X => board.empty_cells().next(),
            Mark::O => search(&board, Mark::O).index(),
        };
        let Some(index) = next else { break };
        board.apply_move(index, mark).unwrap();
        if unbeatable_core::classify(&board).is_terminal() {
            break;
        }
        mark = mark.opponent();
    }
    black_box(board);
}

fn search_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimax");

    group.sample_size(10);

    group.bench_function("empty_board", |b| b.iter(bench_search_empty_board));
    group.bench_function("after_centre_opening", |b| {
        b.iter(bench_search_after_opening)
    });
    group.bench_function("mid_game", |b| b.iter(bench_search_mid_game));
    group.bench_function("full_game", |b| b.iter(bench_full_game));

    group.finish();
}

criterion_group!(benches, search_bench);
criterion_main!(benches);

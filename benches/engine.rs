use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, seq::IteratorRandom, SeedableRng};

use chess_rules::{Board, Color, Game, MatchInterface, Square};

fn random_game(mut game: Game, rng: &mut StdRng, max_steps: usize) -> Game {
    for _ in 0..max_steps {
        if game.is_over() {
            break;
        }
        let mover = game.current_player();
        let moves: Vec<(Square, Square)> = game
            .board()
            .iter_pieces()
            .filter(|piece| piece.color() == mover)
            .flat_map(|piece| {
                let from = piece.position();
                game.legal_destinations(from)
                    .into_iter()
                    .map(move |to| (from, to))
            })
            .collect();
        let Some((from, to)) = moves.into_iter().choose(rng) else {
            break;
        };
        game.select_or_move(from.file() as usize, from.rank() as usize);
        game.select_or_move(to.file() as usize, to.rank() as usize);
    }
    game
}

fn all_destinations(board: &mut Board, color: Color) -> usize {
    let own: Vec<Square> = board
        .iter_pieces()
        .filter(|piece| piece.color() == color)
        .map(|piece| piece.position())
        .collect();
    own.into_iter()
        .map(|from| board.legal_destinations(from).len())
        .sum()
}

fn criterion_benchmark(c: &mut Criterion) {
    let _ = env_logger::try_init();
    c.bench_function("recompute coverage", |b| {
        let mut board = Board::default();
        b.iter(|| black_box(&mut board).recompute_coverage())
    });
    c.bench_function("legal destinations", |b| {
        let mut board = Board::default();
        b.iter(|| all_destinations(black_box(&mut board), Color::White))
    });
    c.bench_function("has legal move", |b| {
        let mut board = Board::default();
        b.iter(|| black_box(&mut board).has_legal_move(Color::Black))
    });
    c.bench_function("random game 100", |b| {
        let mut rng = StdRng::seed_from_u64(1200);
        b.iter(|| random_game(Game::default(), &mut rng, 100))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

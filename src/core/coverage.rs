use log::trace;

use crate::core::board::Board;
use crate::core::pieces::{Color, Piece, PieceKind};
use crate::core::utils::{
    in_direction, Square, BISHOP_DIR, KING_MOVES, KNIGHT_MOVES, QUEEN_DIR, ROOK_DIR,
};
use crate::definitions::Material;

impl Piece {
    /// Squares this piece attacks, own-occupied ones included since a defended
    /// piece can't be taken by a king.
    ///
    /// Pawns cover only their two forward diagonals, never the square straight
    /// ahead. Sliding pieces stop at the first occupied square, counting it.
    pub fn covered_squares(&self, board: &Board) -> Vec<Square> {
        let position = self.position();
        match self.kind() {
            PieceKind::Pawn { .. } => {
                let forward = self.color().forward();
                [(-1, forward), (1, forward)]
                    .into_iter()
                    .filter_map(|step| position.offset(step))
                    .collect()
            }
            PieceKind::Knight => KNIGHT_MOVES
                .iter()
                .filter_map(|step| position.offset(*step))
                .collect(),
            PieceKind::King { .. } => KING_MOVES
                .iter()
                .filter_map(|step| position.offset(*step))
                .collect(),
            // Sliding pieces
            sliding_kind => {
                let possible_directions = match sliding_kind {
                    PieceKind::Bishop => BISHOP_DIR,
                    PieceKind::Rook { .. } => ROOK_DIR,
                    _ => QUEEN_DIR,
                };
                let mut covered = Vec::with_capacity(14);
                for dir in possible_directions {
                    for square in in_direction(position, *dir) {
                        covered.push(square);
                        if board.piece(square).is_some() {
                            break;
                        }
                    }
                }
                covered
            }
        }
    }
}

impl Board {
    /// Rebuilds every square's attacker counters and the material totals from
    /// scratch.
    pub fn recompute_coverage(&mut self) {
        for square in self.squares.iter_mut() {
            square.reset();
        }
        let mut material = Material::default();
        for idx in 0..self.pieces.len() {
            let Some(piece) = self.pieces[idx] else {
                continue;
            };
            for square in piece.covered_squares(self) {
                self.squares[square.index()].increase(piece.color());
            }
            material.add(piece.color(), piece.worth());
        }
        self.material = material;
        trace!(
            "Coverage recomputed, material white {} black {}",
            material.white,
            material.black
        );
    }

    /// Counts, without touching the counters, how many pieces of `color` cover
    /// `square`.
    pub fn count_attackers(&self, square: Square, color: Color) -> u8 {
        self.iter_pieces()
            .filter(|piece| piece.color() == color)
            .filter(|piece| piece.covered_squares(self).contains(&square))
            .count() as u8
    }

    /// Every counter matches a fresh count of the pieces covering its square.
    pub fn coverage_consistent(&self) -> bool {
        self.iter_squares().all(|record| {
            [Color::White, Color::Black].into_iter().all(|color| {
                record.attackers(color) == self.count_attackers(record.position(), color)
            })
        })
    }
}

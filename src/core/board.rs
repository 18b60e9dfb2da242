use std::fmt::{self, Display};

use crate::core::pieces::{Color, Piece, PieceKind, PieceType};
use crate::core::utils::{between, Square};
use crate::definitions::Material;

/// Per-square record: who stands here and how many pieces of each color cover it.
///
/// Counters are reset and rebuilt by `Board::recompute_coverage` before anyone
/// reads them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoardSquare {
    position: Square,
    occupant: Option<Color>,
    white_attackers: u8,
    black_attackers: u8,
}

impl BoardSquare {
    pub(crate) fn new(position: Square) -> BoardSquare {
        BoardSquare {
            position,
            occupant: None,
            white_attackers: 0,
            black_attackers: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> Square {
        self.position
    }

    #[inline]
    pub fn occupant(&self) -> Option<Color> {
        self.occupant
    }

    pub fn attackers(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white_attackers,
            Color::Black => self.black_attackers,
        }
    }

    #[inline]
    pub fn is_attacked_by(&self, color: Color) -> bool {
        self.attackers(color) > 0
    }

    pub fn increase(&mut self, color: Color) {
        match color {
            Color::White => self.white_attackers += 1,
            Color::Black => self.black_attackers += 1,
        }
    }

    /// No-op once the counter of `color` is already zero.
    pub fn decrease(&mut self, color: Color) {
        let counter = match color {
            Color::White => &mut self.white_attackers,
            Color::Black => &mut self.black_attackers,
        };
        *counter = counter.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.white_attackers = 0;
        self.black_attackers = 0;
    }
}

/// Two 8x8 grids kept in lockstep: square records and the pieces themselves.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) squares: [BoardSquare; 64],
    pub(crate) pieces: [Option<Piece>; 64],
    /// White king first, then black.
    pub(crate) kings: [Square; 2],
    pub(crate) material: Material,
}

impl Board {
    /// Board with no pieces at all. Only valid as a starting point for `put`.
    pub(crate) fn blank() -> Board {
        let mut squares = [BoardSquare::new(Square::origin()); 64];
        for square in Square::all() {
            squares[square.index()] = BoardSquare::new(square);
        }
        Board {
            squares,
            pieces: [None; 64],
            kings: [Square::origin(); 2],
            material: Material::default(),
        }
    }

    #[inline]
    pub fn square(&self, square: Square) -> &BoardSquare {
        &self.squares[square.index()]
    }

    #[inline]
    pub fn piece(&self, square: Square) -> Option<&Piece> {
        self.pieces[square.index()].as_ref()
    }

    pub fn get(&self, file: u8, rank: u8) -> Option<&Piece> {
        Square::new(file, rank).and_then(|square| self.piece(square))
    }

    pub fn iter_squares(&self) -> impl Iterator<Item = &BoardSquare> + '_ {
        self.squares.iter()
    }

    pub fn iter_pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().flatten()
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    pub fn king(&self, color: Color) -> Option<&Piece> {
        self.piece(self.king_square(color))
    }

    /// Whether the opponent covers the king of `color`. Reads the coverage counters.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.square(self.king_square(color))
            .is_attacked_by(color.opposite())
    }

    pub fn material(&self) -> Material {
        self.material
    }

    /// Every square strictly between `from` and `to` is empty, whatever would
    /// occupy it.
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        between(from, to).all(|square| self.pieces[square.index()].is_none())
    }

    /// Both grids agree on the color standing on every square.
    pub fn grids_agree(&self) -> bool {
        Square::all().all(|square| {
            let piece = self.piece(square);
            self.square(square).occupant() == piece.map(|piece| piece.color())
                && piece.map_or(true, |piece| piece.position() == square)
        })
    }

    /// Writes `piece` into both grids at `square`.
    pub(crate) fn put(&mut self, square: Square, piece: Option<Piece>) {
        let idx = square.index();
        self.squares[idx].occupant = piece.map(|piece| piece.color());
        if let Some(piece) = &piece {
            debug_assert_eq!(piece.position(), square, "Piece placed off its own square!");
            if piece.type_() == PieceType::King {
                self.kings[piece.color().index()] = square;
            }
        }
        self.pieces[idx] = piece;
    }

    /// Moves whatever stands on `from` to `to`, returning the piece it displaced.
    /// Coverage is left stale.
    pub(crate) fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let mut piece = self.pieces[from.index()].take();
        self.squares[from.index()].occupant = None;
        if let Some(piece) = piece.as_mut() {
            piece.relocate(to);
        }
        let captured = self.pieces[to.index()].take();
        self.put(to, piece);
        captured
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in 0..8u8 {
            write!(f, "{} ", 8 - rank)?;
            for file in 0..8u8 {
                let symbol = match self.get(file, rank) {
                    None => '.',
                    Some(piece) => {
                        let symbol = match piece.kind() {
                            PieceKind::Pawn { .. } => 'p',
                            PieceKind::Knight => 'n',
                            PieceKind::Bishop => 'b',
                            PieceKind::Rook { .. } => 'r',
                            PieceKind::Queen => 'q',
                            PieceKind::King { .. } => 'k',
                        };
                        match piece.color() {
                            Color::White => symbol.to_ascii_uppercase(),
                            Color::Black => symbol,
                        }
                    }
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        write!(f, "  abcdefgh")
    }
}

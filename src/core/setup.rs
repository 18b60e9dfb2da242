use crate::core::board::Board;
use crate::core::pieces::{Color, Piece, PieceType};
use crate::core::utils::Square;
use crate::definitions::SetupError;

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Initial placement of a game and the side that moves first.
#[derive(Clone, Debug, PartialEq)]
pub struct Setup {
    pieces: Vec<Piece>,
    to_move: Color,
}

impl Setup {
    pub fn empty() -> Setup {
        Setup {
            pieces: Vec::new(),
            to_move: Color::White,
        }
    }

    pub fn standard() -> Setup {
        let mut pieces = Vec::with_capacity(32);
        for color in [Color::Black, Color::White] {
            let back_rank = color.back_rank();
            let pawn_rank = (back_rank as i8 + color.forward()) as u8;
            for (file, piece_type) in (0..8u8).zip(BACK_RANK) {
                pieces.extend(
                    [(piece_type, back_rank), (PieceType::Pawn, pawn_rank)]
                        .into_iter()
                        .filter_map(|(piece_type, rank)| {
                            Square::new(file, rank)
                                .map(|square| Piece::new(piece_type, color, square))
                        }),
                );
            }
        }
        Setup {
            pieces,
            to_move: Color::White,
        }
    }

    /// Adds a piece that has never moved.
    pub fn place(mut self, piece_type: PieceType, color: Color, square: Square) -> Setup {
        self.pieces.push(Piece::new(piece_type, color, square));
        self
    }

    /// Adds a piece whose moved flag is already set: a pawn without its double
    /// step, or a king or rook that can no longer castle.
    pub fn place_moved(mut self, piece_type: PieceType, color: Color, square: Square) -> Setup {
        let mut piece = Piece::new(piece_type, color, square);
        piece.mark_moved();
        self.pieces.push(piece);
        self
    }

    pub fn to_move(mut self, color: Color) -> Setup {
        self.to_move = color;
        self
    }

    pub fn side_to_move(&self) -> Color {
        self.to_move
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Lays the pieces out and computes their coverage.
    pub fn build(&self) -> Result<Board, SetupError> {
        let mut board = Board::blank();
        let mut kings = [0usize; 2];
        for piece in &self.pieces {
            let square = piece.position();
            if board.piece(square).is_some() {
                return Err(SetupError::Occupied(square));
            }
            if piece.type_() == PieceType::King {
                let count = &mut kings[piece.color().index()];
                *count += 1;
                if *count > 1 {
                    return Err(SetupError::DuplicateKing(piece.color()));
                }
            }
            board.put(square, Some(*piece));
        }
        for color in [Color::White, Color::Black] {
            if kings[color.index()] == 0 {
                return Err(SetupError::MissingKing(color));
            }
        }
        board.recompute_coverage();
        Ok(board)
    }
}

impl Default for Setup {
    fn default() -> Self {
        Setup::standard()
    }
}

impl Default for Board {
    fn default() -> Self {
        let mut board = Board::blank();
        for piece in Setup::standard().pieces {
            board.put(piece.position(), Some(piece));
        }
        board.recompute_coverage();
        board
    }
}

use std::fmt::{self, Display};

use crate::core::board::BoardSquare;
use crate::core::utils::{delta, distance, is_in_diagonal_line, is_in_straight_line, Square};

#[derive(PartialEq, Eq, Debug, Default, Clone, Copy, Hash)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank step of a pawn of this color.
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn back_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Rank on which this color's pawns promote.
    pub fn promotion_rank(self) -> u8 {
        self.opposite().back_rank()
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(if self == &Self::White {
            "White"
        } else {
            "Black"
        })
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Material worth in pawns. The king is priceless and counts as zero.
    pub fn worth(self) -> u32 {
        match self {
            PieceType::Pawn => 1,
            PieceType::Knight => 3,
            PieceType::Bishop => 3,
            PieceType::Rook => 5,
            PieceType::Queen => 9,
            PieceType::King => 0,
        }
    }
}

impl Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            PieceType::Pawn => "Pawn",
            PieceType::Knight => "Knight",
            PieceType::Bishop => "Bishop",
            PieceType::Rook => "Rook",
            PieceType::Queen => "Queen",
            PieceType::King => "King",
        })
    }
}

/// What a pawn may turn into on the far rank.
#[derive(PartialEq, Eq, Debug, Default, Clone, Copy, Hash)]
pub enum Promotion {
    #[default]
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl From<Promotion> for PieceType {
    fn from(value: Promotion) -> Self {
        match value {
            Promotion::Queen => PieceType::Queen,
            Promotion::Rook => PieceType::Rook,
            Promotion::Bishop => PieceType::Bishop,
            Promotion::Knight => PieceType::Knight,
        }
    }
}

/// Piece kind together with the state only some kinds carry.
///
/// `moved` drives the pawn double step and castling eligibility.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum PieceKind {
    Pawn { moved: bool },
    Rook { moved: bool },
    Knight,
    Bishop,
    Queen,
    King { moved: bool },
}

impl PieceKind {
    pub fn fresh(piece_type: PieceType) -> PieceKind {
        match piece_type {
            PieceType::Pawn => PieceKind::Pawn { moved: false },
            PieceType::Knight => PieceKind::Knight,
            PieceType::Bishop => PieceKind::Bishop,
            PieceType::Rook => PieceKind::Rook { moved: false },
            PieceType::Queen => PieceKind::Queen,
            PieceType::King => PieceKind::King { moved: false },
        }
    }

    pub fn type_(self) -> PieceType {
        match self {
            PieceKind::Pawn { .. } => PieceType::Pawn,
            PieceKind::Rook { .. } => PieceType::Rook,
            PieceKind::Knight => PieceType::Knight,
            PieceKind::Bishop => PieceType::Bishop,
            PieceKind::Queen => PieceType::Queen,
            PieceKind::King { .. } => PieceType::King,
        }
    }

    pub fn has_moved(self) -> bool {
        match self {
            PieceKind::Pawn { moved } | PieceKind::Rook { moved } | PieceKind::King { moved } => {
                moved
            }
            _ => false,
        }
    }

    fn mark_moved(&mut self) {
        match self {
            PieceKind::Pawn { moved } | PieceKind::Rook { moved } | PieceKind::King { moved } => {
                *moved = true
            }
            _ => (),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    position: Square,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color, position: Square) -> Piece {
        Piece {
            kind: PieceKind::fresh(piece_type),
            color,
            position,
        }
    }

    /// Piece created by promoting `pawn`. It stands on the pawn's square and
    /// counts as moved.
    pub fn promoted(pawn: &Piece, choice: Promotion) -> Piece {
        let mut piece = Piece::new(choice.into(), pawn.color, pawn.position);
        piece.kind.mark_moved();
        piece
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn type_(&self) -> PieceType {
        self.kind.type_()
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn position(&self) -> Square {
        self.position
    }

    pub fn worth(&self) -> u32 {
        self.type_().worth()
    }

    pub fn has_moved(&self) -> bool {
        self.kind.has_moved()
    }

    pub(crate) fn mark_moved(&mut self) {
        self.kind.mark_moved()
    }

    /// Moves the piece to `to`, setting its moved flag.
    pub(crate) fn relocate(&mut self, to: Square) {
        self.position = to;
        self.kind.mark_moved();
    }

    /// Whether `target` lies on this piece's movement pattern.
    ///
    /// Pure geometry plus occupancy of the destination: intermediate squares are
    /// checked separately (see `Board::is_path_clear`). A king additionally refuses
    /// squares the opponent covers, and accepts the two-file castling step while
    /// it has never moved; the engine decides whether that step is a legal castle.
    pub fn is_geometrically_valid(&self, target: &BoardSquare) -> bool {
        let to = target.position();
        if to == self.position || target.occupant() == Some(self.color) {
            return false;
        }
        let (file_diff, rank_diff) = delta(self.position, to);
        match self.kind {
            PieceKind::Pawn { moved } => {
                let forward = self.color.forward();
                match target.occupant() {
                    None => {
                        file_diff == 0
                            && (rank_diff == forward || (!moved && rank_diff == 2 * forward))
                    }
                    Some(_) => file_diff.abs() == 1 && rank_diff == forward,
                }
            }
            PieceKind::Rook { .. } => is_in_straight_line(self.position, to),
            PieceKind::Bishop => is_in_diagonal_line(self.position, to),
            PieceKind::Queen => {
                is_in_straight_line(self.position, to) || is_in_diagonal_line(self.position, to)
            }
            PieceKind::Knight => {
                matches!((file_diff.abs(), rank_diff.abs()), (1, 2) | (2, 1))
            }
            PieceKind::King { moved } => {
                if target.is_attacked_by(self.color.opposite()) {
                    return false;
                }
                distance(self.position, to) == 1
                    || (!moved && rank_diff == 0 && file_diff.abs() == 2)
            }
        }
    }

    /// Whether the squares between here and `to` must be empty for the move.
    pub fn needs_clear_path(&self, to: Square) -> bool {
        match self.kind {
            PieceKind::Rook { .. } | PieceKind::Bishop | PieceKind::Queen => true,
            PieceKind::Pawn { .. } => distance(self.position, to) == 2,
            PieceKind::Knight | PieceKind::King { .. } => false,
        }
    }

    pub fn is_castling_step(&self, to: Square) -> bool {
        let (file_diff, rank_diff) = delta(self.position, to);
        matches!(self.kind, PieceKind::King { .. }) && rank_diff == 0 && file_diff.abs() == 2
    }
}

use std::fmt::{self, Display};

use crate::core::pieces::{Color, Piece, PieceType, Promotion};
use crate::core::utils::Square;

#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    pub kind: PieceType,
    pub color: Color,
    /// The piece currently picked up by the side to move.
    pub selected: bool,
    /// A king standing in check.
    pub impose_check: bool,
    /// The square took part in the last committed move.
    pub last_move: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Figure(Figure),
}

/// Half-steps of a turn: choosing a piece, then choosing where it goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    WhiteSelecting,
    WhitePlacing,
    BlackSelecting,
    BlackPlacing,
}

impl Phase {
    pub fn selecting(color: Color) -> Phase {
        match color {
            Color::White => Phase::WhiteSelecting,
            Color::Black => Phase::BlackSelecting,
        }
    }

    pub fn placing(color: Color) -> Phase {
        match color {
            Color::White => Phase::WhitePlacing,
            Color::Black => Phase::BlackPlacing,
        }
    }

    /// The side whose turn it is.
    pub fn side(self) -> Color {
        match self {
            Phase::WhiteSelecting | Phase::WhitePlacing => Color::White,
            Phase::BlackSelecting | Phase::BlackPlacing => Color::Black,
        }
    }

    pub fn is_placing(self) -> bool {
        matches!(self, Phase::WhitePlacing | Phase::BlackPlacing)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GameStatus {
    #[default]
    Normal,
    Check,
    Checkmate,
    Stalemate,
    Draw,
    Resign,
    TimeExpired,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Normal | GameStatus::Check)
    }
}

/// Sum of piece worth still on the board, per color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Material {
    pub white: u32,
    pub black: u32,
}

impl Material {
    pub fn of(&self, color: Color) -> u32 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub(crate) fn add(&mut self, color: Color, worth: u32) {
        match color {
            Color::White => self.white += worth,
            Color::Black => self.black += worth,
        }
    }

    /// The side ahead on material and by how much, `None` when level.
    pub fn lead(&self) -> Option<(Color, u32)> {
        if self.white > self.black {
            Some((Color::White, self.white - self.black))
        } else if self.black > self.white {
            Some((Color::Black, self.black - self.white))
        } else {
            None
        }
    }
}

/// Recoverable rejections of a request. None of them touch the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum MoveError {
    #[error("Invalid move!")]
    InvalidMove,
    #[error("King in check!")]
    SelfCheck,
    #[error("Cannot capture King!")]
    CannotCaptureKing,
    #[error("Castling unavailable!")]
    CastlingUnavailable,
    #[error("Game already ended!")]
    GameAlreadyEnded,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("no {0} king on the board")]
    MissingKing(Color),
    #[error("more than one {0} king on the board")]
    DuplicateKing(Color),
    #[error("square {0} is occupied twice")]
    Occupied(Square),
}

/// Notifications for the presentation layer (sound, animation, move lists).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Moved {
        from: Square,
        to: Square,
        captured: Option<PieceType>,
    },
    Castled {
        color: Color,
        king_from: Square,
        king_to: Square,
    },
    Promoted {
        square: Square,
        to: Promotion,
    },
    /// The given side's king has just come under attack.
    Check(Color),
    Checkmate {
        winner: Color,
    },
    Stalemate,
    Resigned(Color),
    DrawAgreed,
    TimeExpired(Color),
}

/// Capabilities the engine calls out to while processing a request.
///
/// Calls are synchronous: the engine waits for the answer. A GUI host blocks its
/// own dialog layer, never the engine.
pub trait Collaborator {
    fn choose_promotion(&mut self, pawn: &Piece) -> Promotion;
    fn confirm_draw(&mut self) -> bool;
    fn notify(&mut self, _event: &GameEvent) {}
}

/// Collaborator for hosts without dialogs: fixed answers, events ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeadlessCollaborator {
    pub promotion: Promotion,
    pub accept_draw: bool,
}

impl Collaborator for HeadlessCollaborator {
    fn choose_promotion(&mut self, _pawn: &Piece) -> Promotion {
        self.promotion
    }

    fn confirm_draw(&mut self) -> bool {
        self.accept_draw
    }
}

impl<T: Collaborator + ?Sized> Collaborator for &mut T {
    fn choose_promotion(&mut self, pawn: &Piece) -> Promotion {
        (**self).choose_promotion(pawn)
    }

    fn confirm_draw(&mut self) -> bool {
        (**self).confirm_draw()
    }

    fn notify(&mut self, event: &GameEvent) {
        (**self).notify(event)
    }
}

/// What a `select_or_move` request left behind.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveOutcome {
    pub status: GameStatus,
    pub phase: Phase,
    /// The rejection message when `error` is set, the status message otherwise.
    pub message: String,
    pub error: Option<MoveError>,
    pub king_in_check: Option<Color>,
    pub material: Material,
    /// `(from, to)` of the king's (or piece's) move if this request committed one.
    pub committed: Option<(Square, Square)>,
}

impl Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.message)
    }
}

pub trait MatchInterface {
    fn current_board(&self) -> Vec<Vec<Cell>>;
    fn cell(&self, file: usize, rank: usize) -> Option<Cell>;
    fn possible_moves(&self, file: usize, rank: usize) -> Option<Vec<Square>>;
    fn select_or_move(&mut self, file: usize, rank: usize) -> MoveOutcome;
    // info
    fn current_player(&self) -> Color;
    fn checked(&self) -> bool;
    fn game_ended(&self) -> bool;
}

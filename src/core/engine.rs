use log::{debug, trace};

use crate::core::board::Board;
use crate::core::pieces::{Color, Piece, PieceKind, PieceType, Promotion};
use crate::core::utils::{between, Square};
use crate::definitions::MoveError;

/// What an accepted (or probed) move did to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub from: Square,
    pub to: Square,
    pub captured: Option<Piece>,
    /// `(from, to)` of the rook when the move was a castle.
    pub castle: Option<(Square, Square)>,
    /// The moved pawn reached the far rank and waits for its promotion.
    pub promotes: bool,
    /// The mover's own king is attacked after the move. Only ever true for
    /// test-only probes; a committed move never leaves it set.
    pub in_check_after: bool,
}

/// Cells touched by a tentative move, restored verbatim on revert.
struct Undo {
    cells: Vec<(Square, Option<Piece>)>,
    kings: [Square; 2],
}

impl Board {
    fn save(&self, squares: &[Square]) -> Undo {
        Undo {
            cells: squares
                .iter()
                .map(|square| (*square, self.piece(*square).copied()))
                .collect(),
            kings: self.kings,
        }
    }

    fn restore(&mut self, undo: Undo) {
        for (square, piece) in undo.cells {
            self.put(square, piece);
        }
        self.kings = undo.kings;
        self.recompute_coverage();
    }

    /// Pseudo-legality of a plain (non-castling) move: geometry, destination
    /// occupancy and path clearance. Does not look at self-check.
    pub fn validate(&self, from: Square, to: Square) -> Result<Piece, MoveError> {
        let piece = *self.piece(from).ok_or(MoveError::InvalidMove)?;
        if piece.is_castling_step(to) {
            // castles only go through `attempt_castle`
            return Err(MoveError::InvalidMove);
        }
        let target = self.square(to);
        if let Some(victim) = self.piece(to) {
            if victim.color() == piece.color() {
                return Err(MoveError::InvalidMove);
            }
            if victim.type_() == PieceType::King {
                return Err(MoveError::CannotCaptureKing);
            }
        }
        if !piece.is_geometrically_valid(target) {
            return Err(MoveError::InvalidMove);
        }
        if piece.needs_clear_path(to) && !self.is_path_clear(from, to) {
            return Err(MoveError::InvalidMove);
        }
        Ok(piece)
    }

    /// Tentatively plays `from -> to`, then keeps or reverts it.
    ///
    /// The move is reverted when `test_only` is set or when it leaves the mover's
    /// king attacked; in the latter case a committing call fails with
    /// `SelfCheck`. A reverted board is identical to the one before the call,
    /// coverage counters included.
    pub fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        test_only: bool,
    ) -> Result<MoveReport, MoveError> {
        let piece = self.validate(from, to)?;
        let color = piece.color();
        let undo = self.save(&[from, to]);

        let captured = self.relocate(from, to);
        self.recompute_coverage();
        let in_check_after = self.is_in_check(color);

        if test_only || in_check_after {
            self.restore(undo);
            trace!("Reverted {from}-{to}, king attacked: {in_check_after}");
            if !test_only {
                return Err(MoveError::SelfCheck);
            }
        } else {
            debug!("{color} {} {from}-{to}", piece.type_());
        }
        Ok(MoveReport {
            from,
            to,
            captured,
            castle: None,
            promotes: matches!(piece.kind(), PieceKind::Pawn { .. })
                && to.rank() == color.promotion_rank(),
            in_check_after,
        })
    }

    /// Rook square and rook destination for a castle of the king on `from`
    /// toward `to`.
    fn castling_rook(from: Square, to: Square) -> Option<(Square, Square)> {
        let toward_h = to.file() > from.file();
        let rook_file = if toward_h { 7 } else { 0 };
        let rook_from = Square::new(rook_file, from.rank())?;
        let rook_to = from.offset((if toward_h { 1 } else { -1 }, 0))?;
        Some((rook_from, rook_to))
    }

    /// Everything a castle requires, checked before the board is touched.
    fn validate_castle(
        &self,
        from: Square,
        to: Square,
    ) -> Result<(Color, Square, Square), MoveError> {
        let king = *self.piece(from).ok_or(MoveError::InvalidMove)?;
        if !king.is_castling_step(to) {
            return Err(MoveError::InvalidMove);
        }
        if king.has_moved() {
            return Err(MoveError::CastlingUnavailable);
        }
        let color = king.color();
        let (rook_from, rook_to) =
            Board::castling_rook(from, to).ok_or(MoveError::CastlingUnavailable)?;
        match self.piece(rook_from) {
            Some(rook)
                if rook.color() == color
                    && matches!(rook.kind(), PieceKind::Rook { moved: false }) => {}
            _ => return Err(MoveError::CastlingUnavailable),
        }
        // the king lands strictly between its square and the rook's
        if !between(from, rook_from).any(|square| square == to)
            || !between(from, rook_from).all(|square| self.piece(square).is_none())
        {
            return Err(MoveError::CastlingUnavailable);
        }
        let opponent = color.opposite();
        if [from, rook_to, to]
            .into_iter()
            .any(|square| self.square(square).is_attacked_by(opponent))
        {
            return Err(MoveError::CastlingUnavailable);
        }
        Ok((color, rook_from, rook_to))
    }

    /// Castles the king on `from` to `to`, moving the matching rook alongside.
    /// Both relocations happen or neither does.
    pub fn attempt_castle(
        &mut self,
        from: Square,
        to: Square,
        test_only: bool,
    ) -> Result<MoveReport, MoveError> {
        let (color, rook_from, rook_to) = self.validate_castle(from, to)?;
        let report = MoveReport {
            from,
            to,
            captured: None,
            castle: Some((rook_from, rook_to)),
            promotes: false,
            in_check_after: false,
        };
        if test_only {
            return Ok(report);
        }
        let undo = self.save(&[from, to, rook_from, rook_to]);
        self.relocate(from, to);
        self.relocate(rook_from, rook_to);
        self.recompute_coverage();
        if self.is_in_check(color) {
            self.restore(undo);
            return Err(MoveError::SelfCheck);
        }
        debug!("{color} castles {from}-{to}, rook {rook_from}-{rook_to}");
        Ok(report)
    }

    /// Entry point for any move of the piece on `from`: a king's two-file step is
    /// a castle, everything else a plain move.
    pub fn try_move(
        &mut self,
        from: Square,
        to: Square,
        test_only: bool,
    ) -> Result<MoveReport, MoveError> {
        let castling = self.piece(from).map(|piece| piece.is_castling_step(to));
        match castling {
            Some(true) => self.attempt_castle(from, to, test_only),
            Some(false) => self.attempt_move(from, to, test_only),
            None => Err(MoveError::InvalidMove),
        }
    }

    /// Replaces the pawn on `square` with a fresh piece of the chosen type.
    pub fn promote(&mut self, square: Square, choice: Promotion) -> Result<Piece, MoveError> {
        let pawn = match self.piece(square) {
            Some(pawn) if pawn.type_() == PieceType::Pawn => *pawn,
            _ => return Err(MoveError::InvalidMove),
        };
        let promoted = Piece::promoted(&pawn, choice);
        self.put(square, Some(promoted));
        self.recompute_coverage();
        debug!("{} pawn on {square} promoted to {}", pawn.color(), promoted.type_());
        Ok(promoted)
    }

    /// Destinations the piece on `from` can legally reach, in row-major order.
    ///
    /// Each pseudo-legal destination is probed with a test-only move; the board
    /// ends up exactly as it started.
    pub fn legal_destinations(&mut self, from: Square) -> Vec<Square> {
        if self.piece(from).is_none() {
            return Vec::new();
        }
        Square::all()
            .filter(|to| {
                self.try_move(from, *to, true)
                    .map(|report| !report.in_check_after)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Whether `color` has at least one move that keeps its king safe. Stops at
    /// the first one found.
    pub fn has_legal_move(&mut self, color: Color) -> bool {
        let own: Vec<Square> = self
            .iter_pieces()
            .filter(|piece| piece.color() == color)
            .map(|piece| piece.position())
            .collect();
        own.into_iter().any(|from| {
            Square::all().any(|to| {
                self.try_move(from, to, true)
                    .map(|report| !report.in_check_after)
                    .unwrap_or(false)
            })
        })
    }
}

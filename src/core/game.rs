use log::{debug, info, warn};

use crate::core::board::Board;
use crate::core::engine::MoveReport;
use crate::core::pieces::{Color, Piece, PieceType};
use crate::core::setup::Setup;
use crate::core::utils::Square;
use crate::definitions::{
    Cell, Collaborator, Figure, GameEvent, GameStatus, HeadlessCollaborator, Material,
    MatchInterface, MoveError, MoveOutcome, Phase, SetupError,
};

pub fn ui_board(board: &Board) -> Vec<Vec<Cell>> {
    (0..8u8)
        .map(|rank| {
            (0..8u8)
                .map(|file| match board.get(file, rank) {
                    None => Cell::Empty,
                    Some(piece) => Cell::Figure(Figure {
                        kind: piece.type_(),
                        color: piece.color(),
                        selected: false,
                        impose_check: false,
                        last_move: false,
                    }),
                })
                .collect()
        })
        .collect()
}

/// Interaction state that lives beside the board.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    phase: Phase,
    selected: Option<Square>,
    status: GameStatus,
    winner: Option<Color>,
    king_in_check: Option<Color>,
    last_move: Option<(Square, Square)>,
    message: String,
}

impl GameState {
    fn new(to_move: Color) -> GameState {
        GameState {
            phase: Phase::selecting(to_move),
            selected: None,
            status: GameStatus::Normal,
            winner: None,
            king_in_check: None,
            last_move: None,
            message: "No error".to_string(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn king_in_check(&self) -> Option<Color> {
        self.king_in_check
    }

    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One game: the board, the interaction state and the host's collaborator.
#[derive(Debug, Clone)]
pub struct Game<C: Collaborator = HeadlessCollaborator> {
    board: Board,
    state: GameState,
    collaborator: C,
}

/// A game from the standard position with a headless collaborator.
pub fn new_game() -> Game {
    Game::new()
}

impl Game {
    pub fn new() -> Game {
        Game::with_collaborator(HeadlessCollaborator::default())
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl<C: Collaborator> Game<C> {
    pub fn with_collaborator(collaborator: C) -> Game<C> {
        Game {
            board: Board::default(),
            state: GameState::new(Color::White),
            collaborator,
        }
    }

    /// Starts from a custom placement. Check, checkmate and stalemate of the side
    /// to move are derived right away.
    pub fn from_setup(setup: &Setup, collaborator: C) -> Result<Game<C>, SetupError> {
        let board = setup.build()?;
        let mut game = Game {
            board,
            state: GameState::new(setup.side_to_move()),
            collaborator,
        };
        game.derive_status();
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn collaborator(&self) -> &C {
        &self.collaborator
    }

    pub fn collaborator_mut(&mut self) -> &mut C {
        &mut self.collaborator
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn winner(&self) -> Option<Color> {
        self.state.winner
    }

    pub fn selected(&self) -> Option<&Piece> {
        self.state.selected.and_then(|square| self.board.piece(square))
    }

    pub fn king_in_check(&self) -> Option<Color> {
        self.state.king_in_check
    }

    pub fn material(&self) -> Material {
        self.board.material()
    }

    pub fn is_over(&self) -> bool {
        self.state.status.is_terminal()
    }

    pub fn last_message(&self) -> &str {
        &self.state.message
    }

    /// Legal destinations of the piece on `square`, probed on a copy of the board.
    pub fn legal_destinations(&self, square: Square) -> Vec<Square> {
        let mut board = self.board.clone();
        board.legal_destinations(square)
    }

    /// Single entry point of the turn state machine: a click on `(file, rank)`.
    pub fn select_or_move(&mut self, file: usize, rank: usize) -> MoveOutcome {
        if self.is_over() {
            warn!("Click on ({file}, {rank}) after the game ended");
            return self.reject(MoveError::GameAlreadyEnded);
        }
        let Some(square) = u8::try_from(file)
            .ok()
            .zip(u8::try_from(rank).ok())
            .and_then(|(file, rank)| Square::new(file, rank))
        else {
            debug!("Click on ({file}, {rank}) is off the board");
            self.state.message = MoveError::InvalidMove.to_string();
            return self.outcome(Some(MoveError::InvalidMove), None);
        };
        let side = self.state.phase.side();
        let clicked = self.board.piece(square).copied();

        if !self.state.phase.is_placing() {
            if clicked.is_some_and(|piece| piece.color() == side) {
                self.select(square);
            }
            return self.outcome(None, None);
        }

        match clicked {
            Some(piece) if piece.type_() == PieceType::King && piece.color() != side => {
                self.reject(MoveError::CannotCaptureKing)
            }
            Some(piece) if piece.color() == side => {
                self.select(square);
                self.outcome(None, None)
            }
            _ => {
                let Some(from) = self.state.selected else {
                    return self.reject(MoveError::InvalidMove);
                };
                match self.board.try_move(from, square, false) {
                    Ok(report) => {
                        self.commit(report);
                        self.outcome(None, Some((from, square)))
                    }
                    Err(err) => self.reject(err),
                }
            }
        }
    }

    /// Ends the game in favor of the opponent of `color`.
    pub fn resign(&mut self, color: Color) -> Result<(), MoveError> {
        self.ensure_running()?;
        self.finish(GameStatus::Resign, Some(color.opposite()));
        self.emit(GameEvent::Resigned(color));
        Ok(())
    }

    /// Asks the collaborator whether the draw offer is accepted.
    pub fn offer_draw(&mut self) -> Result<bool, MoveError> {
        self.ensure_running()?;
        let accepted = self.collaborator.confirm_draw();
        if accepted {
            self.finish(GameStatus::Draw, None);
            self.emit(GameEvent::DrawAgreed);
        } else {
            debug!("Draw offer declined");
        }
        Ok(accepted)
    }

    /// Placeholder for a clock: `color` ran out of time and loses.
    pub fn time_expired(&mut self, color: Color) -> Result<(), MoveError> {
        self.ensure_running()?;
        self.finish(GameStatus::TimeExpired, Some(color.opposite()));
        self.emit(GameEvent::TimeExpired(color));
        Ok(())
    }

    pub fn status_message(&self) -> String {
        let winner = self.state.winner.unwrap_or_default();
        match self.state.status {
            GameStatus::Checkmate => format!("Checkmate! {winner} wins."),
            GameStatus::Stalemate => "Draw by stalemate.".to_string(),
            GameStatus::Draw => "Draw agreed.".to_string(),
            GameStatus::Check => format!(
                "{} king in check!",
                self.state.king_in_check.unwrap_or_default()
            ),
            GameStatus::Resign => format!("{} resigns! {winner} wins.", winner.opposite()),
            GameStatus::TimeExpired => {
                format!("Time up! {} loses on time.", winner.opposite())
            }
            GameStatus::Normal => match self.material().lead() {
                Some((color, points)) => {
                    format!("{color} is ahead by {points} points of material.")
                }
                None => "Material is level.".to_string(),
            },
        }
    }

    pub fn turn_message(&self) -> String {
        match self.selected() {
            Some(piece) if self.state.phase.is_placing() => {
                format!("{} {} at {}.", piece.color(), piece.type_(), piece.position())
            }
            _ => format!("{}'s turn!", self.state.phase.side()),
        }
    }

    pub fn current_board(&self) -> Vec<Vec<Cell>> {
        let mut cells = ui_board(&self.board);
        let mut mark = |square: Square, apply: &dyn Fn(&mut Figure)| {
            if let Cell::Figure(figure) =
                &mut cells[square.rank() as usize][square.file() as usize]
            {
                apply(figure);
            }
        };
        if let Some(square) = self.state.selected {
            mark(square, &|figure| figure.selected = true);
        }
        if let Some(color) = self.state.king_in_check {
            mark(self.board.king_square(color), &|figure| figure.impose_check = true);
        }
        if let Some((_, to)) = self.state.last_move {
            mark(to, &|figure| figure.last_move = true);
        }
        cells
    }

    fn select(&mut self, square: Square) {
        debug!("Selected {square}");
        self.state.selected = Some(square);
        self.state.phase = Phase::placing(self.state.phase.side());
    }

    fn ensure_running(&self) -> Result<(), MoveError> {
        if self.is_over() {
            warn!("Request rejected, the game has already ended");
            Err(MoveError::GameAlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn emit(&mut self, event: GameEvent) {
        self.collaborator.notify(&event);
    }

    /// Drops the selection and hands the turn back to choosing a piece.
    fn reject(&mut self, err: MoveError) -> MoveOutcome {
        debug!("Request rejected: {err:?}");
        if !self.is_over() {
            self.state.phase = Phase::selecting(self.state.phase.side());
            self.state.selected = None;
        }
        self.state.message = err.to_string();
        self.outcome(Some(err), None)
    }

    fn commit(&mut self, report: MoveReport) {
        let side = self.state.phase.side();
        match report.castle {
            Some(_) => self.emit(GameEvent::Castled {
                color: side,
                king_from: report.from,
                king_to: report.to,
            }),
            None => self.emit(GameEvent::Moved {
                from: report.from,
                to: report.to,
                captured: report.captured.map(|piece| piece.type_()),
            }),
        }
        if report.promotes {
            self.promote(report.to);
        }
        self.state.selected = None;
        self.state.last_move = Some((report.from, report.to));
        self.state.phase = Phase::selecting(side.opposite());
        self.derive_status();
    }

    fn promote(&mut self, square: Square) {
        let Some(pawn) = self.board.piece(square).copied() else {
            return;
        };
        let choice = self.collaborator.choose_promotion(&pawn);
        if self.board.promote(square, choice).is_ok() {
            self.emit(GameEvent::Promoted { square, to: choice });
        }
    }

    /// Check, checkmate or stalemate of the side to move.
    fn derive_status(&mut self) {
        let to_move = self.state.phase.side();
        let was_in_check = self.state.king_in_check == Some(to_move);
        let in_check = self.board.is_in_check(to_move);
        let can_move = self.board.has_legal_move(to_move);
        self.state.king_in_check = in_check.then_some(to_move);
        match (in_check, can_move) {
            (true, true) => {
                self.state.status = GameStatus::Check;
                if !was_in_check {
                    self.emit(GameEvent::Check(to_move));
                }
            }
            (true, false) => {
                let winner = to_move.opposite();
                self.finish(GameStatus::Checkmate, Some(winner));
                self.emit(GameEvent::Checkmate { winner });
            }
            (false, true) => self.state.status = GameStatus::Normal,
            (false, false) => {
                self.finish(GameStatus::Stalemate, None);
                self.emit(GameEvent::Stalemate);
            }
        }
    }

    fn finish(&mut self, status: GameStatus, winner: Option<Color>) {
        self.state.status = status;
        self.state.winner = winner;
        self.state.selected = None;
        self.state.phase = Phase::selecting(self.state.phase.side());
        self.state.message = self.status_message();
        info!("Game over: {}", self.state.message);
    }

    fn outcome(
        &self,
        error: Option<MoveError>,
        committed: Option<(Square, Square)>,
    ) -> MoveOutcome {
        MoveOutcome {
            status: self.state.status,
            phase: self.state.phase,
            message: match error {
                Some(err) => err.to_string(),
                None => self.status_message(),
            },
            error,
            king_in_check: self.state.king_in_check,
            material: self.material(),
            committed,
        }
    }
}

impl<C: Collaborator> MatchInterface for Game<C> {
    fn current_board(&self) -> Vec<Vec<Cell>> {
        Game::current_board(self)
    }

    fn cell(&self, file: usize, rank: usize) -> Option<Cell> {
        self.current_board()
            .get(rank)
            .and_then(|row| row.get(file))
            .cloned()
    }

    fn possible_moves(&self, file: usize, rank: usize) -> Option<Vec<Square>> {
        let square = Square::new(u8::try_from(file).ok()?, u8::try_from(rank).ok()?)?;
        let piece = self.board.piece(square)?;
        if self.is_over() || piece.color() != self.current_player() {
            return None;
        }
        let moves = self.legal_destinations(square);
        if moves.is_empty() {
            None
        } else {
            Some(moves)
        }
    }

    fn select_or_move(&mut self, file: usize, rank: usize) -> MoveOutcome {
        Game::select_or_move(self, file, rank)
    }

    fn current_player(&self) -> Color {
        self.state.phase.side()
    }

    fn checked(&self) -> bool {
        self.state.king_in_check.is_some()
    }

    fn game_ended(&self) -> bool {
        self.is_over()
    }
}

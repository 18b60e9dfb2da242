pub mod core;
pub mod definitions;

// module re-exports
pub use crate::core::board::{Board, BoardSquare};
pub use crate::core::engine::MoveReport;
pub use crate::core::game::{new_game, Game, GameState};
pub use crate::core::pieces::{Color, Piece, PieceKind, PieceType, Promotion};
pub use crate::core::setup::Setup;
pub use crate::core::utils::{ParseSquareError, Square};
pub use definitions::{
    Cell, Collaborator, Figure, GameEvent, GameStatus, HeadlessCollaborator, Material,
    MatchInterface, MoveError, MoveOutcome, Phase, SetupError,
};

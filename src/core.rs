pub mod board;
pub mod coverage;
pub mod engine;
pub mod game;
pub mod pieces;
pub mod setup;
pub mod utils;

//! Board types consumed by the accumulator cache: bitboards, squares, and piece placement.

mod bitboard;
mod board;
mod color;
mod error;
mod fen;
mod piece_kind;
mod square;

pub use bitboard::Bitboard;
pub use board::Board;
pub use color::Color;
pub use error::{BoardError, FenError};
pub use fen::STARTING_FEN;
pub use piece_kind::PieceKind;
pub use square::Square;

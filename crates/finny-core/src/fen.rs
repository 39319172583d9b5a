//! FEN parsing and serialization for [`Board`].
//!
//! Only piece placement and the active color matter to the accumulator, so
//! castling, en passant and the move counters are accepted but not stored.

use std::fmt;
use std::str::FromStr;

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::color::Color;
use crate::error::FenError;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl FromStr for Board {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Board, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let [placement, active, ..] = fields[..] else {
            return Err(FenError::MissingFields {
                found: fields.len(),
            });
        };

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }

        let mut pieces = [Bitboard::EMPTY; PieceKind::COUNT];
        let mut sides = [Bitboard::EMPTY; Color::COUNT];

        // FEN ranks run from 8 down to 1
        for (rank_index, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_index as u8;
            let mut file: u8 = 0;

            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(FenError::InvalidPieceChar { character: c });
                    }
                    file += digit as u8;
                    continue;
                }

                let kind = PieceKind::from_fen_char(c)
                    .ok_or(FenError::InvalidPieceChar { character: c })?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let sq = Square::from_coords(file, rank).ok_or(FenError::BadRankLength {
                    rank_index,
                    length: file as usize + 1,
                })?;

                pieces[kind.index()] |= sq.bitboard();
                sides[color.index()] |= sq.bitboard();
                file += 1;
            }

            if file != 8 {
                return Err(FenError::BadRankLength {
                    rank_index,
                    length: file as usize,
                });
            }
        }

        let side_to_move = match active {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidColor {
                    found: other.to_string(),
                });
            }
        };

        let board = Board::from_raw(pieces, sides, side_to_move);
        board.validate()?;
        Ok(board)
    }
}

/// Writes the placement and active color fields.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0u8..8).rev() {
            let mut empty = 0u8;
            for file in 0u8..8 {
                let piece = Square::from_coords(file, rank)
                    .and_then(|sq| Some((self.piece_on(sq)?, self.color_on(sq)?)));
                match piece {
                    Some((kind, color)) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        let c = match color {
                            Color::White => kind.fen_char().to_ascii_uppercase(),
                            Color::Black => kind.fen_char(),
                        };
                        write!(f, "{c}")?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 0 {
                write!(f, "/")?;
            }
        }
        write!(f, " {}", self.side_to_move())
    }
}

#[cfg(test)]
mod tests {
    use super::STARTING_FEN;
    use crate::board::Board;
    use crate::color::Color;
    use crate::error::FenError;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    #[test]
    fn starting_fen_matches_constructor() {
        let from_fen: Board = STARTING_FEN.parse().unwrap();
        assert_eq!(from_fen, Board::starting_position());
    }

    #[test]
    fn display_writes_placement_and_color() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b";
        let board: Board = format!("{fen} KQkq - 0 1").parse().unwrap();
        assert_eq!(board.to_string(), fen);
        assert_eq!(board.side_to_move(), Color::Black);
    }

    #[test]
    fn trailing_fields_are_optional() {
        let board: Board = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w".parse().unwrap();
        assert_eq!(board.king_square(Color::White), Square::A5);
        assert_eq!(board.piece_on(Square::H5), Some(PieceKind::Rook));
    }

    #[test]
    fn error_missing_fields() {
        let result = "8/8/8/8/8/8/8/8".parse::<Board>();
        assert_eq!(result, Err(FenError::MissingFields { found: 1 }));
    }

    #[test]
    fn error_invalid_piece_char() {
        let result = "rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w".parse::<Board>();
        assert_eq!(result, Err(FenError::InvalidPieceChar { character: 'X' }));
    }

    #[test]
    fn error_bad_rank_length() {
        let short = "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w".parse::<Board>();
        assert!(matches!(short, Err(FenError::BadRankLength { rank_index: 1, length: 7 })));
        let long = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNRR w".parse::<Board>();
        assert!(matches!(long, Err(FenError::BadRankLength { rank_index: 7, .. })));
    }

    #[test]
    fn error_invalid_color() {
        let result = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x".parse::<Board>();
        assert!(matches!(result, Err(FenError::InvalidColor { .. })));
    }

    #[test]
    fn error_missing_king() {
        let result = "rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w".parse::<Board>();
        assert!(matches!(result, Err(FenError::InvalidBoard { .. })));
    }
}

//! Piece placement and side to move.

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::error::BoardError;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// A position as far as the feature transform is concerned: who stands where, and who moves.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// Bitboard for each piece kind, indexed by [`PieceKind::index()`].
    pieces: [Bitboard; PieceKind::COUNT],
    /// Bitboard for each side, indexed by [`Color::index()`].
    sides: [Bitboard; Color::COUNT],
    side_to_move: Color,
}

impl Board {
    /// Return the standard starting position.
    pub fn starting_position() -> Board {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::from_raw(
            [Bitboard::EMPTY; PieceKind::COUNT],
            [Bitboard::EMPTY; Color::COUNT],
            Color::White,
        );
        for sq in Bitboard::RANK_2 {
            board.toggle_piece(sq, PieceKind::Pawn, Color::White);
            board.toggle_piece(sq.flip_rank(), PieceKind::Pawn, Color::Black);
        }
        for (sq, kind) in Bitboard::RANK_1.zip(BACK_RANK) {
            board.toggle_piece(sq, kind, Color::White);
            board.toggle_piece(sq.flip_rank(), kind, Color::Black);
        }
        board
    }

    /// Construct a board from raw components. Used by FEN parsing.
    pub(crate) fn from_raw(
        pieces: [Bitboard; PieceKind::COUNT],
        sides: [Bitboard; Color::COUNT],
        side_to_move: Color,
    ) -> Board {
        Board {
            pieces,
            sides,
            side_to_move,
        }
    }

    /// Return the piece kind on the given square, if any.
    pub fn piece_on(&self, sq: Square) -> Option<PieceKind> {
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.pieces[kind.index()].contains(sq))
    }

    /// Return the color of the piece on the given square, if any.
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&color| self.sides[color.index()].contains(sq))
    }

    /// Return the bitboard for the given piece kind (both colors).
    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()]
    }

    /// Return the bitboard for the given side.
    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    /// Return the occupied squares bitboard.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.sides[Color::White.index()] | self.sides[Color::Black.index()]
    }

    /// Return the square of the king for the given side.
    ///
    /// # Panics
    ///
    /// Panics if the board has no king for the given color (invalid board state).
    pub fn king_square(&self, color: Color) -> Square {
        (self.pieces(PieceKind::King) & self.side(color))
            .lsb()
            .expect("board must have a king for each side")
    }

    /// Return the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Set the side to move.
    #[inline]
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// Toggle a piece into or out of the placement via XOR.
    ///
    /// Toggling a piece onto an occupied square produces an invalid board; callers
    /// remove the old occupant first.
    #[inline]
    pub fn toggle_piece(&mut self, sq: Square, kind: PieceKind, color: Color) {
        self.pieces[kind.index()] = self.pieces[kind.index()].toggle(sq);
        self.sides[color.index()] = self.sides[color.index()].toggle(sq);
    }

    /// Move a piece between squares, capturing whatever stands on `to`.
    /// Does nothing if `from` is empty.
    pub fn move_piece(&mut self, from: Square, to: Square) {
        let (Some(kind), Some(color)) = (self.piece_on(from), self.color_on(from)) else {
            return;
        };
        if let (Some(captured), Some(victim)) = (self.piece_on(to), self.color_on(to)) {
            self.toggle_piece(to, captured, victim);
        }
        self.toggle_piece(from, kind, color);
        self.toggle_piece(to, kind, color);
    }

    /// Validate the structural integrity of the board.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::ALL {
            let count = (self.pieces(PieceKind::King) & self.side(color)).count();
            if count != 1 {
                let color = match color {
                    Color::White => "white",
                    Color::Black => "black",
                };
                return Err(BoardError::InvalidKingCount { color, count });
            }
        }

        for i in 0..PieceKind::COUNT {
            for j in (i + 1)..PieceKind::COUNT {
                if (self.pieces[i] & self.pieces[j]).is_nonempty() {
                    return Err(BoardError::OverlappingPieces);
                }
            }
        }

        if (self.side(Color::White) & self.side(Color::Black)).is_nonempty() {
            return Err(BoardError::InconsistentSides);
        }

        let by_kind = self.pieces.iter().fold(Bitboard::EMPTY, |acc, &bb| acc | bb);
        if by_kind != self.occupied() {
            return Err(BoardError::InconsistentOccupancy);
        }

        Ok(())
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Board(\"{self}\")")
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use crate::color::Color;
    use crate::error::BoardError;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    #[test]
    fn starting_position_validates() {
        let board = Board::starting_position();
        board.validate().unwrap();
        assert_eq!(board.occupied().count(), 32);
        assert_eq!(board.side_to_move(), Color::White);
    }

    #[test]
    fn starting_position_piece_on() {
        let board = Board::starting_position();
        assert_eq!(board.piece_on(Square::E1), Some(PieceKind::King));
        assert_eq!(board.piece_on(Square::D8), Some(PieceKind::Queen));
        assert_eq!(board.piece_on(Square::G1), Some(PieceKind::Knight));
        assert_eq!(board.piece_on(Square::E7), Some(PieceKind::Pawn));
        assert_eq!(board.piece_on(Square::E4), None);
        assert_eq!(board.color_on(Square::A8), Some(Color::Black));
    }

    #[test]
    fn king_squares() {
        let board = Board::starting_position();
        assert_eq!(board.king_square(Color::White), Square::E1);
        assert_eq!(board.king_square(Color::Black), Square::E8);
    }

    #[test]
    fn move_piece_captures() {
        let mut board = Board::starting_position();
        board.move_piece(Square::D1, Square::D7);
        board.validate().unwrap();
        assert_eq!(board.piece_on(Square::D7), Some(PieceKind::Queen));
        assert_eq!(board.color_on(Square::D7), Some(Color::White));
        assert_eq!(board.piece_on(Square::D1), None);
        assert_eq!(board.occupied().count(), 31);
        assert!((board.pieces(PieceKind::Pawn) & Square::D7.bitboard()).is_empty());
    }

    #[test]
    fn missing_king_fails_validation() {
        let mut board = Board::starting_position();
        board.toggle_piece(Square::E8, PieceKind::King, Color::Black);
        assert_eq!(
            board.validate(),
            Err(BoardError::InvalidKingCount { color: "black", count: 0 })
        );
    }

    #[test]
    fn half_toggled_piece_fails_validation() {
        let mut board = Board::starting_position();
        board.toggle_piece(Square::E4, PieceKind::Knight, Color::White);
        board.validate().unwrap();
        let mut broken = board;
        broken.pieces[PieceKind::Knight.index()] = broken.pieces(PieceKind::Knight).without(Square::E4);
        assert_eq!(broken.validate(), Err(BoardError::InconsistentOccupancy));
    }
}

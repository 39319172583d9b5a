//! Perspective-oriented piece placement, the snapshot stored in every cache entry.

use finny_core::{Bitboard, Board, Color, PieceKind, Square};

/// How a perspective sees the board.
///
/// Black's view is flipped vertically so both sides see their own back rank as
/// rank 1. If the king then stands on files e-h the board is also mirrored so
/// the king lands on files a-d. Mirrored king squares share a bucket, so every
/// king square in a bucket yields the same feature indices for the same
/// oriented placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    flip: bool,
    mirror: bool,
}

impl Orientation {
    /// White's view with the king on the queen side.
    pub const IDENTITY: Orientation = Orientation {
        flip: false,
        mirror: false,
    };

    /// Orientation for `perspective` with its king on `king`.
    #[inline]
    pub const fn new(perspective: Color, king: Square) -> Orientation {
        let flip = matches!(perspective, Color::Black);
        let relative = if flip { king.flip_rank() } else { king };
        Orientation {
            flip,
            mirror: relative.file() >= 4,
        }
    }

    #[inline]
    pub const fn square(self, sq: Square) -> Square {
        let sq = if self.flip { sq.flip_rank() } else { sq };
        if self.mirror { sq.mirror_file() } else { sq }
    }

    #[inline]
    pub const fn bitboard(self, bb: Bitboard) -> Bitboard {
        let bb = if self.flip { bb.flip_vertical() } else { bb };
        if self.mirror { bb.mirror_horizontal() } else { bb }
    }
}

/// Which squares hold which pieces, split by color and by kind.
///
/// Colors stay absolute; only squares are oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Occupancy {
    by_color: [Bitboard; Color::COUNT],
    by_kind: [Bitboard; PieceKind::COUNT],
}

impl Occupancy {
    /// No pieces at all.
    pub const EMPTY: Occupancy = Occupancy {
        by_color: [Bitboard::EMPTY; Color::COUNT],
        by_kind: [Bitboard::EMPTY; PieceKind::COUNT],
    };

    /// Snapshot `board` as seen through `orientation`.
    pub fn from_board(board: &Board, orientation: Orientation) -> Occupancy {
        Occupancy {
            by_color: Color::ALL.map(|color| orientation.bitboard(board.side(color))),
            by_kind: PieceKind::ALL.map(|kind| orientation.bitboard(board.pieces(kind))),
        }
    }

    /// Return a copy with one more piece on `sq`.
    ///
    /// `sq` must be empty.
    pub fn with_piece(mut self, color: Color, kind: PieceKind, sq: Square) -> Occupancy {
        debug_assert!(!self.occupied().contains(sq), "{sq} is already occupied");
        self.by_color[color.index()] = self.by_color[color.index()].with(sq);
        self.by_kind[kind.index()] = self.by_kind[kind.index()].with(sq);
        self
    }

    #[inline]
    pub fn by_color(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    #[inline]
    pub fn by_kind(&self, kind: PieceKind) -> Bitboard {
        self.by_kind[kind.index()]
    }

    /// Squares holding a `color` piece of `kind`.
    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.by_color(color) & self.by_kind(kind)
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.by_color[0] | self.by_color[1]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied().is_empty()
    }
}

//! King-square to cache-bucket mapping.
//!
//! Buckets only select refresh-cache slots and the king-dependent block of
//! input features. Back-rank and second-rank king squares get their own
//! bucket; the table is symmetric under left-right mirroring and under
//! rank 1 <-> rank 8 flipping, so both sides share it. Every other square
//! falls into the shared bucket 0.

use finny_core::Square;

/// Number of distinct king buckets produced by [`KING_BUCKET_MAP`].
pub const KING_BUCKETS: usize = 9;

/// Bucket for each king square, indexed by [`Square::index()`] (a1 first).
#[rustfmt::skip]
pub const KING_BUCKET_MAP: [u8; Square::COUNT] = [
    1, 2, 3, 4, 4, 3, 2, 1, // rank 1
    5, 6, 7, 8, 8, 7, 6, 5, // rank 2
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    5, 6, 7, 8, 8, 7, 6, 5, // rank 7
    1, 2, 3, 4, 4, 3, 2, 1, // rank 8
];

const _: () = {
    let mut i = 0;
    while i < Square::COUNT {
        assert!((KING_BUCKET_MAP[i] as usize) < KING_BUCKETS);
        i += 1;
    }
};

/// A refresh-cache bucket id, always `< KING_BUCKETS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KingBucket(u8);

impl KingBucket {
    /// The catch-all bucket shared by every king square without a dedicated id.
    pub const SHARED: KingBucket = KingBucket(0);

    /// Create a bucket from an index, returning `None` if out of range.
    #[inline]
    pub const fn new(index: usize) -> Option<KingBucket> {
        if index < KING_BUCKETS {
            Some(KingBucket(index as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over every bucket in index order.
    pub fn all() -> impl Iterator<Item = KingBucket> {
        (0..KING_BUCKETS as u8).map(KingBucket)
    }
}

/// Map a king square to its cache bucket.
#[inline]
pub const fn king_bucket(king: Square) -> KingBucket {
    KingBucket(KING_BUCKET_MAP[king.index()])
}

#[cfg(test)]
mod tests {
    use finny_core::Square;

    use super::{KING_BUCKETS, KingBucket, king_bucket};

    #[test]
    fn every_square_has_a_bucket() {
        for sq in Square::all() {
            let bucket = king_bucket(sq);
            assert!(bucket.index() < KING_BUCKETS, "{sq} -> {bucket:?}");
            assert_eq!(king_bucket(sq), bucket);
        }
    }

    #[test]
    fn mirrored_squares_share_buckets() {
        for sq in Square::all() {
            assert_eq!(king_bucket(sq), king_bucket(sq.mirror_file()), "mirror of {sq}");
            assert_eq!(king_bucket(sq), king_bucket(sq.flip_rank()), "flip of {sq}");
        }
        assert_eq!(king_bucket(Square::A1), king_bucket(Square::H1));
        assert_eq!(king_bucket(Square::G8), king_bucket(Square::B1));
    }

    #[test]
    fn back_ranks_have_dedicated_buckets() {
        assert_eq!(king_bucket(Square::A1).index(), 1);
        assert_eq!(king_bucket(Square::E1).index(), 4);
        assert_eq!(king_bucket(Square::G1).index(), 2);
        assert_eq!(king_bucket(Square::C2).index(), 7);
        assert_eq!(king_bucket(Square::E8).index(), 4);
        assert_eq!(king_bucket(Square::E4), KingBucket::SHARED);
        assert_eq!(king_bucket(Square::A3), KingBucket::SHARED);
        assert_eq!(king_bucket(Square::H6), KingBucket::SHARED);
    }

    #[test]
    fn every_bucket_is_reachable() {
        for bucket in KingBucket::all() {
            assert!(
                Square::all().any(|sq| king_bucket(sq) == bucket),
                "{bucket:?} has no king square"
            );
        }
        assert_eq!(KingBucket::all().count(), KING_BUCKETS);
        assert!(KingBucket::new(KING_BUCKETS).is_none());
    }
}

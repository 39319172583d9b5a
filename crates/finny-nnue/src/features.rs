//! King-bucketed 768 feature index mapping.

use finny_core::{Color, PieceKind, Square};

use crate::king_bucket::{KING_BUCKETS, KingBucket};

/// Features in one king bucket: 2 relative colors * 6 kinds * 64 squares.
pub const FEATURES_PER_BUCKET: usize = 768;

/// Total number of input features.
pub const INPUTS: usize = KING_BUCKETS * FEATURES_PER_BUCKET;

/// Compute the input feature index of a piece seen from `perspective`.
///
/// Layout inside a bucket block:
/// - Own pieces:      `kind.index() * 64 + sq_index`  (offsets 0..383)
/// - Opponent pieces: `384 + kind.index() * 64 + sq_index`  (offsets 384..767)
///
/// `sq` must already be oriented for `perspective` (see
/// [`Orientation`](crate::Orientation)).
#[inline]
pub fn feature_index(
    perspective: Color,
    bucket: KingBucket,
    piece_color: Color,
    kind: PieceKind,
    sq: Square,
) -> usize {
    let color_offset = if piece_color == perspective { 0 } else { 384 };
    bucket.index() * FEATURES_PER_BUCKET + color_offset + kind.index() * 64 + sq.index()
}

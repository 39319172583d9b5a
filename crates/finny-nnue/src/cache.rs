//! Refresh cache ("Finny table"): one base accumulator per king bucket and perspective.
//!
//! Each [`Entry`] remembers the exact oriented placement its values were
//! computed for. Refreshing a side diffs that placement against the current
//! position and applies only the changed features, so the cost scales with
//! how far the position drifted from the last visit to the same bucket rather
//! than with the number of pieces on the board.
//!
//! The cache must be cleared whenever the transformer's biases or weights
//! change; entries computed under other weights are wrong, not merely stale.

use finny_core::{Board, Color, PieceKind};
use tracing::{debug, trace};

use crate::accumulator::Accumulator;
use crate::features::feature_index;
use crate::king_bucket::{KING_BUCKETS, KingBucket, king_bucket};
use crate::occupancy::{Occupancy, Orientation};
use crate::transformer::FeatureTransformer;

/// Cached base state for one (king bucket, perspective) slot.
///
/// The numeric state and the placement are only ever written together, by
/// [`Entry::reset`] or [`Entry::update`].
#[derive(Clone, Copy)]
#[repr(C, align(64))]
pub struct Entry<const L1: usize, const PSQT: usize> {
    accumulation: [i16; L1],
    psqt_accumulation: [i32; PSQT],
    occupancy: Occupancy,
}

impl<const L1: usize, const PSQT: usize> Entry<L1, PSQT> {
    /// An entry representing the empty board.
    pub fn new(biases: &[i16; L1]) -> Self {
        Self {
            accumulation: *biases,
            psqt_accumulation: [0; PSQT],
            occupancy: Occupancy::EMPTY,
        }
    }

    /// Reset to the empty board: with no active features the accumulation is
    /// exactly the biases.
    pub fn reset(&mut self, biases: &[i16; L1]) {
        self.accumulation = *biases;
        self.psqt_accumulation = [0; PSQT];
        self.occupancy = Occupancy::EMPTY;
    }

    /// Bring the entry up to date with `target`, an oriented placement for
    /// `perspective` in `bucket`.
    ///
    /// Removes the features of pieces that vanished, adds the features of
    /// pieces that appeared, then records `target` as the stored placement.
    /// Returns the number of feature updates applied; zero when the entry
    /// already matches.
    pub fn update(
        &mut self,
        target: &Occupancy,
        perspective: Color,
        bucket: KingBucket,
        transformer: &FeatureTransformer<L1, PSQT>,
    ) -> usize {
        let mut updates = 0;

        for color in Color::ALL {
            for kind in PieceKind::ALL {
                let old = self.occupancy.pieces(color, kind);
                let new = target.pieces(color, kind);

                for sq in old.and_not(new) {
                    let idx = feature_index(perspective, bucket, color, kind, sq);
                    transformer.remove_feature(idx, &mut self.accumulation, &mut self.psqt_accumulation);
                    updates += 1;
                }
                for sq in new.and_not(old) {
                    let idx = feature_index(perspective, bucket, color, kind, sq);
                    transformer.add_feature(idx, &mut self.accumulation, &mut self.psqt_accumulation);
                    updates += 1;
                }
            }
        }

        self.occupancy = *target;
        updates
    }

    #[inline]
    pub fn accumulation(&self) -> &[i16; L1] {
        &self.accumulation
    }

    #[inline]
    pub fn psqt_accumulation(&self) -> &[i32; PSQT] {
        &self.psqt_accumulation
    }

    /// The placement the numeric state was computed for.
    #[inline]
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }
}

/// Running totals of refresh work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of perspective refreshes served.
    pub refreshes: u64,
    /// Feature add/remove operations actually applied.
    pub updates: u64,
    /// Feature additions a from-scratch rebuild would have needed.
    pub full_updates: u64,
}

impl CacheStats {
    /// Average feature updates per refresh, or 0 before the first refresh.
    pub fn average_updates(&self) -> f64 {
        if self.refreshes == 0 {
            0.0
        } else {
            self.updates as f64 / self.refreshes as f64
        }
    }

    /// Fraction of from-scratch work that was skipped.
    pub fn savings(&self) -> f64 {
        if self.full_updates == 0 {
            0.0
        } else {
            1.0 - self.updates as f64 / self.full_updates as f64
        }
    }
}

/// Fixed table of [`Entry`]s, `KING_BUCKETS x 2`, owned by one search thread.
pub struct RefreshCache<const L1: usize, const PSQT: usize> {
    entries: Box<[[Entry<L1, PSQT>; Color::COUNT]]>,
    stats: CacheStats,
}

impl<const L1: usize, const PSQT: usize> RefreshCache<L1, PSQT> {
    /// Allocate every slot up front, reset to the empty board under `biases`.
    pub fn new(biases: &[i16; L1]) -> Self {
        let entries = (0..KING_BUCKETS)
            .map(|_| std::array::from_fn(|_| Entry::new(biases)))
            .collect();
        Self {
            entries,
            stats: CacheStats::default(),
        }
    }

    /// Reset every entry under new biases and zero the statistics.
    ///
    /// Must be called whenever the transformer changes.
    pub fn clear(&mut self, biases: &[i16; L1]) {
        for entry in self.entries.iter_mut().flatten() {
            entry.reset(biases);
        }
        self.stats = CacheStats::default();
        debug!(slots = KING_BUCKETS * Color::COUNT, "refresh cache cleared");
    }

    /// The entry for a bucket and perspective.
    #[inline]
    pub fn entry(&self, bucket: KingBucket, perspective: Color) -> &Entry<L1, PSQT> {
        &self.entries[bucket.index()][perspective.index()]
    }

    #[inline]
    pub fn entry_mut(&mut self, bucket: KingBucket, perspective: Color) -> &mut Entry<L1, PSQT> {
        &mut self.entries[bucket.index()][perspective.index()]
    }

    /// Refresh `perspective` of `accumulator` for `board` through the cache.
    ///
    /// Returns the number of feature updates applied to the cached entry.
    ///
    /// # Panics
    ///
    /// Panics if `board` has no king for `perspective`.
    pub fn refresh(
        &mut self,
        board: &Board,
        perspective: Color,
        transformer: &FeatureTransformer<L1, PSQT>,
        accumulator: &mut Accumulator<L1, PSQT>,
    ) -> usize {
        let king = board.king_square(perspective);
        let bucket = king_bucket(king);
        let target = Occupancy::from_board(board, Orientation::new(perspective, king));

        let entry = &mut self.entries[bucket.index()][perspective.index()];
        let updates = entry.update(&target, perspective, bucket, transformer);
        accumulator.publish_entry(perspective, entry);

        self.stats.refreshes += 1;
        self.stats.updates += updates as u64;
        self.stats.full_updates += u64::from(target.occupied().count());
        trace!(%king, bucket = bucket.index(), %perspective, updates, "refreshed from cache");

        updates
    }

    /// Statistics since construction or the last [`clear`](Self::clear).
    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<const L1: usize, const PSQT: usize> std::fmt::Debug for RefreshCache<L1, PSQT> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCache")
            .field("buckets", &self.entries.len())
            .field("stats", &self.stats)
            .finish()
    }
}

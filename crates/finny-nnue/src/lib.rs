//! NNUE accumulator state and the king-bucketed refresh cache ("Finny table").
//!
//! The evaluator keeps one [`Accumulator`] per search frame and one
//! [`RefreshCache`] per search thread. Refreshing a side means diffing the
//! cached entry for that side's king bucket against the current position and
//! applying only the changed features, instead of rebuilding from the biases.

mod accumulator;
mod cache;
mod error;
mod features;
mod king_bucket;
mod occupancy;
mod transformer;

pub use accumulator::Accumulator;
pub use cache::{CacheStats, Entry, RefreshCache};
pub use error::TransformerError;
pub use features::{FEATURES_PER_BUCKET, INPUTS, feature_index};
pub use king_bucket::{KING_BUCKET_MAP, KING_BUCKETS, KingBucket, king_bucket};
pub use occupancy::{Occupancy, Orientation};
pub use transformer::FeatureTransformer;

/// Default transformed feature dimension.
pub const L1: usize = 256;

/// Default number of PSQT buckets.
pub const PSQT_BUCKETS: usize = 8;

/// Accumulator sized for the default architecture.
pub type DefaultAccumulator = Accumulator<L1, PSQT_BUCKETS>;

/// Refresh cache sized for the default architecture.
pub type DefaultRefreshCache = RefreshCache<L1, PSQT_BUCKETS>;

/// Feature transformer sized for the default architecture.
pub type DefaultFeatureTransformer = FeatureTransformer<L1, PSQT_BUCKETS>;

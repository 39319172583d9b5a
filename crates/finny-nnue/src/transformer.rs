//! Scalar feature transformer: biases, per-feature weight columns, and PSQT weights.

use finny_core::{Color, PieceKind};

use crate::error::TransformerError;
use crate::features::{INPUTS, feature_index};
use crate::king_bucket::KingBucket;
use crate::occupancy::Occupancy;

/// First layer of the network, from sparse input features to `L1` values plus `PSQT` sums.
///
/// Arithmetic wraps, so removing a feature exactly undoes adding it regardless
/// of the order updates are applied in.
#[derive(Clone)]
pub struct FeatureTransformer<const L1: usize, const PSQT: usize> {
    biases: [i16; L1],
    /// `INPUTS x L1`, one contiguous column per feature.
    weights: Box<[i16]>,
    /// `INPUTS x PSQT`, one contiguous row per feature.
    psqt_weights: Box<[i32]>,
}

impl<const L1: usize, const PSQT: usize> FeatureTransformer<L1, PSQT> {
    /// Assemble a transformer from flat buffers, checking every length.
    pub fn from_parts(
        biases: Vec<i16>,
        weights: Vec<i16>,
        psqt_weights: Vec<i32>,
    ) -> Result<Self, TransformerError> {
        check_len("weights", INPUTS * L1, weights.len())?;
        check_len("psqt weights", INPUTS * PSQT, psqt_weights.len())?;
        let found = biases.len();
        let biases: [i16; L1] = biases
            .try_into()
            .map_err(|_| TransformerError::LengthMismatch {
                part: "biases",
                expected: L1,
                found,
            })?;

        Ok(Self {
            biases,
            weights: weights.into_boxed_slice(),
            psqt_weights: psqt_weights.into_boxed_slice(),
        })
    }

    /// Build a transformer from generator functions.
    ///
    /// `weight(feature, dim)` fills the weight matrix and `psqt(feature, bucket)`
    /// the PSQT rows.
    pub fn from_fn(
        bias: impl Fn(usize) -> i16,
        weight: impl Fn(usize, usize) -> i16,
        psqt: impl Fn(usize, usize) -> i32,
    ) -> Self {
        Self {
            biases: std::array::from_fn(bias),
            weights: (0..INPUTS * L1).map(|i| weight(i / L1, i % L1)).collect(),
            psqt_weights: (0..INPUTS * PSQT).map(|i| psqt(i / PSQT, i % PSQT)).collect(),
        }
    }

    /// The accumulation of a position with no active features.
    #[inline]
    pub fn biases(&self) -> &[i16; L1] {
        &self.biases
    }

    /// Weight column of one feature.
    #[inline]
    pub fn feature_weights(&self, idx: usize) -> &[i16] {
        &self.weights[idx * L1..(idx + 1) * L1]
    }

    /// PSQT row of one feature.
    #[inline]
    pub fn feature_psqt(&self, idx: usize) -> &[i32] {
        &self.psqt_weights[idx * PSQT..(idx + 1) * PSQT]
    }

    /// Add one feature's contribution (piece placed on a square).
    #[inline]
    pub fn add_feature(&self, idx: usize, acc: &mut [i16; L1], psqt: &mut [i32; PSQT]) {
        for (a, &w) in acc.iter_mut().zip(self.feature_weights(idx)) {
            *a = a.wrapping_add(w);
        }
        for (p, &w) in psqt.iter_mut().zip(self.feature_psqt(idx)) {
            *p = p.wrapping_add(w);
        }
    }

    /// Remove one feature's contribution (piece lifted from a square).
    #[inline]
    pub fn remove_feature(&self, idx: usize, acc: &mut [i16; L1], psqt: &mut [i32; PSQT]) {
        for (a, &w) in acc.iter_mut().zip(self.feature_weights(idx)) {
            *a = a.wrapping_sub(w);
        }
        for (p, &w) in psqt.iter_mut().zip(self.feature_psqt(idx)) {
            *p = p.wrapping_sub(w);
        }
    }

    /// Full recompute: start from the biases, then add every piece in `occupancy`.
    pub fn compute(
        &self,
        occupancy: &Occupancy,
        perspective: Color,
        bucket: KingBucket,
    ) -> ([i16; L1], [i32; PSQT]) {
        let mut acc = self.biases;
        let mut psqt = [0; PSQT];

        for color in Color::ALL {
            for kind in PieceKind::ALL {
                for sq in occupancy.pieces(color, kind) {
                    let idx = feature_index(perspective, bucket, color, kind, sq);
                    self.add_feature(idx, &mut acc, &mut psqt);
                }
            }
        }

        (acc, psqt)
    }
}

fn check_len(part: &'static str, expected: usize, found: usize) -> Result<(), TransformerError> {
    if expected == found {
        Ok(())
    } else {
        Err(TransformerError::LengthMismatch {
            part,
            expected,
            found,
        })
    }
}

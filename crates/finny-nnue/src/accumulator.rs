//! Per-frame accumulator holding both perspectives' transformed features.

use finny_core::Color;

use crate::cache::Entry;

/// Transformed feature sums and PSQT sums for both perspectives.
///
/// A side's values are only readable while it is marked computed; the
/// accessors return `None` for a stale side.
#[derive(Clone, Copy)]
#[repr(C, align(64))]
pub struct Accumulator<const L1: usize, const PSQT: usize> {
    accumulation: [[i16; L1]; Color::COUNT],
    psqt_accumulation: [[i32; PSQT]; Color::COUNT],
    computed: [bool; Color::COUNT],
}

impl<const L1: usize, const PSQT: usize> Accumulator<L1, PSQT> {
    /// A zeroed accumulator with both sides stale.
    pub const fn new() -> Self {
        Self {
            accumulation: [[0; L1]; Color::COUNT],
            psqt_accumulation: [[0; PSQT]; Color::COUNT],
            computed: [false; Color::COUNT],
        }
    }

    /// Mark one side stale. Its arrays are left as they are but can no longer be read.
    #[inline]
    pub fn invalidate(&mut self, side: Color) {
        self.computed[side.index()] = false;
    }

    /// Mark both sides stale, as on entering a new node.
    #[inline]
    pub fn invalidate_all(&mut self) {
        self.computed = [false; Color::COUNT];
    }

    /// Overwrite one side and mark it computed.
    ///
    /// The caller guarantees the values match the position being evaluated.
    #[inline]
    pub fn publish(&mut self, side: Color, accumulation: &[i16; L1], psqt: &[i32; PSQT]) {
        self.accumulation[side.index()] = *accumulation;
        self.psqt_accumulation[side.index()] = *psqt;
        self.computed[side.index()] = true;
    }

    /// Publish an up-to-date cache entry for `side`.
    #[inline]
    pub fn publish_entry(&mut self, side: Color, entry: &Entry<L1, PSQT>) {
        self.publish(side, entry.accumulation(), entry.psqt_accumulation());
    }

    #[inline]
    pub fn is_computed(&self, side: Color) -> bool {
        self.computed[side.index()]
    }

    /// Transformed features for `side`, or `None` if stale.
    #[inline]
    pub fn accumulation(&self, side: Color) -> Option<&[i16; L1]> {
        self.is_computed(side)
            .then(|| &self.accumulation[side.index()])
    }

    /// PSQT sums for `side`, or `None` if stale.
    #[inline]
    pub fn psqt_accumulation(&self, side: Color) -> Option<&[i32; PSQT]> {
        self.is_computed(side)
            .then(|| &self.psqt_accumulation[side.index()])
    }
}

impl<const L1: usize, const PSQT: usize> Default for Accumulator<L1, PSQT> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use finny_core::Color;

    use super::Accumulator;

    type Small = Accumulator<8, 2>;

    #[test]
    fn aligned_to_cache_line() {
        assert_eq!(std::mem::align_of::<Small>(), 64);
        assert_eq!(std::mem::align_of::<crate::DefaultAccumulator>(), 64);
        assert_eq!(std::mem::size_of::<Small>() % 64, 0);
    }

    #[test]
    fn new_accumulator_is_stale() {
        let acc = Small::new();
        for side in Color::ALL {
            assert!(!acc.is_computed(side));
            assert!(acc.accumulation(side).is_none());
            assert!(acc.psqt_accumulation(side).is_none());
        }
    }

    #[test]
    fn publish_makes_one_side_readable() {
        let mut acc = Small::new();
        acc.publish(Color::Black, &[7; 8], &[-3, 4]);

        assert_eq!(acc.accumulation(Color::Black), Some(&[7; 8]));
        assert_eq!(acc.psqt_accumulation(Color::Black), Some(&[-3, 4]));
        assert!(acc.accumulation(Color::White).is_none());
    }

    #[test]
    fn invalidate_hides_values_until_next_publish() {
        let mut acc = Small::new();
        acc.publish(Color::White, &[1; 8], &[1, 1]);
        acc.publish(Color::Black, &[2; 8], &[2, 2]);

        acc.invalidate(Color::White);
        assert!(acc.accumulation(Color::White).is_none());
        assert!(acc.psqt_accumulation(Color::White).is_none());
        assert_eq!(acc.accumulation(Color::Black), Some(&[2; 8]));

        acc.publish(Color::White, &[3; 8], &[3, 3]);
        assert_eq!(acc.accumulation(Color::White), Some(&[3; 8]));

        acc.invalidate_all();
        assert!(Color::ALL.into_iter().all(|side| !acc.is_computed(side)));
    }

    #[test]
    fn invalidate_is_idempotent() {
        let mut acc = Small::default();
        acc.invalidate(Color::White);
        acc.invalidate(Color::White);
        assert!(!acc.is_computed(Color::White));
    }
}

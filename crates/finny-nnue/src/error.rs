//! Errors raised while assembling a feature transformer.

/// A weight or bias buffer does not match the transformer's dimensions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformerError {
    /// A buffer has the wrong number of values.
    #[error("{part} has {found} values, expected {expected}")]
    LengthMismatch {
        /// Which buffer ("biases", "weights" or "psqt weights").
        part: &'static str,
        /// Number of values required by the dimensions.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },
}

//! Error types for fallible vector operations.

/// Failure of a length- or index-checked vector operation.
///
/// Operations returning this error never write partial results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum VectorError {
  /// The source slice holds fewer than four elements.
  #[error("source has {len} elements, at least 4 required")]
  SourceTooShort { len: usize },
  /// The destination has fewer than four writable elements.
  #[error("destination has {len} writable elements, at least 4 required")]
  DestinationTooShort { len: usize },
  /// Lane or start index outside the valid range.
  #[error("index {index} is out of range")]
  IndexOutOfRange { index: usize },
  /// Slice operands of different lengths.
  #[error("length mismatch: {left} vs {right}")]
  LengthMismatch { left: usize, right: usize },
}

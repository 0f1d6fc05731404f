//! Entropy sources for coefficient generation.
//!
//! Randomness is never global: every sharing operation takes its own
//! `&mut impl EntropySource`, so independent operations can run in parallel
//! without synchronization.
//!
//! # Design
//! - **Single strong source**: Only full-entropy sources (8 bits per byte) are
//!   accepted for polynomial coefficients. A failing source is fatal; there is
//!   no fallback to anything weaker.
//! - **Uniform sampling**: `next_field_element` over-reads by a safety margin
//!   and reduces mod P, so the bias is below 2^-128.

#[cfg(test)]
pub(crate) mod testing;

pub mod os;
pub mod sampling;

pub use os::OsEntropy;
pub use sampling::next_field_element;

use core::fmt;

/// Entropy per byte a source must claim before it may feed polynomial
/// coefficients.
pub const FULL_ENTROPY: f64 = 8.0;

/// Error types for entropy collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropyError {
    /// Source could not be opened.
    InitFailed,
    /// Source failed to deliver the requested bytes.
    CollectionFailed,
    /// Source has no bytes left.
    Exhausted,
    /// Source does not claim full entropy.
    InsufficientQuality,
}

impl fmt::Display for EntropyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntropyError::InitFailed => write!(f, "Entropy source could not be initialized"),
            EntropyError::CollectionFailed => write!(f, "Entropy source failed to deliver bytes"),
            EntropyError::Exhausted => write!(f, "Entropy source is exhausted"),
            EntropyError::InsufficientQuality => {
                write!(f, "Entropy source does not provide full entropy")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EntropyError {}

/// A trait for entropy sources.
pub trait EntropySource {
    /// Returns a unique identifier for the source.
    fn name(&self) -> &'static str;

    /// Fills `dest` with random bytes from the source.
    ///
    /// # Arguments
    /// * `dest` - Buffer to fill with entropy.
    ///
    /// # Returns
    /// * `Ok(())` on success.
    /// * `Err(EntropyError)` if the source fails. `dest` contents are then
    ///   unspecified and must not be used.
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError>;

    /// Returns the estimated entropy per byte (in bits, 0.0-8.0).
    fn entropy_estimate(&self) -> f64;
}

/// Refuses sources that do not claim full entropy.
pub fn require_full_entropy<R: EntropySource + ?Sized>(rng: &R) -> Result<(), EntropyError> {
    if rng.entropy_estimate() < FULL_ENTROPY {
        log::error!(
            "Refusing entropy source {}: {} bits/byte claimed, {} required",
            rng.name(),
            rng.entropy_estimate(),
            FULL_ENTROPY
        );
        return Err(EntropyError::InsufficientQuality);
    }
    Ok(())
}

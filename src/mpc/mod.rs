//! Threshold secret sharing.
//!
//! This module implements Shamir's (t, n) scheme over a prime field: a secret
//! is the constant term of a random degree-(t-1) polynomial, shares are its
//! values at x = 1..n, and any t shares recover the constant term by Lagrange
//! interpolation at zero.
//!
//! # Components
//! - `polynomial`: Random polynomial construction and Horner evaluation.
//! - `share`: Definition and fixed-width encoding of an (x, y) share.
//! - `quorum`: Parameter validation and share generation.
//! - `reconstruct`: Lagrange interpolation and redundant-share consistency.
//! - `envelope`: Per-holder share container carrying t and a checksum.
//!
//! # Security
//! - **Finite field only**: No integer or floating-point evaluation anywhere.
//! - **Zeroization**: Secrets, coefficients and share values wipe on drop.
//! - **Validation first**: Parameter and share-set errors are raised before
//!   any randomness is consumed or any arithmetic runs.

pub mod envelope;
pub mod polynomial;
pub mod quorum;
pub mod reconstruct;
pub mod share;

extern crate alloc;
use alloc::vec::Vec;
use core::fmt;

use crate::core::{FieldElement, FieldError, PrimeField};
use crate::entropy::{EntropyError, EntropySource};

pub use envelope::ShareEnvelope;
pub use polynomial::{Polynomial, MIN_THRESHOLD};
pub use share::Share;

/// Shares produced by one sharing operation.
pub type ShareSet = Vec<Share>;

/// Errors for sharing and reconstruction.
///
/// Variants carry public context (counts, x-coordinates) only; never a
/// secret or a y value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharingError {
    /// Threshold below 2, or above the share count when one is known.
    InvalidThreshold {
        threshold: usize,
        share_count: Option<usize>,
    },
    /// Share count does not fit the x-coordinate space of the field.
    InvalidShareCount { share_count: usize },
    /// Fewer shares than the threshold.
    InsufficientShares { required: usize, provided: usize },
    /// Two shares with the same x. `conflicting` is set when their y values
    /// differ, which indicates tampering or a transcription error.
    DuplicateXCoordinate { x: u32, conflicting: bool },
    /// The named share is the only one whose removal leaves the rest on a
    /// single polynomial, or its envelope checksum failed.
    CorruptShare { x: u32 },
    /// The shares do not lie on one polynomial of degree t-1 and no single
    /// share can be singled out as the cause.
    InconsistentShares { provided: usize },
    /// x-coordinate is zero or not below the modulus.
    InvalidXCoordinate { x: u32 },
    /// Share or envelope bytes could not be decoded.
    MalformedShare(&'static str),
    /// Share was produced over a different field.
    FieldMismatch,
    /// Secure randomness unavailable; never retried, never substituted.
    EntropyUnavailable(EntropyError),
    /// Field arithmetic failure.
    Field(FieldError),
}

impl fmt::Display for SharingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SharingError::InvalidThreshold {
                threshold,
                share_count: Some(n),
            } => write!(f, "Invalid threshold {} for {} shares (need 2 <= t <= n)", threshold, n),
            SharingError::InvalidThreshold {
                threshold,
                share_count: None,
            } => write!(f, "Invalid threshold {} (need t >= 2)", threshold),
            SharingError::InvalidShareCount { share_count } => {
                write!(f, "Share count {} exceeds the field's x-coordinate space", share_count)
            }
            SharingError::InsufficientShares { required, provided } => {
                write!(f, "Insufficient shares: need {}, got {}", required, provided)
            }
            SharingError::DuplicateXCoordinate { x, conflicting: false } => {
                write!(f, "Duplicate share x-coordinate {}", x)
            }
            SharingError::DuplicateXCoordinate { x, conflicting: true } => write!(
                f,
                "Conflicting shares at x-coordinate {} (tampering or transcription error)",
                x
            ),
            SharingError::CorruptShare { x } => write!(f, "Share at x-coordinate {} is corrupt", x),
            SharingError::InconsistentShares { provided } => write!(
                f,
                "The {} shares do not lie on one polynomial; the faulty share cannot be identified",
                provided
            ),
            SharingError::InvalidXCoordinate { x } => write!(f, "Invalid x-coordinate {}", x),
            SharingError::MalformedShare(reason) => write!(f, "Malformed share: {}", reason),
            SharingError::FieldMismatch => write!(f, "Share belongs to a different field"),
            SharingError::EntropyUnavailable(err) => write!(f, "Entropy unavailable: {}", err),
            SharingError::Field(err) => write!(f, "Field error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SharingError {}

impl From<EntropyError> for SharingError {
    fn from(err: EntropyError) -> Self {
        SharingError::EntropyUnavailable(err)
    }
}

impl From<FieldError> for SharingError {
    fn from(err: FieldError) -> Self {
        SharingError::Field(err)
    }
}

/// Trait for Secret Sharing Schemes.
pub trait SecretSharingScheme {
    type Share;
    type Secret;
    type Error;

    /// Splits a secret into `share_count` shares with the given threshold.
    fn split<R: EntropySource + ?Sized>(
        &self,
        secret: &Self::Secret,
        threshold: usize,
        share_count: usize,
        rng: &mut R,
    ) -> Result<Vec<Self::Share>, Self::Error>;

    /// Reconstructs a secret from at least `threshold` shares.
    fn reconstruct(
        &self,
        shares: &[Self::Share],
        threshold: usize,
    ) -> Result<Self::Secret, Self::Error>;
}

/// Shamir's Secret Sharing over a prime field.
#[derive(Debug, Clone, Default)]
pub struct Shamir {
    field: PrimeField,
}

impl Shamir {
    pub fn new(field: PrimeField) -> Self {
        Self { field }
    }

    pub fn field(&self) -> &PrimeField {
        &self.field
    }
}

impl SecretSharingScheme for Shamir {
    type Share = Share;
    type Secret = FieldElement;
    type Error = SharingError;

    fn split<R: EntropySource + ?Sized>(
        &self,
        secret: &Self::Secret,
        threshold: usize,
        share_count: usize,
        rng: &mut R,
    ) -> Result<Vec<Self::Share>, Self::Error> {
        quorum::split_secret(&self.field, secret, threshold, share_count, rng)
    }

    fn reconstruct(
        &self,
        shares: &[Self::Share],
        threshold: usize,
    ) -> Result<Self::Secret, Self::Error> {
        reconstruct::reconstruct_secret(&self.field, shares, threshold)
    }
}

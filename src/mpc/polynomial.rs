//! Sharing polynomials.
//!
//! A polynomial of degree t-1 is stored as its coefficients
//! `[c0, c1, ..., c(t-1)]` with `c0` the secret. It lives only for the
//! duration of one sharing operation and wipes itself on drop, including on
//! error paths.

extern crate alloc;
use alloc::vec::Vec;
use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::core::{FieldElement, PrimeField};
use crate::entropy::{next_field_element, require_full_entropy, EntropySource};
use super::SharingError;

/// Smallest meaningful threshold. With t = 1 every share equals the secret.
pub const MIN_THRESHOLD: usize = 2;

/// A secret-carrying polynomial over a prime field.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Polynomial {
    coefficients: Vec<FieldElement>,
}

impl Polynomial {
    /// Builds `f(x) = secret + c1*x + ... + c(t-1)*x^(t-1)` with `c1..c(t-1)`
    /// drawn uniformly from the field.
    ///
    /// # Errors
    /// * `SharingError::InvalidThreshold` if `threshold < 2`. Checked before
    ///   any randomness is drawn.
    /// * `SharingError::EntropyUnavailable` if the source is weak or fails.
    ///   Coefficients drawn so far are wiped.
    pub fn build<R: EntropySource + ?Sized>(
        field: &PrimeField,
        secret: &FieldElement,
        threshold: usize,
        rng: &mut R,
    ) -> Result<Self, SharingError> {
        if threshold < MIN_THRESHOLD {
            return Err(SharingError::InvalidThreshold {
                threshold,
                share_count: None,
            });
        }
        require_full_entropy(rng)?;

        let mut coefficients = Vec::with_capacity(threshold);
        coefficients.push(secret.clone());
        for _ in 1..threshold {
            coefficients.push(next_field_element(rng, field)?);
        }

        Ok(Self { coefficients })
    }

    /// Wraps known coefficients (lowest degree first).
    pub fn from_coefficients(coefficients: Vec<FieldElement>) -> Result<Self, SharingError> {
        if coefficients.len() < MIN_THRESHOLD {
            return Err(SharingError::InvalidThreshold {
                threshold: coefficients.len(),
                share_count: None,
            });
        }
        Ok(Self { coefficients })
    }

    /// Number of coefficients, i.e. the sharing threshold.
    pub fn threshold(&self) -> usize {
        self.coefficients.len()
    }

    /// Degree of the polynomial. A zeroized polynomial reports 0.
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluates the polynomial at `x` using Horner's method:
    /// `f(x) = c0 + x*(c1 + x*(c2 + ... + x*c(t-1)))`.
    pub fn evaluate(&self, field: &PrimeField, x: &FieldElement) -> FieldElement {
        let mut coeffs = self.coefficients.iter().rev();
        let mut acc = match coeffs.next() {
            Some(leading) => leading.clone(),
            None => return field.zero(),
        };
        for coeff in coeffs {
            let scaled = field.mul(&acc, x);
            acc = field.add(&scaled, coeff);
        }
        acc
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polynomial")
            .field("degree", &self.degree())
            .field("coefficients", &"***SENSITIVE***")
            .finish()
    }
}

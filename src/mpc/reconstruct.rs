//! Secret reconstruction from shares.
//!
//! This module implements Lagrange interpolation over the prime field to
//! recover the constant term of the sharing polynomial.
//!
//! # Security
//! - **Validation**: Threshold, share count, duplicate and out-of-range
//!   x-coordinates are rejected before any arithmetic runs.
//! - **Consistency**: When more than t shares arrive, all of them must lie on
//!   one polynomial of degree t-1, so every t-subset yields the same secret or
//!   the call fails. A share is only named as corrupt when it is the single
//!   share whose removal makes the rest consistent.
//! - **Zeroization**: Lagrange terms are field elements and wipe on drop.

extern crate alloc;
use alloc::vec::Vec;

use crate::core::{FieldElement, FieldError, PrimeField};
use super::polynomial::MIN_THRESHOLD;
use super::share::check_x;
use super::{Share, SharingError};

/// Reconstructs the secret from at least `threshold` shares.
///
/// The first `threshold` shares determine the polynomial; its value at zero
/// is the secret. Every further share must lie on that polynomial.
///
/// # Errors
/// * `SharingError::InvalidThreshold` if `threshold < 2`.
/// * `SharingError::InsufficientShares` if fewer than `threshold` shares.
/// * `SharingError::DuplicateXCoordinate` if two shares share an x. The
///   `conflicting` flag is set when their y values differ.
/// * `SharingError::InvalidXCoordinate` if an x is zero or not below P.
/// * `SharingError::CorruptShare` if the shares are inconsistent and exactly
///   one share, once removed, leaves the others on a single polynomial.
/// * `SharingError::InconsistentShares` if the shares are inconsistent and no
///   single share explains it (for example with only `threshold + 1` shares).
pub fn reconstruct_secret(
    field: &PrimeField,
    shares: &[Share],
    threshold: usize,
) -> Result<FieldElement, SharingError> {
    if threshold < MIN_THRESHOLD {
        return Err(SharingError::InvalidThreshold {
            threshold,
            share_count: None,
        });
    }
    if shares.len() < threshold {
        return Err(SharingError::InsufficientShares {
            required: threshold,
            provided: shares.len(),
        });
    }
    validate_shares(field, shares)?;

    if !lie_on_one_polynomial(field, shares, threshold)? {
        return Err(blame(field, shares, threshold)?);
    }
    let secret = interpolate_at(field, &shares[..threshold], &field.zero())?;

    log::debug!(
        "Reconstructed secret from {} shares (threshold {}, x = {:?})",
        shares.len(),
        threshold,
        shares.iter().map(Share::x).collect::<Vec<_>>()
    );
    Ok(secret)
}

/// Evaluates at `z` the unique polynomial of degree `points.len() - 1`
/// through `points`:
///
/// `L(z) = sum_j y_j * prod_{m != j} (z - x_m) / (x_j - x_m)`
///
/// # Errors
/// * `SharingError::InsufficientShares` if `points` is empty.
/// * `SharingError::Field(FieldError::DivisionByZero)` if two points share an
///   x-coordinate. [`reconstruct_secret`] rules this out beforehand.
pub fn interpolate_at(
    field: &PrimeField,
    points: &[Share],
    z: &FieldElement,
) -> Result<FieldElement, SharingError> {
    if points.is_empty() {
        return Err(SharingError::InsufficientShares {
            required: 1,
            provided: 0,
        });
    }

    let xs = points
        .iter()
        .map(|p| field.element_from_u64(u64::from(p.x())))
        .collect::<Result<Vec<_>, FieldError>>()?;

    let mut sum = field.zero();
    for (j, point) in points.iter().enumerate() {
        let mut numerator = field.one();
        let mut denominator = field.one();
        for (m, xm) in xs.iter().enumerate() {
            if j == m {
                continue;
            }
            numerator = field.mul(&numerator, &field.sub(z, xm));
            denominator = field.mul(&denominator, &field.sub(&xs[j], xm));
        }
        let basis = field.div(&numerator, &denominator)?;
        let term = field.mul(point.y(), &basis);
        sum = field.add(&sum, &term);
    }
    Ok(sum)
}

/// Whether every share lies on the degree-(t-1) polynomial through the
/// first `threshold` of them.
fn lie_on_one_polynomial(
    field: &PrimeField,
    shares: &[Share],
    threshold: usize,
) -> Result<bool, SharingError> {
    let (basis, redundant) = shares.split_at(threshold);
    let mut consistent = true;
    for share in redundant {
        let point = field.element_from_u64(u64::from(share.x()))?;
        let expected = interpolate_at(field, basis, &point)?;
        consistent &= field.ct_eq(&expected, share.y());
    }
    Ok(consistent)
}

/// Names the culprit of an inconsistent share set when exactly one share,
/// left out, makes the remaining shares consistent.
fn blame(field: &PrimeField, shares: &[Share], threshold: usize) -> Result<SharingError, SharingError> {
    let mut suspects = Vec::new();
    for (i, suspect) in shares.iter().enumerate() {
        let rest: Vec<Share> = shares
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, share)| share.clone())
            .collect();
        if lie_on_one_polynomial(field, &rest, threshold)? {
            suspects.push(suspect.x());
        }
    }

    match suspects.as_slice() {
        [x] => {
            log::warn!("Share at x = {} does not lie on the polynomial through the others", x);
            Ok(SharingError::CorruptShare { x: *x })
        }
        _ => {
            log::warn!(
                "{} shares do not lie on one polynomial of degree {}",
                shares.len(),
                threshold - 1
            );
            Ok(SharingError::InconsistentShares {
                provided: shares.len(),
            })
        }
    }
}

fn validate_shares(field: &PrimeField, shares: &[Share]) -> Result<(), SharingError> {
    // O(N^2) is fine: N is a handful of holders.
    for (i, a) in shares.iter().enumerate() {
        for b in &shares[i + 1..] {
            if a.x() == b.x() {
                return Err(SharingError::DuplicateXCoordinate {
                    x: a.x(),
                    conflicting: !field.ct_eq(a.y(), b.y()),
                });
            }
        }
    }
    for share in shares {
        check_x(field, share.x())?;
        if !field.contains(share.y()) {
            return Err(SharingError::Field(FieldError::OutOfRange));
        }
    }
    Ok(())
}

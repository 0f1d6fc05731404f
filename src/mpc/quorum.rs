//! Quorum logic for Shamir's Secret Sharing over a prime field.
//!
//! This module validates (t, n) parameters and produces the n shares of a
//! secret.
//!
//! # Security
//! - **Validation first**: Parameters are checked before any randomness is
//!   drawn, so a rejected call consumes nothing from the source.
//! - **Zeroization**: The polynomial wipes its coefficients when it goes out
//!   of scope, on success and on every error path.
//! - **Fresh randomness**: Every call draws new coefficients. Nothing is
//!   cached between calls.

extern crate alloc;
use alloc::vec::Vec;

use crate::core::{FieldElement, FieldError, PrimeField};
use crate::entropy::EntropySource;
use super::polynomial::{Polynomial, MIN_THRESHOLD};
use super::{Share, SharingError};

/// Checks `2 <= threshold <= share_count` and that x = 1..=share_count are
/// distinct non-zero field elements that fit the share encoding.
pub fn validate_parameters(
    field: &PrimeField,
    threshold: usize,
    share_count: usize,
) -> Result<(), SharingError> {
    if threshold < MIN_THRESHOLD || threshold > share_count {
        return Err(SharingError::InvalidThreshold {
            threshold,
            share_count: Some(share_count),
        });
    }
    let fits_encoding = u32::try_from(share_count).is_ok();
    if !fits_encoding || !field.contains_u64(share_count as u64) {
        return Err(SharingError::InvalidShareCount { share_count });
    }
    Ok(())
}

/// Splits `secret` into `share_count` shares, any `threshold` of which
/// reconstruct it.
///
/// Share i (1-based) is `(i, f(i))` for a fresh random polynomial `f` of
/// degree `threshold - 1` with `f(0) = secret`.
///
/// # Errors
/// * `SharingError::InvalidThreshold` unless `2 <= threshold <= share_count`.
/// * `SharingError::InvalidShareCount` if `share_count` is not below the
///   modulus or exceeds `u32::MAX`.
/// * `SharingError::Field` if `secret` is not a canonical element of `field`.
/// * `SharingError::EntropyUnavailable` if the source is weak or fails. No
///   shares are returned.
pub fn split_secret<R: EntropySource + ?Sized>(
    field: &PrimeField,
    secret: &FieldElement,
    threshold: usize,
    share_count: usize,
    rng: &mut R,
) -> Result<Vec<Share>, SharingError> {
    validate_parameters(field, threshold, share_count)?;
    if !field.contains(secret) {
        return Err(SharingError::Field(FieldError::OutOfRange));
    }

    let polynomial = Polynomial::build(field, secret, threshold, rng)?;

    let mut shares = Vec::with_capacity(share_count);
    for x in 1..=share_count as u32 {
        let point = field.element_from_u64(u64::from(x))?;
        shares.push(Share::new(x, polynomial.evaluate(field, &point))?);
    }

    log::debug!(
        "Split secret into {} shares (threshold {}, {}-bit field, source {})",
        share_count,
        threshold,
        field.bits(),
        rng.name()
    );
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use crate::entropy::testing::{CountingEntropy, FailingEntropy, ScriptedEntropy, WeakEntropy};
    use crate::entropy::{EntropyError, OsEntropy};
    use crate::mpc::reconstruct::reconstruct_secret;

    #[test]
    fn test_split_secret_basic() {
        let field = PrimeField::mersenne_61();
        let secret = field.element_from_u64(1234).unwrap();
        let mut rng = CountingEntropy::new(0x10);

        let shares = split_secret(&field, &secret, 2, 3, &mut rng).expect("Split failed");

        assert_eq!(shares.len(), 3);
        for (i, share) in shares.iter().enumerate() {
            assert_eq!(share.x(), (i + 1) as u32);
            assert!(field.contains(share.y()));
        }
    }

    #[test]
    fn test_known_shares() {
        // f(x) = 1234 + 166x + 94x^2 over GF(1613)
        let field = PrimeField::new(BigUint::from(1613u32)).unwrap();
        let secret = field.element_from_u64(1234).unwrap();
        let mut rng = ScriptedEntropy::new(&[166, 94]);

        let shares = split_secret(&field, &secret, 3, 6, &mut rng).unwrap();
        let ys: Vec<u64> = shares.iter().map(|s| s.y().to_u64().unwrap()).collect();
        assert_eq!(ys, [1494, 329, 965, 176, 1188, 775]);
    }

    #[test]
    fn test_invalid_params() {
        let field = PrimeField::mersenne_61();
        let secret = field.element_from_u64(1234).unwrap();
        let mut rng = ScriptedEntropy::new(&[]);

        for (n, t) in [(5usize, 1usize), (5, 6), (5, 0), (0, 2)] {
            assert_eq!(
                split_secret(&field, &secret, t, n, &mut rng),
                Err(SharingError::InvalidThreshold { threshold: t, share_count: Some(n) })
            );
        }
        // Nothing was drawn.
        assert_eq!(rng.last_request(), 0);
    }

    #[test]
    fn test_share_count_bounded_by_modulus() {
        let field = PrimeField::new(BigUint::from(7u32)).unwrap();
        let secret = field.element_from_u64(3).unwrap();
        let mut rng = CountingEntropy::new(0);

        assert!(split_secret(&field, &secret, 2, 6, &mut rng).is_ok());
        assert_eq!(
            split_secret(&field, &secret, 2, 7, &mut rng),
            Err(SharingError::InvalidShareCount { share_count: 7 })
        );
    }

    #[test]
    fn test_secret_from_larger_field_rejected() {
        let small = PrimeField::new(BigUint::from(1613u32)).unwrap();
        let big = PrimeField::mersenne_61();
        let secret = big.element_from_u64(5000).unwrap();
        assert_eq!(
            split_secret(&small, &secret, 2, 3, &mut CountingEntropy::new(0)),
            Err(SharingError::Field(FieldError::OutOfRange))
        );
    }

    #[test]
    fn test_entropy_failure_yields_no_shares() {
        let field = PrimeField::mersenne_127();
        let secret = field.element_from_u64(42).unwrap();
        assert_eq!(
            split_secret(&field, &secret, 3, 5, &mut FailingEntropy),
            Err(SharingError::EntropyUnavailable(EntropyError::CollectionFailed))
        );
        assert_eq!(
            split_secret(&field, &secret, 3, 5, &mut WeakEntropy),
            Err(SharingError::EntropyUnavailable(EntropyError::InsufficientQuality))
        );
    }

    #[test]
    fn test_fresh_randomness_per_call() {
        let field = PrimeField::mersenne_521();
        let secret = field.element_from_u64(7).unwrap();
        let mut rng = OsEntropy::new();

        let first = split_secret(&field, &secret, 2, 2, &mut rng).unwrap();
        let second = split_secret(&field, &secret, 2, 2, &mut rng).unwrap();
        assert_ne!(first[0].y(), second[0].y());
    }

    #[test]
    fn test_threshold_minus_one_shares_are_uniform() {
        // Over GF(31) with t = 3, the pair (f(1), f(2)) takes every value in
        // GF(31)^2 exactly once as (c1, c2) ranges over GF(31)^2, whatever
        // the secret.
        let field = PrimeField::new(BigUint::from(31u32)).unwrap();
        for secret_value in [0u64, 17] {
            let secret = field.element_from_u64(secret_value).unwrap();
            let mut seen = [[0u8; 31]; 31];
            for c1 in 0..31u64 {
                for c2 in 0..31u64 {
                    let mut rng = ScriptedEntropy::new(&[c1, c2]);
                    let shares = split_secret(&field, &secret, 3, 3, &mut rng).unwrap();
                    let y1 = shares[0].y().to_u64().unwrap() as usize;
                    let y2 = shares[1].y().to_u64().unwrap() as usize;
                    seen[y1][y2] += 1;
                }
            }
            assert!(seen.iter().flatten().all(|&count| count == 1));
        }
    }

    #[test]
    fn test_split_then_reconstruct() {
        let field = PrimeField::mersenne_521();
        let secret = field.reduce_bytes_be(&[0xA5; 64]);
        let mut rng = OsEntropy::new();

        let shares = split_secret(&field, &secret, 4, 7, &mut rng).unwrap();
        let subset = [shares[6].clone(), shares[0].clone(), shares[3].clone(), shares[2].clone()];
        assert_eq!(reconstruct_secret(&field, &subset, 4).unwrap(), secret);
    }
}

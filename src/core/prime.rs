//! Primality checks for caller-supplied moduli.
//!
//! The built-in moduli are Mersenne primes and need no check. A modulus coming
//! from configuration is run through Miller-Rabin with the first twelve primes
//! as witnesses, which is deterministic below 3.3 * 10^24 and has error
//! probability below 4^-12 above it.

use num_bigint::BigUint;
use num_traits::{One, Zero};

const WITNESSES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Returns the Mersenne number `2^exponent - 1`.
pub(crate) fn mersenne(exponent: u32) -> BigUint {
    (BigUint::one() << exponent) - 1u32
}

/// Miller-Rabin probable-prime test.
pub fn is_probable_prime(candidate: &BigUint) -> bool {
    if *candidate < BigUint::from(2u32) {
        return false;
    }

    // Trial division by the witnesses also settles every candidate <= 37.
    for &w in WITNESSES.iter() {
        let w = BigUint::from(w);
        if *candidate == w {
            return true;
        }
        if (candidate % &w).is_zero() {
            return false;
        }
    }

    let n_minus_one = candidate - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;
    let two = BigUint::from(2u32);

    'witness: for &w in WITNESSES.iter() {
        let mut x = BigUint::from(w).modpow(&d, candidate);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, candidate);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }

    true
}

//! Prime-field elements.
//!
//! A [`FieldElement`] is an integer in `[0, P)` where `P` is the modulus of the
//! [`PrimeField`](super::field::PrimeField) that produced it. Elements carry the
//! most sensitive material in the crate: the secret, polynomial coefficients
//! and share values.
//!
//! # Security
//! - **Fixed width**: Every element occupies the full 576-bit representation,
//!   whatever its magnitude, so the limb count never depends on the value.
//! - **Zeroization**: Limbs are overwritten in place on drop.
//! - **Redaction**: `Debug` never prints the value.

use core::fmt;
use crypto_bigint::{Encoding, U576};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Width in bytes of the element representation.
pub(crate) const REPR_BYTES: usize = U576::BYTES;

/// An element of a prime field.
///
/// Elements are only created through [`PrimeField`](super::field::PrimeField),
/// which guarantees they are canonical (strictly below the modulus).
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct FieldElement(pub(crate) U576);

impl FieldElement {
    /// Returns `true` for the additive identity.
    pub fn is_zero(&self) -> bool {
        self.0.ct_eq(&U576::ZERO).into()
    }

    /// Returns the value as a `u64` when it fits.
    ///
    /// Intended for small public values such as x-coordinates and test vectors.
    pub fn to_u64(&self) -> Option<u64> {
        let bytes = Zeroizing::new(self.0.to_be_bytes());
        let (high, low) = bytes.split_at(REPR_BYTES - 8);
        if high.iter().any(|&b| b != 0) {
            return None;
        }
        let mut raw = [0u8; 8];
        raw.copy_from_slice(low);
        Some(u64::from_be_bytes(raw))
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldElement")
            .field(&"***SENSITIVE***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroize_element() {
        let mut element = FieldElement(U576::from_u64(1234));
        assert!(!element.is_zero());
        element.zeroize();
        assert!(element.is_zero());
        assert_eq!(element.to_u64(), Some(0));
    }

    #[test]
    fn test_to_u64_rejects_wide_values() {
        let element = FieldElement(U576::ONE.shl_vartime(64));
        assert_eq!(element.to_u64(), None);
        assert_eq!(FieldElement(U576::from_u64(u64::MAX)).to_u64(), Some(u64::MAX));
    }

    #[test]
    fn test_representation_width_is_fixed() {
        let small = FieldElement(U576::from_u64(1234));
        let large = FieldElement(U576::MAX.shr_vartime(55));
        assert_eq!(small.0.as_limbs().len(), large.0.as_limbs().len());
        assert_eq!(core::mem::size_of::<FieldElement>(), REPR_BYTES);
    }

    #[test]
    fn test_debug_redaction() {
        let element = FieldElement(U576::from_u64(987_654_321));
        let debug_str = alloc::format!("{:?}", element);
        assert!(debug_str.contains("***SENSITIVE***"));
        assert!(!debug_str.contains("987654321"));
    }
}

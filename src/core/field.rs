//! Prime-field arithmetic over GF(P) for primes up to 576 bits.
//!
//! Every operation takes canonical operands (values in `[0, P)`) and returns a
//! canonical result.
//!
//! # Design Choices
//! - **Fixed width**: Elements are `crypto-bigint` `U576` values. Every value
//!   is processed at full width, so small secrets take the same number of limb
//!   operations as full-width ones.
//! - **Constant time**: Addition and subtraction use `add_mod`/`sub_mod`,
//!   multiplication runs in Montgomery form (`DynResidue`), and comparisons go
//!   through `subtle`. No operation branches on the value of a secret operand.
//! - **Fixed schedule**: Inversion is `a^(P-2)` with the public exponent `P-2`.
//! - **Public modulus**: The modulus is also kept as a `BigUint` for the
//!   Miller-Rabin check and the fingerprint. It is never secret.
//!
//! # Usage
//! ```
//! use shamir_vault::core::field::PrimeField;
//!
//! let field = PrimeField::mersenne_61();
//! let a = field.element_from_u64(7).unwrap();
//! let b = field.element_from_u64(5).unwrap();
//! let quotient = field.div(&a, &b).unwrap();
//! assert_eq!(field.mul(&quotient, &b), a);
//! ```

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use crypto_bigint::modular::runtime_mod::{DynResidue, DynResidueParams};
use crypto_bigint::{Encoding, U576};
use num_bigint::BigUint;
use subtle::{ConstantTimeEq, ConstantTimeLess};
use zeroize::Zeroizing;

use super::element::{FieldElement, REPR_BYTES};
use super::prime::{is_probable_prime, mersenne};

const LIMBS: usize = U576::LIMBS;

/// Widest modulus the fixed-width representation can hold.
pub const MAX_MODULUS_BITS: u64 = U576::BITS as u64;

/// Bytes folded in per step of [`PrimeField::reduce_bytes_be`].
const REDUCTION_CHUNK: usize = 32;

/// Length of the modulus fingerprint embedded in share envelopes.
pub const FINGERPRINT_LEN: usize = 8;

/// Errors for field arithmetic and element encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Inverse of zero requested.
    DivisionByZero,
    /// Value is not below the modulus.
    OutOfRange,
    /// Modulus is not an odd prime of at least 3.
    InvalidModulus,
    /// Encoded element has the wrong width.
    InvalidEncoding { expected: usize, actual: usize },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::DivisionByZero => write!(f, "Division by zero in field arithmetic"),
            FieldError::OutOfRange => write!(f, "Value is not below the field modulus"),
            FieldError::InvalidModulus => write!(f, "Modulus is not an odd prime"),
            FieldError::InvalidEncoding { expected, actual } => write!(
                f,
                "Field element encoding has {} bytes, expected {}",
                actual, expected
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FieldError {}

/// A prime field GF(P).
///
/// The modulus is public.
#[derive(Clone)]
pub struct PrimeField {
    modulus: BigUint,
    wide_modulus: U576,
    params: DynResidueParams<LIMBS>,
    inversion_exponent: U576,
    byte_len: usize,
}

impl PrimeField {
    /// Creates a field from a caller-chosen modulus.
    ///
    /// # Errors
    /// * `FieldError::InvalidModulus` if the modulus is below 3, wider than
    ///   [`MAX_MODULUS_BITS`], or fails the primality test.
    pub fn new(modulus: BigUint) -> Result<Self, FieldError> {
        if modulus < BigUint::from(3u32)
            || modulus.bits() > MAX_MODULUS_BITS
            || !is_probable_prime(&modulus)
        {
            return Err(FieldError::InvalidModulus);
        }
        Ok(Self::from_prime(modulus))
    }

    /// GF(2^61 - 1). Small enough for readable test vectors.
    pub fn mersenne_61() -> Self {
        Self::from_prime(mersenne(61))
    }

    /// GF(2^127 - 1). Holds 126-bit secrets.
    pub fn mersenne_127() -> Self {
        Self::from_prime(mersenne(127))
    }

    /// GF(2^521 - 1). Holds 512-bit secrets, so any 256-bit cipher key fits.
    pub fn mersenne_521() -> Self {
        Self::from_prime(mersenne(521))
    }

    // Callers guarantee an odd prime of at most `MAX_MODULUS_BITS` bits.
    fn from_prime(modulus: BigUint) -> Self {
        let wide_modulus = uint_from_public(&modulus);
        let inversion_exponent = uint_from_public(&(&modulus - 2u32));
        let byte_len = modulus.bits().div_ceil(8) as usize;
        Self {
            params: DynResidueParams::new(&wide_modulus),
            modulus,
            wide_modulus,
            inversion_exponent,
            byte_len,
        }
    }

    /// The modulus P.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Bit length of P.
    pub fn bits(&self) -> u64 {
        self.modulus.bits()
    }

    /// Width in bytes of an encoded element.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Short identifier of the modulus, used to refuse shares from another field.
    pub fn fingerprint(&self) -> [u8; FINGERPRINT_LEN] {
        let digest = blake3::hash(&self.modulus.to_bytes_be());
        let mut out = [0u8; FINGERPRINT_LEN];
        out.copy_from_slice(&digest.as_bytes()[..FINGERPRINT_LEN]);
        out
    }

    /// Returns `true` when `element` is canonical for this field
    /// (strictly below P). Runs in constant time.
    pub fn contains(&self, element: &FieldElement) -> bool {
        element.0.ct_lt(&self.wide_modulus).into()
    }

    /// Returns `true` when the public integer `value` is below P.
    pub fn contains_u64(&self, value: u64) -> bool {
        BigUint::from(value) < self.modulus
    }

    pub fn zero(&self) -> FieldElement {
        FieldElement(U576::ZERO)
    }

    pub fn one(&self) -> FieldElement {
        FieldElement(U576::ONE)
    }

    /// Wraps a canonical value.
    ///
    /// # Errors
    /// * `FieldError::OutOfRange` if `value >= P`.
    fn element(&self, value: U576) -> Result<FieldElement, FieldError> {
        let element = FieldElement(value);
        if !self.contains(&element) {
            return Err(FieldError::OutOfRange);
        }
        Ok(element)
    }

    pub fn element_from_u64(&self, value: u64) -> Result<FieldElement, FieldError> {
        self.element(U576::from_u64(value))
    }

    /// Decodes an element from exactly `byte_len()` big-endian bytes.
    pub fn element_from_bytes_be(&self, bytes: &[u8]) -> Result<FieldElement, FieldError> {
        if bytes.len() != self.byte_len {
            return Err(FieldError::InvalidEncoding {
                expected: self.byte_len,
                actual: bytes.len(),
            });
        }
        let mut padded = Zeroizing::new([0u8; REPR_BYTES]);
        padded[REPR_BYTES - bytes.len()..].copy_from_slice(bytes);
        self.element(U576::from_be_slice(&*padded))
    }

    /// Reduces an arbitrary-length big-endian integer mod P.
    ///
    /// Used for wide reduction of random bytes. The input is folded in
    /// `REDUCTION_CHUNK`-byte digits with Horner's rule, so the work depends
    /// only on the input length.
    pub fn reduce_bytes_be(&self, bytes: &[u8]) -> FieldElement {
        let radix = DynResidue::new(&U576::ONE.shl_vartime(REDUCTION_CHUNK * 8), self.params);
        let head = bytes.len() % REDUCTION_CHUNK;
        let digits = core::iter::once(&bytes[..head]).chain(bytes[head..].chunks(REDUCTION_CHUNK));

        let mut acc = DynResidue::zero(self.params);
        for digit in digits {
            let mut padded = Zeroizing::new([0u8; REPR_BYTES]);
            padded[REPR_BYTES - digit.len()..].copy_from_slice(digit);
            let digit = DynResidue::new(&U576::from_be_slice(&*padded), self.params);
            acc = &(&acc * &radix) + &digit;
        }
        FieldElement(acc.retrieve())
    }

    /// Encodes an element as exactly `byte_len()` big-endian bytes.
    pub fn to_bytes_be(&self, element: &FieldElement) -> Zeroizing<Vec<u8>> {
        let full = Zeroizing::new(element.0.to_be_bytes());
        let mut out = Zeroizing::new(vec![0u8; self.byte_len]);
        out.copy_from_slice(&full[REPR_BYTES - self.byte_len..]);
        out
    }

    /// Constant-time equality.
    pub fn ct_eq(&self, a: &FieldElement, b: &FieldElement) -> bool {
        a.0.ct_eq(&b.0).into()
    }

    pub fn add(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        FieldElement(a.0.add_mod(&b.0, &self.wide_modulus))
    }

    pub fn sub(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        FieldElement(a.0.sub_mod(&b.0, &self.wide_modulus))
    }

    pub fn neg(&self, a: &FieldElement) -> FieldElement {
        FieldElement(U576::ZERO.sub_mod(&a.0, &self.wide_modulus))
    }

    pub fn mul(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        let product = &self.residue(a) * &self.residue(b);
        FieldElement(product.retrieve())
    }

    /// Multiplicative inverse via Fermat's little theorem: `a^(P-2) mod P`.
    ///
    /// Square-and-multiply over the bits of the public exponent.
    ///
    /// # Errors
    /// * `FieldError::DivisionByZero` if `a == 0`.
    pub fn inv(&self, a: &FieldElement) -> Result<FieldElement, FieldError> {
        if a.is_zero() {
            return Err(FieldError::DivisionByZero);
        }
        let base = self.residue(a);
        let mut acc = DynResidue::one(self.params);
        for byte in self.inversion_exponent.to_be_bytes() {
            for bit in (0..8).rev() {
                acc = &acc * &acc;
                if (byte >> bit) & 1 == 1 {
                    acc = &acc * &base;
                }
            }
        }
        Ok(FieldElement(acc.retrieve()))
    }

    /// `a / b = a * b^-1`.
    pub fn div(&self, a: &FieldElement, b: &FieldElement) -> Result<FieldElement, FieldError> {
        let inverse = self.inv(b)?;
        Ok(self.mul(a, &inverse))
    }

    fn residue(&self, a: &FieldElement) -> DynResidue<LIMBS> {
        DynResidue::new(&a.0, self.params)
    }
}

/// Converts a public integer of at most `MAX_MODULUS_BITS` bits.
fn uint_from_public(value: &BigUint) -> U576 {
    let raw = value.to_bytes_be();
    let mut padded = [0u8; REPR_BYTES];
    padded[REPR_BYTES - raw.len()..].copy_from_slice(&raw);
    U576::from_be_slice(&padded)
}

impl PartialEq for PrimeField {
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus
    }
}

impl Eq for PrimeField {}

impl fmt::Debug for PrimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimeField")
            .field("bits", &self.bits())
            .field("fingerprint", &hex::encode(self.fingerprint()))
            .finish()
    }
}

impl Default for PrimeField {
    fn default() -> Self {
        Self::mersenne_521()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_field() -> PrimeField {
        PrimeField::new(BigUint::from(1613u32)).unwrap()
    }

    fn el(field: &PrimeField, v: u64) -> FieldElement {
        field.element_from_u64(v).unwrap()
    }

    #[test]
    fn test_new_rejects_composites() {
        assert_eq!(
            PrimeField::new(BigUint::from(1615u32)),
            Err(FieldError::InvalidModulus)
        );
        assert_eq!(PrimeField::new(BigUint::from(2u32)), Err(FieldError::InvalidModulus));
        assert!(PrimeField::new(BigUint::from(3u32)).is_ok());
    }

    #[test]
    fn test_new_rejects_modulus_wider_than_representation() {
        // 2^607 - 1 is prime but does not fit 576 bits.
        assert_eq!(PrimeField::new(mersenne(607)), Err(FieldError::InvalidModulus));
    }

    #[test]
    fn test_small_and_full_width_secrets_share_one_path() {
        let f = PrimeField::mersenne_521();
        let p = f.modulus().clone();
        let small = el(&f, 1234);
        let full = f.element_from_bytes_be(&f.to_bytes_be(&f.neg(&f.one()))).unwrap();
        let three = el(&f, 3);

        // Both operands occupy every limb of the representation.
        assert_eq!(small.0.as_limbs().len(), full.0.as_limbs().len());

        for secret in [&small, &full] {
            let reference = BigUint::from_bytes_be(&f.to_bytes_be(secret));
            let product = f.mul(secret, &three);
            assert_eq!(product.0.as_limbs().len(), U576::LIMBS);
            assert_eq!(
                BigUint::from_bytes_be(&f.to_bytes_be(&product)),
                (&reference * 3u32) % &p
            );
            let sum = f.add(secret, &three);
            assert_eq!(BigUint::from_bytes_be(&f.to_bytes_be(&sum)), (&reference + 3u32) % &p);
        }
    }

    #[test]
    fn test_wide_reduction_matches_reference() {
        let f = PrimeField::mersenne_521();
        let bytes: Vec<u8> = (0..82u8).map(|i| i.wrapping_mul(37).wrapping_add(11)).collect();
        let reduced = f.reduce_bytes_be(&bytes);
        let expected = BigUint::from_bytes_be(&bytes) % f.modulus();
        assert_eq!(BigUint::from_bytes_be(&f.to_bytes_be(&reduced)), expected);

        let g = small_field();
        assert_eq!(g.reduce_bytes_be(&[0x07, 0x00]).to_u64(), Some(1792 % 1613));
        assert_eq!(g.reduce_bytes_be(&[]), g.zero());
    }

    #[test]
    fn test_mersenne_sizes() {
        assert_eq!(PrimeField::mersenne_61().bits(), 61);
        assert_eq!(PrimeField::mersenne_61().byte_len(), 8);
        assert_eq!(PrimeField::mersenne_127().byte_len(), 16);
        assert_eq!(PrimeField::mersenne_521().bits(), 521);
        assert_eq!(PrimeField::mersenne_521().byte_len(), 66);
        assert_eq!(PrimeField::default(), PrimeField::mersenne_521());
    }

    #[test]
    fn test_arithmetic_wraps() {
        let f = small_field();
        assert_eq!(f.add(&el(&f, 1600), &el(&f, 20)), el(&f, 7));
        assert_eq!(f.sub(&el(&f, 3), &el(&f, 10)), el(&f, 1606));
        assert_eq!(f.neg(&el(&f, 1)), el(&f, 1612));
        assert_eq!(f.neg(&f.zero()), f.zero());
        assert_eq!(f.mul(&el(&f, 1000), &el(&f, 1000)), el(&f, 1_000_000 % 1613));
    }

    #[test]
    fn test_inverse() {
        let f = small_field();
        for v in [1u64, 2, 3, 166, 1612] {
            let a = el(&f, v);
            let inv = f.inv(&a).unwrap();
            assert_eq!(f.mul(&a, &inv), f.one());
        }
        assert_eq!(f.inv(&f.zero()), Err(FieldError::DivisionByZero));
        assert_eq!(f.div(&f.one(), &f.zero()), Err(FieldError::DivisionByZero));
    }

    #[test]
    fn test_inverse_large_field() {
        let f = PrimeField::mersenne_521();
        let a = f.reduce_bytes_be(&[0xA5; 80]);
        let inv = f.inv(&a).unwrap();
        assert_eq!(f.mul(&a, &inv), f.one());
    }

    #[test]
    fn test_range_checks() {
        let f = small_field();
        assert_eq!(f.element_from_u64(1613), Err(FieldError::OutOfRange));
        assert!(f.element_from_u64(1612).is_ok());
    }

    #[test]
    fn test_fixed_width_encoding() {
        let f = PrimeField::mersenne_61();
        let bytes = f.to_bytes_be(&el(&f, 0x0102));
        assert_eq!(bytes.as_slice(), &[0, 0, 0, 0, 0, 0, 0x01, 0x02]);
        assert_eq!(f.element_from_bytes_be(&bytes).unwrap(), el(&f, 0x0102));

        assert_eq!(f.to_bytes_be(&f.zero()).as_slice(), &[0u8; 8]);
        assert_eq!(
            f.element_from_bytes_be(&[1, 2, 3]),
            Err(FieldError::InvalidEncoding { expected: 8, actual: 3 })
        );
        assert_eq!(f.element_from_bytes_be(&[0xFF; 8]), Err(FieldError::OutOfRange));
    }

    #[test]
    fn test_ct_eq() {
        let f = small_field();
        assert!(f.ct_eq(&el(&f, 42), &el(&f, 42)));
        assert!(!f.ct_eq(&el(&f, 42), &el(&f, 43)));
    }

    #[test]
    fn test_fingerprint_distinguishes_fields() {
        assert_ne!(
            PrimeField::mersenne_61().fingerprint(),
            PrimeField::mersenne_127().fingerprint()
        );
        assert_eq!(
            PrimeField::mersenne_61().fingerprint(),
            PrimeField::mersenne_61().fingerprint()
        );
    }

    #[test]
    fn test_debug_shows_size_only() {
        let debug_str = alloc::format!("{:?}", PrimeField::mersenne_61());
        assert!(debug_str.contains("bits: 61"));
    }
}

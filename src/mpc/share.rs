//! Secret Share Definition.
//!
//! A share is a point $(x, y)$ on the polynomial used to hide the secret.
//! - $x$: A non-zero public coordinate unique to each holder.
//! - $y$: The evaluation of the polynomial at $x$, a field element.
//!
//! # Encodings
//! - Binary: `x` as u32 big-endian, then `y` as exactly `byte_len()`
//!   big-endian bytes of the field.
//! - Text: `(x, <hex y>)` with `y` in fixed-width lowercase hex.
//!
//! # Security
//! - Implements `Zeroize` and `ZeroizeOnDrop` to wipe sensitive data from memory.
//! - `Debug` implementation redacts the y value.

extern crate alloc;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::core::{FieldElement, PrimeField};
use super::SharingError;

/// Width of the encoded x-coordinate.
pub const X_LEN: usize = 4;

/// A share of a secret.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    /// Public information (who holds the share).
    #[zeroize(skip)]
    x: u32,

    /// Highly sensitive information.
    y: FieldElement,
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("x", &self.x)
            .field("y", &"***SENSITIVE***")
            .finish()
    }
}

impl Share {
    /// Creates a new share.
    ///
    /// # Errors
    /// * `SharingError::InvalidXCoordinate` if `x == 0`. A share at zero would
    ///   be the secret itself.
    pub fn new(x: u32, y: FieldElement) -> Result<Self, SharingError> {
        if x == 0 {
            return Err(SharingError::InvalidXCoordinate { x });
        }
        Ok(Self { x, y })
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> &FieldElement {
        &self.y
    }

    /// Length of the binary encoding over `field`.
    pub fn encoded_len(field: &PrimeField) -> usize {
        X_LEN + field.byte_len()
    }

    /// Binary encoding: `x (u32 BE) || y (field width BE)`.
    pub fn to_bytes(&self, field: &PrimeField) -> Zeroizing<Vec<u8>> {
        let y = field.to_bytes_be(&self.y);
        let mut out = Zeroizing::new(Vec::with_capacity(X_LEN + y.len()));
        out.extend_from_slice(&self.x.to_be_bytes());
        out.extend_from_slice(&y);
        out
    }

    /// Decodes the binary form produced by [`Share::to_bytes`].
    ///
    /// # Errors
    /// * `SharingError::MalformedShare` on a length mismatch or a y value that
    ///   is not below the modulus.
    /// * `SharingError::InvalidXCoordinate` if `x` is zero or not below the
    ///   modulus.
    pub fn from_bytes(field: &PrimeField, bytes: &[u8]) -> Result<Self, SharingError> {
        if bytes.len() != Self::encoded_len(field) {
            return Err(SharingError::MalformedShare("unexpected share length"));
        }
        let (x_bytes, y_bytes) = bytes.split_at(X_LEN);
        let mut x_raw = [0u8; X_LEN];
        x_raw.copy_from_slice(x_bytes);
        let x = u32::from_be_bytes(x_raw);
        check_x(field, x)?;

        let y = field
            .element_from_bytes_be(y_bytes)
            .map_err(|_| SharingError::MalformedShare("share value out of range"))?;
        Self::new(x, y)
    }

    /// Text form `(x, <hex y>)`.
    pub fn to_text(&self, field: &PrimeField) -> Zeroizing<String> {
        let y = field.to_bytes_be(&self.y);
        let y_hex = Zeroizing::new(hex::encode(&*y));
        Zeroizing::new(format!("({}, {})", self.x, y_hex.as_str()))
    }

    /// Parses the text form produced by [`Share::to_text`]. Surrounding
    /// whitespace is ignored and the hex may be either case.
    pub fn parse_text(field: &PrimeField, text: &str) -> Result<Self, SharingError> {
        let inner = text
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(SharingError::MalformedShare("expected \"(x, y)\""))?;
        let (x_text, y_text) = inner
            .split_once(',')
            .ok_or(SharingError::MalformedShare("missing separator"))?;

        let x: u32 = x_text
            .trim()
            .parse()
            .map_err(|_| SharingError::MalformedShare("x-coordinate is not a decimal integer"))?;
        check_x(field, x)?;

        let y_text = y_text.trim();
        if y_text.len() != field.byte_len() * 2 {
            return Err(SharingError::MalformedShare("share value has the wrong width"));
        }
        let mut y_bytes = Zeroizing::new(vec![0u8; field.byte_len()]);
        hex::decode_to_slice(y_text, &mut y_bytes)
            .map_err(|_| SharingError::MalformedShare("share value is not hex"))?;
        let y = field
            .element_from_bytes_be(&y_bytes)
            .map_err(|_| SharingError::MalformedShare("share value out of range"))?;
        Self::new(x, y)
    }
}

/// Rejects x-coordinates that are zero or not below the modulus.
pub(crate) fn check_x(field: &PrimeField, x: u32) -> Result<(), SharingError> {
    if x == 0 || !field.contains_u64(u64::from(x)) {
        return Err(SharingError::InvalidXCoordinate { x });
    }
    Ok(())
}

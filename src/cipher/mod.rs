//! File encryption under the shared key.
//!
//! The sharing engine only ever sees the key as a field element. This module
//! owns the other side: a 256-bit [`CipherKey`], its conversion to and from
//! the secret, and the [`FileCipher`] capability that encrypts a byte stream
//! under it.

pub mod chacha;

use core::fmt;
use std::io::{Read, Write};
use zeroize::Zeroizing;

use crate::core::{FieldElement, PrimeField};
use crate::entropy::{require_full_entropy, EntropyError, EntropySource};

pub use chacha::ChaChaFileCipher;

/// Key length in bytes.
pub const KEY_LEN: usize = 32;

/// Errors from key handling and file encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherError {
    /// Reading the input or writing the output failed.
    Io,
    /// Input is larger than the cipher accepts.
    TooLarge,
    /// Not a file produced by this cipher.
    BadHeader,
    /// Wrong key, or the ciphertext was modified.
    AuthenticationFailed,
    /// Secret does not fit in a key, or a key does not fit in the field.
    KeyDoesNotFit,
    /// Randomness for a key or nonce was unavailable.
    Entropy(EntropyError),
}

impl fmt::Display for CipherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherError::Io => write!(f, "I/O error during encryption"),
            CipherError::TooLarge => write!(f, "Input too large"),
            CipherError::BadHeader => write!(f, "Not an encrypted vault file"),
            CipherError::AuthenticationFailed => {
                write!(f, "Decryption failed: wrong key or modified file")
            }
            CipherError::KeyDoesNotFit => write!(f, "Key and field widths are incompatible"),
            CipherError::Entropy(err) => write!(f, "Entropy error: {}", err),
        }
    }
}

impl std::error::Error for CipherError {}

impl From<std::io::Error> for CipherError {
    fn from(err: std::io::Error) -> Self {
        log::debug!("Cipher stream error: {}", err);
        CipherError::Io
    }
}

impl From<EntropyError> for CipherError {
    fn from(err: EntropyError) -> Self {
        CipherError::Entropy(err)
    }
}

/// A 256-bit symmetric key. Wiped on drop.
#[derive(Clone)]
pub struct CipherKey(Zeroizing<[u8; KEY_LEN]>);

impl CipherKey {
    /// Draws a fresh key from `rng`.
    pub fn generate<R: EntropySource + ?Sized>(rng: &mut R) -> Result<Self, CipherError> {
        require_full_entropy(rng)?;
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        rng.fill(&mut *key)?;
        Ok(Self(key))
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Whether every key is a canonical element of `field`.
    pub fn fits(field: &PrimeField) -> bool {
        field.bits() > (KEY_LEN as u64) * 8
    }

    /// Reads the key as a big-endian integer in `field`.
    ///
    /// # Errors
    /// * `CipherError::KeyDoesNotFit` unless the field is wider than 256
    ///   bits, so the outcome never depends on the key value.
    pub fn to_secret(&self, field: &PrimeField) -> Result<FieldElement, CipherError> {
        if !Self::fits(field) {
            return Err(CipherError::KeyDoesNotFit);
        }
        let mut padded = Zeroizing::new(vec![0u8; field.byte_len()]);
        let offset = padded.len() - KEY_LEN;
        padded[offset..].copy_from_slice(&*self.0);
        field
            .element_from_bytes_be(&padded)
            .map_err(|_| CipherError::KeyDoesNotFit)
    }

    /// Inverse of [`CipherKey::to_secret`].
    ///
    /// # Errors
    /// * `CipherError::KeyDoesNotFit` if the secret is 2^256 or more.
    pub fn from_secret(field: &PrimeField, secret: &FieldElement) -> Result<Self, CipherError> {
        let bytes = field.to_bytes_be(secret);
        if bytes.len() < KEY_LEN {
            let mut key = Zeroizing::new([0u8; KEY_LEN]);
            key[KEY_LEN - bytes.len()..].copy_from_slice(&bytes);
            return Ok(Self(key));
        }
        let (high, low) = bytes.split_at(bytes.len() - KEY_LEN);
        if high.iter().fold(0u8, |acc, b| acc | b) != 0 {
            return Err(CipherError::KeyDoesNotFit);
        }
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(low);
        Ok(Self(key))
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CipherKey(***SENSITIVE***)")
    }
}

/// Symmetric encryption of a byte stream under a [`CipherKey`].
pub trait FileCipher {
    /// Encrypts all of `plaintext` into `ciphertext`. Returns the number of
    /// bytes written.
    fn encrypt(
        &mut self,
        plaintext: &mut dyn Read,
        ciphertext: &mut dyn Write,
        key: &CipherKey,
    ) -> Result<u64, CipherError>;

    /// Decrypts all of `ciphertext` into `plaintext`. Nothing is written
    /// unless authentication succeeds. Returns the number of bytes written.
    fn decrypt(
        &self,
        ciphertext: &mut dyn Read,
        plaintext: &mut dyn Write,
        key: &CipherKey,
    ) -> Result<u64, CipherError>;
}

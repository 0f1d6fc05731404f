//! Share envelopes.
//!
//! An envelope is what a holder actually keeps: the share plus everything
//! needed to use it later without outside bookkeeping.
//!
//! ```text
//! "SSV1" | threshold (u32 BE) | field fingerprint (8) | x (u32 BE) | y (field width) | BLAKE3 checksum (32)
//! ```
//!
//! The checksum covers every preceding byte. It catches transcription errors;
//! it is not an authenticator, since anyone can recompute it.

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;
use zeroize::Zeroizing;

use crate::core::field::FINGERPRINT_LEN;
use crate::core::{FieldElement, PrimeField};
use super::polynomial::MIN_THRESHOLD;
use super::reconstruct::reconstruct_secret;
use super::share::X_LEN;
use super::{Share, SharingError};

pub const ENVELOPE_MAGIC: &[u8; 4] = b"SSV1";
pub const CHECKSUM_LEN: usize = 32;
const HEADER_LEN: usize = 4 + 4 + FINGERPRINT_LEN;

/// A share bound to its threshold and field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareEnvelope {
    threshold: usize,
    field: PrimeField,
    share: Share,
}

impl ShareEnvelope {
    /// # Errors
    /// * `SharingError::InvalidThreshold` if `threshold < 2` or it does not
    ///   fit the u32 header field.
    pub fn new(field: &PrimeField, threshold: usize, share: Share) -> Result<Self, SharingError> {
        if threshold < MIN_THRESHOLD || u32::try_from(threshold).is_err() {
            return Err(SharingError::InvalidThreshold {
                threshold,
                share_count: None,
            });
        }
        Ok(Self {
            threshold,
            field: field.clone(),
            share,
        })
    }

    /// Wraps every share of one sharing operation.
    pub fn wrap_all(
        field: &PrimeField,
        threshold: usize,
        shares: Vec<Share>,
    ) -> Result<Vec<Self>, SharingError> {
        shares
            .into_iter()
            .map(|share| Self::new(field, threshold, share))
            .collect()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    pub fn share(&self) -> &Share {
        &self.share
    }

    pub fn x(&self) -> u32 {
        self.share.x()
    }

    pub fn into_share(self) -> Share {
        self.share
    }

    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let share = self.share.to_bytes(&self.field);
        let mut out = Zeroizing::new(Vec::with_capacity(HEADER_LEN + share.len() + CHECKSUM_LEN));
        out.extend_from_slice(ENVELOPE_MAGIC);
        // Checked in `new`.
        out.extend_from_slice(&(self.threshold as u32).to_be_bytes());
        out.extend_from_slice(&self.field.fingerprint());
        out.extend_from_slice(&share);
        let checksum = blake3::hash(&out);
        out.extend_from_slice(checksum.as_bytes());
        out
    }

    /// Decodes an envelope produced over `field`.
    ///
    /// # Errors
    /// * `SharingError::MalformedShare` on a bad length or magic.
    /// * `SharingError::FieldMismatch` if the envelope names another field.
    /// * `SharingError::CorruptShare` if the checksum does not match.
    pub fn from_bytes(field: &PrimeField, bytes: &[u8]) -> Result<Self, SharingError> {
        let share_len = Share::encoded_len(field);
        if bytes.len() < HEADER_LEN + X_LEN + CHECKSUM_LEN {
            return Err(SharingError::MalformedShare("envelope too short"));
        }
        if &bytes[..4] != ENVELOPE_MAGIC {
            return Err(SharingError::MalformedShare("bad envelope magic"));
        }
        if bytes[8..HEADER_LEN] != field.fingerprint() {
            return Err(SharingError::FieldMismatch);
        }
        if bytes.len() != HEADER_LEN + share_len + CHECKSUM_LEN {
            return Err(SharingError::MalformedShare("unexpected envelope length"));
        }

        let (body, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
        let mut expected = [0u8; CHECKSUM_LEN];
        expected.copy_from_slice(checksum);
        if blake3::hash(body) != blake3::Hash::from(expected) {
            let mut x_raw = [0u8; X_LEN];
            x_raw.copy_from_slice(&body[HEADER_LEN..HEADER_LEN + X_LEN]);
            let x = u32::from_be_bytes(x_raw);
            log::warn!("Envelope checksum mismatch for share x = {}", x);
            return Err(SharingError::CorruptShare { x });
        }

        let mut threshold_raw = [0u8; 4];
        threshold_raw.copy_from_slice(&body[4..8]);
        let threshold = u32::from_be_bytes(threshold_raw) as usize;
        let share = Share::from_bytes(field, &body[HEADER_LEN..])?;
        Self::new(field, threshold, share)
    }

    /// Lowercase hex of [`ShareEnvelope::to_bytes`].
    pub fn to_text(&self) -> Zeroizing<String> {
        let bytes = self.to_bytes();
        Zeroizing::new(hex::encode(&*bytes))
    }

    pub fn parse_text(field: &PrimeField, text: &str) -> Result<Self, SharingError> {
        let bytes = Zeroizing::new(
            hex::decode(text.trim()).map_err(|_| SharingError::MalformedShare("envelope is not hex"))?,
        );
        Self::from_bytes(field, &bytes)
    }
}

/// Reconstructs the secret from envelopes that agree on threshold and field.
///
/// # Errors
/// * `SharingError::InsufficientShares` if `envelopes` is empty.
/// * `SharingError::FieldMismatch` if the envelopes name different fields.
/// * `SharingError::MalformedShare` if they disagree on the threshold.
/// * Anything [`reconstruct_secret`] reports.
pub fn reconstruct_from_envelopes(
    envelopes: &[ShareEnvelope],
) -> Result<FieldElement, SharingError> {
    let first = envelopes.first().ok_or(SharingError::InsufficientShares {
        required: MIN_THRESHOLD,
        provided: 0,
    })?;
    for envelope in &envelopes[1..] {
        if envelope.field != first.field {
            return Err(SharingError::FieldMismatch);
        }
        if envelope.threshold != first.threshold {
            return Err(SharingError::MalformedShare("envelopes disagree on the threshold"));
        }
    }

    let shares: Vec<Share> = envelopes.iter().map(|e| e.share.clone()).collect();
    reconstruct_secret(&first.field, &shares, first.threshold)
}

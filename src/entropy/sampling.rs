//! Uniform sampling of field elements.

extern crate alloc;
use alloc::vec;
use zeroize::Zeroizing;

use super::{EntropyError, EntropySource};
use crate::core::{FieldElement, PrimeField};

/// Extra bytes drawn beyond the modulus width. Wide reduction of
/// `byte_len + 16` uniform bytes leaves a statistical distance below 2^-128
/// from uniform on `[0, P)`.
pub const SAMPLING_MARGIN_BYTES: usize = 16;

/// Draws a field element uniformly from `[0, P)`.
///
/// # Errors
/// * Whatever the source reports when it cannot deliver the bytes. Callers
///   must treat this as fatal.
pub fn next_field_element<R: EntropySource + ?Sized>(
    rng: &mut R,
    field: &PrimeField,
) -> Result<FieldElement, EntropyError> {
    let mut wide = Zeroizing::new(vec![0u8; field.byte_len() + SAMPLING_MARGIN_BYTES]);
    rng.fill(&mut wide)?;
    Ok(field.reduce_bytes_be(&wide))
}

//! Operating-system CSPRNG source.
//!
//! Reads from the platform generator (`getrandom`, `/dev/urandom`,
//! `BCryptGenRandom`, ...) through `rand_core::OsRng`. The handle is
//! stateless, so every operation can hold its own.

use rand_core::{OsRng, RngCore};
use super::{EntropyError, EntropySource, FULL_ENTROPY};

/// Operating-system entropy source.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy {
    _private: (),
}

impl OsEntropy {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl EntropySource for OsEntropy {
    fn name(&self) -> &'static str {
        "OsRng"
    }

    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        OsRng.try_fill_bytes(dest).map_err(|err| {
            log::error!("Operating system entropy source failed: {}", err);
            EntropyError::CollectionFailed
        })
    }

    fn entropy_estimate(&self) -> f64 {
        FULL_ENTROPY
    }
}

//! Deterministic entropy sources for unit tests.

extern crate alloc;
use alloc::collections::VecDeque;
use super::{EntropyError, EntropySource, FULL_ENTROPY};

/// Emits an incrementing byte counter.
pub(crate) struct CountingEntropy {
    next: u8,
}

impl CountingEntropy {
    pub(crate) fn new(start: u8) -> Self {
        Self { next: start }
    }
}

impl EntropySource for CountingEntropy {
    fn name(&self) -> &'static str { "Counting" }
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        for b in dest.iter_mut() {
            *b = self.next;
            self.next = self.next.wrapping_add(1);
        }
        Ok(())
    }
    fn entropy_estimate(&self) -> f64 { FULL_ENTROPY }
}

/// Replays a script of integers, one per request, each written big-endian
/// into the tail of the requested buffer.
pub(crate) struct ScriptedEntropy {
    values: VecDeque<u64>,
    last_request: usize,
}

impl ScriptedEntropy {
    pub(crate) fn new(values: &[u64]) -> Self {
        Self {
            values: values.iter().copied().collect(),
            last_request: 0,
        }
    }

    pub(crate) fn last_request(&self) -> usize {
        self.last_request
    }
}

impl EntropySource for ScriptedEntropy {
    fn name(&self) -> &'static str { "Scripted" }
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        self.last_request = dest.len();
        let value = self.values.pop_front().ok_or(EntropyError::Exhausted)?;
        let bytes = value.to_be_bytes();
        dest.fill(0);
        let n = dest.len().min(bytes.len());
        let dest_len = dest.len();
        dest[dest_len - n..].copy_from_slice(&bytes[bytes.len() - n..]);
        Ok(())
    }
    fn entropy_estimate(&self) -> f64 { FULL_ENTROPY }
}

/// Always fails.
pub(crate) struct FailingEntropy;

impl EntropySource for FailingEntropy {
    fn name(&self) -> &'static str { "Failing" }
    fn fill(&mut self, _dest: &mut [u8]) -> Result<(), EntropyError> {
        Err(EntropyError::CollectionFailed)
    }
    fn entropy_estimate(&self) -> f64 { FULL_ENTROPY }
}

/// Works, but admits to being weak.
pub(crate) struct WeakEntropy;

impl EntropySource for WeakEntropy {
    fn name(&self) -> &'static str { "Weak" }
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        dest.fill(0x5A);
        Ok(())
    }
    fn entropy_estimate(&self) -> f64 { 2.0 }
}

/// Deterministic stream expanded from a seed with the BLAKE3 XOF.
pub(crate) struct SeededEntropy {
    stream: blake3::OutputReader,
}

impl SeededEntropy {
    pub(crate) fn new(seed: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"seeded test entropy");
        hasher.update(&seed.to_le_bytes());
        Self { stream: hasher.finalize_xof() }
    }
}

impl EntropySource for SeededEntropy {
    fn name(&self) -> &'static str { "Seeded" }
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        self.stream.fill(dest);
        Ok(())
    }
    fn entropy_estimate(&self) -> f64 { FULL_ENTROPY }
}

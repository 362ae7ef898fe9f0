//! Entropy sources for tests.

use std::collections::VecDeque;

use rand_core::{impls, CryptoRng, Error, RngCore};

/// An entropy source which replays a fixed byte sequence.
///
/// Panics once the script is exhausted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    bytes: VecDeque<u8>,
}

impl ScriptedRng {
    /// Creates a new source replaying `bytes`.
    pub fn new(bytes: impl Into<VecDeque<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Appends bytes to the end of the script.
    pub fn extend(&mut self, bytes: impl IntoIterator<Item = u8>) {
        self.bytes.extend(bytes);
    }

    /// Returns `true` if every scripted byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest {
            *byte = self.bytes.pop_front().expect("entropy script exhausted");
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for ScriptedRng {}

/// An entropy source which panics when read.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEntropy;

impl RngCore for NoEntropy {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("entropy was read")
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for NoEntropy {}

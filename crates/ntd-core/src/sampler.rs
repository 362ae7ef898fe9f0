//! Uniform sampling of integers from a secure random source.

use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};

/// A sampling error.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    /// The range is empty.
    #[error("invalid range: {0}, expected at least 1")]
    InvalidRange(u64),
}

/// Draws integers uniformly distributed in `[0, range)`.
///
/// Each draw reads the smallest number of bytes `k` such that
/// `2^(8k) >= range` and interprets them as a big-endian integer `r`. Draws
/// with `r` at or above the largest multiple of `range` not exceeding
/// `2^(8k)` are rejected, so every value in the range is equally likely.
#[derive(Debug, Clone)]
pub struct UniformSampler<R = OsRng> {
    rng: R,
}

impl Default for UniformSampler<OsRng> {
    fn default() -> Self {
        Self::new(OsRng)
    }
}

impl<R> UniformSampler<R>
where
    R: RngCore + CryptoRng,
{
    /// Creates a new sampler drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns a mutable reference to the entropy source.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Returns the entropy source.
    pub fn into_inner(self) -> R {
        self.rng
    }

    /// Samples a value uniformly from `[0, range)`.
    ///
    /// A range of 1 returns 0 without consuming entropy.
    pub fn sample(&mut self, range: u64) -> Result<u64, SampleError> {
        if range == 0 {
            return Err(SampleError::InvalidRange(range));
        }

        if range == 1 {
            return Ok(0);
        }

        let len = byte_len(range);
        let space = 1u128 << (8 * len);
        let range = u128::from(range);
        let limit = space / range * range;

        let mut buf = [0u8; 8];
        loop {
            self.rng.fill_bytes(&mut buf[8 - len..]);
            let r = u128::from(u64::from_be_bytes(buf));

            if r < limit {
                return Ok((r % range) as u64);
            }

            tracing::trace!(range = %range, draw = %r, "rejected biased draw");
        }
    }
}

/// Returns the smallest `k` such that `2^(8k) >= range`.
fn byte_len(range: u64) -> usize {
    let bits = u64::BITS - range.saturating_sub(1).leading_zeros();
    bits.div_ceil(8) as usize
}

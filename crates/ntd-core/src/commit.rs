//! Keyed commitments to a hidden integer.
//!
//! A commitment binds a hidden value to a digest computed with HMAC-SHA-256
//! under a fresh 256-bit key. The digest is published first; the key and the
//! value are disclosed later so anyone can recompute the digest.
//!
//! The MAC input is the decimal rendering of the value, so a digest can be
//! checked with any standard HMAC tool.

use std::fmt;

use hmac::{Hmac, Mac};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of a commitment key in bytes.
pub const KEY_LEN: usize = 32;
/// Length of a digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// A commitment error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum CommitmentError {
    #[error("malformed key: expected {expected} bytes, got {actual}")]
    MalformedKey { expected: usize, actual: usize },
    #[error("malformed digest: expected {expected} bytes, got {actual}")]
    MalformedDigest { expected: usize, actual: usize },
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("value {value} is outside of the range [0, {range})")]
    ValueOutOfRange { value: u64, range: u64 },
}

/// A secret commitment key.
pub struct Key([u8; KEY_LEN]);

opaque_debug::implement!(Key);

impl Key {
    /// Generates a fresh key.
    pub fn random<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut key = [0u8; KEY_LEN];
        rng.fill_bytes(&mut key);
        Self(key)
    }

    /// Creates a key from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CommitmentError> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| CommitmentError::MalformedKey {
                expected: KEY_LEN,
                actual: bytes.len(),
            })
    }

    /// Parses a hex encoded key.
    pub fn from_hex(s: &str) -> Result<Self, CommitmentError> {
        Self::from_bytes(&hex::decode(s.trim())?)
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Returns the key as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    fn mac(&self, value: u64) -> Result<HmacSha256, CommitmentError> {
        let mut mac =
            HmacSha256::new_from_slice(&self.0).map_err(|_| CommitmentError::MalformedKey {
                expected: KEY_LEN,
                actual: self.0.len(),
            })?;
        mac.update(value.to_string().as_bytes());
        Ok(mac)
    }

    fn digest(&self, value: u64) -> Result<Digest, CommitmentError> {
        let tag = self.mac(value)?.finalize().into_bytes();

        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&tag);
        Ok(Digest(digest))
    }

    fn verify(&self, value: u64, digest: &[u8]) -> Result<bool, CommitmentError> {
        Ok(self.mac(value)?.verify_slice(digest).is_ok())
    }
}

/// A digest binding a hidden value to a key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Creates a digest from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CommitmentError> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| CommitmentError::MalformedDigest {
                expected: DIGEST_LEN,
                actual: bytes.len(),
            })
    }

    /// Parses a hex encoded digest.
    pub fn from_hex(s: &str) -> Result<Self, CommitmentError> {
        Self::from_bytes(&hex::decode(s.trim())?)
    }

    /// Returns the digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Returns the digest as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Digest").field(&self.to_hex()).finish()
    }
}

/// A commitment to a hidden value.
///
/// Holds the secret key and the value; only [`Commitment::digest`] may be
/// published before the commitment is opened.
pub struct Commitment {
    key: Key,
    value: u64,
    range: u64,
    digest: Digest,
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commitment")
            .field("range", &self.range)
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}

impl Commitment {
    /// Returns the digest, which is safe to publish.
    pub fn digest(&self) -> Digest {
        self.digest
    }

    /// Returns the range the hidden value was drawn from.
    pub fn range(&self) -> u64 {
        self.range
    }

    /// Returns the hidden value.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Returns `true` if the stored digest matches the key and value.
    pub fn is_consistent(&self) -> Result<bool, CommitmentError> {
        self.key.verify(self.value, &self.digest.0)
    }

    /// Opens the commitment, returning the key and the hidden value.
    pub fn open(self) -> (Key, u64) {
        (self.key, self.value)
    }
}

/// Commits to `value`, a member of `[0, range)`, under a fresh key.
///
/// Returns the full commitment, kept by the committing party, and its digest
/// which is published to the counterpart.
pub fn commit<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    value: u64,
    range: u64,
) -> Result<(Commitment, Digest), CommitmentError> {
    if value >= range {
        return Err(CommitmentError::ValueOutOfRange { value, range });
    }

    let key = Key::random(rng);
    let digest = key.digest(value)?;

    Ok((
        Commitment {
            key,
            value,
            range,
            digest,
        },
        digest,
    ))
}

/// Verifies that `digest` was computed from `key` and `value`.
///
/// The comparison is constant-time. A mismatch, including a digest of the
/// wrong length, returns `false`.
pub fn verify(key: &[u8], value: u64, digest: &[u8]) -> Result<bool, CommitmentError> {
    Key::from_bytes(key)?.verify(value, digest)
}

/// (De)serializes a disclosed key as hex.
pub(crate) mod hex_key {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::Key;

    pub(crate) fn serialize<S: Serializer>(key: &Key, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&key.to_hex())
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Key, D::Error> {
        let s = String::deserialize(deserializer)?;
        Key::from_hex(&s).map_err(D::Error::custom)
    }
}

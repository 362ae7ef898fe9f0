//! Fair collaborative generation of a random value.
//!
//! One party (the house) draws a hidden value uniformly from `[0, range)`
//! and publishes a digest committing to it. The counterpart then chooses its
//! own value in the same range. The house reveals the hidden value and key,
//! and the result is `(hidden + counterpart) mod range`.
//!
//! The result is uniform as long as either contribution is: the house cannot
//! change its value after seeing the counterpart's, and the counterpart
//! chooses before learning the hidden value.
//!
//! [`FairRandomSession`] runs a single round and reports protocol misuse as
//! [`SessionError::InvalidState`]. [`Round`] is the underlying typestate API.

mod round;

pub use round::{state as round_state, Round};

use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{
    commit::{self, CommitmentError, Digest, Key},
    sampler::{SampleError, UniformSampler},
};

/// A session error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum SessionError {
    #[error("invalid range: {0}, expected at least 1")]
    InvalidRange(u64),
    #[error("invalid state: expected {0}")]
    InvalidState(String),
    #[error("counterpart value {value} is outside of the range [0, {range})")]
    OutOfRange { value: u64, range: u64 },
    #[error(transparent)]
    Commitment(#[from] CommitmentError),
    #[error("commitment does not match its digest")]
    IntegrityCheckFailed,
}

impl From<SampleError> for SessionError {
    fn from(err: SampleError) -> Self {
        match err {
            SampleError::InvalidRange(range) => SessionError::InvalidRange(range),
        }
    }
}

/// The disclosed outcome of a round.
#[derive(Debug, Serialize, Deserialize)]
pub struct Reveal {
    /// The commitment key.
    #[serde(with = "commit::hex_key")]
    pub key: Key,
    /// The house's hidden value.
    pub hidden_value: u64,
    /// The counterpart's value.
    pub counterpart_value: u64,
    /// The range of the round.
    pub range: u64,
    /// The combined result, `(hidden_value + counterpart_value) mod range`.
    pub result: u64,
}

impl Reveal {
    /// Verifies the reveal against the digest published at commit time.
    ///
    /// Returns `false` if the digest does not match the disclosed key and
    /// hidden value, or if the result was not combined correctly.
    pub fn verify(&self, digest: &Digest) -> Result<bool, CommitmentError> {
        if self.hidden_value >= self.range || self.counterpart_value >= self.range {
            return Ok(false);
        }

        let digest_ok = commit::verify(self.key.as_bytes(), self.hidden_value, digest.as_bytes())?;

        Ok(digest_ok && self.result == combine(self.hidden_value, self.counterpart_value, self.range))
    }
}

/// Combines two contributions in `[0, range)`.
pub fn combine(hidden_value: u64, counterpart_value: u64, range: u64) -> u64 {
    ((u128::from(hidden_value) + u128::from(counterpart_value)) % u128::from(range)) as u64
}

#[derive(Debug)]
enum State {
    Idle,
    Committed(Round<round_state::Committed>),
    Revealed,
    Error,
}

/// A single-use fair random session.
///
/// `Idle --initiate--> Committed --reveal--> Revealed`. A new round requires a
/// new session.
#[derive(Debug)]
pub struct FairRandomSession<R = OsRng> {
    sampler: UniformSampler<R>,
    state: State,
}

impl Default for FairRandomSession<OsRng> {
    fn default() -> Self {
        Self::new(OsRng)
    }
}

impl<R> FairRandomSession<R>
where
    R: RngCore + CryptoRng,
{
    /// Creates a new session drawing entropy from `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            sampler: UniformSampler::new(rng),
            state: State::Idle,
        }
    }

    /// Returns the range of the round, once initiated.
    pub fn range(&self) -> Option<u64> {
        match &self.state {
            State::Committed(round) => Some(round.range()),
            _ => None,
        }
    }

    /// Returns the published digest while the session is committed.
    pub fn digest(&self) -> Option<Digest> {
        match &self.state {
            State::Committed(round) => Some(round.digest()),
            _ => None,
        }
    }

    /// Returns `true` if the session has been revealed.
    pub fn is_revealed(&self) -> bool {
        matches!(self.state, State::Revealed)
    }

    /// Returns the entropy source.
    pub fn into_rng(self) -> R {
        self.sampler.into_inner()
    }

    /// Commits to a hidden value in `[0, range)`.
    ///
    /// Returns the digest, which must be shown to the counterpart before its
    /// value is requested.
    pub fn initiate(&mut self, range: u64) -> Result<Digest, SessionError> {
        if !matches!(self.state, State::Idle) {
            return Err(SessionError::InvalidState("idle".to_string()));
        }

        let (round, digest) = Round::new(range)?.commit(&mut self.sampler)?;

        tracing::debug!(range, %digest, "committed to hidden value");

        self.state = State::Committed(round);

        Ok(digest)
    }

    /// Reveals the hidden value and combines it with the counterpart's value.
    ///
    /// A counterpart value outside of the range is rejected and the session
    /// stays committed, so the caller may ask again.
    pub fn reveal(&mut self, counterpart_value: u64) -> Result<Reveal, SessionError> {
        let round = match std::mem::replace(&mut self.state, State::Error) {
            State::Committed(round) => round,
            state => {
                self.state = state;
                return Err(SessionError::InvalidState("committed".to_string()));
            }
        };

        if let Err(err) = round.check_counterpart(counterpart_value) {
            self.state = State::Committed(round);
            return Err(err);
        }

        let reveal = round.reveal(counterpart_value).map_err(|err| {
            tracing::warn!(error = %err, "failed to reveal commitment");
            err
        })?;

        tracing::debug!(
            range = reveal.range,
            counterpart_value,
            result = reveal.result,
            "revealed commitment"
        );

        self.state = State::Revealed;

        Ok(reveal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedRng;

    use rand_chacha::ChaCha12Rng;
    use rand_core::SeedableRng;
    use rstest::*;

    #[fixture]
    fn session() -> FairRandomSession<ChaCha12Rng> {
        FairRandomSession::new(ChaCha12Rng::seed_from_u64(0))
    }

    #[rstest]
    fn test_session(mut session: FairRandomSession<ChaCha12Rng>) {
        let digest = session.initiate(6).unwrap();
        assert_eq!(session.digest(), Some(digest));
        assert_eq!(session.range(), Some(6));

        let reveal = session.reveal(3).unwrap();

        assert!(session.is_revealed());
        assert!(reveal.result < 6);
        assert_eq!(reveal.result, (reveal.hidden_value + 3) % 6);
        assert!(reveal.verify(&digest).unwrap());
        assert!(commit::verify(reveal.key.as_bytes(), reveal.hidden_value, digest.as_bytes()).unwrap());
    }

    #[rstest]
    fn test_session_reveal_before_initiate(mut session: FairRandomSession<ChaCha12Rng>) {
        assert!(matches!(
            session.reveal(0),
            Err(SessionError::InvalidState(_))
        ));

        // Misuse leaves the session usable.
        session.initiate(2).unwrap();
        session.reveal(1).unwrap();
    }

    #[rstest]
    fn test_session_initiate_twice(mut session: FairRandomSession<ChaCha12Rng>) {
        let digest = session.initiate(6).unwrap();

        assert!(matches!(
            session.initiate(6),
            Err(SessionError::InvalidState(_))
        ));

        // The original commitment is untouched.
        assert_eq!(session.digest(), Some(digest));
    }

    #[rstest]
    fn test_session_is_single_use(mut session: FairRandomSession<ChaCha12Rng>) {
        session.initiate(6).unwrap();
        session.reveal(0).unwrap();

        assert!(matches!(
            session.initiate(6),
            Err(SessionError::InvalidState(_))
        ));
        assert!(matches!(
            session.reveal(0),
            Err(SessionError::InvalidState(_))
        ));
    }

    #[rstest]
    fn test_session_invalid_range(mut session: FairRandomSession<ChaCha12Rng>) {
        assert!(matches!(
            session.initiate(0),
            Err(SessionError::InvalidRange(0))
        ));
    }

    #[rstest]
    fn test_session_counterpart_out_of_range(mut session: FairRandomSession<ChaCha12Rng>) {
        let digest = session.initiate(6).unwrap();

        assert!(matches!(
            session.reveal(6),
            Err(SessionError::OutOfRange { value: 6, range: 6 })
        ));
        assert!(matches!(
            session.reveal(u64::MAX),
            Err(SessionError::OutOfRange { .. })
        ));

        // The session stays committed to the same value.
        assert_eq!(session.digest(), Some(digest));
        let reveal = session.reveal(5).unwrap();
        assert!(reveal.verify(&digest).unwrap());
    }

    #[test]
    fn test_session_range_one() {
        // A range of 1 draws no value, only the key.
        let mut session = FairRandomSession::new(ScriptedRng::new(vec![1u8; 32]));

        let digest = session.initiate(1).unwrap();
        let reveal = session.reveal(0).unwrap();

        assert_eq!(reveal.hidden_value, 0);
        assert_eq!(reveal.result, 0);
        assert!(reveal.verify(&digest).unwrap());
        assert!(session.into_rng().is_exhausted());
    }

    #[test]
    fn test_session_exercises_rejection_sampling() {
        // 255 is rejected for a range of 3, then 7 % 3 = 1.
        let mut bytes = vec![255, 7];
        bytes.extend([9u8; 32]);
        let mut session = FairRandomSession::new(ScriptedRng::new(bytes));

        session.initiate(3).unwrap();
        let reveal = session.reveal(2).unwrap();

        assert_eq!(reveal.hidden_value, 1);
        assert_eq!(reveal.result, 0);
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(6)]
    #[case(13)]
    fn test_combine_is_bijective(#[case] range: u64) {
        for hidden_value in 0..range {
            let mut results: Vec<_> = (0..range)
                .map(|counterpart| combine(hidden_value, counterpart, range))
                .collect();
            results.sort_unstable();

            assert_eq!(results, (0..range).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_combine_does_not_overflow() {
        assert_eq!(combine(u64::MAX - 1, u64::MAX - 1, u64::MAX), u64::MAX - 2);
    }

    #[rstest]
    fn test_reveal_verify_detects_tampering(mut session: FairRandomSession<ChaCha12Rng>) {
        let digest = session.initiate(6).unwrap();
        let mut reveal = session.reveal(1).unwrap();

        reveal.result = (reveal.result + 1) % 6;
        assert!(!reveal.verify(&digest).unwrap());
        reveal.result = (reveal.result + 5) % 6;
        assert!(reveal.verify(&digest).unwrap());

        reveal.hidden_value = (reveal.hidden_value + 1) % 6;
        assert!(!reveal.verify(&digest).unwrap());
    }

    #[rstest]
    fn test_reveal_verify_rejects_other_digest(mut session: FairRandomSession<ChaCha12Rng>) {
        let mut other = FairRandomSession::new(ChaCha12Rng::seed_from_u64(1));
        let other_digest = other.initiate(6).unwrap();

        session.initiate(6).unwrap();
        let reveal = session.reveal(0).unwrap();

        assert!(!reveal.verify(&other_digest).unwrap());
    }
}

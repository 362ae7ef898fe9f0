use rand_core::{CryptoRng, RngCore};

use crate::{
    commit::{self, Digest},
    sampler::UniformSampler,
    session::{combine, Reveal, SessionError},
};

/// A single commit/reveal round, with the protocol order encoded in its type.
#[derive(Debug)]
pub struct Round<S: state::State = state::Initialized> {
    range: u64,
    state: S,
}

impl Round {
    /// Creates a new round over `[0, range)`.
    pub fn new(range: u64) -> Result<Self, SessionError> {
        if range == 0 {
            return Err(SessionError::InvalidRange(range));
        }

        Ok(Self {
            range,
            state: state::Initialized,
        })
    }

    /// Draws the hidden value and commits to it.
    ///
    /// Returns the committed round and the digest to publish.
    pub fn commit<R: RngCore + CryptoRng>(
        self,
        sampler: &mut UniformSampler<R>,
    ) -> Result<(Round<state::Committed>, Digest), SessionError> {
        let hidden_value = sampler.sample(self.range)?;
        let (commitment, digest) = commit::commit(sampler.rng_mut(), hidden_value, self.range)?;

        Ok((
            Round {
                range: self.range,
                state: state::Committed { commitment },
            },
            digest,
        ))
    }
}

impl<S: state::State> Round<S> {
    /// Returns the range of the round.
    pub fn range(&self) -> u64 {
        self.range
    }
}

impl Round<state::Committed> {
    /// Returns the published digest.
    pub fn digest(&self) -> Digest {
        self.state.commitment.digest()
    }

    /// Checks that a counterpart value lies in `[0, range)`.
    pub fn check_counterpart(&self, counterpart_value: u64) -> Result<(), SessionError> {
        if counterpart_value >= self.range {
            return Err(SessionError::OutOfRange {
                value: counterpart_value,
                range: self.range,
            });
        }

        Ok(())
    }

    /// Opens the commitment and combines the hidden value with the
    /// counterpart's value.
    pub fn reveal(self, counterpart_value: u64) -> Result<Reveal, SessionError> {
        self.check_counterpart(counterpart_value)?;

        let state::Committed { commitment } = self.state;

        if !commitment.is_consistent()? {
            return Err(SessionError::IntegrityCheckFailed);
        }

        let (key, hidden_value) = commitment.open();

        Ok(Reveal {
            key,
            hidden_value,
            counterpart_value,
            range: self.range,
            result: combine(hidden_value, counterpart_value, self.range),
        })
    }
}

/// Round states.
pub mod state {
    use crate::commit::Commitment;

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl Sealed for super::Committed {}
    }

    /// The round's state.
    pub trait State: sealed::Sealed {}

    /// The round's initial state.
    #[derive(Debug)]
    pub struct Initialized;

    impl State for Initialized {}

    /// The round's state after the hidden value was committed.
    pub struct Committed {
        pub(super) commitment: Commitment,
    }

    impl State for Committed {}

    opaque_debug::implement!(Committed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedRng;

    #[test]
    fn test_round() {
        // One byte for the hidden value, 32 for the key.
        let mut bytes = vec![4];
        bytes.extend([7u8; 32]);
        let mut sampler = UniformSampler::new(ScriptedRng::new(bytes));

        let (round, digest) = Round::new(6).unwrap().commit(&mut sampler).unwrap();
        assert_eq!(round.digest(), digest);

        let reveal = round.reveal(5).unwrap();
        assert_eq!(reveal.hidden_value, 4);
        assert_eq!(reveal.counterpart_value, 5);
        assert_eq!(reveal.result, 3);
        assert_eq!(reveal.key.as_bytes(), &[7u8; 32]);
        assert!(reveal.verify(&digest).unwrap());
    }

    #[test]
    fn test_round_rejects_empty_range() {
        assert!(matches!(
            Round::new(0),
            Err(SessionError::InvalidRange(0))
        ));
    }

    #[test]
    fn test_round_rejects_counterpart_out_of_range() {
        let mut bytes = vec![0];
        bytes.extend([0u8; 32]);
        let mut sampler = UniformSampler::new(ScriptedRng::new(bytes));

        let (round, _) = Round::new(2).unwrap().commit(&mut sampler).unwrap();

        assert!(matches!(
            round.reveal(2),
            Err(SessionError::OutOfRange { value: 2, range: 2 })
        ));
    }
}

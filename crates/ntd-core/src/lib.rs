//! Core of the non-transitive dice game.
//!
//! This crate provides the fair collaborative random-value protocol used to
//! pick move order and roll dice, along with the die abstraction and the
//! pairwise win-probability calculator.
//!
//! It performs no I/O: the party that supplies the counterpart value is
//! modeled by the caller.
//!
//! # Example
//!
//! ```
//! use ntd_core::{commit, FairRandomSession};
//! # use ntd_core::SessionError;
//!
//! # fn main() -> Result<(), SessionError> {
//! let mut session = FairRandomSession::default();
//!
//! // Publish the digest before asking the counterpart for its value.
//! let digest = session.initiate(6)?;
//!
//! let reveal = session.reveal(4)?;
//! assert!(reveal.result < 6);
//!
//! // The counterpart checks the disclosed key and value against the digest.
//! assert!(commit::verify(reveal.key.as_bytes(), reveal.hidden_value, digest.as_bytes())?);
//! # Ok(())
//! # }
//! ```

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

pub mod commit;
pub mod die;
pub mod probability;
pub mod sampler;
pub mod session;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use commit::{Commitment, CommitmentError, Digest, Key};
pub use die::{Die, DieError};
pub use probability::{ProbabilityError, ProbabilityMatrix, WinRatio};
pub use sampler::{SampleError, UniformSampler};
pub use session::{FairRandomSession, Reveal, SessionError};

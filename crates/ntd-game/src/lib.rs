//! The non-transitive dice game.
//!
//! The house and the player each pick a different die, then roll. Move order
//! and every roll are decided with [`ntd_core::FairRandomSession`]: the house
//! publishes a digest of its hidden value, the player adds a value of its
//! own, and the house reveals its key so the player can check the digest.
//!
//! The player is abstracted behind [`Player`], so the game runs without any
//! interactive input. The `ntd` binary provides a console player.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

mod config;
pub mod game;
pub mod parser;
pub mod player;
pub mod table;

pub use config::{GameConfig, GameConfigBuilder, GameConfigBuilderError};
pub use game::{Game, RoundOutcome};
pub use parser::{parse_dice, ParseError};
pub use player::{Player, Purpose, RoundEvent, Side};
pub use table::{render_table, HelpTable};

use ntd_core::{CommitmentError, SampleError, SessionError};

/// A game error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum GameError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error(transparent)]
    Commitment(#[from] CommitmentError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("at least {expected} dice are required, got {actual}")]
    TooFewDice { expected: usize, actual: usize },
    #[error("all dice must have the same number of faces")]
    FaceCountMismatch,
    #[error("invalid die selection: {0}")]
    InvalidSelection(usize),
    #[error("the {0} reveal does not match its published digest")]
    Cheating(Purpose),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("player quit")]
    Quit,
}

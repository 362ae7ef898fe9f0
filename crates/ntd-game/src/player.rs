//! The player's side of the game.

use std::fmt;

use ntd_core::{Die, Digest, Reveal};

use crate::GameError;

/// A party in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The computer.
    House,
    /// The user.
    Player,
}

/// What a fair random value decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    /// Who picks a die first.
    MoveOrder,
    /// The face index of the house's die.
    HouseRoll,
    /// The face index of the player's die.
    PlayerRoll,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Purpose::MoveOrder => "move order",
            Purpose::HouseRoll => "house roll",
            Purpose::PlayerRoll => "player roll",
        })
    }
}

/// An event of a round, reported to the player.
#[derive(Debug)]
pub enum RoundEvent<'a> {
    /// The move order was decided.
    FirstMove(Side),
    /// A die was selected.
    DieSelected {
        /// Who selected the die.
        side: Side,
        /// Index of the die.
        index: usize,
        /// The die.
        die: &'a Die,
    },
    /// A fair random value was revealed.
    Revealed {
        /// What the value decides.
        purpose: Purpose,
        /// The disclosed commitment and result.
        reveal: &'a Reveal,
    },
    /// A die was rolled.
    Rolled {
        /// Whose die was rolled.
        side: Side,
        /// The rolled face.
        face: i64,
    },
}

/// The counterpart of the house.
///
/// Supplies its contribution to each fair random value after seeing the
/// house's digest, and chooses its die.
pub trait Player {
    /// Returns the player's value in `[0, range)` for a fair random value.
    ///
    /// # Arguments
    ///
    /// * `purpose` - What the value decides.
    /// * `range` - The range of the value.
    /// * `digest` - The house's published commitment.
    fn contribute(&mut self, purpose: Purpose, range: u64, digest: &Digest)
        -> Result<u64, GameError>;

    /// Returns the index of the die the player selects.
    ///
    /// # Arguments
    ///
    /// * `dice` - All dice in the game.
    /// * `taken` - The die already selected by the house, if any.
    fn select_die(&mut self, dice: &[Die], taken: Option<usize>) -> Result<usize, GameError>;

    /// Observes an event of the round.
    fn observe(&mut self, _event: &RoundEvent<'_>) {}
}

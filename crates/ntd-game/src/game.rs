//! Rounds of the dice game.

use std::cmp::Ordering;

use ntd_core::{
    probability, Die, Digest, FairRandomSession, ProbabilityMatrix, Reveal, UniformSampler,
};
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use tracing::instrument;

use crate::{render_table, GameConfig, GameError, Player, Purpose, RoundEvent, Side};

/// The outcome of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    /// Who picked a die first.
    pub first: Side,
    /// Index of the house's die.
    pub house_die: usize,
    /// Index of the player's die.
    pub player_die: usize,
    /// The house's rolled face.
    pub house_face: i64,
    /// The player's rolled face.
    pub player_face: i64,
}

impl RoundOutcome {
    /// Returns the winner, or `None` on a tie.
    pub fn winner(&self) -> Option<Side> {
        match self.player_face.cmp(&self.house_face) {
            Ordering::Greater => Some(Side::Player),
            Ordering::Less => Some(Side::House),
            Ordering::Equal => None,
        }
    }
}

/// A dice game between the house and a player.
#[derive(Debug)]
pub struct Game<R = OsRng> {
    dice: Vec<Die>,
    matrix: ProbabilityMatrix,
    config: GameConfig,
    rng: R,
}

impl Game<OsRng> {
    /// Creates a new game drawing entropy from the operating system.
    pub fn new(dice: Vec<Die>, config: GameConfig) -> Result<Self, GameError> {
        Self::with_rng(dice, config, OsRng)
    }
}

impl<R> Game<R>
where
    R: RngCore + CryptoRng,
{
    /// Creates a new game drawing entropy from `rng`.
    ///
    /// # Arguments
    ///
    /// * `dice` - The dice, all with the same number of faces.
    /// * `config` - The game configuration.
    /// * `rng` - The house's entropy source.
    pub fn with_rng(dice: Vec<Die>, config: GameConfig, rng: R) -> Result<Self, GameError> {
        if dice.len() < config.min_dice() {
            return Err(GameError::TooFewDice {
                expected: config.min_dice(),
                actual: dice.len(),
            });
        }

        if dice
            .iter()
            .any(|die| die.face_count() != dice[0].face_count())
        {
            return Err(GameError::FaceCountMismatch);
        }

        let matrix = probability::compute(&dice);

        Ok(Self {
            dice,
            matrix,
            config,
            rng,
        })
    }

    /// Returns the dice.
    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    /// Returns the win probabilities of the dice.
    pub fn probabilities(&self) -> &ProbabilityMatrix {
        &self.matrix
    }

    /// Returns the game configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Renders the help table.
    pub fn help_table(&self) -> String {
        render_table(&self.dice, &self.matrix, self.config.percent_precision())
    }

    /// Plays one round against `player`.
    #[instrument(level = "debug", skip_all)]
    pub fn play_round<P: Player>(&mut self, player: &mut P) -> Result<RoundOutcome, GameError> {
        let first = match self.fair_value(player, Purpose::MoveOrder, 2)? {
            1 => Side::Player,
            _ => Side::House,
        };
        player.observe(&RoundEvent::FirstMove(first));

        let (house_die, player_die) = match first {
            Side::House => {
                let house_die = self.house_select(player, None)?;
                let player_die = self.player_select(player, Some(house_die))?;
                (house_die, player_die)
            }
            Side::Player => {
                let player_die = self.player_select(player, None)?;
                let house_die = self.house_select(player, Some(player_die))?;
                (house_die, player_die)
            }
        };

        let house_face = self.roll(player, Side::House, house_die)?;
        let player_face = self.roll(player, Side::Player, player_die)?;

        let outcome = RoundOutcome {
            first,
            house_die,
            player_die,
            house_face,
            player_face,
        };

        tracing::debug!(?outcome, "round finished");

        Ok(outcome)
    }

    /// Runs one fair random session with the player as counterpart.
    fn fair_value<P: Player>(
        &mut self,
        player: &mut P,
        purpose: Purpose,
        range: u64,
    ) -> Result<u64, GameError> {
        let mut session = FairRandomSession::new(&mut self.rng);

        let digest = session.initiate(range)?;
        let value = player.contribute(purpose, range, &digest)?;
        let reveal = session.reveal(value)?;

        check_reveal(purpose, &reveal, &digest)?;

        player.observe(&RoundEvent::Revealed {
            purpose,
            reveal: &reveal,
        });

        Ok(reveal.result)
    }

    fn house_select<P: Player>(
        &mut self,
        player: &mut P,
        taken: Option<usize>,
    ) -> Result<usize, GameError> {
        let choices: Vec<usize> = (0..self.dice.len())
            .filter(|&index| Some(index) != taken)
            .collect();

        let pick = UniformSampler::new(&mut self.rng).sample(choices.len() as u64)?;
        let index = choices[pick as usize];

        player.observe(&RoundEvent::DieSelected {
            side: Side::House,
            index,
            die: &self.dice[index],
        });

        Ok(index)
    }

    fn player_select<P: Player>(
        &mut self,
        player: &mut P,
        taken: Option<usize>,
    ) -> Result<usize, GameError> {
        let index = player.select_die(&self.dice, taken)?;

        if index >= self.dice.len() || Some(index) == taken {
            return Err(GameError::InvalidSelection(index));
        }

        player.observe(&RoundEvent::DieSelected {
            side: Side::Player,
            index,
            die: &self.dice[index],
        });

        Ok(index)
    }

    fn roll<P: Player>(&mut self, player: &mut P, side: Side, die: usize) -> Result<i64, GameError> {
        let purpose = match side {
            Side::House => Purpose::HouseRoll,
            Side::Player => Purpose::PlayerRoll,
        };

        let face_count = self.dice[die].face_count() as u64;
        let index = self.fair_value(player, purpose, face_count)? as usize;

        // The fair value is always below the face count.
        let face = self.dice[die].faces()[index];

        player.observe(&RoundEvent::Rolled { side, face });

        Ok(face)
    }
}

/// Checks a reveal against the digest published for it.
fn check_reveal(purpose: Purpose, reveal: &Reveal, digest: &Digest) -> Result<(), GameError> {
    if !reveal.verify(digest)? {
        tracing::warn!(%purpose, "reveal does not match the published digest");
        return Err(GameError::Cheating(purpose));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand_chacha::ChaCha12Rng;
    use rand_core::SeedableRng;
    use rstest::*;

    #[fixture]
    fn revealed() -> (Reveal, Digest) {
        let mut session = FairRandomSession::new(ChaCha12Rng::seed_from_u64(0));
        let digest = session.initiate(6).unwrap();
        let reveal = session.reveal(2).unwrap();

        (reveal, digest)
    }

    #[rstest]
    fn test_check_reveal_accepts_honest_reveal(revealed: (Reveal, Digest)) {
        let (reveal, digest) = revealed;

        assert!(check_reveal(Purpose::HouseRoll, &reveal, &digest).is_ok());
    }

    #[rstest]
    fn test_check_reveal_rejects_tampered_result(revealed: (Reveal, Digest)) {
        let (mut reveal, digest) = revealed;
        reveal.result = (reveal.result + 1) % reveal.range;

        assert!(matches!(
            check_reveal(Purpose::HouseRoll, &reveal, &digest),
            Err(GameError::Cheating(Purpose::HouseRoll))
        ));
    }

    #[rstest]
    fn test_check_reveal_rejects_swapped_value(revealed: (Reveal, Digest)) {
        let (mut reveal, digest) = revealed;
        reveal.hidden_value = (reveal.hidden_value + 1) % reveal.range;
        reveal.result = (reveal.hidden_value + reveal.counterpart_value) % reveal.range;

        assert!(matches!(
            check_reveal(Purpose::PlayerRoll, &reveal, &digest),
            Err(GameError::Cheating(Purpose::PlayerRoll))
        ));
    }

    #[rstest]
    fn test_check_reveal_rejects_other_digest(revealed: (Reveal, Digest)) {
        let (reveal, _) = revealed;
        let other = Digest::from_bytes(&[0u8; 32]).unwrap();

        assert!(matches!(
            check_reveal(Purpose::MoveOrder, &reveal, &other),
            Err(GameError::Cheating(Purpose::MoveOrder))
        ));
    }
}

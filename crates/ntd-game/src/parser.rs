//! Dice definitions from command-line arguments.
//!
//! Each argument defines one die as a comma-separated list of integer faces,
//! e.g. `2,2,4,4,9,9`.

use ntd_core::{Die, DieError};

use crate::GameConfig;

/// A dice parsing error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ParseError {
    #[error("at least {expected} dice are required, got {actual}")]
    TooFewDice { expected: usize, actual: usize },
    #[error("die #{die} has an invalid face: {value:?}, expected an integer")]
    InvalidFace { die: usize, value: String },
    #[error("die #{die} has {actual} faces, expected at least {expected}")]
    TooFewFaces {
        die: usize,
        expected: usize,
        actual: usize,
    },
    #[error("die #{die} has {actual} faces, expected {expected} like the first die")]
    FaceCountMismatch {
        die: usize,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Die(#[from] DieError),
}

/// Parses one die definition.
///
/// `number` is the 1-based position of the die, used in error messages.
pub fn parse_die(number: usize, arg: &str) -> Result<Die, ParseError> {
    let faces = arg
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| ParseError::InvalidFace {
                    die: number,
                    value: part.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Die::new(faces)?)
}

/// Parses a set of dice, checking the constraints of `config`.
pub fn parse_dice<S: AsRef<str>>(args: &[S], config: &GameConfig) -> Result<Vec<Die>, ParseError> {
    if args.len() < config.min_dice() {
        return Err(ParseError::TooFewDice {
            expected: config.min_dice(),
            actual: args.len(),
        });
    }

    let dice = args
        .iter()
        .enumerate()
        .map(|(i, arg)| parse_die(i + 1, arg.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    for (i, die) in dice.iter().enumerate() {
        if die.face_count() < config.min_faces() {
            return Err(ParseError::TooFewFaces {
                die: i + 1,
                expected: config.min_faces(),
                actual: die.face_count(),
            });
        }
    }

    let face_count = dice[0].face_count();
    if let Some((i, die)) = dice
        .iter()
        .enumerate()
        .find(|(_, die)| die.face_count() != face_count)
    {
        return Err(ParseError::FaceCountMismatch {
            die: i + 1,
            expected: face_count,
            actual: die.face_count(),
        });
    }

    Ok(dice)
}

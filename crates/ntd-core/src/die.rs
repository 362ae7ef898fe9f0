//! Dice.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A die error.
#[derive(Debug, thiserror::Error)]
pub enum DieError {
    /// The die was constructed without faces.
    #[error("a die must have at least one face")]
    EmptyFaces,
}

/// A die with an ordered sequence of integer faces.
///
/// Duplicate faces are allowed. A die is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct Die {
    faces: Vec<i64>,
}

impl Die {
    /// Creates a new die.
    ///
    /// # Arguments
    ///
    /// * `faces` - The face values, in order.
    pub fn new(faces: Vec<i64>) -> Result<Self, DieError> {
        if faces.is_empty() {
            return Err(DieError::EmptyFaces);
        }

        Ok(Self { faces })
    }

    /// Returns the faces of the die.
    pub fn faces(&self) -> &[i64] {
        &self.faces
    }

    /// Returns the number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns the face at `index`, if any.
    pub fn face(&self, index: usize) -> Option<i64> {
        self.faces.get(index).copied()
    }
}

impl TryFrom<Vec<i64>> for Die {
    type Error = DieError;

    fn try_from(faces: Vec<i64>) -> Result<Self, Self::Error> {
        Self::new(faces)
    }
}

impl From<Die> for Vec<i64> {
    fn from(die: Die) -> Self {
        die.faces
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut faces = self.faces.iter();
        if let Some(first) = faces.next() {
            write!(f, "{first}")?;
        }
        for face in faces {
            write!(f, ",{face}")?;
        }
        Ok(())
    }
}

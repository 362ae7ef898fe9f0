//! Pairwise win probabilities between dice.

use serde::{Deserialize, Serialize};

use crate::die::Die;

/// A probability matrix error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ProbabilityError {
    #[error("invalid win ratio: {wins} wins out of {total} face pairs")]
    InvalidRatio { wins: u64, total: u64 },
    #[error("expected {expected} cells for {size} dice, got {actual}")]
    CellCount {
        size: usize,
        expected: usize,
        actual: usize,
    },
    #[error("cell ({row}, {col}) must be empty exactly on the diagonal")]
    Diagonal { row: usize, col: usize },
}

/// The exact chance of one die beating another.
///
/// Counts every ordered pair of faces once. Ties count as neither a win nor
/// a loss, so the ratios of two dice against each other need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWinRatio")]
pub struct WinRatio {
    wins: u64,
    total: u64,
}

impl WinRatio {
    /// Computes the ratio of face pairs in which `a` strictly beats `b`.
    pub fn between(a: &Die, b: &Die) -> Self {
        let wins = a
            .faces()
            .iter()
            .map(|x| b.faces().iter().filter(|y| x > y).count() as u64)
            .sum();

        Self {
            wins,
            total: (a.face_count() * b.face_count()) as u64,
        }
    }

    /// Returns the number of winning face pairs.
    pub fn wins(&self) -> u64 {
        self.wins
    }

    /// Returns the number of face pairs.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns the win probability.
    pub fn probability(&self) -> f64 {
        self.wins as f64 / self.total as f64
    }

    /// Returns the win probability as a percentage.
    pub fn percent(&self) -> f64 {
        self.probability() * 100.0
    }
}

#[derive(Serialize, Deserialize)]
struct RawWinRatio {
    wins: u64,
    total: u64,
}

impl TryFrom<RawWinRatio> for WinRatio {
    type Error = ProbabilityError;

    fn try_from(raw: RawWinRatio) -> Result<Self, Self::Error> {
        let RawWinRatio { wins, total } = raw;
        if total == 0 || wins > total {
            return Err(ProbabilityError::InvalidRatio { wins, total });
        }

        Ok(Self { wins, total })
    }
}

/// Win probabilities for every ordered pair of dice.
///
/// Cell `(i, j)` holds the chance that die `i` beats die `j`. Diagonal cells
/// are `None`, since a die never plays itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProbabilityMatrix")]
pub struct ProbabilityMatrix {
    size: usize,
    cells: Vec<Option<WinRatio>>,
}

#[derive(Serialize, Deserialize)]
struct RawProbabilityMatrix {
    size: usize,
    cells: Vec<Option<WinRatio>>,
}

impl TryFrom<RawProbabilityMatrix> for ProbabilityMatrix {
    type Error = ProbabilityError;

    fn try_from(raw: RawProbabilityMatrix) -> Result<Self, Self::Error> {
        let RawProbabilityMatrix { size, cells } = raw;

        let expected = size.checked_mul(size).ok_or(ProbabilityError::CellCount {
            size,
            expected: usize::MAX,
            actual: cells.len(),
        })?;
        if cells.len() != expected {
            return Err(ProbabilityError::CellCount {
                size,
                expected,
                actual: cells.len(),
            });
        }

        for (i, cell) in cells.iter().enumerate() {
            let (row, col) = (i / size, i % size);
            if cell.is_none() != (row == col) {
                return Err(ProbabilityError::Diagonal { row, col });
            }
        }

        Ok(Self { size, cells })
    }
}

impl ProbabilityMatrix {
    /// Returns the number of dice.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the cell for die `row` against die `col`.
    ///
    /// Returns `None` on the diagonal.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<WinRatio> {
        assert!(row < self.size && col < self.size, "index out of bounds");
        self.cells[row * self.size + col]
    }

    /// Returns the cells of a row.
    pub fn row(&self, row: usize) -> &[Option<WinRatio>] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    /// Returns an iterator over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<WinRatio>]> {
        // `max(1)` keeps `chunks` valid for an empty matrix.
        self.cells.chunks(self.size.max(1))
    }
}

/// Computes the win probability of every die against every other die.
pub fn compute(dice: &[Die]) -> ProbabilityMatrix {
    let size = dice.len();

    let cells = dice
        .iter()
        .enumerate()
        .flat_map(|(i, a)| {
            dice.iter()
                .enumerate()
                .map(move |(j, b)| (i != j).then(|| WinRatio::between(a, b)))
        })
        .collect();

    ProbabilityMatrix { size, cells }
}

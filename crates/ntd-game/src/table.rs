//! Help table of win probabilities.

use std::fmt;

use ntd_core::{Die, ProbabilityMatrix};

const CORNER: &str = "User dice v";
const DIAGONAL: &str = "-";

/// A table of the chance of each row die beating each column die.
#[derive(Debug, Clone, Copy)]
pub struct HelpTable<'a> {
    dice: &'a [Die],
    matrix: &'a ProbabilityMatrix,
    precision: usize,
}

impl<'a> HelpTable<'a> {
    /// Creates a new table.
    ///
    /// # Arguments
    ///
    /// * `dice` - The dice, in matrix order.
    /// * `matrix` - The win probabilities of `dice`.
    /// * `precision` - Digits after the decimal point of each percentage.
    pub fn new(dice: &'a [Die], matrix: &'a ProbabilityMatrix, precision: usize) -> Self {
        Self {
            dice,
            matrix,
            precision,
        }
    }
}

impl fmt::Display for HelpTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.dice.iter().map(Die::to_string).collect();

        let rows: Vec<Vec<String>> = self
            .matrix
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Some(ratio) => format!("{:.*}%", self.precision, ratio.percent()),
                        None => DIAGONAL.to_string(),
                    })
                    .collect()
            })
            .collect();

        let width = labels
            .iter()
            .chain(rows.iter().flatten())
            .map(String::len)
            .chain([CORNER.len()])
            .max()
            .unwrap_or_default();

        let separator = format!(
            "+{}",
            format!("{}+", "-".repeat(width + 2)).repeat(labels.len() + 1)
        );

        writeln!(
            f,
            "Probability of the win for the user (row) against the computer (column):"
        )?;
        writeln!(f, "{separator}")?;
        write!(f, "| {CORNER:<width$} |")?;
        for label in &labels {
            write!(f, " {label:<width$} |")?;
        }
        writeln!(f)?;
        writeln!(f, "{separator}")?;

        for (label, row) in labels.iter().zip(&rows) {
            write!(f, "| {label:<width$} |")?;
            for cell in row {
                write!(f, " {cell:<width$} |")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{separator}")
    }
}

/// Renders the chance of each row die beating each column die.
pub fn render_table(dice: &[Die], matrix: &ProbabilityMatrix, precision: usize) -> String {
    HelpTable::new(dice, matrix, precision).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use ntd_core::probability;

    fn dice() -> Vec<Die> {
        vec![
            Die::new(vec![2, 2, 4, 4, 9, 9]).unwrap(),
            Die::new(vec![1, 1, 6, 6, 8, 8]).unwrap(),
            Die::new(vec![3, 3, 5, 5, 7, 7]).unwrap(),
        ]
    }

    #[test]
    fn test_render_table() {
        let dice = dice();
        let table = render_table(&dice, &probability::compute(&dice), 1);
        let lines: Vec<&str> = table.lines().collect();

        // Title, 3 separators, header and one line per die.
        assert_eq!(lines.len(), 8);

        let width = lines[1].len();
        assert!(lines[1..].iter().all(|line| line.len() == width));

        assert!(lines[2].contains("2,2,4,4,9,9"));
        assert!(lines[4].starts_with("| 2,2,4,4,9,9 "));

        let cells: Vec<&str> = lines[4]
            .split('|')
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .collect();
        assert_eq!(cells, ["2,2,4,4,9,9", "-", "55.6%", "44.4%"]);
    }

    #[test]
    fn test_help_table_writes_like_render_table() {
        let dice = dice();
        let matrix = probability::compute(&dice);

        let mut out = String::new();
        fmt::write(&mut out, format_args!("{}", HelpTable::new(&dice, &matrix, 1))).unwrap();

        assert_eq!(out, render_table(&dice, &matrix, 1));
        assert!(out.ends_with("+\n"));
    }

    #[test]
    fn test_render_table_precision() {
        let dice = dice();
        let table = render_table(&dice, &probability::compute(&dice), 0);

        assert!(table.contains("56%"));
        assert!(table.contains("44%"));
        assert!(!table.contains("55.6%"));
    }
}

//! Validation of solved grids against the clue lines

use crate::puzzle::{filled_runs, Cell, Grid, Puzzle};
use std::fmt;

/// Checks a fully-determined grid against every row and column clue
pub struct SolutionValidator;

/// Result of validating a grid
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<ClueViolation>,
    pub error_message: Option<String>,
}

/// One line whose painted runs do not match its clues
#[derive(Debug, Clone)]
pub struct ClueViolation {
    pub kind: LineKind,
    pub index: usize,
    pub expected: Vec<usize>,
    pub found: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Row,
    Column,
}

impl SolutionValidator {
    /// Validate a candidate grid against the puzzle's clues
    pub fn validate(puzzle: &Puzzle, grid: &Grid) -> ValidationResult {
        if grid.size() != puzzle.size() {
            return ValidationResult {
                is_valid: false,
                violations: Vec::new(),
                error_message: Some(format!(
                    "grid size {} does not match puzzle size {}",
                    grid.size(),
                    puzzle.size()
                )),
            };
        }

        if !grid.is_fully_determined() {
            return ValidationResult {
                is_valid: false,
                violations: Vec::new(),
                error_message: Some(format!(
                    "grid still has {} undetermined cells",
                    grid.cell_count() - grid.determined_count()
                )),
            };
        }

        let mut violations = Vec::new();
        let transposed = grid.transpose();

        for i in 0..puzzle.size() {
            if let Some(v) =
                Self::check_line(LineKind::Row, i, grid.row(i), puzzle.row_line(i).run_lengths())
            {
                violations.push(v);
            }
            if let Some(v) = Self::check_line(
                LineKind::Column,
                i,
                transposed.row(i),
                puzzle.column_line(i).run_lengths(),
            ) {
                violations.push(v);
            }
        }

        ValidationResult {
            is_valid: violations.is_empty(),
            violations,
            error_message: None,
        }
    }

    fn check_line(
        kind: LineKind,
        index: usize,
        cells: &[Cell],
        expected: Vec<usize>,
    ) -> Option<ClueViolation> {
        let found = filled_runs(cells);
        if found == expected {
            None
        } else {
            Some(ClueViolation {
                kind,
                index,
                expected,
                found,
            })
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Validation Result: {}",
            if self.is_valid { "VALID" } else { "INVALID" }
        )?;

        if let Some(ref error) = self.error_message {
            writeln!(f, "Error: {}", error)?;
        }

        for violation in &self.violations {
            writeln!(f, "  {}", violation)?;
        }

        Ok(())
    }
}

impl fmt::Display for ClueViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            LineKind::Row => "row",
            LineKind::Column => "column",
        };
        write!(
            f,
            "{} {}: expected runs {:?}, found {:?}",
            kind, self.index, self.expected, self.found
        )
    }
}

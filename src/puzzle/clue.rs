//! Clues and clue lines

use serde::{Deserialize, Serialize};

/// One run of contiguous painted cells required somewhere in a line
///
/// `resolved` means the run's position within its line has been fully pinned
/// down by deduction. The flag only ever moves from `false` to `true`; search
/// branches clone the owning structures instead of mutating shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub length: usize,
    pub resolved: bool,
}

impl Clue {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            resolved: false,
        }
    }
}

/// The ordered clue sequence of one row or one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub clues: Vec<Clue>,
}

impl Line {
    pub fn new(run_lengths: &[usize]) -> Self {
        Self {
            clues: run_lengths.iter().map(|&v| Clue::new(v)).collect(),
        }
    }

    /// Total number of painted cells this line requires
    pub fn sum_of_runs(&self) -> usize {
        self.clues.iter().map(|c| c.length).sum()
    }

    /// Shortest line that can host these runs (one blank between runs)
    pub fn min_length(&self) -> usize {
        self.sum_of_runs() + self.clues.len().saturating_sub(1)
    }

    /// The non-zero run lengths, in order
    ///
    /// A `0` record is the conventional marker for an empty line; everything
    /// that reasons about actual runs (the permutation generator, column
    /// feasibility, validation) works on this view.
    pub fn run_lengths(&self) -> Vec<usize> {
        self.clues
            .iter()
            .map(|c| c.length)
            .filter(|&v| v > 0)
            .collect()
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.clues.iter().all(|c| c.resolved)
    }

    pub fn unresolved_count(&self) -> usize {
        self.clues.iter().filter(|c| !c.resolved).count()
    }
}

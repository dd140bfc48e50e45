//! Puzzle data model and clue-file I/O

pub mod cell;
pub mod clue;
pub mod grid;
pub mod io;

pub use cell::Cell;
pub use clue::{Clue, Line};
pub use grid::{filled_runs, Grid};
pub use io::{
    create_example_puzzles, load_grid_from_file, load_puzzle_from_file, save_grid_to_file,
    PuzzleFormatError,
};

/// One Nonogram instance: 2N clue lines plus the working grid
///
/// Lines `[0, N)` are rows top-to-bottom, lines `[N, 2N)` are columns
/// left-to-right. Row i's line and column i's line must agree with the grid
/// on every determined cell; the propagation engine and the search maintain
/// that invariant.
#[derive(Debug, Clone)]
pub struct Puzzle {
    size: usize,
    lines: Vec<Line>,
    grid: Grid,
}

impl Puzzle {
    /// Build a puzzle from raw clue records (rows first, then columns)
    pub fn from_clue_records(records: Vec<Vec<usize>>) -> Result<Self, PuzzleFormatError> {
        if records.is_empty() {
            return Err(PuzzleFormatError::EmptyInput);
        }
        if records.len() % 2 != 0 {
            return Err(PuzzleFormatError::NonSquareInput {
                records: records.len(),
            });
        }

        let size = records.len() / 2;
        let lines: Vec<Line> = records.iter().map(|r| Line::new(r)).collect();

        for (index, line) in lines.iter().enumerate() {
            let min_length = line.min_length();
            if min_length > size {
                return Err(PuzzleFormatError::OversizedLine {
                    index,
                    min_length,
                    size,
                });
            }
        }

        Ok(Self {
            size,
            lines,
            grid: Grid::new(size),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The clue line of row `i`
    pub fn row_line(&self, i: usize) -> &Line {
        &self.lines[i]
    }

    /// The clue line of column `i`
    pub fn column_line(&self, i: usize) -> &Line {
        &self.lines[self.size + i]
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [Line] {
        &mut self.lines
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Total painted cells demanded by the row clues and by the column clues
    ///
    /// The two sums must agree for any satisfiable instance, which makes this
    /// a cheap solvability screen for `analyze`.
    pub fn clue_sums(&self) -> (usize, usize) {
        let rows = self.lines[..self.size]
            .iter()
            .map(|l| l.sum_of_runs())
            .sum();
        let cols = self.lines[self.size..]
            .iter()
            .map(|l| l.sum_of_runs())
            .sum();
        (rows, cols)
    }
}

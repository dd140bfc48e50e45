//! Square three-valued grid, the working solution state

use super::Cell;
use anyhow::Result;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An N×N matrix of three-valued cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a fully undetermined grid
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Undetermined; size * size],
        }
    }

    /// Create a grid from explicit rows (used by tests and grid-file parsing)
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let size = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                anyhow::bail!(
                    "row {} has length {}, expected {} (grid must be square)",
                    i,
                    row.len(),
                    size
                );
            }
        }
        Ok(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        let idx = self.index(row, col);
        self.cells[idx] = value;
    }

    /// One row as a slice
    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    /// Overwrite one row
    pub fn set_row(&mut self, row: usize, values: &[Cell]) {
        self.cells[row * self.size..(row + 1) * self.size].copy_from_slice(values);
    }

    /// The transposed grid
    ///
    /// Row/column duality is handled everywhere by transposing and re-running
    /// row logic, so this must stay a pure, cheap operation.
    pub fn transpose(&self) -> Grid {
        let mut cells = vec![Cell::Undetermined; self.size * self.size];
        for row in 0..self.size {
            for col in 0..self.size {
                cells[col * self.size + row] = self.cells[self.index(row, col)];
            }
        }
        Grid {
            size: self.size,
            cells,
        }
    }

    pub fn is_fully_determined(&self) -> bool {
        self.cells.iter().all(|c| c.is_determined())
    }

    pub fn determined_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_determined()).count()
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Filled).count()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                let symbol = match self.get(row, col) {
                    Cell::Filled => '█',
                    Cell::Blank => '·',
                    Cell::Undetermined => '?',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Lengths of the maximal `Filled` runs in a line of cells
pub fn filled_runs(cells: &[Cell]) -> Vec<usize> {
    cells
        .iter()
        .chunk_by(|&&c| c)
        .into_iter()
        .filter(|(state, _)| *state == Cell::Filled)
        .map(|(_, group)| group.count())
        .collect()
}

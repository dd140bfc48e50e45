//! Solution representation

use crate::puzzle::io::grid_to_string;
use crate::puzzle::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// A fully-determined grid satisfying every clue, plus solve diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The solved grid
    pub grid: Grid,
    /// Grid side length
    pub size: usize,
    /// Wall-clock time of the whole solve
    #[serde(skip)]
    pub solve_time: Duration,
    pub metadata: SolutionMetadata,
}

/// Diagnostics attached to a solution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionMetadata {
    /// Number of painted cells
    pub filled_cells: usize,
    /// Painted fraction of the grid (0.0 to 1.0)
    pub density: f64,
    /// Whether the direct rules alone determined the whole grid
    pub solved_by_propagation: bool,
    /// Rule passes used to reach the propagation fixpoint
    pub propagation_passes: usize,
    /// Search nodes expanded (0 when the search was skipped)
    pub nodes_expanded: u64,
}

impl Solution {
    pub fn new(
        grid: Grid,
        solve_time: Duration,
        solved_by_propagation: bool,
        propagation_passes: usize,
        nodes_expanded: u64,
    ) -> Self {
        let size = grid.size();
        let filled_cells = grid.filled_count();
        let density = filled_cells as f64 / grid.cell_count() as f64;

        Self {
            grid,
            size,
            solve_time,
            metadata: SolutionMetadata {
                filled_cells,
                density,
                solved_by_propagation,
                propagation_passes,
                nodes_expanded,
            },
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save the solution as JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", grid_to_string(&self.grid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Cell::{Blank as B, Filled as F};

    fn solution() -> Solution {
        let grid = Grid::from_rows(vec![vec![F, B], vec![F, F]]).unwrap();
        Solution::new(grid, Duration::from_millis(12), true, 2, 0)
    }

    #[test]
    fn test_metadata() {
        let solution = solution();
        assert_eq!(solution.size, 2);
        assert_eq!(solution.metadata.filled_cells, 3);
        assert!((solution.metadata.density - 0.75).abs() < f64::EPSILON);
        assert!(solution.metadata.solved_by_propagation);
    }

    #[test]
    fn test_display_uses_tokens() {
        assert_eq!(solution().to_string(), "1 0\n1 1\n");
    }

    #[test]
    fn test_json_round_trip() {
        let solution = solution();
        let json = solution.to_json().unwrap();
        let parsed: Solution = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.grid, solution.grid);
        assert_eq!(parsed.metadata.filled_cells, 3);
    }
}

//! Nonogram (Picross) solver
//!
//! Given run-length clues for every row and column of a square grid, this
//! library determines which cells are painted. A constraint-propagation pass
//! applies direct deduction rules to a fixpoint; a backtracking search over
//! row permutations completes whatever the rules left open. Unsatisfiable
//! puzzles are reported as a normal negative outcome.

pub mod config;
pub mod problem;
pub mod puzzle;
pub mod solver;
pub mod utils;

pub use config::Settings;
pub use problem::{NonogramProblem, Solution, SolveReport};
pub use puzzle::Puzzle;

use anyhow::Result;

/// Main entry point: solve the puzzle named by the settings
pub fn solve_nonogram(settings: Settings) -> Result<SolveReport> {
    let problem = NonogramProblem::new(settings)?;
    problem.solve()
}

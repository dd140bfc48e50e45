//! Backtracking depth-first search over rows

use super::PermutationGenerator;
use crate::puzzle::{Cell, Grid, Puzzle};
use std::fmt;
use std::time::Instant;

/// Outcome of the search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchVerdict {
    /// The first complete consistent grid, in enumeration order
    Solved(Grid),
    /// The whole pruned space was explored without finding a solution; this
    /// is the normal "unsatisfiable" result, not an error
    Exhausted,
    /// The deadline expired between candidate attempts
    Cancelled,
}

/// Counters for diagnostics; they have no influence on the result
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    pub nodes_expanded: u64,
    pub candidates_generated: u64,
    pub rejected_by_mask: u64,
    pub rejected_by_columns: u64,
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Nodes expanded: {}", self.nodes_expanded)?;
        writeln!(f, "  Candidates generated: {}", self.candidates_generated)?;
        writeln!(f, "  Rejected by deduced cells: {}", self.rejected_by_mask)?;
        writeln!(f, "  Rejected by column check: {}", self.rejected_by_columns)?;
        Ok(())
    }
}

/// Depth-first search that completes what propagation left open
///
/// The search walks rows top to bottom. Each recursion step owns its grid
/// outright; failed branches are dropped, never undone, so no state leaks
/// across branches. The propagation grid is only read, as the mask of cells
/// already known.
pub struct SearchEngine<'a> {
    puzzle: &'a Puzzle,
    reference: &'a Grid,
    column_runs: Vec<Vec<usize>>,
    deadline: Option<Instant>,
    stats: SearchStatistics,
}

impl<'a> SearchEngine<'a> {
    /// `reference` is the propagation fixpoint grid (or a fresh undetermined
    /// grid to search from scratch)
    pub fn new(puzzle: &'a Puzzle, reference: &'a Grid) -> Self {
        let column_runs = (0..puzzle.size())
            .map(|c| puzzle.column_line(c).run_lengths())
            .collect();
        Self {
            puzzle,
            reference,
            column_runs,
            deadline: None,
            stats: SearchStatistics::default(),
        }
    }

    /// Abort the search once `deadline` has passed
    ///
    /// The check sits between candidate attempts, so any run that completes
    /// is unaffected by it.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn run(mut self) -> (SearchVerdict, SearchStatistics) {
        let verdict = self.descend(Grid::new(self.puzzle.size()), 0);
        (verdict, self.stats)
    }

    fn descend(&mut self, grid: Grid, depth: usize) -> SearchVerdict {
        let size = self.puzzle.size();
        if depth == size {
            // All rows fixed; pruning kept every column consistent
            return SearchVerdict::Solved(grid);
        }
        self.stats.nodes_expanded += 1;

        let candidates =
            PermutationGenerator::generate(&self.puzzle.row_line(depth).run_lengths(), size);
        self.stats.candidates_generated += candidates.len() as u64;

        for candidate in candidates {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    return SearchVerdict::Cancelled;
                }
            }

            if !self.agrees_with_reference(depth, &candidate) {
                self.stats.rejected_by_mask += 1;
                continue;
            }

            let mut child = grid.clone();
            child.set_row(depth, &candidate);
            if !self.columns_remain_feasible(&child) {
                self.stats.rejected_by_columns += 1;
                continue;
            }

            match self.descend(child, depth + 1) {
                SearchVerdict::Exhausted => continue,
                verdict => return verdict,
            }
        }

        SearchVerdict::Exhausted
    }

    /// Pruning 1: the candidate must agree with every cell the propagation
    /// engine determined in this row
    fn agrees_with_reference(&self, depth: usize, candidate: &[Cell]) -> bool {
        self.reference
            .row(depth)
            .iter()
            .zip(candidate)
            .all(|(&known, &cell)| !known.is_determined() || known == cell)
    }

    /// Pruning 2: every column of the partial grid must still be completable
    fn columns_remain_feasible(&self, grid: &Grid) -> bool {
        let transposed = grid.transpose();
        (0..grid.size()).all(|c| column_fits(transposed.row(c), &self.column_runs[c]))
    }
}

/// Whether a partially determined column can still satisfy its clue runs
///
/// The column is split into maximal non-`Blank` runs. A run containing
/// undetermined cells may still grow, so its clue only needs to cover the
/// painted prefix; a fully determined run must match its clue exactly; any
/// painted run beyond the clue list is fatal. A column with nothing left
/// undetermined must additionally have consumed its whole clue list.
fn column_fits(cells: &[Cell], clues: &[usize]) -> bool {
    let fully_determined = cells.iter().all(|c| c.is_determined());
    let mut run_index = 0;
    let mut i = 0;

    while i < cells.len() {
        if cells[i] == Cell::Blank {
            i += 1;
            continue;
        }
        let start = i;
        while i < cells.len() && cells[i] != Cell::Blank {
            i += 1;
        }
        let run = &cells[start..i];

        if run_index < clues.len() {
            if run.iter().any(|&c| c == Cell::Undetermined) {
                let painted_prefix = run.iter().take_while(|&&c| c == Cell::Filled).count();
                if clues[run_index] < painted_prefix {
                    return false;
                }
            } else if clues[run_index] != run.len() {
                return false;
            }
        } else if run.iter().any(|&c| c == Cell::Filled) {
            return false;
        }
        run_index += 1;
    }

    !(fully_determined && run_index < clues.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::filled_runs;
    use itertools::Itertools;
    use Cell::{Blank as B, Filled as F, Undetermined as U};

    fn puzzle(records: &[&[usize]]) -> Puzzle {
        Puzzle::from_clue_records(records.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn search(puzzle: &Puzzle) -> SearchVerdict {
        let reference = Grid::new(puzzle.size());
        let (verdict, _) = SearchEngine::new(puzzle, &reference).run();
        verdict
    }

    fn solved_rows(verdict: SearchVerdict) -> Vec<Vec<Cell>> {
        match verdict {
            SearchVerdict::Solved(grid) => {
                (0..grid.size()).map(|i| grid.row(i).to_vec()).collect()
            }
            other => panic!("expected a solution, got {:?}", other),
        }
    }

    /// Reference oracle: try every combination of row candidates
    fn brute_force(puzzle: &Puzzle) -> Option<Vec<Vec<Cell>>> {
        let n = puzzle.size();
        let per_row: Vec<Vec<Vec<Cell>>> = (0..n)
            .map(|i| PermutationGenerator::generate(&puzzle.row_line(i).run_lengths(), n))
            .collect();

        per_row
            .iter()
            .multi_cartesian_product()
            .find(|rows| {
                (0..n).all(|c| {
                    let column: Vec<Cell> = rows.iter().map(|row| row[c]).collect();
                    filled_runs(&column) == puzzle.column_line(c).run_lengths()
                })
            })
            .map(|rows| rows.into_iter().cloned().collect())
    }

    #[test]
    fn test_small_solvable_puzzle() {
        let puzzle = puzzle(&[&[1], &[1], &[2], &[0]]);
        assert_eq!(
            solved_rows(search(&puzzle)),
            vec![vec![F, B], vec![F, B]]
        );
    }

    #[test]
    fn test_unsatisfiable_puzzle() {
        let puzzle = puzzle(&[&[2], &[0], &[2], &[0]]);
        assert_eq!(search(&puzzle), SearchVerdict::Exhausted);
    }

    #[test]
    fn test_letter_p() {
        let puzzle = puzzle(&[
            &[3],
            &[1, 1],
            &[3],
            &[1],
            &[1],
            &[0],
            &[5],
            &[1, 1],
            &[3],
            &[0],
        ]);
        assert_eq!(
            solved_rows(search(&puzzle)),
            vec![
                vec![B, F, F, F, B],
                vec![B, F, B, F, B],
                vec![B, F, F, F, B],
                vec![B, F, B, B, B],
                vec![B, F, B, B, B],
            ]
        );
    }

    #[test]
    fn test_first_solution_is_deterministic() {
        // Every permutation matrix solves this one; the leftmost-biased
        // enumeration makes the identity the first hit
        let puzzle = puzzle(&[&[1], &[1], &[1], &[1]]);
        let first = solved_rows(search(&puzzle));
        assert_eq!(first, vec![vec![F, B], vec![B, F]]);
        assert_eq!(solved_rows(search(&puzzle)), first);
    }

    #[test]
    fn test_respects_propagation_mask() {
        // Force the anti-diagonal solution through the reference grid
        let puzzle = puzzle(&[&[1], &[1], &[1], &[1]]);
        let mut reference = Grid::new(2);
        reference.set(0, 0, B);

        let (verdict, stats) = SearchEngine::new(&puzzle, &reference).run();
        assert_eq!(
            solved_rows(verdict),
            vec![vec![B, F], vec![F, B]]
        );
        assert!(stats.rejected_by_mask > 0);
    }

    #[test]
    fn test_matches_brute_force_on_3x3() {
        let fixtures: Vec<Vec<Vec<usize>>> = vec![
            // Multiple solutions
            vec![
                vec![1], vec![1], vec![1],
                vec![1], vec![1], vec![1],
            ],
            // Unique solution (an L shape)
            vec![
                vec![1], vec![1], vec![3],
                vec![3], vec![1], vec![1],
            ],
            // Unsatisfiable: no column can host a run of two
            vec![
                vec![2], vec![0], vec![2],
                vec![2], vec![0], vec![2],
            ],
            // Satisfiable cousin of the above
            vec![
                vec![2], vec![2], vec![0],
                vec![2], vec![2], vec![0],
            ],
        ];

        for records in fixtures {
            let puzzle = Puzzle::from_clue_records(records.clone()).unwrap();
            let expected = brute_force(&puzzle);
            match (search(&puzzle), expected) {
                (SearchVerdict::Solved(grid), Some(rows)) => {
                    let found: Vec<Vec<Cell>> =
                        (0..3).map(|i| grid.row(i).to_vec()).collect();
                    assert_eq!(found, rows, "wrong solution for {:?}", records);
                }
                (SearchVerdict::Exhausted, None) => {}
                (verdict, expected) => panic!(
                    "solver and oracle disagree for {:?}: {:?} vs {:?}",
                    records, verdict, expected
                ),
            }
        }
    }

    #[test]
    fn test_solution_satisfies_all_clues() {
        let puzzle = puzzle(&[
            &[1, 1],
            &[2],
            &[0],
            &[2],
            &[1],
            &[1],
        ]);
        let rows = solved_rows(search(&puzzle));

        for (i, row) in rows.iter().enumerate() {
            assert_eq!(filled_runs(row), puzzle.row_line(i).run_lengths());
        }
        for c in 0..3 {
            let column: Vec<Cell> = rows.iter().map(|row| row[c]).collect();
            assert_eq!(filled_runs(&column), puzzle.column_line(c).run_lengths());
        }
    }

    #[test]
    fn test_column_fits_partial_runs() {
        // An open run only needs its painted prefix covered
        assert!(column_fits(&[F, U, U], &[2]));
        assert!(column_fits(&[F, F, U], &[2]));
        assert!(!column_fits(&[F, F, F], &[2]));
        assert!(!column_fits(&[F, U, U], &[]));
        assert!(column_fits(&[U, U, U], &[]));
    }

    #[test]
    fn test_column_fits_closed_runs() {
        assert!(column_fits(&[F, B, F, U], &[1, 1]));
        assert!(!column_fits(&[F, F, B, U], &[1, 1]));
        // A painted run beyond the clue list is fatal even mid-column
        assert!(!column_fits(&[F, B, F, U], &[1]));
    }

    #[test]
    fn test_column_fits_requires_all_clues_once_determined() {
        // A fully determined column with a clue left over is infeasible
        assert!(!column_fits(&[B, F, B, B], &[1, 1]));
        assert!(column_fits(&[B, F, B, F], &[1, 1]));
        assert!(!column_fits(&[B, B, B], &[1]));
        // Still open columns may leave clues for later
        assert!(column_fits(&[B, F, B, U], &[1, 1]));
    }

    #[test]
    fn test_deadline_cancels() {
        let puzzle = puzzle(&[
            &[1], &[1], &[1], &[1], &[1],
            &[1], &[1], &[1], &[1], &[1],
        ]);
        let reference = Grid::new(puzzle.size());
        let deadline = Instant::now();
        let (verdict, _) = SearchEngine::new(&puzzle, &reference)
            .with_deadline(deadline)
            .run();
        assert_eq!(verdict, SearchVerdict::Cancelled);
    }
}

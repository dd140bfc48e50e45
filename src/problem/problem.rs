//! Nonogram problem definition and solve orchestration

use super::{Solution, SolutionValidator};
use crate::config::Settings;
use crate::puzzle::{load_puzzle_from_file, Grid, Puzzle};
use crate::solver::{PropagationEngine, SearchEngine, SearchStatistics, SearchVerdict};
use anyhow::{Context, Result};
use std::time::{Duration, Instant};

/// One Nonogram instance bound to its settings
pub struct NonogramProblem {
    settings: Settings,
    puzzle: Puzzle,
}

/// Everything a solve run produces
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// The solution, or `None` for an unsatisfiable puzzle
    pub solution: Option<Solution>,
    /// Propagation diagnostics (absent when the direct rules were disabled)
    pub propagation: Option<PropagationSummary>,
    /// Search diagnostics (absent when propagation alone solved the puzzle)
    pub search: Option<SearchStatistics>,
    pub total_time: Duration,
}

/// Diagnostics from the propagation fixpoint
#[derive(Debug, Clone)]
pub struct PropagationSummary {
    pub passes: usize,
    pub cells_determined: usize,
    pub total_cells: usize,
    pub fully_determined: bool,
}

impl NonogramProblem {
    /// Create a problem by loading the puzzle named in the settings
    pub fn new(settings: Settings) -> Result<Self> {
        let puzzle = load_puzzle_from_file(&settings.input.puzzle_file)
            .context("Failed to load puzzle file")?;
        Ok(Self { settings, puzzle })
    }

    /// Create a problem with an explicit puzzle (useful for testing)
    pub fn with_puzzle(settings: Settings, puzzle: Puzzle) -> Self {
        Self { settings, puzzle }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Solve the puzzle: propagation first, then backtracking search
    pub fn solve(&self) -> Result<SolveReport> {
        let started = Instant::now();
        let deadline = self
            .settings
            .solver
            .timeout_seconds
            .map(|secs| started + Duration::from_secs(secs));

        let (reference, propagation) = if self.settings.solver.use_direct_rules {
            let outcome = PropagationEngine::run(self.puzzle.clone());
            let summary = PropagationSummary {
                passes: outcome.passes,
                cells_determined: outcome.cells_determined,
                total_cells: outcome.puzzle.grid().cell_count(),
                fully_determined: outcome.fully_determined,
            };
            (outcome.puzzle.grid().clone(), Some(summary))
        } else {
            (Grid::new(self.puzzle.size()), None)
        };

        // A fully-determined fixpoint is the solution, provided it actually
        // validates. On unsatisfiable input the rules can fill the whole grid
        // with contradictory deductions; the search is the arbiter then.
        if reference.is_fully_determined()
            && SolutionValidator::validate(&self.puzzle, &reference).is_valid
        {
            let passes = propagation.as_ref().map(|p| p.passes).unwrap_or(0);
            let solution = Solution::new(reference, started.elapsed(), true, passes, 0);
            return Ok(SolveReport {
                solution: Some(solution),
                propagation,
                search: None,
                total_time: started.elapsed(),
            });
        }

        let mut engine = SearchEngine::new(&self.puzzle, &reference);
        if let Some(deadline) = deadline {
            engine = engine.with_deadline(deadline);
        }
        let (verdict, stats) = engine.run();

        let solution = match verdict {
            SearchVerdict::Solved(grid) => {
                let validation = SolutionValidator::validate(&self.puzzle, &grid);
                if !validation.is_valid {
                    anyhow::bail!("search produced an inconsistent grid: {}", validation);
                }
                let passes = propagation.as_ref().map(|p| p.passes).unwrap_or(0);
                Some(Solution::new(
                    grid,
                    started.elapsed(),
                    false,
                    passes,
                    stats.nodes_expanded,
                ))
            }
            SearchVerdict::Exhausted => None,
            SearchVerdict::Cancelled => {
                anyhow::bail!(
                    "search aborted after {} seconds",
                    self.settings.solver.timeout_seconds.unwrap_or(0)
                );
            }
        };

        Ok(SolveReport {
            solution,
            propagation,
            search: Some(stats),
            total_time: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Cell::{Blank as B, Filled as F};

    fn settings() -> Settings {
        Settings::default()
    }

    fn puzzle(records: &[&[usize]]) -> Puzzle {
        Puzzle::from_clue_records(records.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_propagation_only_solve() {
        let problem = settings_problem(&[&[4], &[4], &[0], &[0], &[2], &[2], &[2], &[2]]);
        let report = problem.solve().unwrap();

        let solution = report.solution.unwrap();
        assert!(solution.metadata.solved_by_propagation);
        assert!(report.search.is_none());
        assert_eq!(solution.grid.row(0), &[F, F, F, F]);
        assert_eq!(solution.grid.row(3), &[B, B, B, B]);
    }

    #[test]
    fn test_search_backed_solve() {
        let problem = settings_problem(&[&[1], &[1], &[1], &[1], &[1], &[1]]);
        let report = problem.solve().unwrap();

        let solution = report.solution.unwrap();
        assert!(!solution.metadata.solved_by_propagation);
        assert!(report.search.is_some());

        let validation = SolutionValidator::validate(problem.puzzle(), &solution.grid);
        assert!(validation.is_valid);
    }

    #[test]
    fn test_unsatisfiable_is_a_normal_outcome() {
        let problem = settings_problem(&[&[2], &[0], &[2], &[0]]);
        let report = problem.solve().unwrap();
        assert!(report.solution.is_none());
    }

    #[test]
    fn test_disabled_direct_rules() {
        let mut settings = settings();
        settings.solver.use_direct_rules = false;
        let problem = NonogramProblem::with_puzzle(
            settings,
            puzzle(&[&[1], &[1], &[2], &[0]]),
        );
        let report = problem.solve().unwrap();

        assert!(report.propagation.is_none());
        let solution = report.solution.unwrap();
        assert_eq!(solution.grid.row(0), &[F, B]);
        assert_eq!(solution.grid.row(1), &[F, B]);
    }

    #[test]
    fn test_same_solution_every_run() {
        let records: &[&[usize]] = &[&[1], &[1], &[1], &[1], &[1], &[1]];
        let first = settings_problem(records).solve().unwrap();
        let second = settings_problem(records).solve().unwrap();
        assert_eq!(
            first.solution.unwrap().grid,
            second.solution.unwrap().grid
        );
    }

    fn settings_problem(records: &[&[usize]]) -> NonogramProblem {
        NonogramProblem::with_puzzle(settings(), puzzle(records))
    }
}

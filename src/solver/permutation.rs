//! Candidate-row enumeration for the backtracking search

use crate::puzzle::Cell;

/// Enumerates every fully-determined arrangement of a clue line
///
/// A candidate is valid iff its painted runs match the clue lengths in
/// order, consecutive runs are separated by at least one blank, and nothing
/// is painted outside the runs. Enumeration is leftmost-biased and
/// first-run-major: the first run is tried at each offset from its leftmost
/// feasible position rightwards, and for each offset the remaining runs are
/// enumerated recursively in the remaining space. The search reports the
/// first solution it completes, so this order decides which solution is
/// found when several exist and must stay stable.
pub struct PermutationGenerator;

impl PermutationGenerator {
    /// All candidate rows of `length` cells for the given run lengths
    ///
    /// Zero-length runs are ignored, so the conventional `[0]` empty-line
    /// record yields the single all-blank candidate. Runs that cannot fit
    /// yield no candidates at all.
    pub fn generate(run_lengths: &[usize], length: usize) -> Vec<Vec<Cell>> {
        let runs: Vec<usize> = run_lengths.iter().copied().filter(|&r| r > 0).collect();

        let min_length = runs.iter().sum::<usize>() + runs.len().saturating_sub(1);
        if min_length > length {
            return Vec::new();
        }

        let mut candidates = Vec::new();
        let mut prefix = Vec::with_capacity(length);
        Self::place_runs(&runs, length, &mut prefix, &mut candidates);
        candidates
    }

    fn place_runs(
        runs: &[usize],
        length: usize,
        prefix: &mut Vec<Cell>,
        candidates: &mut Vec<Vec<Cell>>,
    ) {
        let remaining = length - prefix.len();

        let Some((&first, rest)) = runs.split_first() else {
            let mut candidate = prefix.clone();
            candidate.resize(length, Cell::Blank);
            candidates.push(candidate);
            return;
        };

        // Later runs each need one separator plus their own cells
        let tail_min: usize = rest.iter().sum::<usize>() + rest.len();
        let max_offset = remaining - first - tail_min;

        for offset in 0..=max_offset {
            let mark = prefix.len();
            prefix.resize(mark + offset, Cell::Blank);
            prefix.resize(mark + offset + first, Cell::Filled);
            if !rest.is_empty() {
                prefix.push(Cell::Blank);
            }
            Self::place_runs(rest, length, prefix, candidates);
            prefix.truncate(mark);
        }
    }

    /// Number of candidates for the given runs and length
    ///
    /// Closed form: `C(f + k, k)` with `k` runs and free slack
    /// `f = length - sum - (k - 1)`.
    pub fn count(run_lengths: &[usize], length: usize) -> usize {
        let runs: Vec<usize> = run_lengths.iter().copied().filter(|&r| r > 0).collect();
        let k = runs.len();
        let min_length = runs.iter().sum::<usize>() + k.saturating_sub(1);
        if min_length > length {
            return 0;
        }
        binomial(length - min_length + k, k)
    }
}

fn binomial(n: usize, k: usize) -> usize {
    let k = k.min(n - k);
    let mut result = 1usize;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}

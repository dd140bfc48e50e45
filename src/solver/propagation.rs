//! Constraint propagation: direct deduction rules applied to a fixpoint
//!
//! The engine repeatedly applies a fixed battery of local rules to every row
//! and every column (columns are handled by transposing the grid and reusing
//! the row logic) until a full pass deduces nothing new. Cells only ever move
//! from `Undetermined` to `Blank`/`Filled` and clues only from unresolved to
//! resolved, so the fixpoint is reached in finitely many passes.

use crate::puzzle::{Cell, Clue, Line, Puzzle};

/// Result of running the propagation engine
#[derive(Debug, Clone)]
pub struct PropagationOutcome {
    /// The puzzle at the fixpoint: partially (sometimes fully) solved grid
    /// plus updated clue resolution flags
    pub puzzle: Puzzle,
    /// Number of full rule passes until the fixpoint
    pub passes: usize,
    /// Determined cells at the fixpoint
    pub cells_determined: usize,
    /// Whether the grid has no `Undetermined` cells left
    pub fully_determined: bool,
}

/// Applies the direct deduction rules
pub struct PropagationEngine;

type LineRule = fn(&mut [Cell], &mut [Clue]) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Rows,
    Columns,
}

impl PropagationEngine {
    /// Run the rules to a fixpoint on an owned working copy
    pub fn run(mut puzzle: Puzzle) -> PropagationOutcome {
        // Trivial and exact-fit lines can only fire once; their preconditions
        // never become true again after other rules resolve clues.
        Self::paint_trivial_lines(&mut puzzle);
        Self::place_exact_fits(&mut puzzle);
        Self::sync_resolved(&mut puzzle);

        let rules: [LineRule; 5] = [
            anchor_edges,
            overlap_fill,
            limit_single_run_range,
            close_small_gaps,
            blank_finished_lines,
        ];

        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;
            for rule in rules {
                changed |= Self::apply_to_both_axes(&mut puzzle, rule);
            }
            if !changed {
                break;
            }
        }

        let cells_determined = puzzle.grid().determined_count();
        let fully_determined = puzzle.grid().is_fully_determined();
        PropagationOutcome {
            puzzle,
            passes,
            cells_determined,
            fully_determined,
        }
    }

    /// A line whose clue is `0` is all blank; a clue equal to N fills the line
    fn paint_trivial_lines(puzzle: &mut Puzzle) {
        let size = puzzle.size();
        for index in 0..2 * size {
            for j in 0..puzzle.lines()[index].clues.len() {
                let clue = puzzle.lines()[index].clues[j];
                if clue.resolved || (clue.length != 0 && clue.length != size) {
                    continue;
                }
                let value = if clue.length == 0 {
                    Cell::Blank
                } else {
                    Cell::Filled
                };
                for k in 0..size {
                    set_line_cell(puzzle, index, k, value);
                }
                puzzle.lines_mut()[index].clues[j].resolved = true;
            }
        }
    }

    /// A line whose runs plus mandatory gaps need exactly N cells is forced
    fn place_exact_fits(puzzle: &mut Puzzle) {
        let size = puzzle.size();
        for index in 0..2 * size {
            let line = &puzzle.lines()[index];
            if line.clues.is_empty() || line.clues.iter().any(|c| c.resolved) {
                continue;
            }
            if line.min_length() != size {
                continue;
            }

            let lengths: Vec<usize> = line.clues.iter().map(|c| c.length).collect();
            let mut pos = 0;
            for (j, &run) in lengths.iter().enumerate() {
                for k in 0..run {
                    set_line_cell(puzzle, index, pos + k, Cell::Filled);
                }
                pos += run;
                if j + 1 < lengths.len() {
                    set_line_cell(puzzle, index, pos, Cell::Blank);
                    pos += 1;
                }
            }
            for clue in &mut puzzle.lines_mut()[index].clues {
                clue.resolved = true;
            }
        }
    }

    fn apply_to_both_axes(puzzle: &mut Puzzle, rule: LineRule) -> bool {
        let mut changed = Self::apply_to_axis(puzzle, Axis::Rows, rule);
        Self::sync_resolved(puzzle);
        changed |= Self::apply_to_axis(puzzle, Axis::Columns, rule);
        Self::sync_resolved(puzzle);
        changed
    }

    /// Apply one rule to every line of one orientation
    ///
    /// The rule sees only the line's active window: resolved leading/trailing
    /// clues and the fully-determined leading/trailing cells are trimmed from
    /// view, and the rule's writes are spliced back afterwards. Trimmed cells
    /// are never revisited.
    fn apply_to_axis(puzzle: &mut Puzzle, axis: Axis, rule: LineRule) -> bool {
        let size = puzzle.size();
        let mut view = match axis {
            Axis::Rows => puzzle.grid().clone(),
            Axis::Columns => puzzle.grid().transpose(),
        };
        let mut changed = false;

        for i in 0..size {
            let line_index = match axis {
                Axis::Rows => i,
                Axis::Columns => size + i,
            };
            let (start, end) = window_bounds(view.row(i));
            if start >= end {
                continue;
            }

            let mut cells: Vec<Cell> = view.row(i)[start..end].to_vec();
            let line = &mut puzzle.lines_mut()[line_index];
            let (clue_lo, clue_hi) = active_clue_range(&line.clues);

            if rule(&mut cells, &mut line.clues[clue_lo..clue_hi]) {
                changed = true;
                for (offset, &cell) in cells.iter().enumerate() {
                    view.set(i, start + offset, cell);
                }
            }
        }

        if changed {
            *puzzle.grid_mut() = match axis {
                Axis::Rows => view,
                Axis::Columns => view.transpose(),
            };
        }
        changed
    }

    /// Mark clues whose runs are closed off inside the determined prefix or
    /// suffix of their line as resolved
    fn sync_resolved(puzzle: &mut Puzzle) {
        let size = puzzle.size();
        let transposed = puzzle.grid().transpose();
        for i in 0..size {
            let row: Vec<Cell> = puzzle.grid().row(i).to_vec();
            mark_closed_runs(&mut puzzle.lines_mut()[i], &row);
            let column: Vec<Cell> = transposed.row(i).to_vec();
            mark_closed_runs(&mut puzzle.lines_mut()[size + i], &column);
        }
    }
}

fn set_line_cell(puzzle: &mut Puzzle, line_index: usize, k: usize, value: Cell) {
    let size = puzzle.size();
    if line_index < size {
        puzzle.grid_mut().set(line_index, k, value);
    } else {
        puzzle.grid_mut().set(k, line_index - size, value);
    }
}

/// The active cell window of a line: everything between the fully-determined
/// leading and trailing chunks
///
/// A chunk only counts as determined once it is closed by a `Blank`, so a
/// partial leading run stays inside the window for the edge-anchoring rule.
/// Window boundaries are therefore always a line edge or a `Blank`.
fn window_bounds(cells: &[Cell]) -> (usize, usize) {
    let mut start = 0;
    let mut run = 0;
    let mut saw_undetermined = false;
    for &cell in cells {
        match cell {
            Cell::Filled => run += 1,
            Cell::Blank => {
                start += run + 1;
                run = 0;
            }
            Cell::Undetermined => {
                saw_undetermined = true;
                break;
            }
        }
    }
    if !saw_undetermined {
        return (0, 0);
    }

    let mut end = cells.len();
    let mut run = 0;
    for &cell in cells.iter().rev() {
        match cell {
            Cell::Filled => run += 1,
            Cell::Blank => {
                end -= run + 1;
                run = 0;
            }
            Cell::Undetermined => break,
        }
    }
    (start, end)
}

/// Index range of the clues still in play (resolved edges trimmed)
fn active_clue_range(clues: &[Clue]) -> (usize, usize) {
    let mut lo = 0;
    while lo < clues.len() && clues[lo].resolved {
        lo += 1;
    }
    let mut hi = clues.len();
    while hi > lo && clues[hi - 1].resolved {
        hi -= 1;
    }
    (lo, hi)
}

/// Mark leading/trailing clues whose runs appear closed in the determined
/// prefix/suffix of `cells`
fn mark_closed_runs(line: &mut Line, cells: &[Cell]) {
    let count = line.clues.len();

    let mut idx = 0;
    let mut in_run = false;
    for &cell in cells {
        match cell {
            Cell::Filled => in_run = true,
            Cell::Blank => {
                if in_run {
                    if idx < count {
                        line.clues[idx].resolved = true;
                    }
                    idx += 1;
                    in_run = false;
                }
            }
            Cell::Undetermined => break,
        }
    }

    let mut idx = 0;
    let mut in_run = false;
    for &cell in cells.iter().rev() {
        match cell {
            Cell::Filled => in_run = true,
            Cell::Blank => {
                if in_run {
                    if idx < count {
                        line.clues[count - 1 - idx].resolved = true;
                    }
                    idx += 1;
                    in_run = false;
                }
            }
            Cell::Undetermined => break,
        }
    }
}

/// Rule: a painted cell on a window edge pins the nearest unresolved clue
///
/// The run is painted from that edge and the cell just past it becomes the
/// mandatory gap.
fn anchor_edges(cells: &mut [Cell], clues: &mut [Clue]) -> bool {
    let mut changed = false;
    let len = cells.len();

    if cells.first() == Some(&Cell::Filled) {
        if let Some(first) = clues.first_mut() {
            if !first.resolved && first.length <= len {
                for cell in cells[..first.length].iter_mut() {
                    *cell = Cell::Filled;
                }
                first.resolved = true;
                changed = true;
            }
            let run = first.length;
            if run < len && cells[run] == Cell::Undetermined {
                cells[run] = Cell::Blank;
                changed = true;
            }
        }
    }

    if len > 0 && cells[len - 1] == Cell::Filled {
        if let Some(last) = clues.last_mut() {
            if !last.resolved && last.length <= len {
                for cell in cells[len - last.length..].iter_mut() {
                    *cell = Cell::Filled;
                }
                last.resolved = true;
                changed = true;
            }
            let run = last.length;
            if run < len && cells[len - run - 1] == Cell::Undetermined {
                cells[len - run - 1] = Cell::Blank;
                changed = true;
            }
        }
    }

    changed
}

/// Rule: overlap
///
/// With slack `gl = len - sum - count + 1`, every run longer than `gl` has
/// `length - gl` cells that are painted in all of its placements.
fn overlap_fill(cells: &mut [Cell], clues: &mut [Clue]) -> bool {
    let len = cells.len() as isize;
    let sum: isize = clues.iter().map(|c| c.length as isize).sum();
    let count = clues.len() as isize;
    let slack = len - sum - count + 1;
    if slack < 0 {
        return false;
    }

    let mut changed = false;
    let mut preceding = 0isize;
    for (j, clue) in clues.iter().enumerate() {
        let length = clue.length as isize;
        if length > slack {
            for k in 0..length - slack {
                let idx = (preceding + j as isize + slack + k) as usize;
                if cells[idx] != Cell::Filled {
                    cells[idx] = Cell::Filled;
                    changed = true;
                }
            }
        }
        preceding += length;
    }
    changed
}

/// Rule: maximum range
///
/// With a single run left, no cell farther than the run length from an
/// already painted cell can be reached.
fn limit_single_run_range(cells: &mut [Cell], clues: &mut [Clue]) -> bool {
    if clues.len() != 1 {
        return false;
    }
    let run = clues[0].length;
    let mut changed = false;

    if let Some(j) = cells.iter().position(|&c| c == Cell::Filled) {
        for k in j + run..cells.len() {
            if cells[k] == Cell::Undetermined {
                cells[k] = Cell::Blank;
                changed = true;
            }
        }
    }

    if let Some(j) = cells.iter().rposition(|&c| c == Cell::Filled) {
        if j >= run {
            for k in 0..=j - run {
                if cells[k] == Cell::Undetermined {
                    cells[k] = Cell::Blank;
                    changed = true;
                }
            }
        }
    }

    changed
}

/// Rule: small gaps
///
/// A maximal undetermined gap bounded by blanks (or the window edge) that is
/// shorter than every remaining unresolved run cannot host any run.
fn close_small_gaps(cells: &mut [Cell], clues: &mut [Clue]) -> bool {
    let Some(min_run) = clues
        .iter()
        .filter(|c| !c.resolved)
        .map(|c| c.length)
        .min()
    else {
        return false;
    };

    let mut changed = false;
    let mut i = 0;
    while i < cells.len() {
        if cells[i] != Cell::Undetermined {
            i += 1;
            continue;
        }
        let gap_start = i;
        while i < cells.len() && cells[i] == Cell::Undetermined {
            i += 1;
        }

        let open_left = gap_start == 0 || cells[gap_start - 1] == Cell::Blank;
        let open_right = i == cells.len() || cells[i] == Cell::Blank;
        if open_left && open_right && i - gap_start < min_run {
            for cell in cells[gap_start..i].iter_mut() {
                *cell = Cell::Blank;
                changed = true;
            }
        }
    }
    changed
}

/// Rule: line completion
///
/// Once every clue of a line is resolved, whatever is still undetermined
/// must be blank.
fn blank_finished_lines(cells: &mut [Cell], clues: &mut [Clue]) -> bool {
    if !clues.is_empty() {
        return false;
    }
    let mut changed = false;
    for cell in cells.iter_mut() {
        if *cell == Cell::Undetermined {
            *cell = Cell::Blank;
            changed = true;
        }
    }
    changed
}

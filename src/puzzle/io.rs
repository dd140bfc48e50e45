//! File I/O for clue files and solution grids

use super::{Cell, Grid, Puzzle};
use anyhow::{Context, Result};
use itertools::Itertools;
use std::path::Path;

/// Rejections raised while ingesting a clue file
///
/// These surface before the solve starts; the solving core itself has no
/// recoverable-error path.
#[derive(Debug, thiserror::Error)]
pub enum PuzzleFormatError {
    #[error("run length {value} on line {line} is negative; all clues must be >= 0")]
    MalformedRunLength { line: usize, value: i64 },

    #[error("{records} clue records cannot form a square puzzle; expected an even count")]
    NonSquareInput { records: usize },

    #[error("the input contains no clue records")]
    EmptyInput,

    #[error("clue line {index} needs at least {min_length} cells but the grid side is {size}")]
    OversizedLine {
        index: usize,
        min_length: usize,
        size: usize,
    },

    #[error("invalid token '{token}' on line {line}; expected an integer")]
    InvalidToken { line: usize, token: String },
}

/// Parse a clue file
///
/// One whitespace-separated integer record per text line; the first half are
/// rows top-to-bottom, the second half columns left-to-right. Lines starting
/// with '#' separate the two halves and are skipped, blank lines are ignored
/// (an empty clue line is written as the record `0`).
pub fn parse_puzzle_from_str(content: &str) -> Result<Puzzle, PuzzleFormatError> {
    let mut records = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut record = Vec::new();
        for token in line.split_whitespace() {
            let value: i64 = token
                .parse()
                .map_err(|_| PuzzleFormatError::InvalidToken {
                    line: line_no + 1,
                    token: token.to_string(),
                })?;
            if value < 0 {
                return Err(PuzzleFormatError::MalformedRunLength {
                    line: line_no + 1,
                    value,
                });
            }
            record.push(value as usize);
        }
        records.push(record);
    }

    Puzzle::from_clue_records(records)
}

/// Load a puzzle from a clue file
pub fn load_puzzle_from_file<P: AsRef<Path>>(path: P) -> Result<Puzzle> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read puzzle file: {}", path.as_ref().display()))?;

    parse_puzzle_from_str(&content)
        .with_context(|| format!("Failed to parse puzzle file: {}", path.as_ref().display()))
}

/// Parse a solution grid from its textual form
///
/// Each non-empty line is one row of `0`/`1` cells, with or without
/// separating whitespace.
pub fn parse_grid_from_str(content: &str) -> Result<Grid> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("grid file is empty");
    }

    let mut rows = Vec::with_capacity(lines.len());
    for (row_idx, line) in lines.iter().enumerate() {
        let mut row = Vec::new();
        for (col_idx, ch) in line.chars().filter(|c| !c.is_whitespace()).enumerate() {
            match ch {
                '0' => row.push(Cell::Blank),
                '1' => row.push(Cell::Filled),
                _ => anyhow::bail!(
                    "invalid character '{}' at ({}, {}); only '0' and '1' are allowed",
                    ch,
                    row_idx,
                    col_idx
                ),
            }
        }
        rows.push(row);
    }

    Grid::from_rows(rows)
}

/// Load a solution grid from a text file
pub fn load_grid_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read grid file: {}", path.as_ref().display()))?;

    parse_grid_from_str(&content)
        .with_context(|| format!("Failed to parse grid file: {}", path.as_ref().display()))
}

/// Render a grid as `0`/`1` tokens, one space-separated row per line
pub fn grid_to_string(grid: &Grid) -> String {
    let mut result = String::with_capacity(grid.size() * (2 * grid.size() + 1));
    for row in 0..grid.size() {
        let line = grid.row(row).iter().map(|c| c.token()).join(" ");
        result.push_str(&line);
        result.push('\n');
    }
    result
}

/// Save a grid to a text file
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, grid_to_string(grid))
        .with_context(|| format!("Failed to write grid to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Create example puzzle files for the `setup` command
pub fn create_example_puzzles<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // Solved entirely by the direct rules
    let banner = "4\n4\n0\n0\n#\n2\n2\n2\n2\n";
    std::fs::write(dir.join("banner.txt"), banner).context("Failed to write banner.txt")?;

    // A 5x5 letter P
    let letter_p = "3\n1 1\n3\n1\n1\n#\n0\n5\n1 1\n3\n0\n";
    std::fs::write(dir.join("letter_p.txt"), letter_p).context("Failed to write letter_p.txt")?;

    // Several valid grids exist; the solver always reports the same one
    let diagonal = "1\n1\n1\n1\n1\n#\n1\n1\n1\n1\n1\n";
    std::fs::write(dir.join("diagonal.txt"), diagonal).context("Failed to write diagonal.txt")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_puzzle() {
        let content = "2\n1 1\n#\n1 1\n2\n";
        let puzzle = parse_puzzle_from_str(content).unwrap();

        assert_eq!(puzzle.size(), 2);
        assert_eq!(puzzle.row_line(0).run_lengths(), vec![2]);
        assert_eq!(puzzle.row_line(1).run_lengths(), vec![1, 1]);
        assert_eq!(puzzle.column_line(0).run_lengths(), vec![1, 1]);
        assert_eq!(puzzle.column_line(1).run_lengths(), vec![2]);
    }

    #[test]
    fn test_blank_lines_and_separators_are_skipped() {
        let content = "\n1\n\n# rows above, columns below\n1\n\n";
        let puzzle = parse_puzzle_from_str(content).unwrap();
        assert_eq!(puzzle.size(), 1);
    }

    #[test]
    fn test_negative_run_length_is_rejected() {
        let err = parse_puzzle_from_str("1\n-2\n").unwrap_err();
        assert!(matches!(
            err,
            PuzzleFormatError::MalformedRunLength { line: 2, value: -2 }
        ));
    }

    #[test]
    fn test_odd_record_count_is_rejected() {
        let err = parse_puzzle_from_str("1\n1\n1\n").unwrap_err();
        assert!(matches!(err, PuzzleFormatError::NonSquareInput { records: 3 }));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = parse_puzzle_from_str("# nothing here\n").unwrap_err();
        assert!(matches!(err, PuzzleFormatError::EmptyInput));
    }

    #[test]
    fn test_oversized_line_is_rejected() {
        // Row 0 needs 2 + 1 + 1 = 4 cells in a 2x2 grid
        let err = parse_puzzle_from_str("2 1\n0\n#\n1\n1\n").unwrap_err();
        assert!(matches!(
            err,
            PuzzleFormatError::OversizedLine {
                index: 0,
                min_length: 4,
                size: 2
            }
        ));
    }

    #[test]
    fn test_junk_token_is_rejected() {
        let err = parse_puzzle_from_str("1\nx\n").unwrap_err();
        assert!(matches!(err, PuzzleFormatError::InvalidToken { line: 2, .. }));
    }

    #[test]
    fn test_grid_round_trip() {
        let grid = Grid::from_rows(vec![
            vec![Cell::Filled, Cell::Blank],
            vec![Cell::Blank, Cell::Filled],
        ])
        .unwrap();

        let text = grid_to_string(&grid);
        assert_eq!(text, "1 0\n0 1\n");

        let parsed = parse_grid_from_str(&text).unwrap();
        assert_eq!(parsed, grid);
    }

    #[test]
    fn test_grid_parse_rejects_junk() {
        assert!(parse_grid_from_str("1 0\n0 x\n").is_err());
        assert!(parse_grid_from_str("").is_err());
        assert!(parse_grid_from_str("1 0\n0\n").is_err());
    }

    #[test]
    fn test_grid_file_operations() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("solution.txt");

        let grid = Grid::from_rows(vec![
            vec![Cell::Filled, Cell::Filled],
            vec![Cell::Blank, Cell::Blank],
        ])
        .unwrap();

        save_grid_to_file(&grid, &path).unwrap();
        let loaded = load_grid_from_file(&path).unwrap();
        assert_eq!(loaded, grid);
    }

    #[test]
    fn test_create_example_puzzles() {
        let temp_dir = tempdir().unwrap();
        create_example_puzzles(temp_dir.path()).unwrap();

        for name in ["banner.txt", "letter_p.txt", "diagonal.txt"] {
            let puzzle = load_puzzle_from_file(temp_dir.path().join(name)).unwrap();
            assert!(puzzle.size() > 0, "{} should parse", name);
        }

        let banner = load_puzzle_from_file(temp_dir.path().join("banner.txt")).unwrap();
        assert_eq!(banner.size(), 4);
        assert_eq!(banner.row_line(0).run_lengths(), vec![4]);
        assert_eq!(banner.column_line(3).run_lengths(), vec![2]);
    }
}

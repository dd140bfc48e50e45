//! Three-valued cell state for Nonogram grids

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single grid cell
///
/// Every cell starts `Undetermined` and transitions at most once to `Blank`
/// or `Filled` during propagation; search candidates never contain
/// `Undetermined` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Blank,
    Filled,
    Undetermined,
}

impl Cell {
    /// Whether the cell has been pinned to `Blank` or `Filled`
    pub fn is_determined(self) -> bool {
        self != Cell::Undetermined
    }

    /// The `0`/`1` token used in solution files
    pub fn token(self) -> &'static str {
        match self {
            Cell::Blank => "0",
            Cell::Filled => "1",
            Cell::Undetermined => "?",
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

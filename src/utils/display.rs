//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::problem::Solution;
use crate::puzzle::io::grid_to_string;
use crate::puzzle::Grid;
use anyhow::Result;
use std::path::Path;

/// Formats solutions for console output and files
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Format a solution for console output
    pub fn format_solution(solution: &Solution, show_details: bool) -> String {
        let mut output = String::new();

        output.push_str(&grid_to_string(&solution.grid));

        if show_details {
            output.push('\n');
            output.push_str(&format!("Grid: {}x{}\n", solution.size, solution.size));
            output.push_str(&format!(
                "Filled cells: {} ({:.1}%)\n",
                solution.metadata.filled_cells,
                solution.metadata.density * 100.0
            ));
            output.push_str(&format!(
                "Solved by direct rules alone: {}\n",
                if solution.metadata.solved_by_propagation {
                    "yes"
                } else {
                    "no"
                }
            ));
            output.push_str(&format!(
                "Propagation passes: {}\n",
                solution.metadata.propagation_passes
            ));
            output.push_str(&format!(
                "Search nodes expanded: {}\n",
                solution.metadata.nodes_expanded
            ));
            output.push_str(&format!(
                "Solve time: {:.3}s\n",
                solution.solve_time.as_secs_f64()
            ));
        }

        output
    }

    /// Format a grid in compact block form (useful for partial grids)
    pub fn format_grid_compact(grid: &Grid) -> String {
        grid.to_string()
    }

    /// Save a solution to the output directory in the configured format
    pub fn save_solution<P: AsRef<Path>>(
        solution: &Solution,
        output_dir: P,
        format: &OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        match format {
            OutputFormat::Text => {
                let filepath = output_dir.join("solution.txt");
                std::fs::write(filepath, grid_to_string(&solution.grid))?;
            }
            OutputFormat::Json => {
                let filepath = output_dir.join("solution.json");
                solution.save_to_file(filepath)?;
            }
        }

        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

//! Main CLI application for the Nonogram solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nonogram_solver::{
    config::{CliOverrides, Settings},
    problem::{NonogramProblem, SolutionValidator},
    puzzle::{create_example_puzzles, load_grid_from_file, load_puzzle_from_file},
    solver::PropagationEngine,
    utils::{ColorOutput, SolutionFormatter},
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nonogram_solver")]
#[command(about = "Nonogram (Picross) solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a Nonogram puzzle
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle clue file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Abort the search after this many seconds (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Skip the direct deduction rules and search from scratch
        #[arg(long)]
        no_direct_rules: bool,

        /// Save the solution to the output directory
        #[arg(short, long)]
        save: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and puzzle files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Check a solution grid against a clue file
    Validate {
        /// Puzzle clue file
        #[arg(short, long)]
        puzzle: PathBuf,

        /// Solution grid file (0/1 tokens, one row per line)
        #[arg(short, long)]
        solution: PathBuf,
    },

    /// Analyze a puzzle for solvability
    Analyze {
        /// Puzzle clue file
        #[arg(short, long)]
        puzzle: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            puzzle,
            output,
            timeout,
            no_direct_rules,
            save,
            verbose,
        } => solve_command(config, puzzle, output, timeout, no_direct_rules, save, verbose),
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Validate { puzzle, solution } => validate_command(puzzle, solution),
        Commands::Analyze { puzzle } => analyze_command(puzzle),
    }
}

fn solve_command(
    config_path: PathBuf,
    puzzle_file: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    timeout_seconds: Option<u64>,
    no_direct_rules: bool,
    save_solution: bool,
    verbose: bool,
) -> Result<()> {
    println!("{}", ColorOutput::info("Starting Nonogram solver"));

    // Load configuration
    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!(
                "Config file {} not found, using defaults",
                config_path.display()
            ))
        );
        Settings::default()
    };

    // Apply CLI overrides
    let cli_overrides = CliOverrides {
        puzzle_file,
        output_dir,
        timeout_seconds,
        no_direct_rules,
        save_solution,
    };
    settings.merge_with_cli(&cli_overrides);

    if verbose {
        println!("Configuration:");
        println!("  Puzzle file: {}", settings.input.puzzle_file.display());
        println!("  Output dir: {}", settings.output.output_directory.display());
        println!("  Direct rules: {}", settings.solver.use_direct_rules);
        match settings.solver.timeout_seconds {
            Some(secs) => println!("  Timeout: {}s", secs),
            None => println!("  Timeout: none"),
        }
        println!();
    }

    // Validate settings
    settings
        .validate()
        .context("Configuration validation failed")?;

    let problem = NonogramProblem::new(settings.clone()).context("Failed to load puzzle")?;
    println!(
        "Puzzle: {}x{}, {} clue lines",
        problem.puzzle().size(),
        problem.puzzle().size(),
        problem.puzzle().lines().len()
    );

    let report = problem.solve().context("Failed to solve puzzle")?;

    if verbose {
        if let Some(ref propagation) = report.propagation {
            println!(
                "Direct rules: {}/{} cells in {} passes",
                propagation.cells_determined, propagation.total_cells, propagation.passes
            );
        }
        if let Some(ref search) = report.search {
            print!("{}", search);
        }
        println!();
    }

    match report.solution {
        Some(solution) => {
            println!(
                "{}",
                ColorOutput::success(&format!(
                    "Solved in {:.3}s",
                    report.total_time.as_secs_f64()
                ))
            );
            println!();
            print!("{}", SolutionFormatter::format_solution(&solution, verbose));

            if settings.output.save_solution {
                SolutionFormatter::save_solution(
                    &solution,
                    &settings.output.output_directory,
                    &settings.output.format,
                )
                .context("Failed to save solution")?;
                println!(
                    "\n{}",
                    ColorOutput::info(&format!(
                        "Solution saved to {}",
                        settings.output.output_directory.display()
                    ))
                );
            }
        }
        None => {
            println!("{}", ColorOutput::warning("A solution could not be found."));
            println!(
                "Execution time: {:.3} seconds",
                report.total_time.as_secs_f64()
            );
        }
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let puzzle_dir = directory.join("puzzles");
    let output_dir = directory.join("output/solutions");

    for dir in [&config_dir, &puzzle_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        let default_settings = Settings::default();
        default_settings
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_puzzles(&puzzle_dir).context("Failed to create example puzzles")?;
    println!("Created example puzzles in: {}", puzzle_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Add your puzzles to {}", puzzle_dir.display());
    println!("2. Run: cargo run -- solve --puzzle puzzles/letter_p.txt");

    Ok(())
}

fn validate_command(puzzle_path: PathBuf, solution_path: PathBuf) -> Result<()> {
    println!("{}", ColorOutput::info("Validating solution..."));

    let puzzle = load_puzzle_from_file(&puzzle_path)
        .with_context(|| format!("Failed to load puzzle from {}", puzzle_path.display()))?;
    let grid = load_grid_from_file(&solution_path)
        .with_context(|| format!("Failed to load solution from {}", solution_path.display()))?;

    let result = SolutionValidator::validate(&puzzle, &grid);
    print!("{}", result);

    if result.is_valid {
        println!("{}", ColorOutput::success("Solution is valid!"));
    } else {
        println!("{}", ColorOutput::error("Solution is invalid"));
    }

    Ok(())
}

fn analyze_command(puzzle_path: PathBuf) -> Result<()> {
    println!("{}", ColorOutput::info("Analyzing puzzle..."));

    let puzzle = load_puzzle_from_file(&puzzle_path)
        .with_context(|| format!("Failed to load puzzle from {}", puzzle_path.display()))?;

    let size = puzzle.size();
    let (row_sum, col_sum) = puzzle.clue_sums();

    println!("Grid: {}x{}", size, size);
    println!(
        "Painted cells: {} by row clues, {} by column clues ({:.1}% density)",
        row_sum,
        col_sum,
        (row_sum as f64 / (size * size) as f64) * 100.0
    );

    if row_sum != col_sum {
        println!(
            "{}",
            ColorOutput::warning(
                "Row and column clue sums disagree; the puzzle cannot be solved"
            )
        );
    }

    let min_slack = (0..2 * size)
        .map(|i| size - puzzle.lines()[i].min_length())
        .min()
        .unwrap_or(0);
    println!("Tightest line slack: {}", min_slack);

    let outcome = PropagationEngine::run(puzzle.clone());
    println!(
        "Direct rules determine {}/{} cells in {} passes",
        outcome.cells_determined,
        outcome.puzzle.grid().cell_count(),
        outcome.passes
    );

    if outcome.fully_determined {
        println!(
            "{}",
            ColorOutput::success("The direct rules alone settle this puzzle")
        );
    } else {
        println!("Backtracking search required beyond this point");
        print!(
            "{}",
            SolutionFormatter::format_grid_compact(outcome.puzzle.grid())
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "nonogram_solver",
            "solve",
            "--config",
            "test.yaml",
            "--timeout",
            "5",
        ]);

        assert!(cli.is_ok());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("puzzles/banner.txt").exists());
        assert!(temp_dir.path().join("puzzles/letter_p.txt").exists());
    }

    #[test]
    fn test_validate_command() {
        let temp_dir = tempdir().unwrap();
        let puzzle_path = temp_dir.path().join("puzzle.txt");
        let solution_path = temp_dir.path().join("solution.txt");
        std::fs::write(&puzzle_path, "1\n1\n#\n2\n0\n").unwrap();
        std::fs::write(&solution_path, "1 0\n1 0\n").unwrap();

        assert!(validate_command(puzzle_path, solution_path).is_ok());
    }
}

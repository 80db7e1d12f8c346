//! Command-line configuration, logging setup and the entry point used by the binary.

use std::fmt::Write as _;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Result, WrapErr as _};
use log::{info, LevelFilter};
use rand::{Rng as _, SeedableRng as _};
use rand_chacha::ChaCha8Rng;

use crate::{
    grid::{Grid, DEFAULT_COLS, DEFAULT_ROWS},
    maze::generate_maze,
    pathfinding::{search, SearchResult},
    types::{Coord, MazeKind, SearchKind},
};

/// Runs one maze generation and one search, then prints the grid and a summary.
///
/// Every option can also be set through the environment variable named next to it.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Search algorithm to run.
    #[arg(
        short,
        long,
        value_enum,
        default_value_t = SearchKind::AStar,
        env = "TILEMAZE_ALGORITHM"
    )]
    pub algorithm: SearchKind,
    /// Maze generator applied before searching.
    #[arg(short, long, value_enum, default_value_t = MazeKind::None, env = "TILEMAZE_MAZE")]
    pub maze: MazeKind,
    /// Number of grid rows.
    #[arg(long, default_value_t = DEFAULT_ROWS, env = "TILEMAZE_ROWS")]
    pub rows: usize,
    /// Number of grid columns.
    #[arg(long, default_value_t = DEFAULT_COLS, env = "TILEMAZE_COLS")]
    pub cols: usize,
    /// Start tile as `row,col`.
    #[arg(long, default_value = "1,1", env = "TILEMAZE_START")]
    pub start: Coord,
    /// End tile as `row,col`.
    #[arg(long, default_value = "37,47", env = "TILEMAZE_END")]
    pub end: Coord,
    /// Seed for the maze generator; a random one is drawn and logged when absent.
    #[arg(short, long, env = "TILEMAZE_SEED")]
    pub seed: Option<u64>,
    /// Raises log verbosity, once per occurrence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Installs the global logger.
///
/// The level follows the `-v` count (warn, info, debug, trace) and can be overridden with
/// `RUST_LOG`.
///
/// # Errors
///
/// - [`log::SetLoggerError`] when a logger is already installed.
pub fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()?;

    Ok(())
}

/// Builds the grid, maze and search described by `cli` and returns the printable report.
///
/// # Errors
///
/// - Invalid grid dimensions or endpoints.
/// - A maze requested on a grid too small to hold one.
/// - A search rejected by [`search`].
pub fn report(cli: &Cli) -> Result<String> {
    let grid = Grid::with_dimensions(cli.rows, cli.cols, cli.start, cli.end)
        .wrap_err("invalid grid configuration")?;

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    info!("maze seed: {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let grid = generate_maze(cli.maze, &grid, &mut rng)
        .wrap_err_with(|| format!("failed to generate a {} maze", cli.maze))?;

    let result = search(cli.algorithm, &grid, grid.start(), grid.end())
        .wrap_err_with(|| format!("{} search failed", cli.algorithm))?;

    Ok(format_report(cli, &result))
}

/// Formats the searched grid followed by a one-line summary.
fn format_report(cli: &Cli, result: &SearchResult) -> String {
    let mut output = result.grid.to_string();
    let path = if result.found_path() {
        result.path.len().to_string()
    } else {
        "none (end unreachable)".to_owned()
    };
    // Writing into a `String` cannot fail.
    let _ = write!(
        output,
        "\nalgorithm: {} | maze: {} | traversed: {} | path: {path}",
        cli.algorithm,
        cli.maze,
        result.traversed_tiles.len(),
    );

    output
}

/// Prints the report for `cli` to standard output.
///
/// # Errors
///
/// - Any error from [`report`].
pub fn run(cli: &Cli) -> Result<()> {
    println!("{}", report(cli)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tilemaze").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);

        assert_eq!(cli.algorithm, SearchKind::AStar);
        assert_eq!(cli.maze, MazeKind::None);
        assert_eq!(cli.rows, 39);
        assert_eq!(cli.cols, 49);
        assert_eq!(cli.start, Coord::new(1, 1));
        assert_eq!(cli.end, Coord::new(37, 47));
        assert_eq!(cli.seed, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_options() {
        let cli = parse(&[
            "-a",
            "dijkstra",
            "--maze",
            "recursive-division",
            "--start",
            "3,3",
            "--end",
            "5,7",
            "-s",
            "9",
            "-vv",
        ]);

        assert_eq!(cli.algorithm, SearchKind::Dijkstra);
        assert_eq!(cli.maze, MazeKind::RecursiveDivision);
        assert_eq!(cli.start, Coord::new(3, 3));
        assert_eq!(cli.end, Coord::new(5, 7));
        assert_eq!(cli.seed, Some(9));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_rejects_bad_coord() {
        assert!(Cli::try_parse_from(["tilemaze", "--start", "1;1"]).is_err());
        assert!(Cli::try_parse_from(["tilemaze", "-a", "greedy"]).is_err());
    }

    #[test]
    fn test_report_open_grid() {
        let report = report(&parse(&["-a", "bfs"])).expect("report should succeed");
        let summary = report.lines().last().expect("report should not be empty");

        assert_eq!(report.lines().count(), 40);
        assert!(summary.starts_with("algorithm: BFS | maze: none | traversed: "));
        assert!(summary.ends_with("| path: 83"));
    }

    #[test]
    fn test_report_maze_is_seeded() {
        let args = ["--maze", "binary-tree", "--seed", "17"];

        let first = report(&parse(&args)).expect("report should succeed");
        let second = report(&parse(&args)).expect("report should succeed");

        assert_eq!(first, second);
    }

    #[test]
    fn test_report_unreachable() {
        let cli = parse(&["--rows", "3", "--cols", "3", "--start", "0,0", "--end", "2,2"]);
        let grid = Grid::with_dimensions(3, 3, cli.start, cli.end)
            .and_then(|grid| grid.toggle_wall(1, 2))
            .and_then(|grid| grid.toggle_wall(2, 1))
            .expect("grid should build");
        let result = search(cli.algorithm, &grid, grid.start(), grid.end())
            .expect("search should succeed");

        let report = format_report(&cli, &result);

        assert!(report.ends_with("| path: none (end unreachable)"));
    }

    #[test]
    fn test_report_rejects_bad_grid() {
        assert!(report(&parse(&["--start", "37,47"])).is_err());
        assert!(report(&parse(&["--rows", "2", "--maze", "binary-tree", "--end", "1,4"])).is_err());
    }
}

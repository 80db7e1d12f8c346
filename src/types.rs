//! Shared value types: coordinates, movement directions, algorithm selectors and errors.

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use thiserror::Error;

/// Position of a tile in the grid.
///
/// Coordinates are zero-based and row-major: `row` grows downwards and `col` grows to the right.
/// They double as the back-reference type for [`Tile::parent`](crate::tile::Tile::parent), which
/// keeps the predecessor relation a plain lookup instead of a pointer into the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    /// Row index, counted from the top edge.
    pub row: usize,
    /// Column index, counted from the left edge.
    pub col: usize,
}

impl Coord {
    /// Builds a coordinate from a row and a column.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the 4-directional (Manhattan) distance to another coordinate.
    pub const fn manhattan(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Moves one step in `direction`, returning [`None`] when the step leaves a grid of
    /// `rows` by `cols` tiles.
    pub fn step(self, direction: Direction, rows: usize, cols: usize) -> Option<Self> {
        let (row, col) = match direction {
            Direction::Up => (self.row.checked_sub(1)?, self.col),
            Direction::Down => (self.row.checked_add(1)?, self.col),
            Direction::Left => (self.row, self.col.checked_sub(1)?),
            Direction::Right => (self.row, self.col.checked_add(1)?),
        };

        (row < rows && col < cols).then_some(Self { row, col })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Coord {
    type Err = GridError;

    /// Parses the `row,col` form used on the command line. Whitespace around either number is
    /// ignored.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || GridError::InvalidCoord(input.to_owned());

        let (row, col) = input.split_once(',').ok_or_else(invalid)?;
        let row = row.trim().parse().map_err(|_err| invalid())?;
        let col = col.trim().parse().map_err(|_err| invalid())?;

        Ok(Self { row, col })
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Orthogonal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards row zero.
    Up,
    /// Away from row zero.
    Down,
    /// Towards column zero.
    Left,
    /// Away from column zero.
    Right,
}

impl Direction {
    /// Neighbor enumeration order shared by every search algorithm.
    ///
    /// Results that depend on tie-breaking, such as the depth-first visiting order or which of two
    /// equally short paths Dijkstra reports, follow this order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
}

/// Search algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SearchKind {
    /// Breadth-first search over a FIFO queue.
    ///
    /// This variant explores tiles in rings of growing distance and always finds a shortest path.
    Bfs,
    /// Depth-first search over an explicit stack.
    ///
    /// This variant follows one branch as far as it goes before backtracking. The path it reports
    /// is valid but not necessarily the shortest.
    Dfs,
    /// Dijkstra's algorithm over a distance-keyed binary heap.
    ///
    /// This variant finalizes tiles in order of distance and finds a shortest path. Tiles at equal
    /// distance are taken in the order they were discovered.
    Dijkstra,
    /// A* over a binary heap keyed by distance plus Manhattan heuristic.
    ///
    /// This variant finds a shortest path while usually visiting fewer tiles than the others,
    /// since the heuristic steers it towards the end.
    AStar,
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
            Self::Dijkstra => "Dijkstra",
            Self::AStar => "A*",
        })
    }
}

/// Maze generator selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MazeKind {
    /// Binary-tree carving biased towards the bottom-right corner.
    ///
    /// This variant walls the whole grid and has every cell carve one passage south or east,
    /// which leaves long open corridors along the last row and column.
    BinaryTree,
    /// Recursive division into chambers joined by single gaps.
    ///
    /// This variant starts from an open grid and keeps splitting it with walls that each leave a
    /// single opening.
    RecursiveDivision,
    /// No maze.
    ///
    /// This variant passes the grid through unchanged, hand-placed walls included.
    #[default]
    None,
}

impl fmt::Display for MazeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BinaryTree => "binary tree",
            Self::RecursiveDivision => "recursive division",
            Self::None => "none",
        })
    }
}

/// Errors raised by grid construction, layout parsing, search and maze generation.
///
/// Every variant describes a precondition violation. An unreachable end tile is deliberately
/// absent: searches report it as an empty path.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// A coordinate lies outside the grid.
    ///
    /// This variant is raised for endpoints given to grid construction or to a search, and for
    /// wall toggles aimed past the edges.
    #[error("coordinate {coord} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        /// Offending coordinate.
        coord: Coord,
        /// Number of rows in the grid.
        rows: usize,
        /// Number of columns in the grid.
        cols: usize,
    },
    /// A grid was requested with zero rows or zero columns.
    ///
    /// This variant carries the requested dimensions as given.
    #[error("grid dimensions must be non-zero, got {rows}x{cols}")]
    EmptyDimensions {
        /// Requested number of rows.
        rows: usize,
        /// Requested number of columns.
        cols: usize,
    },
    /// Start and end were configured on the same tile.
    ///
    /// This variant is only raised at construction. A search may still be asked to go from a
    /// tile to itself.
    #[error("start and end both sit at {0}")]
    StartEqualsEnd(Coord),
    /// The grid holds a number of start tiles other than one.
    ///
    /// This variant comes from layout parsing and validation, and carries the count found.
    #[error("expected exactly one start tile, found {0}")]
    StartCount(usize),
    /// The grid holds a number of end tiles other than one.
    ///
    /// This variant comes from layout parsing and validation, and carries the count found.
    #[error("expected exactly one end tile, found {0}")]
    EndCount(usize),
    /// A start or end tile is marked as a wall.
    ///
    /// This variant guards searches, which cannot begin or finish on a blocked tile.
    #[error("endpoint {0} is a wall")]
    WalledEndpoint(Coord),
    /// A layout contains a character with no tile meaning.
    ///
    /// This variant is raised by layout parsing, which accepts `S`, `E`, `#`, `.` and spaces.
    #[error("invalid layout character {ch:?} at {coord}")]
    InvalidCharacter {
        /// Offending character.
        ch: char,
        /// Where the character was found.
        coord: Coord,
    },
    /// A layout row differs in length from the first one.
    ///
    /// This variant is raised by layout parsing, since grids must be rectangular.
    #[error("layout row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A layout contains no tiles at all.
    ///
    /// This variant is raised for empty input, or input holding only blank lines.
    #[error("layout is empty")]
    EmptyLayout,
    /// A coordinate string is not of the form `row,col`.
    ///
    /// This variant carries the rejected input, and is what the command line reports for a bad
    /// `--start` or `--end`.
    #[error("invalid coordinate {0:?}, expected `row,col`")]
    InvalidCoord(String),
    /// The grid cannot hold a maze lattice.
    ///
    /// This variant is raised by maze generation on grids with fewer than three rows or columns.
    #[error("a {rows}x{cols} grid is too small for a maze, need at least 3x3")]
    TooSmallForMaze {
        /// Number of rows in the grid.
        rows: usize,
        /// Number of columns in the grid.
        cols: usize,
    },
    /// Path reconstruction hit a tile without a predecessor before reaching the start.
    ///
    /// This variant also covers parent links that loop back on themselves. It points at the tile
    /// where the chain stopped.
    #[error("parent chain broken at {0}")]
    BrokenParentChain(Coord),
}

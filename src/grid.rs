//! Grid arena and its construction, editing and validation helpers.
//!
//! A [`Grid`] owns its tiles in a single row-major vector and addresses them by [`Coord`].
//! Operations that edit a grid on behalf of a caller, such as [`Grid::toggle_wall`], return a new
//! grid and leave the receiver untouched.

use std::{fmt, str::FromStr};

use crate::{
    tile::Tile,
    types::{Coord, GridError},
};

/// Number of rows in the reference configuration.
pub const DEFAULT_ROWS: usize = 39;

/// Number of columns in the reference configuration.
pub const DEFAULT_COLS: usize = 49;

/// Start tile of the reference configuration.
pub const DEFAULT_START: Coord = Coord::new(1, 1);

/// End tile of the reference configuration.
pub const DEFAULT_END: Coord = Coord::new(DEFAULT_ROWS - 2, DEFAULT_COLS - 2);

/// Rectangular collection of tiles with exactly one start and one end.
///
/// The grid is the unit that searches and maze generators work on. Both take a grid by reference
/// and hand back a new one, so a caller can keep the grid it started from, for instance to run
/// several algorithms over the same maze.
#[derive(Clone, Debug)]
pub struct Grid {
    /// Number of rows.
    ///
    /// This is never zero.
    rows: usize,
    /// Number of columns.
    ///
    /// This is never zero.
    cols: usize,
    /// Position of the start tile.
    ///
    /// The tile at this position is the only one with [`Tile::is_start`] set.
    start: Coord,
    /// Position of the end tile.
    ///
    /// The tile at this position is the only one with [`Tile::is_end`] set.
    end: Coord,
    /// Tiles in row-major order.
    ///
    /// The tile at `(row, col)` sits at index `row * cols + col`.
    tiles: Vec<Tile>,
}

impl Grid {
    /// Builds a grid with the reference dimensions.
    ///
    /// # Errors
    ///
    /// - [`GridError::StartEqualsEnd`] when both endpoints coincide.
    /// - [`GridError::OutOfBounds`] when an endpoint lies outside the grid.
    pub fn new(start: Coord, end: Coord) -> Result<Self, GridError> {
        Self::with_dimensions(DEFAULT_ROWS, DEFAULT_COLS, start, end)
    }

    /// Builds an open grid of `rows` by `cols` tiles.
    ///
    /// Every tile starts without walls or search state, except the start tile which holds a zero
    /// distance.
    ///
    /// # Errors
    ///
    /// - [`GridError::EmptyDimensions`] when either dimension is zero.
    /// - [`GridError::StartEqualsEnd`] when both endpoints coincide.
    /// - [`GridError::OutOfBounds`] when an endpoint lies outside the grid.
    pub fn with_dimensions(
        rows: usize,
        cols: usize,
        start: Coord,
        end: Coord,
    ) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyDimensions { rows, cols });
        }
        if start == end {
            return Err(GridError::StartEqualsEnd(start));
        }
        for coord in [start, end] {
            if coord.row >= rows || coord.col >= cols {
                return Err(GridError::OutOfBounds { coord, rows, cols });
            }
        }

        Ok(Self::build(rows, cols, start, end))
    }

    /// Lays out the tiles of an already validated configuration.
    fn build(rows: usize, cols: usize, start: Coord, end: Coord) -> Self {
        let tiles = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Tile::new(row, col)))
            .map(|mut tile| {
                tile.is_start = tile.coord() == start;
                tile.is_end = tile.coord() == end;
                if tile.is_start {
                    tile.distance = Some(0);
                }
                tile
            })
            .collect();

        Self {
            rows,
            cols,
            start,
            end,
            tiles,
        }
    }

    /// Returns the number of rows.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the configured start position.
    pub const fn start(&self) -> Coord {
        self.start
    }

    /// Returns the configured end position.
    pub const fn end(&self) -> Coord {
        self.end
    }

    /// Checks whether `coord` lies inside the grid.
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Maps a coordinate to its slot in the tile vector.
    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.row * self.cols + coord.col)
    }

    /// Returns the tile at `coord`, if it lies inside the grid.
    pub fn tile(&self, coord: Coord) -> Option<&Tile> {
        self.tiles.get(self.index(coord)?)
    }

    /// Returns the tile at `coord` for in-place updates during a search or maze run.
    pub(crate) fn tile_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        let index = self.index(coord)?;
        self.tiles.get_mut(index)
    }

    /// Returns the tiles of row `row`, left to right.
    pub fn row(&self, row: usize) -> Option<&[Tile]> {
        let first = row.checked_mul(self.cols)?;
        self.tiles.get(first..first.checked_add(self.cols)?)
    }

    /// Iterates over every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Counts the wall tiles.
    pub fn wall_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_wall).count()
    }

    /// Checks whether `(row, col)` is the configured start or end.
    ///
    /// Searches and maze generators use this to keep both endpoints from ever being walled.
    pub fn is_start_or_end(&self, row: usize, col: usize) -> bool {
        let coord = Coord::new(row, col);
        coord == self.start || coord == self.end
    }

    /// Returns a copy of the grid with the wall at `(row, col)` flipped.
    ///
    /// The receiver is never modified. Toggling the start or end tile returns an unchanged copy.
    ///
    /// # Errors
    ///
    /// - [`GridError::OutOfBounds`] when `(row, col)` lies outside the grid.
    pub fn toggle_wall(&self, row: usize, col: usize) -> Result<Self, GridError> {
        let coord = Coord::new(row, col);
        let mut grid = self.clone();

        let is_endpoint = grid.is_start_or_end(row, col);
        let tile = grid.tile_mut(coord).ok_or(GridError::OutOfBounds {
            coord,
            rows: self.rows,
            cols: self.cols,
        })?;
        if !is_endpoint {
            tile.is_wall = !tile.is_wall;
        }

        Ok(grid)
    }

    /// Sets the wall flag of a tile in place, skipping endpoints and out-of-bounds positions.
    pub(crate) fn set_wall(&mut self, coord: Coord, is_wall: bool) {
        if self.is_start_or_end(coord.row, coord.col) {
            return;
        }
        if let Some(tile) = self.tile_mut(coord) {
            tile.is_wall = is_wall;
        }
    }

    /// Returns a copy keeping walls and endpoints but none of the state a search leaves behind.
    pub fn without_search_state(&self) -> Self {
        let mut grid = self.clone();
        grid.reset_search_state(self.start);
        grid
    }

    /// Returns a copy with the same dimensions and endpoints, no walls and no search state.
    pub fn blank(&self) -> Self {
        Self::build(self.rows, self.cols, self.start, self.end)
    }

    /// Clears every tile's search state and makes `origin` the zero-distance tile.
    pub(crate) fn reset_search_state(&mut self, origin: Coord) {
        for tile in &mut self.tiles {
            tile.clear_search_state();
        }
        if let Some(tile) = self.tile_mut(origin) {
            tile.distance = Some(0);
        }
    }

    /// Checks the grid invariants: one start, one end, neither of them walled.
    ///
    /// Every search runs this check before touching the grid.
    ///
    /// # Errors
    ///
    /// - [`GridError::StartCount`] or [`GridError::EndCount`] when an endpoint is missing or
    ///   duplicated.
    /// - [`GridError::WalledEndpoint`] when an endpoint is a wall.
    pub fn validate(&self) -> Result<(), GridError> {
        let starts = self.tiles.iter().filter(|tile| tile.is_start).count();
        if starts != 1 {
            return Err(GridError::StartCount(starts));
        }
        let ends = self.tiles.iter().filter(|tile| tile.is_end).count();
        if ends != 1 {
            return Err(GridError::EndCount(ends));
        }
        if let Some(tile) = self
            .tiles
            .iter()
            .find(|tile| (tile.is_start || tile.is_end) && tile.is_wall)
        {
            return Err(GridError::WalledEndpoint(tile.coord()));
        }

        Ok(())
    }
}

/// Parses a character layout into a grid.
///
/// The layout uses one line per row: `S` marks the start, `E` the end, `#` a wall, and `.` or a
/// space an open tile. Leading and trailing blank lines are ignored.
impl FromStr for Grid {
    type Err = GridError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = input
            .trim_matches(|ch: char| ch == '\n' || ch == '\r')
            .lines()
            .collect();
        let cols = lines.first().map_or(0, |line| line.chars().count());
        if cols == 0 {
            return Err(GridError::EmptyLayout);
        }

        let mut starts = Vec::new();
        let mut ends = Vec::new();
        let mut walls = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(GridError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }

            for (col, ch) in line.chars().enumerate() {
                let coord = Coord::new(row, col);
                match ch {
                    'S' => starts.push(coord),
                    'E' => ends.push(coord),
                    '#' => walls.push(coord),
                    '.' | ' ' => {}
                    _ => return Err(GridError::InvalidCharacter { ch, coord }),
                }
            }
        }

        let (&[start], &[end]) = (starts.as_slice(), ends.as_slice()) else {
            if starts.len() != 1 {
                return Err(GridError::StartCount(starts.len()));
            }
            return Err(GridError::EndCount(ends.len()));
        };

        let mut grid = Self::with_dimensions(lines.len(), cols, start, end)?;
        for coord in walls {
            grid.set_wall(coord, true);
        }

        Ok(grid)
    }
}

/// Renders the grid one line per row.
///
/// Endpoints print as `S` and `E`, walls as `#`, path tiles as `*`, traversed tiles as `o` and
/// untouched open tiles as `.`.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, tile) in self.tiles.iter().enumerate() {
            if index > 0 && index % self.cols == 0 {
                writeln!(f)?;
            }

            let symbol = if tile.is_start {
                'S'
            } else if tile.is_end {
                'E'
            } else if tile.is_wall {
                '#'
            } else if tile.is_path {
                '*'
            } else if tile.is_traversed {
                'o'
            } else {
                '.'
            };
            write!(f, "{symbol}")?;
        }

        Ok(())
    }
}

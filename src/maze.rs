//! Maze generation over a [`Grid`].
//!
//! Generators lay their mazes out on a lattice: tiles with an odd row and an odd column inside
//! the border act as cells, and the tiles between them act as separators that are either walls or
//! carved passages. Start and end are never walled, and an endpoint that falls off the lattice is
//! joined to its nearest cell so that every generated maze keeps the two connected.
//!
//! Randomness comes from the caller. Passing a seeded generator such as
//! [`rand_chacha::ChaCha8Rng`] makes layouts reproducible.

use std::cmp::Ordering;

use log::debug;
use rand::Rng;

use crate::{
    grid::Grid,
    types::{Coord, GridError, MazeKind},
};

/// Draws a uniform integer in `min..max_exclusive`.
///
/// # Panics
///
/// Panics when the range is empty, that is when `min >= max_exclusive`.
pub fn get_rand_int<R: Rng>(rng: &mut R, min: usize, max_exclusive: usize) -> usize {
    rng.random_range(min..max_exclusive)
}

/// Builds a `kind` maze with the dimensions and endpoints of `grid`.
///
/// The input grid is left untouched. [`MazeKind::None`] returns a plain copy of it; the other
/// kinds start from a blank grid, so walls and search state of the input do not carry over.
///
/// # Errors
///
/// - [`GridError::TooSmallForMaze`] when the grid has fewer than three rows or columns.
pub fn generate_maze<R: Rng>(
    kind: MazeKind,
    grid: &Grid,
    rng: &mut R,
) -> Result<Grid, GridError> {
    let lattice = match kind {
        MazeKind::None => return Ok(grid.clone()),
        MazeKind::BinaryTree | MazeKind::RecursiveDivision => Lattice::of(grid)?,
    };

    let mut maze = grid.blank();
    if kind == MazeKind::BinaryTree {
        binary_tree(&mut maze, lattice, rng);
    } else {
        recursive_division(&mut maze, lattice, rng);
    }
    for endpoint in [maze.start(), maze.end()] {
        lattice.connect(&mut maze, endpoint);
    }
    debug!(
        "generated {kind} maze on a {}x{} grid with {} walls",
        maze.rows(),
        maze.cols(),
        maze.wall_count()
    );

    Ok(maze)
}

/// Extent of the cell lattice of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Lattice {
    /// Row of the bottom-most cells.
    last_row: usize,
    /// Column of the right-most cells.
    last_col: usize,
}

impl Lattice {
    /// Computes the lattice of `grid`.
    fn of(grid: &Grid) -> Result<Self, GridError> {
        let (rows, cols) = (grid.rows(), grid.cols());
        if rows < 3 || cols < 3 {
            return Err(GridError::TooSmallForMaze { rows, cols });
        }

        Ok(Self {
            last_row: last_odd(rows - 2),
            last_col: last_odd(cols - 2),
        })
    }

    /// Number of cell rows.
    const fn height(self) -> usize {
        self.last_row.div_ceil(2)
    }

    /// Number of cell columns.
    const fn width(self) -> usize {
        self.last_col.div_ceil(2)
    }

    /// Iterates over the cells in row-major order.
    fn cells(self) -> impl Iterator<Item = Coord> {
        (1..=self.last_row).step_by(2).flat_map(move |row| {
            (1..=self.last_col)
                .step_by(2)
                .map(move |col| Coord::new(row, col))
        })
    }

    /// Returns the cell closest to `coord`.
    fn nearest(self, coord: Coord) -> Coord {
        Coord::new(snap(coord.row, self.last_row), snap(coord.col, self.last_col))
    }

    /// Opens the tiles between `coord` and its nearest cell, first along the column and then
    /// along the row.
    fn connect(self, grid: &mut Grid, coord: Coord) {
        let target = self.nearest(coord);

        for row in coord.row.min(target.row)..=coord.row.max(target.row) {
            grid.set_wall(Coord::new(row, coord.col), false);
        }
        for col in coord.col.min(target.col)..=coord.col.max(target.col) {
            grid.set_wall(Coord::new(target.row, col), false);
        }
    }
}

/// Returns `value` when odd, otherwise the odd number right below it. `value` must be positive.
const fn last_odd(value: usize) -> usize {
    if value % 2 == 1 {
        value
    } else {
        value - 1
    }
}

/// Moves an index onto the lattice axis `1, 3, ..., last`.
const fn snap(value: usize, last: usize) -> usize {
    if value == 0 {
        1
    } else if value > last {
        last
    } else if value % 2 == 1 {
        value
    } else {
        value - 1
    }
}

/// Carves a binary-tree maze.
///
/// Every tile but the endpoints starts as a wall and the cells are opened. Each cell then carves
/// one passage, south or east at random, except on the last lattice row (always east), the last
/// lattice column (always south) and the bottom-right cell (nothing). Every cell ends up with a
/// single route towards the bottom-right corner, so the cells form a spanning tree.
fn binary_tree<R: Rng>(grid: &mut Grid, lattice: Lattice, rng: &mut R) {
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            grid.set_wall(Coord::new(row, col), true);
        }
    }
    for cell in lattice.cells() {
        grid.set_wall(cell, false);
    }

    for cell in lattice.cells() {
        let south = Coord::new(cell.row + 1, cell.col);
        let east = Coord::new(cell.row, cell.col + 1);

        let passage = match (cell.row == lattice.last_row, cell.col == lattice.last_col) {
            (true, true) => continue,
            (true, false) => east,
            (false, true) => south,
            (false, false) => {
                if get_rand_int(rng, 0, 2) == 0 {
                    south
                } else {
                    east
                }
            }
        };
        grid.set_wall(passage, false);
    }
}

/// Rectangular block of cells still to be divided.
#[derive(Clone, Copy, Debug)]
struct Chamber {
    /// Row of the top-left cell.
    row: usize,
    /// Column of the top-left cell.
    col: usize,
    /// Number of cell rows.
    height: usize,
    /// Number of cell columns.
    width: usize,
}

impl Chamber {
    /// Row of the bottom-most cells.
    const fn last_row(self) -> usize {
        self.row + 2 * (self.height - 1)
    }

    /// Column of the right-most cells.
    const fn last_col(self) -> usize {
        self.col + 2 * (self.width - 1)
    }
}

/// Builds a recursive-division maze.
///
/// The border is walled and the lattice starts as one open chamber, which [`divide`] then splits.
/// When a dimension is even, the lattice stops one line short of the border, and that extra line
/// is walled with the border.
fn recursive_division<R: Rng>(grid: &mut Grid, lattice: Lattice, rng: &mut R) {
    let (last_row, last_col) = (grid.rows() - 1, grid.cols() - 1);
    for row in 0..=last_row {
        grid.set_wall(Coord::new(row, 0), true);
        grid.set_wall(Coord::new(row, last_col), true);
    }
    for col in 0..=last_col {
        grid.set_wall(Coord::new(0, col), true);
        grid.set_wall(Coord::new(last_row, col), true);
    }
    if lattice.last_row + 1 < last_row {
        for col in 0..=last_col {
            grid.set_wall(Coord::new(lattice.last_row + 1, col), true);
        }
    }
    if lattice.last_col + 1 < last_col {
        for row in 0..=last_row {
            grid.set_wall(Coord::new(row, lattice.last_col + 1), true);
        }
    }

    divide(
        grid,
        rng,
        Chamber {
            row: 1,
            col: 1,
            height: lattice.height(),
            width: lattice.width(),
        },
    );
}

/// Splits a chamber with a wall holding a single gap, then recurses into both halves.
///
/// Chambers one cell thin are left alone. Taller chambers are cut horizontally, wider ones
/// vertically, and square ones either way. Walls run on separator lines and gaps sit on cell
/// lines, so no later wall can close an earlier gap.
///
/// Walls are kept off lines holding an endpoint whenever the chamber offers another line. When
/// it does not, an endpoint on a cell line of the wall becomes the gap. An endpoint sitting where
/// two separator lines cross cannot be the gap, and leaves the wall with a second opening.
fn divide<R: Rng>(grid: &mut Grid, rng: &mut R, chamber: Chamber) {
    if chamber.height <= 1 || chamber.width <= 1 {
        return;
    }

    let horizontal = match chamber.height.cmp(&chamber.width) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => get_rand_int(rng, 0, 2) == 0,
    };
    let endpoints = [grid.start(), grid.end()];

    if horizontal {
        let crossing = |wall_row: usize| {
            endpoints
                .iter()
                .find(|endpoint| {
                    endpoint.row == wall_row
                        && (chamber.col..=chamber.last_col()).contains(&endpoint.col)
                })
                .map(|endpoint| endpoint.col)
        };
        let split = pick_split(rng, chamber.height - 1, |split| {
            crossing(chamber.row + 2 * split + 1).is_some()
        });
        let wall_row = chamber.row + 2 * split + 1;
        let gap_col = pick_gap(rng, crossing(wall_row), chamber.col, chamber.width);
        for col in chamber.col..=chamber.last_col() {
            if col != gap_col {
                grid.set_wall(Coord::new(wall_row, col), true);
            }
        }

        divide(
            grid,
            rng,
            Chamber {
                height: split + 1,
                ..chamber
            },
        );
        divide(
            grid,
            rng,
            Chamber {
                row: wall_row + 1,
                height: chamber.height - split - 1,
                ..chamber
            },
        );
    } else {
        let crossing = |wall_col: usize| {
            endpoints
                .iter()
                .find(|endpoint| {
                    endpoint.col == wall_col
                        && (chamber.row..=chamber.last_row()).contains(&endpoint.row)
                })
                .map(|endpoint| endpoint.row)
        };
        let split = pick_split(rng, chamber.width - 1, |split| {
            crossing(chamber.col + 2 * split + 1).is_some()
        });
        let wall_col = chamber.col + 2 * split + 1;
        let gap_row = pick_gap(rng, crossing(wall_col), chamber.row, chamber.height);
        for row in chamber.row..=chamber.last_row() {
            if row != gap_row {
                grid.set_wall(Coord::new(row, wall_col), true);
            }
        }

        divide(
            grid,
            rng,
            Chamber {
                width: split + 1,
                ..chamber
            },
        );
        divide(
            grid,
            rng,
            Chamber {
                col: wall_col + 1,
                width: chamber.width - split - 1,
                ..chamber
            },
        );
    }
}

/// Draws a split offset in `0..count`, skipping the offsets for which `blocked` holds unless all
/// of them do.
fn pick_split<R: Rng, F: Fn(usize) -> bool>(rng: &mut R, count: usize, blocked: F) -> usize {
    let free: Vec<usize> = (0..count).filter(|&split| !blocked(split)).collect();
    if free.is_empty() {
        return get_rand_int(rng, 0, count);
    }

    free.get(get_rand_int(rng, 0, free.len()))
        .copied()
        .unwrap_or_default()
}

/// Draws the gap of a wall whose cell lines are `first, first + 2, ...` over `cells` cells.
///
/// An endpoint already lying on one of those cell lines is used as the gap.
fn pick_gap<R: Rng>(rng: &mut R, endpoint: Option<usize>, first: usize, cells: usize) -> usize {
    match endpoint {
        Some(offset) if offset >= first && (offset - first) % 2 == 0 => offset,
        _ => first + 2 * get_rand_int(rng, 0, cells),
    }
}

//! Grid pathfinding and maze generation.
//!
//! The crate models a rectangular grid of tiles with one start and one end, runs breadth-first,
//! depth-first, Dijkstra and A* searches over it, and generates binary-tree and
//! recursive-division mazes. Results are plain data: a search reports the tiles it visited in
//! order together with the reconstructed path, leaving any staged display of them to the caller.
//! The [`cli`] module wraps all of this in a small command-line front end.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

pub mod cli;
pub mod grid;
pub mod maze;
pub mod pathfinding;
pub mod tile;
pub mod types;

pub use grid::Grid;
pub use maze::generate_maze;
pub use pathfinding::{search, SearchResult};
pub use tile::Tile;
pub use types::{Coord, GridError, MazeKind, SearchKind};

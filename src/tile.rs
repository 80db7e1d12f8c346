//! Tile data and coordinate-identity helpers.
//!
//! Two tiles are the same tile when they sit at the same position, whatever their traversal,
//! wall or path state. The helpers in this module build on that notion of identity so that
//! callers holding tile snapshots, such as the lists in a
//! [`SearchResult`](crate::pathfinding::SearchResult), can compare and look them up without
//! caring about the state each copy carries.

use std::hash::{Hash, Hasher};

use crate::types::Coord;

/// A single grid cell with its maze and search state.
///
/// Tiles are owned by a [`Grid`](crate::grid::Grid) and copied out of it whenever a search
/// reports them. The position never changes after creation, while the flags and the search
/// fields are rewritten by maze generation and by every search run on a working copy.
#[expect(
    clippy::struct_excessive_bools,
    reason = "Each flag is an independent tile state the presentation layer reads separately."
)]
#[derive(Clone, Debug)]
pub struct Tile {
    /// Row index of the tile.
    ///
    /// This is fixed at creation and, together with [`Tile::col`], is the identity of the tile.
    pub row: usize,
    /// Column index of the tile.
    ///
    /// This is fixed at creation and, together with [`Tile::row`], is the identity of the tile.
    pub col: usize,
    /// Whether searches start from this tile.
    ///
    /// A valid grid holds exactly one such tile, and it is never walled.
    pub is_start: bool,
    /// Whether searches aim for this tile.
    ///
    /// A valid grid holds exactly one such tile, and it is never walled.
    pub is_end: bool,
    /// Whether the tile blocks movement.
    ///
    /// Searches never enter a wall tile. Maze generators set and clear this flag.
    pub is_wall: bool,
    /// Whether the tile lies on the reconstructed path of the last search.
    ///
    /// Set on every tile from start to end inclusive, and only when the end was reached.
    pub is_path: bool,
    /// Whether the last search visited the tile.
    ///
    /// Once set during a search, the tile is not visited again by that search.
    pub is_traversed: bool,
    /// Distance from the search origin.
    ///
    /// [`None`] stands for an infinite distance, which is the state of every tile but the origin
    /// before a search relaxes it.
    pub distance: Option<usize>,
    /// Coordinate of the tile this one was reached from.
    ///
    /// Following these links from the end tile leads back to the start, which is how paths are
    /// rebuilt. The start tile and unvisited tiles have no parent.
    pub parent: Option<Coord>,
}

impl Tile {
    /// Creates an open tile with no search state.
    pub const fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            is_start: false,
            is_end: false,
            is_wall: false,
            is_path: false,
            is_traversed: false,
            distance: None,
            parent: None,
        }
    }

    /// Returns the tile position.
    pub const fn coord(&self) -> Coord {
        Coord::new(self.row, self.col)
    }

    /// Clears the state written by searches, keeping position, endpoints and walls.
    pub(crate) fn clear_search_state(&mut self) {
        self.is_path = false;
        self.is_traversed = false;
        self.distance = None;
        self.parent = None;
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        tiles_equal(self, other)
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coord().hash(state);
    }
}

/// Checks whether two tiles share a position.
///
/// Only the coordinates take part in the comparison; flags, distance and parent are ignored.
pub const fn tiles_equal(first: &Tile, second: &Tile) -> bool {
    first.row == second.row && first.col == second.col
}

/// Checks whether `tile` sits at `(row, col)`.
pub const fn coord_equals(row: usize, col: usize, tile: &Tile) -> bool {
    tile.row == row && tile.col == col
}

/// Checks whether a tile at the same position as `tile` is present in `collection`.
///
/// This is a caller-facing helper over tile snapshots; the searches themselves track frontiers
/// by [`Coord`].
pub fn contains_tile(tile: &Tile, collection: &[Tile]) -> bool {
    collection.iter().any(|other| tiles_equal(tile, other))
}

/// Removes the first tile at the same position as `tile` from `collection`, keeping the order of
/// the rest.
///
/// Returns the removed tile, or [`None`] when nothing matched. Like [`contains_tile`], this works
/// on snapshots held by the caller rather than on a grid.
pub fn remove_tile(tile: &Tile, collection: &mut Vec<Tile>) -> Option<Tile> {
    let index = collection
        .iter()
        .position(|other| tiles_equal(tile, other))?;

    Some(collection.remove(index))
}

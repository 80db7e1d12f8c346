//! Pathfinding algorithms over a [`Grid`].
//!
//! Every algorithm shares one contract: it runs on a working copy of the caller's grid, records
//! the order in which it visits tiles, and rebuilds the path by following
//! [`Tile::parent`](crate::tile::Tile::parent) links back from the end once the end is visited.
//! Movement is limited to the four orthogonal neighbors, enumerated in [`Direction::ALL`] order.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
};

use log::{debug, trace};

use crate::{
    grid::Grid,
    tile::Tile,
    types::{Coord, Direction, GridError, SearchKind},
};

/// Outcome of a single search.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Tiles in the order the algorithm visited them, starting with the start tile.
    pub traversed_tiles: Vec<Tile>,
    /// Tiles from start to end inclusive, or empty when the end is unreachable.
    pub path: Vec<Tile>,
    /// Working copy of the grid after the search, with traversal and path marks applied.
    pub grid: Grid,
}

impl SearchResult {
    /// Checks whether the search reached the end tile.
    pub fn found_path(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Runs the `kind` algorithm from `start` to `end` on a copy of `grid`.
///
/// The caller's grid is never modified. An unreachable end is not an error: the result holds an
/// empty path and every tile the algorithm explored before its frontier ran dry.
///
/// # Errors
///
/// - Any error from [`Grid::validate`] when the grid is malformed.
/// - [`GridError::OutOfBounds`] when `start` or `end` lies outside the grid.
/// - [`GridError::WalledEndpoint`] when `start` or `end` is a wall.
/// - [`GridError::BrokenParentChain`] when the path cannot be rebuilt from parent links.
pub fn search(
    kind: SearchKind,
    grid: &Grid,
    start: Coord,
    end: Coord,
) -> Result<SearchResult, GridError> {
    grid.validate()?;
    for coord in [start, end] {
        let tile = grid.tile(coord).ok_or(GridError::OutOfBounds {
            coord,
            rows: grid.rows(),
            cols: grid.cols(),
        })?;
        if tile.is_wall {
            return Err(GridError::WalledEndpoint(coord));
        }
    }

    let mut working = grid.clone();
    working.reset_search_state(start);

    let order = if start == end {
        visit(&mut working, start, None, 0);
        vec![start]
    } else {
        match kind {
            SearchKind::Bfs => breadth_first(&mut working, start, end),
            SearchKind::Dfs => depth_first(&mut working, start, end),
            SearchKind::Dijkstra => dijkstra(&mut working, start, end),
            SearchKind::AStar => a_star(&mut working, start, end),
        }
    };

    let path = if order.last() == Some(&end) {
        reconstruct_path(&working, start, end)?
    } else {
        Vec::new()
    };
    for &coord in &path {
        if let Some(tile) = working.tile_mut(coord) {
            tile.is_path = true;
        }
    }
    debug!(
        "{kind} from {start} to {end}: {} tiles traversed, path of {} tiles",
        order.len(),
        path.len()
    );

    Ok(SearchResult {
        traversed_tiles: snapshot(&working, &order),
        path: snapshot(&working, &path),
        grid: working,
    })
}

/// Copies the tiles at `coords` out of `grid`, preserving order.
fn snapshot(grid: &Grid, coords: &[Coord]) -> Vec<Tile> {
    coords
        .iter()
        .filter_map(|&coord| grid.tile(coord).cloned())
        .collect()
}

/// Marks a tile as traversed and records how it was reached.
fn visit(grid: &mut Grid, coord: Coord, parent: Option<Coord>, distance: usize) {
    trace!("visiting {coord} at distance {distance}");
    if let Some(tile) = grid.tile_mut(coord) {
        tile.is_traversed = true;
        tile.parent = parent;
        tile.distance = Some(distance);
    }
}

/// Returns the in-bounds, non-wall, not yet traversed neighbors of `coord`, in
/// [`Direction::ALL`] order.
fn open_neighbors(grid: &Grid, coord: Coord) -> Vec<Coord> {
    Direction::ALL
        .iter()
        .filter_map(|&direction| coord.step(direction, grid.rows(), grid.cols()))
        .filter(|&next| {
            grid.tile(next)
                .is_some_and(|tile| !tile.is_wall && !tile.is_traversed)
        })
        .collect()
}

/// Returns the recorded distance of a tile, treating unknown tiles as unreachable.
fn distance_of(grid: &Grid, coord: Coord) -> Option<usize> {
    grid.tile(coord).and_then(|tile| tile.distance)
}

/// Breadth-first search.
///
/// Tiles are marked when enqueued so that each enters the queue once, and join the visiting order
/// when dequeued.
fn breadth_first(grid: &mut Grid, start: Coord, end: Coord) -> Vec<Coord> {
    let mut order = Vec::new();
    let mut queue = VecDeque::from([start]);
    visit(grid, start, None, 0);

    while let Some(current) = queue.pop_front() {
        order.push(current);
        if current == end {
            break;
        }

        let distance = distance_of(grid, current).unwrap_or_default() + 1;
        for next in open_neighbors(grid, current) {
            visit(grid, next, Some(current), distance);
            queue.push_back(next);
        }
    }

    order
}

/// Depth-first search over an explicit stack.
///
/// Neighbors are pushed in enumeration order, so the last one pushed is explored first. A tile
/// may sit on the stack more than once; only its first pop counts as a visit.
fn depth_first(grid: &mut Grid, start: Coord, end: Coord) -> Vec<Coord> {
    let mut order = Vec::new();
    let mut stack = vec![(start, None)];

    while let Some((current, parent)) = stack.pop() {
        if grid.tile(current).is_none_or(|tile| tile.is_traversed) {
            continue;
        }

        let distance = parent
            .and_then(|parent| distance_of(grid, parent))
            .map_or(0, |distance| distance + 1);
        visit(grid, current, parent, distance);
        order.push(current);
        if current == end {
            break;
        }

        for next in open_neighbors(grid, current) {
            stack.push((next, Some(current)));
        }
    }

    order
}

/// Dijkstra's algorithm with a min-heap keyed by distance.
///
/// Entries made stale by a later relaxation stay in the heap and are skipped once their tile is
/// finalized. Equal distances pop in insertion order.
fn dijkstra(grid: &mut Grid, start: Coord, end: Coord) -> Vec<Coord> {
    let mut order = Vec::new();
    let mut sequence = 0_usize;
    let mut heap = BinaryHeap::from([Reverse((0_usize, sequence, start))]);

    while let Some(Reverse((distance, _, current))) = heap.pop() {
        let Some(tile) = grid.tile_mut(current) else {
            continue;
        };
        if tile.is_traversed {
            continue;
        }
        tile.is_traversed = true;
        order.push(current);
        if current == end {
            break;
        }

        let candidate = distance + 1;
        for next in open_neighbors(grid, current) {
            if distance_of(grid, next).is_some_and(|known| known <= candidate) {
                continue;
            }
            if let Some(tile) = grid.tile_mut(next) {
                tile.distance = Some(candidate);
                tile.parent = Some(current);
            }
            sequence += 1;
            heap.push(Reverse((candidate, sequence, next)));
        }
    }

    order
}

/// A* with a min-heap keyed by `f = g + h`, ties broken by smaller `g` then insertion order.
///
/// `g` is the distance from the start and `h` the Manhattan distance to the end. The heuristic
/// never overestimates on a 4-connected unit-cost grid, so the first time the end pops its
/// distance is optimal.
fn a_star(grid: &mut Grid, start: Coord, end: Coord) -> Vec<Coord> {
    let mut order = Vec::new();
    let mut sequence = 0_usize;
    let mut heap = BinaryHeap::from([Reverse((start.manhattan(end), 0_usize, sequence, start))]);

    while let Some(Reverse((_, cost, _, current))) = heap.pop() {
        let Some(tile) = grid.tile_mut(current) else {
            continue;
        };
        if tile.is_traversed {
            continue;
        }
        tile.is_traversed = true;
        order.push(current);
        if current == end {
            break;
        }

        let candidate = cost + 1;
        for next in open_neighbors(grid, current) {
            if distance_of(grid, next).is_some_and(|known| known <= candidate) {
                continue;
            }
            if let Some(tile) = grid.tile_mut(next) {
                tile.distance = Some(candidate);
                tile.parent = Some(current);
            }
            sequence += 1;
            heap.push(Reverse((
                candidate + next.manhattan(end),
                candidate,
                sequence,
                next,
            )));
        }
    }

    order
}

/// Walks parent links from `end` back to `start` and returns the path in forward order.
fn reconstruct_path(grid: &Grid, start: Coord, end: Coord) -> Result<Vec<Coord>, GridError> {
    let mut path = vec![end];
    let mut current = end;

    while current != start {
        let parent = grid
            .tile(current)
            .and_then(|tile| tile.parent)
            .ok_or(GridError::BrokenParentChain(current))?;
        // A chain longer than the grid can only be a cycle.
        if path.len() > grid.rows() * grid.cols() {
            return Err(GridError::BrokenParentChain(current));
        }
        path.push(parent);
        current = parent;
    }
    path.reverse();

    Ok(path)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::grid::{DEFAULT_END, DEFAULT_START};

    const ALL_KINDS: [SearchKind; 4] = [
        SearchKind::Bfs,
        SearchKind::Dfs,
        SearchKind::Dijkstra,
        SearchKind::AStar,
    ];

    fn reference_grid() -> Grid {
        Grid::new(DEFAULT_START, DEFAULT_END).expect("reference configuration should be valid")
    }

    fn run(kind: SearchKind, grid: &Grid) -> SearchResult {
        search(kind, grid, grid.start(), grid.end()).expect("search should succeed")
    }

    fn coords(tiles: &[Tile]) -> Vec<Coord> {
        tiles.iter().map(Tile::coord).collect()
    }

    fn assert_valid_path(result: &SearchResult, start: Coord, end: Coord) {
        let path = coords(&result.path);

        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        for pair in path.windows(2) {
            if let [current, next] = pair {
                assert_eq!(current.manhattan(*next), 1, "{current} -> {next} is not a unit step");
            }
        }
    }

    /// A 7x7 grid whose end sits inside a closed box.
    fn boxed_end_grid() -> Grid {
        "
S......
.......
.......
...###.
...#E#.
...###.
.......
"
        .parse()
        .expect("layout should parse")
    }

    /// A small grid with a winding corridor.
    fn corridor_grid() -> Grid {
        "
S.#....
#.#.##.
#...#..
####.#.
E......
"
        .parse()
        .expect("layout should parse")
    }

    #[test]
    fn test_open_grid_shortest_paths() {
        let grid = reference_grid();

        for kind in [SearchKind::Bfs, SearchKind::Dijkstra, SearchKind::AStar] {
            let result = run(kind, &grid);

            assert_eq!(result.path.len(), 83, "{kind} should find a shortest path");
            assert_valid_path(&result, DEFAULT_START, DEFAULT_END);
        }
    }

    #[test]
    fn test_open_grid_depth_first_path() {
        let result = run(SearchKind::Dfs, &reference_grid());

        assert!(result.path.len() >= 83);
        assert_valid_path(&result, DEFAULT_START, DEFAULT_END);
    }

    #[test]
    fn test_traversal_starts_at_start() {
        for grid in [reference_grid(), corridor_grid(), boxed_end_grid()] {
            for kind in ALL_KINDS {
                let result = run(kind, &grid);

                assert_eq!(
                    result.traversed_tiles.first().map(Tile::coord),
                    Some(grid.start()),
                    "{kind} should visit the start first"
                );
            }
        }
    }

    #[test]
    fn test_breadth_first_visiting_order() {
        let grid: Grid = "S..\n...\n..E".parse().expect("layout should parse");

        let result = run(SearchKind::Bfs, &grid);

        assert_eq!(
            coords(&result.traversed_tiles),
            [
                (0, 0),
                (1, 0),
                (0, 1),
                (2, 0),
                (1, 1),
                (0, 2),
                (2, 1),
                (1, 2),
                (2, 2)
            ]
            .map(Coord::from)
        );
        assert_eq!(
            coords(&result.path),
            [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)].map(Coord::from)
        );
    }

    #[test]
    fn test_depth_first_explores_last_pushed_first() {
        let grid: Grid = "S..\n...\n..E".parse().expect("layout should parse");

        let result = run(SearchKind::Dfs, &grid);

        let expected = [
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 2),
            (1, 1),
            (1, 0),
            (2, 0),
            (2, 1),
            (2, 2),
        ]
        .map(Coord::from);
        assert_eq!(coords(&result.traversed_tiles), expected);
        assert_eq!(coords(&result.path), expected);
    }

    #[test]
    fn test_corridor_paths() {
        let grid = corridor_grid();

        for kind in ALL_KINDS {
            let result = run(kind, &grid);

            assert!(result.found_path(), "{kind} should reach the end");
            assert_valid_path(&result, grid.start(), grid.end());
        }
        for kind in [SearchKind::Bfs, SearchKind::Dijkstra, SearchKind::AStar] {
            assert_eq!(run(kind, &grid).path.len(), 21, "{kind} path length");
        }
    }

    #[test]
    fn test_unreachable_end_yields_empty_path() {
        let grid = boxed_end_grid();
        let open_tiles = grid.tiles().filter(|tile| !tile.is_wall).count();

        for kind in ALL_KINDS {
            let result = run(kind, &grid);

            assert!(result.path.is_empty(), "{kind} should not find a path");
            // Everything but the boxed end is explored.
            assert_eq!(result.traversed_tiles.len(), open_tiles - 1, "{kind}");
        }
    }

    #[test]
    fn test_walls_are_never_traversed() {
        let grid = corridor_grid();

        for kind in ALL_KINDS {
            let result = run(kind, &grid);

            assert!(result
                .traversed_tiles
                .iter()
                .chain(&result.path)
                .all(|tile| !tile.is_wall));
        }
    }

    #[test]
    fn test_start_equals_end() {
        let grid = reference_grid();

        for kind in ALL_KINDS {
            let result =
                search(kind, &grid, DEFAULT_START, DEFAULT_START).expect("search should succeed");

            assert_eq!(coords(&result.traversed_tiles), [DEFAULT_START]);
            assert_eq!(coords(&result.path), [DEFAULT_START]);
        }
    }

    #[test]
    fn test_a_star_visits_no_more_than_breadth_first() {
        for grid in [reference_grid(), corridor_grid(), boxed_end_grid()] {
            let a_star = run(SearchKind::AStar, &grid);
            let breadth_first = run(SearchKind::Bfs, &grid);

            assert!(a_star.traversed_tiles.len() <= breadth_first.traversed_tiles.len());
        }
    }

    #[test]
    fn test_a_star_on_open_grid_stays_in_bounding_box() {
        let result = run(SearchKind::AStar, &reference_grid());

        assert_eq!(result.traversed_tiles.len(), 37 * 47);
    }

    #[test]
    fn test_search_is_deterministic() {
        let grid = corridor_grid();

        for kind in ALL_KINDS {
            let first = run(kind, &grid);
            let second = run(kind, &grid);

            assert_eq!(coords(&first.traversed_tiles), coords(&second.traversed_tiles));
            assert_eq!(coords(&first.path), coords(&second.path));
        }
    }

    #[test]
    fn test_search_leaves_input_untouched() {
        let grid = corridor_grid();

        for kind in ALL_KINDS {
            let result = run(kind, &grid);

            assert!(grid.tiles().all(|tile| !tile.is_traversed && !tile.is_path));
            assert!(result.grid.tiles().any(|tile| tile.is_traversed));
        }
    }

    #[test]
    fn test_result_grid_marks_path() {
        let result = run(SearchKind::Bfs, &corridor_grid());

        let marked: Vec<Coord> = result
            .grid
            .tiles()
            .filter(|tile| tile.is_path)
            .map(Tile::coord)
            .collect();
        let mut path = coords(&result.path);
        path.sort();

        assert_eq!(marked, path);
        assert!(result.path.iter().all(|tile| tile.is_path));
    }

    #[test]
    fn test_distances_follow_path() {
        for kind in [SearchKind::Bfs, SearchKind::Dijkstra, SearchKind::AStar] {
            let result = run(kind, &reference_grid());

            for (index, tile) in result.path.iter().enumerate() {
                assert_eq!(tile.distance, Some(index), "{kind} distance along path");
            }
        }
    }

    #[test]
    fn test_parents_link_path() {
        for kind in ALL_KINDS {
            let result = run(kind, &corridor_grid());

            assert_eq!(result.path.first().and_then(|tile| tile.parent), None);
            for pair in result.path.windows(2) {
                if let [previous, current] = pair {
                    assert_eq!(current.parent, Some(previous.coord()), "{kind}");
                }
            }
        }
    }

    #[test]
    fn test_custom_endpoints() {
        let grid = reference_grid();
        let start = Coord::new(20, 20);
        let end = Coord::new(20, 25);

        let result = search(SearchKind::AStar, &grid, start, end).expect("search should succeed");

        assert_eq!(result.path.len(), 6);
        assert_valid_path(&result, start, end);
        assert_eq!(
            result.grid.tile(start).and_then(|tile| tile.distance),
            Some(0)
        );
    }

    #[test]
    fn test_rejects_bad_endpoints() {
        let grid = reference_grid()
            .toggle_wall(5, 5)
            .expect("toggle should succeed");

        assert!(matches!(
            search(SearchKind::Bfs, &grid, Coord::new(39, 0), DEFAULT_END),
            Err(GridError::OutOfBounds { .. })
        ));
        assert_eq!(
            search(SearchKind::Bfs, &grid, DEFAULT_START, Coord::new(5, 5)).err(),
            Some(GridError::WalledEndpoint(Coord::new(5, 5)))
        );
    }

    #[test]
    fn test_reconstruct_path_broken_chain() {
        let grid = reference_grid();

        assert_eq!(
            reconstruct_path(&grid, DEFAULT_START, DEFAULT_END),
            Err(GridError::BrokenParentChain(DEFAULT_END))
        );
    }
}

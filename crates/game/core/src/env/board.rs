//! Board oracle: static tile layout and the generic reachability search.

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::entity::Position;

/// Result of a board search: every reached tile with its step distance and
/// back-link toward the start.
#[derive(Clone, Debug, Default)]
pub struct SearchResult {
    distances: HashMap<Position, u32>,
    previous: HashMap<Position, Position>,
}

impl SearchResult {
    pub fn contains(&self, tile: Position) -> bool {
        self.distances.contains_key(&tile)
    }

    pub fn distance(&self, tile: Position) -> Option<u32> {
        self.distances.get(&tile).copied()
    }

    /// Tile preceding `tile` on the path back to the search origin.
    pub fn previous(&self, tile: Position) -> Option<Position> {
        self.previous.get(&tile).copied()
    }

    pub fn tiles(&self) -> impl Iterator<Item = Position> + '_ {
        self.distances.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// Static board layout supplied by the host.
///
/// `search` is the single reachability primitive range and movement queries
/// build on: breadth-first over cardinal neighbors, expanding only where the
/// caller's predicate allows.
pub trait BoardOracle: Send + Sync {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    /// Whether the tile exists and can hold a combatant.
    fn is_walkable(&self, tile: Position) -> bool;

    fn contains(&self, tile: Position) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width() && tile.y < self.height()
    }

    /// Breadth-first flood from `start`. The predicate receives
    /// `(from, to, steps_to_to)` and decides whether the frontier may expand
    /// onto `to`. The start tile is always part of the result.
    fn search(
        &self,
        start: Position,
        expand: &mut dyn FnMut(Position, Position, u32) -> bool,
    ) -> SearchResult {
        let mut result = SearchResult::default();
        let mut frontier = VecDeque::new();
        result.distances.insert(start, 0);
        frontier.push_back(start);

        while let Some(from) = frontier.pop_front() {
            let steps = result.distances[&from] + 1;
            for to in from.neighbors() {
                if !self.contains(to) || result.distances.contains_key(&to) {
                    continue;
                }
                if !expand(from, to, steps) {
                    continue;
                }
                result.distances.insert(to, steps);
                result.previous.insert(to, from);
                frontier.push_back(to);
            }
        }
        result
    }
}

/// Plain rectangular board with optional blocked tiles. Reference
/// implementation used by the test suite; hosts with richer terrain supply
/// their own oracle.
#[derive(Clone, Debug)]
pub struct GridBoard {
    width: i32,
    height: i32,
    blocked: Vec<Position>,
}

impl GridBoard {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            blocked: Vec::new(),
        }
    }

    pub fn with_blocked(mut self, tiles: impl IntoIterator<Item = Position>) -> Self {
        self.blocked.extend(tiles);
        self
    }
}

impl BoardOracle for GridBoard {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn is_walkable(&self, tile: Position) -> bool {
        self.contains(tile) && !self.blocked.contains(&tile)
    }
}

//! Combatant identity and board-facing entity state.
//!
//! Entities live in the battle's arena and are addressed by [`EntityId`]
//! handles. Holding an index instead of a reference is what lets status
//! hooks re-enter the battle mutably during event dispatch.

use std::fmt;

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::stats::StatBlock;
use crate::status::StatusInstance;

/// Unique identifier for a combatant tracked in the battle arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two tiles.
    pub fn distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four cardinal neighbors of this tile.
    pub fn neighbors(self) -> [Position; 4] {
        [
            Position::new(self.x, self.y - 1),
            Position::new(self.x + 1, self.y),
            Position::new(self.x, self.y + 1),
            Position::new(self.x - 1, self.y),
        ]
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Team affiliation used by target filters and the AI boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alliance {
    Hero,
    Enemy,
    Neutral,
}

impl Alliance {
    /// Whether two alliances treat each other as allies.
    pub fn is_ally_of(self, other: Alliance) -> bool {
        self == other
    }
}

/// Cardinal facing of an entity on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Facing {
    North,
    East,
    South,
    West,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    /// Unit step vector for this facing.
    pub const fn step(self) -> (i32, i32) {
        match self {
            Facing::North => (0, -1),
            Facing::East => (1, 0),
            Facing::South => (0, 1),
            Facing::West => (-1, 0),
        }
    }

    /// The tile one step ahead of `from` along this facing.
    pub fn advance(self, from: Position) -> Position {
        let (dx, dy) = self.step();
        Position::new(from.x + dx, from.y + dy)
    }

    /// Dominant cardinal direction from one tile toward another, or `None`
    /// when the tiles coincide. Diagonal ties resolve along the x axis.
    pub fn toward(from: Position, to: Position) -> Option<Facing> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx == 0 && dy == 0 {
            return None;
        }
        Some(if dx.abs() >= dy.abs() {
            if dx > 0 { Facing::East } else { Facing::West }
        } else if dy > 0 {
            Facing::South
        } else {
            Facing::North
        })
    }

    /// Classifies where an attacker stands relative to a defender's facing.
    ///
    /// The defender's forward half-plane counts as front, the rear half-plane
    /// as back, everything else as side. Diagonal ties resolve toward side.
    pub fn aspect_from(self, defender: Position, attacker: Position) -> Aspect {
        let (fx, fy) = self.step();
        let dx = attacker.x - defender.x;
        let dy = attacker.y - defender.y;
        let dot = fx * dx + fy * dy;
        let forward = dot.abs();
        let lateral = (dx.abs() + dy.abs()) - forward;
        if forward <= lateral {
            Aspect::Side
        } else if dot > 0 {
            Aspect::Front
        } else {
            Aspect::Back
        }
    }
}

/// Relative angle class between an attacker and a defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aspect {
    Front,
    Side,
    Back,
}

impl Aspect {
    /// Flat hit-rate bonus granted by attack angle.
    pub const fn hit_bonus(self) -> i32 {
        match self {
            Aspect::Front => 0,
            Aspect::Side => 10,
            Aspect::Back => 20,
        }
    }
}

/// A combatant: stat block, board presence, and active status effects.
///
/// The stat block is only reachable read-only from outside the battle; all
/// writes are routed through `Battle::set_stat` so interception is never
/// bypassed.
#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub alliance: Alliance,
    pub position: Position,
    pub facing: Facing,
    pub(crate) stats: StatBlock,
    pub(crate) statuses: ArrayVec<StatusInstance, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, alliance: Alliance, position: Position) -> Self {
        Self {
            id,
            alliance,
            position,
            facing: Facing::South,
            stats: StatBlock::new(),
            statuses: ArrayVec::new(),
        }
    }

    /// Attached status effects, in attach order.
    pub fn statuses(&self) -> impl Iterator<Item = &StatusInstance> {
        self.statuses.iter()
    }

    /// Read-only view of the entity's stats.
    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_classifies_front_side_back() {
        let defender = Position::new(5, 5);
        let facing = Facing::North;

        // Directly in front (north of the defender).
        assert_eq!(
            facing.aspect_from(defender, Position::new(5, 3)),
            Aspect::Front
        );
        // Directly behind.
        assert_eq!(
            facing.aspect_from(defender, Position::new(5, 7)),
            Aspect::Back
        );
        // Flank.
        assert_eq!(
            facing.aspect_from(defender, Position::new(8, 5)),
            Aspect::Side
        );
        // Diagonal resolves to side.
        assert_eq!(
            facing.aspect_from(defender, Position::new(6, 4)),
            Aspect::Side
        );
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(Position::new(0, 0).distance(Position::new(3, 4)), 7);
        assert_eq!(Position::new(2, 2).distance(Position::new(2, 2)), 0);
    }
}

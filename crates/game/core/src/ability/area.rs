use crate::entity::{Facing, Position};
use crate::env::BoardOracle;

/// Footprint of an ability around its aim point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Area {
    /// The aim tile alone.
    Single,
    /// The aim tile plus rays of `radius` tiles in each cardinal direction.
    Cross { radius: u32 },
    /// Every tile within `radius` Manhattan steps of the aim tile.
    Diamond { radius: u32 },
    /// A ray of `length` tiles from the aim tile along the cast direction,
    /// aim tile included.
    Line { length: u32 },
    /// Every tile on the board.
    FullBoard,
}

impl Area {
    /// Affected tiles for a cast aimed at `origin`. `direction` only matters
    /// for [`Area::Line`]; it is the direction the caster is aiming. Sorted
    /// row-major so effect application order is deterministic.
    pub fn tiles_in_area(
        &self,
        board: &dyn BoardOracle,
        origin: Position,
        direction: Facing,
    ) -> Vec<Position> {
        let mut tiles = match self {
            Area::Single => vec![origin],
            Area::Cross { radius } => {
                let mut out = vec![origin];
                for dir in Facing::ALL {
                    let mut cursor = origin;
                    for _ in 0..*radius {
                        cursor = dir.advance(cursor);
                        if !board.contains(cursor) {
                            break;
                        }
                        out.push(cursor);
                    }
                }
                out
            }
            Area::Diamond { radius } => {
                let result = board.search(origin, &mut |_, to, steps| {
                    steps <= *radius && board.contains(to)
                });
                result.tiles().collect()
            }
            Area::Line { length } => {
                let mut out = vec![origin];
                let mut cursor = origin;
                for _ in 1..*length {
                    cursor = direction.advance(cursor);
                    if !board.contains(cursor) {
                        break;
                    }
                    out.push(cursor);
                }
                out
            }
            Area::FullBoard => {
                let mut out = Vec::with_capacity((board.width() * board.height()) as usize);
                for y in 0..board.height() {
                    for x in 0..board.width() {
                        out.push(Position::new(x, y));
                    }
                }
                out
            }
        };
        tiles.retain(|p| board.contains(*p));
        tiles.sort_by_key(|p| (p.y, p.x));
        tiles.dedup();
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::GridBoard;

    #[test]
    fn cross_covers_origin_and_four_rays() {
        let board = GridBoard::new(7, 7);
        let tiles = Area::Cross { radius: 2 }.tiles_in_area(&board, Position::new(3, 3), Facing::North);
        assert_eq!(tiles.len(), 9);
        assert!(tiles.contains(&Position::new(3, 1)));
        assert!(!tiles.contains(&Position::new(2, 2)));
    }

    #[test]
    fn diamond_matches_manhattan_distance() {
        let board = GridBoard::new(7, 7);
        let tiles = Area::Diamond { radius: 1 }.tiles_in_area(&board, Position::new(3, 3), Facing::North);
        assert_eq!(tiles.len(), 5);
    }

    #[test]
    fn line_extends_along_the_cast_direction() {
        let board = GridBoard::new(5, 5);
        let tiles = Area::Line { length: 3 }.tiles_in_area(&board, Position::new(2, 2), Facing::East);
        assert_eq!(
            tiles,
            vec![Position::new(2, 2), Position::new(3, 2), Position::new(4, 2)]
        );
    }

    #[test]
    fn full_board_covers_everything() {
        let board = GridBoard::new(4, 3);
        let tiles = Area::FullBoard.tiles_in_area(&board, Position::new(0, 0), Facing::North);
        assert_eq!(tiles.len(), 12);
    }
}

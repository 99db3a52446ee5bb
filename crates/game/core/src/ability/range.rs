use crate::entity::Position;
use crate::env::BoardOracle;

/// Which tiles an ability may be aimed at, relative to the caster.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Range {
    /// Only the caster's own tile.
    SelfOnly,
    /// Every in-bounds tile within `radius` Manhattan steps.
    Constant { radius: u32 },
    /// Straight rays in the four cardinal directions, up to `length` tiles.
    Line { length: u32 },
}

impl Range {
    /// Tiles that are legal aim points from `caster`. Sorted row-major so
    /// callers iterate deterministically.
    pub fn tiles_in_range(&self, board: &dyn BoardOracle, caster: Position) -> Vec<Position> {
        let mut tiles = match self {
            Range::SelfOnly => vec![caster],
            Range::Constant { radius } => {
                let result = board.search(caster, &mut |_, to, steps| {
                    steps <= *radius && board.contains(to)
                });
                result.tiles().collect()
            }
            Range::Line { length } => {
                let mut out = vec![caster];
                for dir in crate::entity::Facing::ALL {
                    let mut cursor = caster;
                    for _ in 0..*length {
                        cursor = dir.advance(cursor);
                        if !board.contains(cursor) {
                            break;
                        }
                        out.push(cursor);
                    }
                }
                out
            }
        };
        tiles.sort_by_key(|p| (p.y, p.x));
        tiles.dedup();
        tiles
    }
}

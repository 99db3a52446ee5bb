//! Movement-range queries over the board oracle.

use crate::battle::Battle;
use crate::entity::{EntityId, Position};
use crate::env::BattleEnv;
use crate::stats::StatType;

/// Tiles `id` may move to this turn: within MOV steps, walkable, and free.
///
/// Paths may pass through allies but never through enemies; the destination
/// must be unoccupied. Returns an empty set when the vetoable can-move
/// answer is false (immobilize, KO). Sorted row-major.
pub fn reachable_tiles(battle: &mut Battle, env: &BattleEnv<'_>, id: EntityId) -> Vec<Position> {
    if !battle.can_move(id) {
        return Vec::new();
    }
    let Some(mover) = battle.entity(id) else {
        return Vec::new();
    };
    let start = mover.position;
    let alliance = mover.alliance;
    let mov = battle.stat(id, StatType::Mov).max(0) as u32;

    let battle_ref = &*battle;
    let result = env.board.search(start, &mut |_, to, steps| {
        if steps > mov || !env.board.is_walkable(to) {
            return false;
        }
        match battle_ref.occupant(to) {
            Some(other) => battle_ref
                .entity(other)
                .is_some_and(|e| e.alliance.is_ally_of(alliance)),
            None => true,
        }
    });

    let mut tiles: Vec<Position> = result
        .tiles()
        .filter(|&tile| tile != start && battle_ref.occupant(tile).is_none())
        .collect();
    tiles.sort_by_key(|p| (p.y, p.x));
    tiles
}

//! Snapshot and restore of a battle's combat state.
//!
//! Only rule-visible state is captured: configuration, the roll counter,
//! and per-entity stats, statuses, and board placement. Event subscriptions
//! are not serialized; restoring replays the spawn and attach paths, which
//! rebuild them deterministically.

use strum::IntoEnumIterator;

use crate::battle::Battle;
use crate::config::BattleConfig;
use crate::entity::{Alliance, Facing, Position};
use crate::stats::StatType;
use crate::status::{Removal, StatusKind};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntitySave {
    pub alliance: Alliance,
    pub position: Position,
    pub facing: Facing,
    pub stats: Vec<(StatType, i32)>,
    pub statuses: Vec<(StatusKind, Removal)>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BattleSave {
    pub config: BattleConfig,
    pub nonce: u64,
    pub entities: Vec<EntitySave>,
}

impl BattleSave {
    pub fn capture(battle: &Battle) -> Self {
        let entities = battle
            .entities()
            .map(|entity| EntitySave {
                alliance: entity.alliance,
                position: entity.position,
                facing: entity.facing,
                stats: StatType::iter()
                    .map(|stat| (stat, entity.stats().get(stat)))
                    .collect(),
                statuses: entity
                    .statuses()
                    .map(|instance| (instance.kind, instance.removal))
                    .collect(),
            })
            .collect();
        Self {
            config: battle.config().clone(),
            nonce: battle.nonce(),
            entities,
        }
    }

    /// Rebuilds a battle in the saved state. Entity ids are assigned in
    /// saved order, so they match the originals.
    pub fn restore(&self) -> Battle {
        let mut battle = Battle::new(self.config.clone());
        for saved in &self.entities {
            // Maxima first, so the dependent-vital sync sees them before
            // the current values land.
            let mut stats = saved.stats.clone();
            stats.sort_by_key(|&(stat, _)| match stat {
                StatType::MaxHp | StatType::MaxMp => 0,
                _ => 1,
            });
            let id = battle.spawn(saved.alliance, saved.position, &stats);
            battle.set_facing(id, saved.facing);
            for &(kind, removal) in &saved.statuses {
                battle.add_status(id, kind, removal);
            }
        }
        battle.set_nonce(self.nonce);
        battle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::testkit::two_sided_battle;

    #[test]
    fn capture_then_restore_preserves_combat_state() {
        let (mut battle, hero, enemy) = two_sided_battle();
        battle.set_stat(enemy, StatType::Hp, 17, true);
        battle.add_status(hero, StatusKind::Haste, Removal::Duration(2));

        let save = BattleSave::capture(&battle);
        let restored = save.restore();

        assert_eq!(restored.stat(enemy, StatType::Hp), 17);
        assert_eq!(restored.stat(hero, StatType::Hp), 100);
        assert!(restored.has_status(hero, StatusKind::Haste));
        assert!(restored.has_status(enemy, StatusKind::Critical));
        assert_eq!(restored.nonce(), battle.nonce());
    }

    #[test]
    fn restore_rebuilds_live_subscriptions() {
        let (battle, hero, _) = two_sided_battle();
        let save = BattleSave::capture(&battle);
        let mut restored = save.restore();

        // The restored clamp interceptor still guards HP.
        restored.set_stat(hero, StatType::Hp, 900, true);
        assert_eq!(restored.stat(hero, StatType::Hp), 100);
    }
}

//! Derived-stat interceptors for HP/MP.
//!
//! These are ordinary bus subscribers registered at spawn, not special cases
//! inside the pipeline: the pre-write clamps append a `Clamp` modifier like
//! any status effect would, and the max-stat syncs react to post-write
//! notifications with nested `set_stat` calls.

use crate::battle::{Battle, CLAMP_SORT_ORDER};
use crate::config::BattleConfig;
use crate::entity::EntityId;
use crate::event::{Hook, Notice, Signal};
use crate::status::{Removal, StatusKind};

use super::block::StatType;
use super::modifier::{Modifier, ModifierOp};

pub(crate) fn vitals_hook(
    battle: &mut Battle,
    hook: Hook,
    owner: EntityId,
    signal: &mut Signal<'_>,
) {
    match hook {
        Hook::HpClamp => clamp_resource(battle, owner, StatType::MaxHp, signal),
        Hook::MpClamp => clamp_resource(battle, owner, StatType::MaxMp, signal),
        Hook::MaxHpSync => sync_resource(battle, owner, StatType::Hp, StatType::MaxHp, signal),
        Hook::MaxMpSync => sync_resource(battle, owner, StatType::Mp, StatType::MaxMp, signal),
        Hook::VitalsWatch => watch_vitals(battle, owner, signal),
        Hook::Status(_) => {}
    }
}

/// Pre-write: clamp the proposed value into `[0, max]`.
fn clamp_resource(battle: &Battle, owner: EntityId, max_stat: StatType, signal: &mut Signal<'_>) {
    if let Signal::Mutation(request) = signal {
        let max = battle.stat(owner, max_stat);
        request.add_modifier(Modifier::new(ModifierOp::Clamp(0, max), CLAMP_SORT_ORDER));
    }
}

/// Post-write on a max stat: growth carries the delta into the current
/// value; shrinking clamps the current value down.
fn sync_resource(
    battle: &mut Battle,
    owner: EntityId,
    current_stat: StatType,
    max_stat: StatType,
    signal: &mut Signal<'_>,
) {
    let Signal::Notice(Notice::StatChanged { old_value, .. }) = signal else {
        return;
    };
    let new_max = battle.stat(owner, max_stat);
    let current = battle.stat(owner, current_stat);
    if new_max > *old_value {
        battle.set_stat(owner, current_stat, current + (new_max - *old_value), true);
    } else if current > new_max {
        battle.set_stat(owner, current_stat, new_max, true);
    }
}

/// Post-write on HP: maintain the Ko and Critical markers.
fn watch_vitals(battle: &mut Battle, owner: EntityId, signal: &mut Signal<'_>) {
    let Signal::Notice(Notice::StatChanged { .. }) = signal else {
        return;
    };
    let hp = battle.stat(owner, StatType::Hp);
    let max_hp = battle.stat(owner, StatType::MaxHp);

    if hp <= 0 {
        battle.remove_status(owner, StatusKind::Critical);
        battle.add_status(owner, StatusKind::Ko, Removal::Threshold);
        return;
    }

    battle.remove_status(owner, StatusKind::Ko);
    if hp * 100 <= BattleConfig::CRITICAL_PERCENT * max_hp {
        battle.add_status(owner, StatusKind::Critical, Removal::Threshold);
    } else {
        battle.remove_status(owner, StatusKind::Critical);
    }
}

//! Behaviors behind each status kind, dispatched by closed enumeration.
//!
//! `subscriptions` declares which channels a status listens on; `dispatch`
//! is the single handler body the battle routes those channels into. A
//! duration-boxed status that does not otherwise care about turns still gets
//! a `TurnBegan` subscription so its counter can tick down.

use crate::battle::{Battle, STATUS_SORT_ORDER};
use crate::entity::EntityId;
use crate::event::{HitSide, Notice, QueryStage, Signal, Topic};
use crate::stats::{Modifier, ModifierOp, StatType};

use super::{Removal, StatusKind};

/// Runs duration ticks after kind-specific turn logic.
const DURATION_SORT_ORDER: i32 = 100;

pub(crate) struct SubscriptionSpec {
    pub topic: Topic,
    pub sort_order: i32,
}

impl SubscriptionSpec {
    const fn new(topic: Topic, sort_order: i32) -> Self {
        Self { topic, sort_order }
    }
}

/// Channels a status of this kind listens on while attached.
pub(crate) fn subscriptions(kind: StatusKind, removal: Removal) -> Vec<SubscriptionSpec> {
    let mut specs = match kind {
        StatusKind::Haste | StatusKind::Slow => vec![SubscriptionSpec::new(
            Topic::StatWillChange(StatType::Ctr),
            STATUS_SORT_ORDER,
        )],
        StatusKind::Stop => vec![
            SubscriptionSpec::new(Topic::StatWillChange(StatType::Ctr), STATUS_SORT_ORDER),
            SubscriptionSpec::new(Topic::TurnCheck, 0),
        ],
        StatusKind::Protect | StatusKind::Shell => vec![SubscriptionSpec::new(
            Topic::StatQuery(QueryStage::Defense),
            STATUS_SORT_ORDER,
        )],
        StatusKind::Blind => vec![
            SubscriptionSpec::new(Topic::HitRate(HitSide::Attacker), STATUS_SORT_ORDER),
            SubscriptionSpec::new(Topic::HitRate(HitSide::Defender), STATUS_SORT_ORDER),
        ],
        StatusKind::Sleep => vec![
            SubscriptionSpec::new(Topic::TurnCheck, 0),
            SubscriptionSpec::new(Topic::AutoHit, 0),
            SubscriptionSpec::new(Topic::StatDidChange(StatType::Hp), STATUS_SORT_ORDER),
        ],
        StatusKind::Poison => vec![SubscriptionSpec::new(Topic::TurnBegan, STATUS_SORT_ORDER)],
        StatusKind::Silence | StatusKind::Disable => {
            vec![SubscriptionSpec::new(Topic::CanPerform, 0)]
        }
        StatusKind::Immobilize => vec![SubscriptionSpec::new(Topic::CanMove, 0)],
        StatusKind::Critical => Vec::new(),
        StatusKind::Ko => vec![SubscriptionSpec::new(Topic::TurnCheck, 0)],
    };

    if matches!(removal, Removal::Duration(_))
        && !specs.iter().any(|s| s.topic == Topic::TurnBegan)
    {
        specs.push(SubscriptionSpec::new(Topic::TurnBegan, DURATION_SORT_ORDER));
    }
    specs
}

/// Handler body for every status subscription.
pub(crate) fn dispatch(
    battle: &mut Battle,
    kind: StatusKind,
    owner: EntityId,
    topic: Topic,
    signal: &mut Signal<'_>,
) {
    match topic {
        Topic::StatWillChange(StatType::Ctr) => {
            let Signal::Mutation(request) = signal else {
                return;
            };
            // Counter effects act on gains only; the turn-cost deduction is
            // never scaled or blocked.
            if request.delta_at_start() <= 0 {
                return;
            }
            match kind {
                StatusKind::Haste => request.add_modifier(Modifier::new(
                    ModifierOp::MultiplyDelta(2.0),
                    STATUS_SORT_ORDER,
                )),
                StatusKind::Slow => request.add_modifier(Modifier::new(
                    ModifierOp::MultiplyDelta(0.5),
                    STATUS_SORT_ORDER,
                )),
                StatusKind::Stop => request.veto(),
                _ => {}
            }
        }

        Topic::TurnCheck => {
            if let Signal::Check(check) = signal
                && matches!(kind, StatusKind::Stop | StatusKind::Sleep | StatusKind::Ko)
            {
                check.veto();
            }
        }

        Topic::StatQuery(QueryStage::Defense) => {
            let Signal::Query(query) = signal else {
                return;
            };
            let guarded = match kind {
                StatusKind::Protect => StatType::Def,
                StatusKind::Shell => StatType::Res,
                _ => return,
            };
            if query.stat == Some(guarded) {
                query.add_modifier(Modifier::new(
                    ModifierOp::MultiplyValue(1.5),
                    STATUS_SORT_ORDER,
                ));
            }
        }

        Topic::HitRate(side) => {
            if let Signal::Query(query) = signal
                && kind == StatusKind::Blind
            {
                let penalty = match side {
                    // A blinded attacker lands far fewer hits.
                    HitSide::Attacker => -50,
                    // A blinded defender barely evades.
                    HitSide::Defender => 20,
                };
                query.add_modifier(Modifier::new(ModifierOp::Add(penalty), STATUS_SORT_ORDER));
            }
        }

        Topic::AutoHit => {
            if let Signal::Check(check) = signal
                && kind == StatusKind::Sleep
            {
                check.allow = true;
            }
        }

        Topic::StatDidChange(StatType::Hp) => {
            if let Signal::Notice(Notice::StatChanged { old_value, .. }) = signal
                && kind == StatusKind::Sleep
                && battle.stat(owner, StatType::Hp) < *old_value
            {
                battle.remove_status(owner, StatusKind::Sleep);
            }
        }

        Topic::CanPerform => {
            let Signal::Check(check) = signal else {
                return;
            };
            match kind {
                StatusKind::Silence if check.magical => check.veto(),
                StatusKind::Disable => check.veto(),
                _ => {}
            }
        }

        Topic::CanMove => {
            if let Signal::Check(check) = signal
                && kind == StatusKind::Immobilize
            {
                check.veto();
            }
        }

        Topic::TurnBegan => {
            if kind == StatusKind::Poison {
                let max_hp = battle.stat(owner, StatType::MaxHp);
                let hp = battle.stat(owner, StatType::Hp);
                let tick = (max_hp / 10).max(1);
                battle.set_stat(owner, StatType::Hp, hp - tick, true);
            }
            tick_duration(battle, owner, kind);
        }

        _ => {}
    }
}

/// Counts down a duration-boxed status at its owner's turn start, removing
/// it when the counter reaches zero.
fn tick_duration(battle: &mut Battle, owner: EntityId, kind: StatusKind) {
    let expired = {
        let Some(entity) = battle.entity_mut(owner) else {
            return;
        };
        let Some(instance) = entity.statuses.iter_mut().find(|s| s.kind == kind) else {
            return;
        };
        match instance.removal {
            Removal::Duration(remaining) if remaining > 1 => {
                instance.removal = Removal::Duration(remaining - 1);
                false
            }
            Removal::Duration(_) => true,
            _ => false,
        }
    };
    if expired {
        battle.remove_status(owner, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::testkit::two_sided_battle;
    use crate::stats::CheckRequest;

    fn gain_ctr(battle: &mut Battle, id: EntityId, amount: i32) {
        let ctr = battle.stat(id, StatType::Ctr);
        battle.set_stat(id, StatType::Ctr, ctr + amount, true);
    }

    #[test]
    fn haste_doubles_and_slow_halves_ctr_gains() {
        let (mut battle, hero, enemy) = two_sided_battle();
        battle.add_status(hero, StatusKind::Haste, Removal::Duration(5));
        battle.add_status(enemy, StatusKind::Slow, Removal::Duration(5));

        gain_ctr(&mut battle, hero, 100);
        gain_ctr(&mut battle, enemy, 100);

        assert_eq!(battle.stat(hero, StatType::Ctr), 200);
        assert_eq!(battle.stat(enemy, StatType::Ctr), 50);
    }

    #[test]
    fn stop_freezes_ctr_but_not_deductions() {
        let (mut battle, hero, _) = two_sided_battle();
        battle.set_stat(hero, StatType::Ctr, 600, false);
        battle.add_status(hero, StatusKind::Stop, Removal::Duration(3));

        gain_ctr(&mut battle, hero, 100);
        assert_eq!(battle.stat(hero, StatType::Ctr), 600);

        // Charging a cost still goes through.
        battle.set_stat(hero, StatType::Ctr, 100, true);
        assert_eq!(battle.stat(hero, StatType::Ctr), 100);
    }

    #[test]
    fn sleep_breaks_on_damage_but_not_on_healing() {
        let (mut battle, hero, _) = two_sided_battle();
        battle.set_stat(hero, StatType::Hp, 60, true);
        battle.add_status(hero, StatusKind::Sleep, Removal::OnDamage);

        battle.set_stat(hero, StatType::Hp, 80, true);
        assert!(battle.has_status(hero, StatusKind::Sleep));

        battle.set_stat(hero, StatType::Hp, 70, true);
        assert!(!battle.has_status(hero, StatusKind::Sleep));
    }

    #[test]
    fn silence_vetoes_magic_only() {
        let (mut battle, hero, _) = two_sided_battle();
        battle.add_status(hero, StatusKind::Silence, Removal::Duration(3));

        assert!(battle.can_perform(hero, false, 0));
        assert!(!battle.can_perform(hero, true, 0));
    }

    #[test]
    fn disable_vetoes_everything_and_immobilize_blocks_movement() {
        let (mut battle, hero, _) = two_sided_battle();
        battle.add_status(hero, StatusKind::Disable, Removal::Duration(2));
        battle.add_status(hero, StatusKind::Immobilize, Removal::Duration(2));

        assert!(!battle.can_perform(hero, false, 0));
        assert!(!battle.can_move(hero));
    }

    #[test]
    fn poison_ticks_a_tenth_of_max_hp_each_turn() {
        let (mut battle, hero, _) = two_sided_battle();
        battle.add_status(hero, StatusKind::Poison, Removal::Duration(2));

        battle.notify(Topic::TurnBegan, Some(hero), Notice::Turn { actor: hero });
        assert_eq!(battle.stat(hero, StatType::Hp), 90);

        // Second tick also expires the status.
        battle.notify(Topic::TurnBegan, Some(hero), Notice::Turn { actor: hero });
        assert_eq!(battle.stat(hero, StatType::Hp), 80);
        assert!(!battle.has_status(hero, StatusKind::Poison));
    }

    #[test]
    fn duration_status_expires_after_exactly_n_turns() {
        let (mut battle, hero, _) = two_sided_battle();
        battle.add_status(hero, StatusKind::Protect, Removal::Duration(3));

        for turn in 0..3 {
            assert!(battle.has_status(hero, StatusKind::Protect), "turn {turn}");
            battle.notify(Topic::TurnBegan, Some(hero), Notice::Turn { actor: hero });
        }
        assert!(!battle.has_status(hero, StatusKind::Protect));
    }

    #[test]
    fn turn_check_vetoed_while_incapacitated() {
        let (mut battle, hero, _) = two_sided_battle();
        battle.add_status(hero, StatusKind::Sleep, Removal::OnDamage);

        let mut check = CheckRequest::new(true);
        battle.publish(Topic::TurnCheck, Some(hero), &mut Signal::Check(&mut check));
        assert!(!check.allow);
    }
}

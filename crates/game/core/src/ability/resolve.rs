//! Cast orchestration: gate, spend, sweep the area, roll, commit.

use crate::ability::{AbilityDefinition, EffectKind, hit_rate};
use crate::battle::Battle;
use crate::entity::{EntityId, Facing, Position};
use crate::env::BattleEnv;
use crate::event::{Notice, Topic};
use crate::stats::StatType;

/// How one effect fared against one touched entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectOutcome {
    pub target: EntityId,
    pub hit: bool,
    /// Resolved hit percentage the roll was made against.
    pub rate: i32,
    /// HP delta actually committed. Zero for misses and pure status effects.
    pub amount: i32,
}

/// Everything that happened during one cast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbilityOutcome {
    pub caster: EntityId,
    pub origin: Position,
    pub results: Vec<EffectOutcome>,
}

/// Resolves one cast of `ability` by `caster`, aimed at `origin`.
///
/// Returns `None` without side effects when the cast is illegal: the aim
/// point is out of range, or the can-perform answer (KO, missing MP, silence,
/// disable) comes back vetoed. A legal cast that touches nobody still spends
/// MP and returns an outcome with no results.
///
/// Effects sweep the area in authored order, row-major over tiles, so damage
/// accumulated by early effects is visible to an absorb listed after them.
pub fn perform(
    battle: &mut Battle,
    env: &BattleEnv<'_>,
    ability: &AbilityDefinition,
    caster: EntityId,
    origin: Position,
) -> Option<AbilityOutcome> {
    let caster_pos = battle.entity(caster)?.position;
    if !ability
        .range
        .tiles_in_range(env.board, caster_pos)
        .contains(&origin)
    {
        tracing::debug!(ability = %ability.name, %origin, "aim point out of range");
        return None;
    }
    if !battle.can_perform(caster, ability.is_magical(), ability.mp_cost) {
        tracing::debug!(ability = %ability.name, %caster, "cast vetoed");
        return None;
    }

    let mp = battle.stat(caster, StatType::Mp);
    battle.set_stat(caster, StatType::Mp, mp - ability.mp_cost, true);

    let direction = Facing::toward(caster_pos, origin).unwrap_or_else(|| {
        battle.entity(caster).map(|e| e.facing).unwrap_or(Facing::South)
    });
    if caster_pos != origin {
        battle.set_facing(caster, direction);
    }

    let tiles = ability.area.tiles_in_area(env.board, origin, direction);
    let mut results = Vec::new();
    let mut pool = 0;

    for effect in &ability.effects {
        if let EffectKind::Absorb { .. } = effect.kind {
            // Mirrors the cast's accumulated damage; one resolution per
            // cast, aimed at the caster, never rolled.
            let amount = effect.kind.apply(battle, env, caster, caster, pool);
            results.push(EffectOutcome {
                target: caster,
                hit: true,
                rate: 100,
                amount,
            });
            continue;
        }

        for &tile in &tiles {
            let Some(target) = battle.occupant(tile) else {
                continue;
            };
            if !effect.filter.is_target(battle, caster, target) {
                continue;
            }
            let rate = hit_rate::calculate(battle, effect.hit, caster, target);
            let hit = hit_rate::roll_for_hit(battle, env, caster, rate);
            let amount = if hit {
                let amount = effect.kind.apply(battle, env, caster, target, pool);
                if matches!(effect.kind, EffectKind::Damage { .. }) && amount < 0 {
                    pool -= amount;
                }
                battle.notify(Topic::AbilityHit, Some(target), Notice::Ability { caster, amount });
                amount
            } else {
                battle.notify(
                    Topic::AbilityMissed,
                    Some(target),
                    Notice::Ability { caster, amount: 0 },
                );
                0
            };
            results.push(EffectOutcome {
                target,
                hit,
                rate,
                amount,
            });
        }
    }

    Some(AbilityOutcome {
        caster,
        origin,
        results,
    })
}

/// Aim points from which this cast would touch at least one passing target.
/// Planning input for hosts and AI; `perform` itself only requires the aim
/// point to be in range.
pub fn legal_targets(
    battle: &Battle,
    env: &BattleEnv<'_>,
    ability: &AbilityDefinition,
    caster: EntityId,
) -> Vec<Position> {
    let Some(caster_ref) = battle.entity(caster) else {
        return Vec::new();
    };
    let caster_pos = caster_ref.position;
    let caster_facing = caster_ref.facing;

    ability
        .range
        .tiles_in_range(env.board, caster_pos)
        .into_iter()
        .filter(|&origin| {
            let direction = Facing::toward(caster_pos, origin).unwrap_or(caster_facing);
            ability
                .area
                .tiles_in_area(env.board, origin, direction)
                .into_iter()
                .filter_map(|tile| battle.occupant(tile))
                .any(|target| {
                    ability
                        .effects
                        .iter()
                        .any(|effect| effect.filter.is_target(battle, caster, target))
                })
        })
        .collect()
}

/// Deterministic forecast of a cast: per touched entity, the summed HP delta
/// every effect would commit if it landed. No rolls, no variance, no writes
/// beyond formula-stage queries. Planning input for hosts and AI.
pub fn predict(
    battle: &mut Battle,
    env: &BattleEnv<'_>,
    ability: &AbilityDefinition,
    caster: EntityId,
    origin: Position,
) -> Vec<(EntityId, i32)> {
    let Some(caster_ref) = battle.entity(caster) else {
        return Vec::new();
    };
    let caster_pos = caster_ref.position;
    let direction = Facing::toward(caster_pos, origin).unwrap_or(caster_ref.facing);
    let tiles = ability.area.tiles_in_area(env.board, origin, direction);

    let mut forecast: Vec<(EntityId, i32)> = Vec::new();
    let mut tally = |target: EntityId, amount: i32| {
        if let Some(entry) = forecast.iter_mut().find(|(id, _)| *id == target) {
            entry.1 += amount;
        } else {
            forecast.push((target, amount));
        }
    };

    let mut pool = 0;
    for effect in &ability.effects {
        if let EffectKind::Absorb { .. } = effect.kind {
            let amount = effect.kind.predict(battle, caster, caster, pool);
            if amount != 0 {
                tally(caster, amount);
            }
            continue;
        }
        for &tile in &tiles {
            let Some(target) = battle.occupant(tile) else {
                continue;
            };
            if !effect.filter.is_target(battle, caster, target) {
                continue;
            }
            let amount = effect.kind.predict(battle, caster, target, pool);
            if matches!(effect.kind, EffectKind::Damage { .. }) && amount < 0 {
                pool -= amount;
            }
            tally(target, amount);
        }
    }
    forecast
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityEffect, Area, DamageStyle, HitRule, Range, TargetFilter};
    use crate::battle::testkit::two_sided_battle;
    use crate::env::{GridBoard, PcgRng};
    use crate::status::{Removal, StatusKind};

    fn strike(power: i32) -> AbilityDefinition {
        AbilityDefinition {
            name: "strike".into(),
            range: Range::Constant { radius: 2 },
            area: Area::Single,
            mp_cost: 0,
            effects: vec![AbilityEffect {
                kind: EffectKind::Damage {
                    style: DamageStyle::Physical,
                    power,
                },
                filter: TargetFilter::Enemy,
                hit: HitRule::Chance { base: 100 },
            }],
        }
    }

    #[test]
    fn cast_commits_damage_and_reports_the_outcome() {
        let (mut battle, hero, enemy) = two_sided_battle();
        let board = GridBoard::new(8, 8);
        let rng = PcgRng;
        let env = BattleEnv::new(&board, &rng);

        let outcome = perform(&mut battle, &env, &strike(100), hero, Position::new(3, 1))
            .expect("legal cast");
        assert_eq!(outcome.results.len(), 1);
        let result = outcome.results[0];
        assert_eq!(result.target, enemy);
        assert!(result.hit);
        assert!((-44..=-36).contains(&result.amount));
        assert_eq!(battle.stat(enemy, StatType::Hp), 80 + result.amount);
        // The caster turned toward the aim point.
        assert_eq!(battle.entity(hero).unwrap().facing, Facing::East);
    }

    #[test]
    fn out_of_range_aim_is_rejected_before_any_spend() {
        let (mut battle, hero, _) = two_sided_battle();
        let board = GridBoard::new(8, 8);
        let rng = PcgRng;
        let env = BattleEnv::new(&board, &rng);

        let mut jab = strike(100);
        jab.mp_cost = 5;
        assert!(perform(&mut battle, &env, &jab, hero, Position::new(7, 7)).is_none());
        assert_eq!(battle.stat(hero, StatType::Mp), 40);
    }

    #[test]
    fn silence_blocks_magical_casts_only() {
        let (mut battle, hero, _enemy) = two_sided_battle();
        let board = GridBoard::new(8, 8);
        let rng = PcgRng;
        let env = BattleEnv::new(&board, &rng);
        battle.add_status(hero, StatusKind::Silence, Removal::Duration(3));

        let mut bolt = strike(100);
        bolt.effects[0].kind = EffectKind::Damage {
            style: DamageStyle::Magical,
            power: 100,
        };
        assert!(perform(&mut battle, &env, &bolt, hero, Position::new(3, 1)).is_none());
        assert!(perform(&mut battle, &env, &strike(100), hero, Position::new(3, 1)).is_some());
    }

    #[test]
    fn missing_mp_vetoes_the_cast() {
        let (mut battle, hero, enemy) = two_sided_battle();
        let board = GridBoard::new(8, 8);
        let rng = PcgRng;
        let env = BattleEnv::new(&board, &rng);

        let mut costly = strike(100);
        costly.mp_cost = 41;
        assert!(perform(&mut battle, &env, &costly, hero, Position::new(3, 1)).is_none());
        assert_eq!(battle.stat(enemy, StatType::Hp), 80);

        costly.mp_cost = 40;
        assert!(perform(&mut battle, &env, &costly, hero, Position::new(3, 1)).is_some());
        assert_eq!(battle.stat(hero, StatType::Mp), 0);
    }

    #[test]
    fn filters_keep_allies_out_of_enemy_fire() {
        let (mut battle, hero, enemy) = two_sided_battle();
        let board = GridBoard::new(8, 8);
        let rng = PcgRng;
        let env = BattleEnv::new(&board, &rng);

        // A diamond wide enough to cover both combatants.
        let mut sweep = strike(100);
        sweep.area = Area::Diamond { radius: 2 };
        let outcome = perform(&mut battle, &env, &sweep, hero, Position::new(2, 1))
            .expect("legal cast");
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].target, enemy);
        assert_eq!(battle.stat(hero, StatType::Hp), 100);
    }

    #[test]
    fn empty_area_still_spends_mp() {
        let (mut battle, hero, _) = two_sided_battle();
        let board = GridBoard::new(8, 8);
        let rng = PcgRng;
        let env = BattleEnv::new(&board, &rng);

        let mut jab = strike(100);
        jab.mp_cost = 3;
        let outcome = perform(&mut battle, &env, &jab, hero, Position::new(1, 2))
            .expect("legal cast");
        assert!(outcome.results.is_empty());
        assert_eq!(battle.stat(hero, StatType::Mp), 37);
    }

    #[test]
    fn absorb_heals_the_caster_from_dealt_damage() {
        let (mut battle, hero, enemy) = two_sided_battle();
        let board = GridBoard::new(8, 8);
        let rng = PcgRng;
        let env = BattleEnv::new(&board, &rng);
        battle.set_stat(hero, StatType::Hp, 50, true);

        let mut drain = strike(100);
        drain.effects.push(AbilityEffect {
            kind: EffectKind::Absorb { percent: 50 },
            filter: TargetFilter::SelfOnly,
            hit: HitRule::Certain,
        });
        let outcome = perform(&mut battle, &env, &drain, hero, Position::new(3, 1))
            .expect("legal cast");
        assert_eq!(outcome.results.len(), 2);
        let dealt = -outcome.results[0].amount;
        assert_eq!(outcome.results[1].target, hero);
        assert_eq!(outcome.results[1].amount, dealt / 2);
        assert_eq!(battle.stat(hero, StatType::Hp), 50 + dealt / 2);
    }

    #[test]
    fn legal_targets_lists_only_fruitful_aim_points() {
        let (battle, hero, _) = two_sided_battle();
        let board = GridBoard::new(8, 8);
        let rng = PcgRng;
        let env = BattleEnv::new(&board, &rng);

        // Single-tile strike: the only fruitful aim point is the enemy tile.
        let aims = legal_targets(&battle, &env, &strike(100), hero);
        assert_eq!(aims, vec![Position::new(3, 1)]);

        // A wider area adds every aim point whose footprint reaches them.
        let mut sweep = strike(100);
        sweep.area = Area::Diamond { radius: 1 };
        let aims = legal_targets(&battle, &env, &sweep, hero);
        assert!(aims.contains(&Position::new(2, 1)));
        assert!(aims.contains(&Position::new(3, 1)));
        // (3,2) would reach the enemy but is out of aiming range.
        assert!(!aims.contains(&Position::new(3, 2)));
        assert!(!aims.contains(&Position::new(1, 1)));
    }

    #[test]
    fn predict_forecasts_without_committing() {
        let (mut battle, hero, enemy) = two_sided_battle();
        let board = GridBoard::new(8, 8);
        let rng = PcgRng;
        let env = BattleEnv::new(&board, &rng);

        let forecast = predict(&mut battle, &env, &strike(100), hero, Position::new(3, 1));
        assert_eq!(forecast, vec![(enemy, -40)]);
        assert_eq!(battle.stat(enemy, StatType::Hp), 80);

        // Forecasting twice gives the same answer: no hidden stream advance.
        let again = predict(&mut battle, &env, &strike(100), hero, Position::new(3, 1));
        assert_eq!(again, forecast);
    }
}

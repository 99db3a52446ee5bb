//! Effect formulas: forecast deterministically, commit with variance.
//!
//! Every committed HP/MP change goes through `Battle::set_stat`, so clamps,
//! vetoes, and vitals bookkeeping apply to ability output exactly as they do
//! to any other write.

use crate::battle::Battle;
use crate::config::BattleConfig;
use crate::entity::EntityId;
use crate::env::BattleEnv;
use crate::event::{QueryStage, Signal, Topic};
use crate::stats::{StatType, ValueQuery};
use crate::status::{Removal, StatusKind};

/// Which stat pair a damage formula reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageStyle {
    /// ATK against DEF.
    Physical,
    /// MAT against RES.
    Magical,
}

impl DamageStyle {
    const fn attack_stat(self) -> StatType {
        match self {
            DamageStyle::Physical => StatType::Atk,
            DamageStyle::Magical => StatType::Mat,
        }
    }

    const fn defense_stat(self) -> StatType {
        match self {
            DamageStyle::Physical => StatType::Def,
            DamageStyle::Magical => StatType::Res,
        }
    }
}

/// What one effect slot does when it lands.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    Damage { style: DamageStyle, power: i32 },
    /// Restores a percentage of the target's MaxHp.
    Heal { percent: i32 },
    /// Attaches a status for a fixed number of the target's turns.
    Inflict { status: StatusKind, duration: u32 },
    /// Brings a downed target back at a percentage of MaxHp.
    Revive { percent: i32 },
    /// Mirrors the damage dealt earlier in the same cast back onto the
    /// caster as healing. Resolved once per cast, not per target.
    Absorb { percent: i32 },
}

impl EffectKind {
    /// Whether silence interferes with this effect. Physical damage is the
    /// only mundane kind; everything else channels.
    pub fn is_magical(&self) -> bool {
        !matches!(
            self,
            EffectKind::Damage {
                style: DamageStyle::Physical,
                ..
            }
        )
    }

    /// Side-effect-free forecast of the HP delta this effect would commit,
    /// before variance. Status infliction forecasts zero. `pool` is the
    /// damage accumulated so far in the cast, for absorb mirroring.
    pub fn predict(&self, battle: &mut Battle, caster: EntityId, target: EntityId, pool: i32) -> i32 {
        match self {
            EffectKind::Damage { style, power } => {
                -damage_amount(battle, caster, target, *style, *power)
            }
            EffectKind::Heal { percent } => heal_amount(battle, target, *percent),
            EffectKind::Inflict { .. } => 0,
            EffectKind::Revive { percent } => {
                if battle.is_ko(target) {
                    revive_amount(battle, target, *percent)
                } else {
                    0
                }
            }
            EffectKind::Absorb { percent } => (pool * percent / 100).max(0),
        }
    }

    /// Commits the effect against `target` and returns the HP delta actually
    /// observed on the touched entity (the caster, for absorb).
    pub fn apply(
        &self,
        battle: &mut Battle,
        env: &BattleEnv<'_>,
        caster: EntityId,
        target: EntityId,
        pool: i32,
    ) -> i32 {
        match self {
            EffectKind::Damage { style, power } => {
                let amount = damage_amount(battle, caster, target, *style, *power);
                let applied = with_variance(battle, env, caster, amount);
                shift_hp(battle, target, -applied)
            }
            EffectKind::Heal { percent } => {
                let amount = heal_amount(battle, target, *percent);
                let applied = with_variance(battle, env, caster, amount);
                shift_hp(battle, target, applied)
            }
            EffectKind::Inflict { status, duration } => {
                if status.is_vital_marker() {
                    // Ko and Critical are owned by the vitals watcher.
                    tracing::warn!(status = %status, "cannot inflict a vital marker, skipping");
                    return 0;
                }
                battle.add_status(target, *status, Removal::Duration(*duration));
                0
            }
            EffectKind::Revive { percent } => {
                if !battle.is_ko(target) {
                    return 0;
                }
                let amount = revive_amount(battle, target, *percent);
                let before = battle.stat(target, StatType::Hp);
                battle.set_stat(target, StatType::Hp, amount, true);
                battle.stat(target, StatType::Hp) - before
            }
            EffectKind::Absorb { percent } => {
                let amount = (pool * percent / 100).max(0);
                if amount == 0 {
                    return 0;
                }
                let _ = target;
                shift_hp(battle, caster, amount)
            }
        }
    }
}

/// Runs one formula-stage query: subscribers scoped to `scope` may append
/// modifiers before the fold.
fn stage_query(
    battle: &mut Battle,
    stage: QueryStage,
    scope: EntityId,
    stat: Option<StatType>,
    base: i32,
) -> i32 {
    let mut query = ValueQuery::new(stat, base);
    battle.publish(Topic::StatQuery(stage), Some(scope), &mut Signal::Query(&mut query));
    query.resolve()
}

fn damage_amount(
    battle: &mut Battle,
    caster: EntityId,
    target: EntityId,
    style: DamageStyle,
    power: i32,
) -> i32 {
    let attack_stat = style.attack_stat();
    let defense_stat = style.defense_stat();
    let attack_base = battle.stat(caster, attack_stat);
    let defense_base = battle.stat(target, defense_stat);
    let attack = stage_query(battle, QueryStage::Attack, caster, Some(attack_stat), attack_base);
    let defense = stage_query(battle, QueryStage::Defense, target, Some(defense_stat), defense_base);
    let base = (attack - defense / 2).max(1);
    let power = stage_query(battle, QueryStage::Power, caster, None, power);
    let damage = (power * base / 100).max(1);
    let damage = stage_query(battle, QueryStage::Tweak, caster, None, damage);
    damage.clamp(-BattleConfig::DAMAGE_CAP, BattleConfig::DAMAGE_CAP)
}

fn heal_amount(battle: &Battle, target: EntityId, percent: i32) -> i32 {
    let max_hp = battle.stat(target, StatType::MaxHp);
    (max_hp * percent / 100).max(1).min(BattleConfig::DAMAGE_CAP)
}

fn revive_amount(battle: &Battle, target: EntityId, percent: i32) -> i32 {
    let max_hp = battle.stat(target, StatType::MaxHp);
    (max_hp * percent / 100).max(1)
}

/// Applies the +/-10% commit-time variance to a forecast amount.
fn with_variance(battle: &mut Battle, env: &BattleEnv<'_>, caster: EntityId, amount: i32) -> i32 {
    if amount == 0 {
        return 0;
    }
    let seed = battle.roll_seed(caster, 1);
    let swing =
        env.rng.range(seed, 0, 2 * BattleConfig::VARIANCE_PERCENT as u32) as i32 - BattleConfig::VARIANCE_PERCENT;
    amount + amount * swing / 100
}

/// Shifts HP by `delta` through the interception pipeline and reports the
/// delta that actually committed (clamps may shrink it, vetoes zero it).
fn shift_hp(battle: &mut Battle, target: EntityId, delta: i32) -> i32 {
    let before = battle.stat(target, StatType::Hp);
    battle.set_stat(target, StatType::Hp, before + delta, true);
    battle.stat(target, StatType::Hp) - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::testkit::two_sided_battle;
    use crate::env::{GridBoard, PcgRng};

    fn env_fixture() -> (GridBoard, PcgRng) {
        (GridBoard::new(8, 8), PcgRng)
    }

    #[test]
    fn physical_damage_follows_the_formula() {
        let (mut battle, hero, enemy) = two_sided_battle();
        // attack 50, defense 20: base = 50 - 10 = 40, power 100 keeps it.
        let effect = EffectKind::Damage {
            style: DamageStyle::Physical,
            power: 100,
        };
        assert_eq!(effect.predict(&mut battle, hero, enemy, 0), -40);
    }

    #[test]
    fn applied_damage_stays_within_the_variance_band() {
        let (mut battle, hero, enemy) = two_sided_battle();
        let (board, rng) = env_fixture();
        let env = BattleEnv::new(&board, &rng);
        let effect = EffectKind::Damage {
            style: DamageStyle::Physical,
            power: 100,
        };
        let delta = effect.apply(&mut battle, &env, hero, enemy, 0);
        assert!((-44..=-36).contains(&delta), "delta {delta} outside band");
        assert_eq!(battle.stat(enemy, StatType::Hp), 80 + delta);
    }

    #[test]
    fn protect_raises_defense_in_the_defense_stage() {
        let (mut battle, hero, enemy) = two_sided_battle();
        battle.add_status(enemy, StatusKind::Protect, Removal::Duration(3));
        // defense 20 * 1.5 = 30: base = 50 - 15 = 35.
        let effect = EffectKind::Damage {
            style: DamageStyle::Physical,
            power: 100,
        };
        assert_eq!(effect.predict(&mut battle, hero, enemy, 0), -35);
    }

    #[test]
    fn shell_guards_magic_but_not_blows() {
        let (mut battle, hero, enemy) = two_sided_battle();
        battle.add_status(enemy, StatusKind::Shell, Removal::Duration(3));
        let physical = EffectKind::Damage {
            style: DamageStyle::Physical,
            power: 100,
        };
        let magical = EffectKind::Damage {
            style: DamageStyle::Magical,
            power: 100,
        };
        // Physical untouched: 50 - 20/2 = 40.
        assert_eq!(physical.predict(&mut battle, hero, enemy, 0), -40);
        // Magical: mat 40 against res 15 * 1.5 = 22 -> 40 - 11 = 29.
        assert_eq!(magical.predict(&mut battle, hero, enemy, 0), -29);
    }

    #[test]
    fn damage_never_drops_below_one() {
        let (mut battle, hero, enemy) = two_sided_battle();
        // The weak side swings with next to no power.
        let effect = EffectKind::Damage {
            style: DamageStyle::Magical,
            power: 1,
        };
        // mat 25 - res 15/2 = 18, then 1 * 18 / 100 floors to 0, raised to 1.
        assert_eq!(effect.predict(&mut battle, enemy, hero, 0), -1);
    }

    #[test]
    fn heal_restores_percent_of_max_hp() {
        let (mut battle, hero, enemy) = two_sided_battle();
        let (board, rng) = env_fixture();
        let env = BattleEnv::new(&board, &rng);
        battle.set_stat(enemy, StatType::Hp, 10, true);

        let effect = EffectKind::Heal { percent: 25 };
        assert_eq!(effect.predict(&mut battle, hero, enemy, 0), 20);
        let delta = effect.apply(&mut battle, &env, hero, enemy, 0);
        assert!((18..=22).contains(&delta), "delta {delta} outside band");
    }

    #[test]
    fn heal_cannot_push_hp_past_max() {
        let (mut battle, hero, enemy) = two_sided_battle();
        let (board, rng) = env_fixture();
        let env = BattleEnv::new(&board, &rng);
        battle.set_stat(enemy, StatType::Hp, 75, true);

        let delta = EffectKind::Heal { percent: 50 }.apply(&mut battle, &env, hero, enemy, 0);
        assert_eq!(delta, 5);
        assert_eq!(battle.stat(enemy, StatType::Hp), 80);
    }

    #[test]
    fn revive_requires_a_downed_target() {
        let (mut battle, hero, enemy) = two_sided_battle();
        let (board, rng) = env_fixture();
        let env = BattleEnv::new(&board, &rng);
        let effect = EffectKind::Revive { percent: 50 };

        assert_eq!(effect.apply(&mut battle, &env, hero, enemy, 0), 0);

        battle.set_stat(enemy, StatType::Hp, 0, true);
        assert!(battle.is_ko(enemy));
        let delta = effect.apply(&mut battle, &env, hero, enemy, 0);
        assert_eq!(delta, 40);
        assert!(!battle.is_ko(enemy));
    }

    #[test]
    fn inflict_attaches_and_rejects_vital_markers() {
        let (mut battle, hero, enemy) = two_sided_battle();
        let (board, rng) = env_fixture();
        let env = BattleEnv::new(&board, &rng);

        let poison = EffectKind::Inflict {
            status: StatusKind::Poison,
            duration: 3,
        };
        assert_eq!(poison.apply(&mut battle, &env, hero, enemy, 0), 0);
        assert!(battle.has_status(enemy, StatusKind::Poison));

        let forged_ko = EffectKind::Inflict {
            status: StatusKind::Ko,
            duration: 1,
        };
        forged_ko.apply(&mut battle, &env, hero, enemy, 0);
        assert!(!battle.is_ko(enemy));
    }

    #[test]
    fn absorb_mirrors_the_pool_onto_the_caster() {
        let (mut battle, hero, enemy) = two_sided_battle();
        let (board, rng) = env_fixture();
        let env = BattleEnv::new(&board, &rng);
        battle.set_stat(hero, StatType::Hp, 50, true);

        let effect = EffectKind::Absorb { percent: 50 };
        assert_eq!(effect.apply(&mut battle, &env, hero, enemy, 40), 20);
        assert_eq!(battle.stat(hero, StatType::Hp), 70);
        // Nothing dealt yet, nothing drained.
        assert_eq!(effect.apply(&mut battle, &env, hero, enemy, 0), 0);
    }
}

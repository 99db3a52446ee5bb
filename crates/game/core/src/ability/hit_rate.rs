//! Per-target hit chance: automatic checks first, then the additive
//! modifier pipeline, then the facing bonus.

use crate::battle::Battle;
use crate::entity::EntityId;
use crate::env::BattleEnv;
use crate::event::{HitSide, Signal, Topic};
use crate::stats::{CheckRequest, ValueQuery};

/// How an effect decides whether it lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitRule {
    /// Always lands; skips the whole pipeline.
    Certain,
    /// Chance-based, starting from `base` percent.
    Chance { base: i32 },
}

/// Final hit percentage in `[0, 100]` for one effect against one target.
///
/// Automatic checks run first and fully short-circuit: an auto-hit answer
/// returns 100 before auto-miss or any rate modifier is consulted, and an
/// auto-miss answer returns 0 before the modifier queries run.
pub fn calculate(battle: &mut Battle, rule: HitRule, attacker: EntityId, target: EntityId) -> i32 {
    let HitRule::Chance { base } = rule else {
        return 100;
    };

    let mut auto_hit = CheckRequest::new(false);
    battle.publish(Topic::AutoHit, Some(target), &mut Signal::Check(&mut auto_hit));
    if auto_hit.allow {
        return 100;
    }

    let mut auto_miss = CheckRequest::new(false);
    battle.publish(Topic::AutoMiss, Some(target), &mut Signal::Check(&mut auto_miss));
    if auto_miss.allow {
        return 0;
    }

    let mut query = ValueQuery::new(None, base);
    battle.publish(
        Topic::HitRate(HitSide::Attacker),
        Some(attacker),
        &mut Signal::Query(&mut query),
    );
    battle.publish(
        Topic::HitRate(HitSide::Defender),
        Some(target),
        &mut Signal::Query(&mut query),
    );
    let mut rate = query.resolve();

    // Attack angle: striking a flank or the back is easier to land.
    if let (Some(attacker_ref), Some(target_ref)) = (battle.entity(attacker), battle.entity(target))
    {
        let aspect = target_ref
            .facing
            .aspect_from(target_ref.position, attacker_ref.position);
        rate += aspect.hit_bonus();
    }

    rate.clamp(0, 100)
}

/// One hit roll against a resolved rate. A rate of 100 never misses and a
/// rate of 0 never lands, independent of the draw.
pub fn roll_for_hit(battle: &mut Battle, env: &BattleEnv<'_>, attacker: EntityId, rate: i32) -> bool {
    if rate >= 100 {
        return true;
    }
    if rate <= 0 {
        return false;
    }
    let seed = battle.roll_seed(attacker, 0);
    let roll = env.rng.range(seed, 0, 99) as i32;
    roll < rate
}

//! Ability resolution: range → area → per-target hit rate → effect.
//!
//! An [`AbilityDefinition`] is authored data (the content crate loads and
//! validates it); the core only consumes it. Each effect carries its own
//! target filter and hit rule, so one cast can damage enemies and buff the
//! caster on the same area.

mod area;
mod effect;
mod filter;
mod hit_rate;
mod range;
mod resolve;

pub use area::Area;
pub use effect::{DamageStyle, EffectKind};
pub use filter::TargetFilter;
pub use hit_rate::{HitRule, roll_for_hit};
pub use range::Range;
pub use resolve::{AbilityOutcome, EffectOutcome, legal_targets, perform, predict};

/// One effect slot of an ability: what it does, whom it may touch, and how
/// likely it is to land.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityEffect {
    pub kind: EffectKind,
    pub filter: TargetFilter,
    pub hit: HitRule,
}

/// Immutable, authored description of one ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub name: String,
    pub range: Range,
    pub area: Area,
    /// MP spent on use; part of the vetoable can-perform answer.
    pub mp_cost: i32,
    pub effects: Vec<AbilityEffect>,
}

impl AbilityDefinition {
    /// Whether any effect counts as magical (silence interacts with this).
    pub fn is_magical(&self) -> bool {
        self.effects.iter().any(|e| e.kind.is_magical())
    }
}

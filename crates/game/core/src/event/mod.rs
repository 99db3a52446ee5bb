//! Typed, synchronous publish/subscribe for combat events.
//!
//! Every channel is keyed by a [`Topic`] plus an optional sender scope, and
//! carries a strongly-typed payload. There are no string keys and no
//! runtime casts. Dispatch is fully synchronous and reentrancy-safe: the
//! battle snapshots the subscriber list before iterating, so a handler may
//! subscribe, unsubscribe, or trigger nested publishes freely.

mod bus;

pub use bus::{EventBus, SubscriberId};
pub(crate) use bus::Subscriber;

use crate::entity::EntityId;
use crate::stats::{CheckRequest, MutationRequest, StatType, ValueQuery};
use crate::status::StatusKind;

/// Event kinds the battle publishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Pre-write interception for a stat; payload is the mutation request.
    StatWillChange(StatType),
    /// Post-commit notification for a stat; payload carries the old value.
    StatDidChange(StatType),
    /// Ability-formula stage query; payload is a value query.
    StatQuery(QueryStage),
    /// Additive hit-rate interception; payload is a value query.
    HitRate(HitSide),
    /// Automatic-hit check against a target (short-circuits the hit rate).
    AutoHit,
    /// Automatic-miss check against a target.
    AutoMiss,
    /// "May this entity take its turn?" The initial answer is the CTR
    /// threshold; incapacitating statuses veto it.
    TurnCheck,
    TurnBegan,
    TurnCompleted,
    RoundBegan,
    RoundEnded,
    /// "May this entity use this ability?"
    CanPerform,
    /// "May this entity move?"
    CanMove,
    /// A resolved effect landed on the scoped target.
    AbilityHit,
    /// A resolved effect missed the scoped target.
    AbilityMissed,
}

/// Formula stage for [`Topic::StatQuery`] events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryStage {
    /// Attacker's offensive stat.
    Attack,
    /// Defender's defensive stat.
    Defense,
    /// Ability power.
    Power,
    /// Final hook for elemental/critical multipliers.
    Tweak,
}

/// Which side of a hit-rate calculation a query concerns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitSide {
    /// Scoped to the attacker; penalties lower the rate.
    Attacker,
    /// Scoped to the defender; evasion losses raise the rate.
    Defender,
}

/// Payload handed to subscribers during dispatch.
///
/// Mutable variants are the "exception" objects of the pipeline; [`Notice`]
/// is fire-and-forget.
#[derive(Debug)]
pub enum Signal<'a> {
    Mutation(&'a mut MutationRequest),
    Query(&'a mut ValueQuery),
    Check(&'a mut CheckRequest),
    Notice(Notice),
}

/// Immutable notification payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    /// A stat committed; the scope entity is the owner.
    StatChanged { stat: StatType, old_value: i32 },
    Round { round: u32 },
    Turn { actor: EntityId },
    /// An effect resolved against the scope entity.
    Ability { caster: EntityId, amount: i32 },
}

/// One notification as observed by the host.
///
/// The battle journals every notice it publishes; presentation layers drain
/// the journal after each step (`Battle::drain_events`) and sequence their
/// own pacing outside the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BattleEvent {
    pub topic: Topic,
    /// Entity the notice was scoped to, if any.
    pub scope: Option<EntityId>,
    pub notice: Notice,
}

/// Interceptor identity, dispatched by closed enumeration.
///
/// Handlers are data, not boxed closures: the battle matches on the hook
/// kind and runs the corresponding function with full mutable access. This
/// keeps dispatch deterministic and the handler set auditable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hook {
    /// Clamp proposed HP into `[0, MaxHp]` (pre-write).
    HpClamp,
    /// Clamp proposed MP into `[0, MaxMp]` (pre-write).
    MpClamp,
    /// Follow MaxHp changes with an HP adjustment (post-write).
    MaxHpSync,
    /// Follow MaxMp changes with an MP adjustment (post-write).
    MaxMpSync,
    /// Attach/detach Ko and Critical when HP crosses thresholds.
    VitalsWatch,
    /// A status effect's interceptor.
    Status(StatusKind),
}

//! Deterministic combat resolution for grid-based tactical battles.
//!
//! `tactics-core` owns the rules: the stat mutation pipeline, the initiative
//! scheduler, ability resolution, and the status-effect subsystem. It holds
//! no tile storage, random state, or authored content of its own; hosts
//! supply those through the [`env`] oracle traits. All state mutation flows
//! through [`battle::Battle::set_stat`], and supporting crates depend on the
//! types re-exported here.
pub mod ability;
pub mod battle;
pub mod config;
pub mod entity;
pub mod env;
pub mod event;
pub mod movement;
pub mod scheduler;
pub mod stats;
pub mod status;

#[cfg(feature = "serde")]
pub mod save;

pub use ability::{
    AbilityDefinition, AbilityEffect, AbilityOutcome, Area, DamageStyle, EffectKind,
    EffectOutcome, HitRule, Range, TargetFilter, legal_targets, perform, predict, roll_for_hit,
};
pub use battle::Battle;
pub use config::BattleConfig;
pub use entity::{Alliance, Aspect, Entity, EntityId, Facing, Position};
pub use env::{BattleEnv, BoardOracle, CatalogOracle, GridBoard, PcgRng, RngOracle, SearchResult};
pub use event::{BattleEvent, EventBus, HitSide, Notice, QueryStage, Signal, SubscriberId, Topic};
pub use movement::reachable_tiles;
pub use scheduler::{SchedulerEvent, TurnRecord, TurnScheduler};
pub use stats::{
    CheckRequest, Modifier, ModifierOp, MutationRequest, StatBlock, StatType, ValueQuery,
};
pub use status::{Removal, StatusInstance, StatusKind};

#[cfg(feature = "serde")]
pub use save::{BattleSave, EntitySave};

//! Status effects: attachable behaviors that intercept stat writes and turn
//! events for their lifetime.
//!
//! The set of effects is a closed enumeration; behaviors are dispatched by
//! matching on [`StatusKind`] (see `hooks`), never by reflection or dynamic
//! lookup. An instance owns every subscription handle it registered, and
//! detaching removes them all, so a handle cannot outlive its status.

pub(crate) mod hooks;

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::event::SubscriberId;

/// Closed enumeration of every status effect the engine implements.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    /// CTR gains doubled.
    Haste,
    /// CTR gains halved.
    Slow,
    /// CTR gains cancelled; turn checks vetoed.
    Stop,
    /// Physical defense (DEF) scaled ×1.5 in defense-stage queries.
    Protect,
    /// Magical resistance (RES) scaled ×1.5 in defense-stage queries.
    Shell,
    /// −50 hit rate when attacking; +20 to-hit when attacked.
    Blind,
    /// Turn checks vetoed; attacks against the sleeper automatically hit;
    /// removed by the first HP loss.
    Sleep,
    /// Loses 10% of MaxHp at the start of each of its turns.
    Poison,
    /// Magical abilities vetoed.
    Silence,
    /// All abilities vetoed.
    Disable,
    /// Movement vetoed.
    Immobilize,
    /// Marker attached while HP is at or below the critical fraction.
    Critical,
    /// Knocked out: attached at 0 HP, vetoes turn checks, removed on revive.
    Ko,
}

impl StatusKind {
    /// Statuses the engine manages itself from HP transitions; they cannot
    /// be inflicted or cured by abilities.
    pub fn is_vital_marker(self) -> bool {
        matches!(self, StatusKind::Critical | StatusKind::Ko)
    }
}

/// How an attached status leaves its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Removal {
    /// Detaches after the owner's n-th turn begins.
    Duration(u32),
    /// Detaches on the first HP-decreasing post-write.
    OnDamage,
    /// Attached and removed by the engine when a stat threshold is crossed
    /// (Ko at 0 HP, Critical at the low-HP fraction).
    Threshold,
}

/// One attached status effect.
///
/// Subscription handles are private: they are registered on attach and the
/// only way to release them is `Battle::remove_status`, which drains the
/// list. Idempotent re-attach refreshes the removal state instead of
/// stacking a second instance.
#[derive(Clone, Debug)]
pub struct StatusInstance {
    pub kind: StatusKind,
    pub removal: Removal,
    pub(crate) subscriptions: ArrayVec<SubscriberId, { BattleConfig::MAX_STATUS_SUBSCRIPTIONS }>,
}

impl StatusInstance {
    pub(crate) fn new(kind: StatusKind, removal: Removal) -> Self {
        Self {
            kind,
            removal,
            subscriptions: ArrayVec::new(),
        }
    }

    /// Remaining turns, for duration-boxed statuses.
    pub fn remaining_turns(&self) -> Option<u32> {
        match self.removal {
            Removal::Duration(turns) => Some(turns),
            _ => None,
        }
    }
}

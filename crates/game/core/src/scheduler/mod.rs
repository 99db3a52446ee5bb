//! Initiative scheduling.
//!
//! The scheduler is an explicit resumable state machine: the surrounding
//! loop calls [`TurnScheduler::advance`] to pump it, resolves the turn it
//! hands out (player input, AI, presentation; none of that is waited on
//! here), and reports back through [`TurnScheduler::complete_turn`]. There
//! is no frame coupling and no hidden suspension.
//!
//! Per round every living combatant gains `SPD` counter points through the
//! mutation pipeline, which is exactly where haste, slow, and stop act,
//! and acts when its counter passes the activation threshold, unless a
//! status vetoes the turn check.

use std::collections::VecDeque;

use crate::battle::Battle;
use crate::config::BattleConfig;
use crate::entity::{EntityId, Position};
use crate::event::{Notice, Signal, Topic};
use crate::stats::{CheckRequest, StatType};

/// Transient state for the turn currently being resolved.
#[derive(Clone, Debug, Default)]
pub struct TurnRecord {
    pub actor: Option<EntityId>,
    /// Catalog name of the ability used this turn, if any.
    pub ability: Option<String>,
    pub has_moved: bool,
    pub has_acted: bool,
    /// Set once an ability lands after moving; movement can no longer be
    /// undone by the UI at that point.
    pub lock_move: bool,
    /// Tiles the chosen ability resolved against.
    pub targets: Vec<Position>,
}

impl TurnRecord {
    pub fn new(actor: EntityId) -> Self {
        Self {
            actor: Some(actor),
            ..Self::default()
        }
    }

    pub fn mark_moved(&mut self) {
        self.has_moved = true;
    }

    pub fn mark_acted(&mut self, ability: &str, targets: Vec<Position>) {
        self.has_acted = true;
        self.ability = Some(ability.to_string());
        self.targets = targets;
        if self.has_moved {
            self.lock_move = true;
        }
    }
}

/// What the scheduler did on one pump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// A new round started; counters have been charged.
    RoundBegan { round: u32 },
    /// An entity's turn activated. Resolve it, then call `complete_turn`.
    TurnReady { actor: EntityId },
    /// Every candidate was considered; the round is over.
    RoundEnded { round: u32 },
}

/// Round-robin initiative driver over a battle.
#[derive(Debug, Default)]
pub struct TurnScheduler {
    round: u32,
    in_round: bool,
    /// Candidates for the current round, highest counter first.
    queue: VecDeque<EntityId>,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds started so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Pumps the scheduler one step.
    ///
    /// Returns `RoundBegan` when a fresh round has charged counters,
    /// `TurnReady` for each entity whose turn check passes, and
    /// `RoundEnded` once the round's candidates are exhausted. The caller
    /// loops on this for the life of the battle; victory detection is the
    /// caller's concern.
    pub fn advance(&mut self, battle: &mut Battle) -> SchedulerEvent {
        if !self.in_round {
            return self.begin_round(battle);
        }

        while let Some(actor) = self.queue.pop_front() {
            if !self.turn_check(battle, actor) {
                continue;
            }
            battle.notify(Topic::TurnBegan, Some(actor), Notice::Turn { actor });
            return SchedulerEvent::TurnReady { actor };
        }

        self.in_round = false;
        battle.notify(Topic::RoundEnded, None, Notice::Round { round: self.round });
        SchedulerEvent::RoundEnded { round: self.round }
    }

    /// Charges the CTR cost for a finished turn and publishes its
    /// completion: base cost, plus the move cost if the actor moved, plus
    /// the action cost if it used an ability.
    pub fn complete_turn(&mut self, battle: &mut Battle, record: &TurnRecord) {
        let Some(actor) = record.actor else {
            return;
        };
        let mut cost = BattleConfig::TURN_COST;
        if record.has_moved {
            cost += BattleConfig::MOVE_COST;
        }
        if record.has_acted {
            cost += BattleConfig::ACTION_COST;
        }
        let ctr = battle.stat(actor, StatType::Ctr);
        battle.set_stat(actor, StatType::Ctr, ctr - cost, true);
        battle.notify(Topic::TurnCompleted, Some(actor), Notice::Turn { actor });
    }

    fn begin_round(&mut self, battle: &mut Battle) -> SchedulerEvent {
        self.round += 1;
        self.in_round = true;
        battle.notify(Topic::RoundBegan, None, Notice::Round { round: self.round });

        // Charge counters through the pipeline so speed-modifying statuses
        // observe every gain.
        let candidates: Vec<EntityId> = battle
            .entities()
            .filter(|e| !battle.has_status(e.id, crate::status::StatusKind::Ko))
            .map(|e| e.id)
            .collect();
        for &id in &candidates {
            let ctr = battle.stat(id, StatType::Ctr);
            let spd = battle.stat(id, StatType::Spd);
            battle.set_stat(id, StatType::Ctr, ctr + spd, true);
        }

        // Highest counter acts first; stable sort keeps arena order on ties.
        let mut ordered = candidates;
        ordered.sort_by_key(|&id| std::cmp::Reverse(battle.stat(id, StatType::Ctr)));
        self.queue = ordered.into();

        SchedulerEvent::RoundBegan { round: self.round }
    }

    /// Publishes the vetoable "may this entity act?" query. The base answer
    /// is the activation threshold; incapacitating statuses veto on top.
    fn turn_check(&self, battle: &mut Battle, actor: EntityId) -> bool {
        let threshold = battle.stat(actor, StatType::Ctr) >= BattleConfig::TURN_ACTIVATION;
        let mut check = CheckRequest::new(threshold);
        battle.publish(Topic::TurnCheck, Some(actor), &mut Signal::Check(&mut check));
        check.allow
    }
}

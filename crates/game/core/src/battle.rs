//! The battle arena: entity storage, the stat mutation pipeline, and event
//! dispatch.
//!
//! All services are constructor-injected and instance-local: there are no
//! globals, so multiple battles can run side by side (tests do exactly
//! that). `set_stat` is the single write path for every stat; ability
//! effects, status ticks, and the scheduler all commit through it.

use crate::config::BattleConfig;
use crate::entity::{Alliance, Entity, EntityId, Facing, Position};
use crate::event::{BattleEvent, EventBus, Hook, Notice, Signal, Subscriber, Topic};
use crate::stats::{CheckRequest, MutationRequest, StatBlock, StatType, vitals_hook};
use crate::status::{Removal, StatusInstance, StatusKind, hooks as status_hooks};

/// Sort order status-effect modifiers use by default.
pub(crate) const STATUS_SORT_ORDER: i32 = 10;
/// Sort order for the final clamp interceptors; runs after status modifiers.
pub(crate) const CLAMP_SORT_ORDER: i32 = 100;

/// A battle in progress.
pub struct Battle {
    config: BattleConfig,
    entities: Vec<Entity>,
    bus: EventBus,
    /// Notices published since the last drain, in publish order.
    journal: Vec<BattleEvent>,
    /// Monotonic roll counter mixed into every RNG seed.
    nonce: u64,
}

impl Battle {
    pub fn new(config: BattleConfig) -> Self {
        Self {
            config,
            entities: Vec::new(),
            bus: EventBus::new(),
            journal: Vec::new(),
            nonce: 0,
        }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Read-only view of the subscriber registry.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Takes every notice published since the last drain, in publish order.
    /// Presentation layers call this after each resolved step; the core
    /// never waits on them.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.journal)
    }

    // ========================================================================
    // Entities
    // ========================================================================

    /// Adds a combatant and wires up its vitals interceptors. Base stats are
    /// committed without interception (initialization writes), but dependent
    /// notifications still fire so HP follows MaxHp and so on.
    pub fn spawn(
        &mut self,
        alliance: Alliance,
        position: Position,
        base_stats: &[(StatType, i32)],
    ) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(Entity::new(id, alliance, position));

        // Ordinary subscribers, not pipeline special cases.
        self.bus.subscribe(
            Topic::StatWillChange(StatType::Hp),
            Some(id),
            id,
            Hook::HpClamp,
            CLAMP_SORT_ORDER,
        );
        self.bus.subscribe(
            Topic::StatWillChange(StatType::Mp),
            Some(id),
            id,
            Hook::MpClamp,
            CLAMP_SORT_ORDER,
        );
        self.bus.subscribe(
            Topic::StatDidChange(StatType::MaxHp),
            Some(id),
            id,
            Hook::MaxHpSync,
            0,
        );
        self.bus.subscribe(
            Topic::StatDidChange(StatType::MaxMp),
            Some(id),
            id,
            Hook::MaxMpSync,
            0,
        );
        self.bus.subscribe(
            Topic::StatDidChange(StatType::Hp),
            Some(id),
            id,
            Hook::VitalsWatch,
            CLAMP_SORT_ORDER,
        );

        for &(stat, value) in base_stats {
            self.set_stat(id, stat, value, false);
        }
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index())
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Entity occupying a tile, if any. KO'd entities still occupy their
    /// tile; target filters decide whether they are legal targets.
    pub fn occupant(&self, position: Position) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|e| e.position == position)
            .map(|e| e.id)
    }

    pub fn set_position(&mut self, id: EntityId, position: Position) {
        if let Some(entity) = self.entity_mut(id) {
            entity.position = position;
        }
    }

    pub fn set_facing(&mut self, id: EntityId, facing: Facing) {
        if let Some(entity) = self.entity_mut(id) {
            entity.facing = facing;
        }
    }

    // ========================================================================
    // Stat pipeline
    // ========================================================================

    /// Current value of a stat; zero for unknown entities.
    pub fn stat(&self, id: EntityId, stat: StatType) -> i32 {
        self.entity(id).map_or(0, |e| e.stats.get(stat))
    }

    /// Proposes a stat write. Returns true if a change committed.
    ///
    /// With `intercept`, the proposal is published to `StatWillChange`
    /// subscribers who may veto it or append modifiers; the modifier chain
    /// is folded (ascending sort order, insertion-stable) and the result
    /// commits only if the toggle survived and the value actually changed.
    /// Without `intercept` (loading, internal bookkeeping) the value commits
    /// directly, but the post-write notification still fires so dependent
    /// interceptors like the HP/MaxHp sync stay consistent.
    pub fn set_stat(&mut self, id: EntityId, stat: StatType, value: i32, intercept: bool) -> bool {
        let Some(old_value) = self.entity(id).map(|e| e.stats.get(stat)) else {
            return false;
        };

        let committed = if intercept {
            let mut request = MutationRequest::new(stat, old_value, value);
            self.publish(
                Topic::StatWillChange(stat),
                Some(id),
                &mut Signal::Mutation(&mut request),
            );
            if !request.proceed {
                return false;
            }
            let resolved = request.resolve();
            if resolved == old_value {
                return false;
            }
            resolved
        } else {
            value
        };

        if let Some(entity) = self.entity_mut(id) {
            entity.stats.commit(stat, committed);
        }
        self.notify(
            Topic::StatDidChange(stat),
            Some(id),
            Notice::StatChanged { stat, old_value },
        );
        true
    }

    /// Read-only stat block snapshot (persistence/AI boundary).
    pub fn stat_block(&self, id: EntityId) -> Option<&StatBlock> {
        self.entity(id).map(Entity::stats)
    }

    // ========================================================================
    // Event dispatch
    // ========================================================================

    /// Publishes a payload to `(topic, sender)` subscribers.
    ///
    /// The subscriber list is snapshotted before iteration: handlers may
    /// subscribe, unsubscribe, or re-enter `set_stat`/`publish` without
    /// invalidating this dispatch.
    pub(crate) fn publish(
        &mut self,
        topic: Topic,
        sender: Option<EntityId>,
        signal: &mut Signal<'_>,
    ) {
        let snapshot = self.bus.snapshot(topic, sender);
        for subscriber in snapshot {
            self.run_hook(&subscriber, topic, signal);
        }
    }

    /// Publishes an immutable notification and journals it for the host.
    pub(crate) fn notify(&mut self, topic: Topic, sender: Option<EntityId>, notice: Notice) {
        self.journal.push(BattleEvent {
            topic,
            scope: sender,
            notice,
        });
        self.publish(topic, sender, &mut Signal::Notice(notice));
    }

    fn run_hook(&mut self, subscriber: &Subscriber, topic: Topic, signal: &mut Signal<'_>) {
        match subscriber.hook {
            Hook::HpClamp
            | Hook::MpClamp
            | Hook::MaxHpSync
            | Hook::MaxMpSync
            | Hook::VitalsWatch => {
                vitals_hook(self, subscriber.hook, subscriber.owner, signal);
            }
            Hook::Status(kind) => {
                status_hooks::dispatch(self, kind, subscriber.owner, topic, signal);
            }
        }
    }

    // ========================================================================
    // Status effects
    // ========================================================================

    pub fn has_status(&self, id: EntityId, kind: StatusKind) -> bool {
        self.entity(id)
            .is_some_and(|e| e.statuses.iter().any(|s| s.kind == kind))
    }

    pub fn status(&self, id: EntityId, kind: StatusKind) -> Option<&StatusInstance> {
        self.entity(id)?.statuses.iter().find(|s| s.kind == kind)
    }

    /// Attaches a status effect. Re-attaching an active status refreshes its
    /// removal state instead of stacking a second instance, so attach is
    /// idempotent.
    pub fn add_status(&mut self, id: EntityId, kind: StatusKind, removal: Removal) {
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        if let Some(existing) = entity.statuses.iter_mut().find(|s| s.kind == kind) {
            existing.removal = removal;
            return;
        }
        if entity.statuses.is_full() {
            tracing::warn!(entity = %id, status = %kind, "status list full; not attached");
            return;
        }

        let mut instance = StatusInstance::new(kind, removal);
        for spec in status_hooks::subscriptions(kind, removal) {
            let handle = self.bus.subscribe(
                spec.topic,
                Some(id),
                id,
                Hook::Status(kind),
                spec.sort_order,
            );
            instance.subscriptions.push(handle);
        }
        if let Some(entity) = self.entity_mut(id) {
            entity.statuses.push(instance);
        }
    }

    /// Detaches a status effect, releasing every subscription it registered.
    /// Returns true if the status was present.
    pub fn remove_status(&mut self, id: EntityId, kind: StatusKind) -> bool {
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        let Some(index) = entity.statuses.iter().position(|s| s.kind == kind) else {
            return false;
        };
        let instance = entity.statuses.remove(index);
        for handle in instance.subscriptions {
            self.bus.unsubscribe(handle);
        }
        true
    }

    pub fn is_ko(&self, id: EntityId) -> bool {
        self.has_status(id, StatusKind::Ko)
    }

    // ========================================================================
    // Vetoable queries
    // ========================================================================

    /// Whether the entity may use an ability right now. The base answer
    /// checks MP and KO state; statuses (silence, disable) may veto on top.
    pub fn can_perform(&mut self, id: EntityId, magical: bool, mp_cost: i32) -> bool {
        let base = !self.is_ko(id) && self.stat(id, StatType::Mp) >= mp_cost;
        let mut check = CheckRequest::for_ability(base, magical);
        self.publish(Topic::CanPerform, Some(id), &mut Signal::Check(&mut check));
        check.allow
    }

    /// Whether the entity may move this turn.
    pub fn can_move(&mut self, id: EntityId) -> bool {
        let mut check = CheckRequest::new(!self.is_ko(id));
        self.publish(Topic::CanMove, Some(id), &mut Signal::Check(&mut check));
        check.allow
    }

    // ========================================================================
    // Randomness
    // ========================================================================

    /// Composes a fresh seed for one random draw and advances the roll
    /// counter, so successive draws are independent but the whole battle
    /// replays from its configured seed.
    pub(crate) fn roll_seed(&mut self, actor: EntityId, context: u32) -> u64 {
        let seed = crate::env::compose_seed(self.config.seed, self.nonce, actor, context);
        self.nonce += 1;
        seed
    }

    /// Current roll-counter position, for snapshots.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub(crate) fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }
}

impl std::fmt::Debug for Battle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battle")
            .field("entities", &self.entities.len())
            .field("subscriptions", &self.bus.len())
            .field("nonce", &self.nonce)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testkit::two_sided_battle;
    use super::*;

    #[test]
    fn spawn_fills_hp_from_max_hp_sync() {
        let (battle, hero, _) = two_sided_battle();
        // MaxHp was committed without interception, but the post-write
        // notification still ran the sync interceptor.
        assert_eq!(battle.stat(hero, StatType::Hp), 100);
        assert_eq!(battle.stat(hero, StatType::Mp), 40);
    }

    #[test]
    fn vetoed_mutation_leaves_value_and_fires_no_notification() {
        let (mut battle, hero, _) = two_sided_battle();
        battle.add_status(hero, StatusKind::Sleep, Removal::OnDamage);
        battle.add_status(hero, StatusKind::Stop, Removal::Duration(3));

        let ctr = battle.stat(hero, StatType::Ctr);
        let committed = battle.set_stat(hero, StatType::Ctr, ctr + 100, true);

        assert!(!committed);
        assert_eq!(battle.stat(hero, StatType::Ctr), ctr);
        // No post-write fired: sleep (removed on damage) is untouched and
        // the write reported no commit.
        assert!(battle.has_status(hero, StatusKind::Sleep));
    }

    #[test]
    fn hp_clamps_into_zero_to_max() {
        let (mut battle, hero, _) = two_sided_battle();

        battle.set_stat(hero, StatType::Hp, 5000, true);
        assert_eq!(battle.stat(hero, StatType::Hp), 100);

        battle.set_stat(hero, StatType::Hp, -25, true);
        assert_eq!(battle.stat(hero, StatType::Hp), 0);
    }

    #[test]
    fn raising_max_hp_carries_the_delta_into_hp() {
        let (mut battle, hero, _) = two_sided_battle();
        battle.set_stat(hero, StatType::Hp, 60, true);

        battle.set_stat(hero, StatType::MaxHp, 120, true);
        assert_eq!(battle.stat(hero, StatType::Hp), 80);

        battle.set_stat(hero, StatType::MaxHp, 70, true);
        assert_eq!(battle.stat(hero, StatType::Hp), 70);
    }

    #[test]
    fn dropping_to_zero_attaches_ko_and_reviving_clears_it() {
        let (mut battle, _, enemy) = two_sided_battle();

        battle.set_stat(enemy, StatType::Hp, 0, true);
        assert!(battle.is_ko(enemy));

        battle.set_stat(enemy, StatType::Hp, 40, true);
        assert!(!battle.is_ko(enemy));
    }

    #[test]
    fn critical_marker_tracks_the_low_hp_threshold() {
        let (mut battle, hero, _) = two_sided_battle();

        battle.set_stat(hero, StatType::Hp, 25, true);
        assert!(battle.has_status(hero, StatusKind::Critical));

        battle.set_stat(hero, StatType::Hp, 90, true);
        assert!(!battle.has_status(hero, StatusKind::Critical));
    }

    #[test]
    fn status_attach_is_idempotent_and_detach_releases_subscriptions() {
        let (mut battle, hero, _) = two_sided_battle();
        let baseline = battle.bus().len();

        battle.add_status(hero, StatusKind::Haste, Removal::Duration(2));
        let subscribed = battle.bus().len();
        battle.add_status(hero, StatusKind::Haste, Removal::Duration(5));
        assert_eq!(battle.bus().len(), subscribed);
        assert_eq!(
            battle.status(hero, StatusKind::Haste).unwrap().remaining_turns(),
            Some(5)
        );

        assert!(battle.remove_status(hero, StatusKind::Haste));
        assert_eq!(battle.bus().len(), baseline);
    }

    #[test]
    fn journal_collects_notices_until_drained() {
        let (mut battle, hero, _) = two_sided_battle();
        battle.drain_events();

        battle.set_stat(hero, StatType::Hp, 60, true);
        let events = battle.drain_events();
        assert!(events.iter().any(|e| {
            e.topic == Topic::StatDidChange(StatType::Hp)
                && e.scope == Some(hero)
                && e.notice
                    == Notice::StatChanged {
                        stat: StatType::Hp,
                        old_value: 100,
                    }
        }));

        // A vetoed write leaves no trace.
        battle.add_status(hero, StatusKind::Stop, Removal::Duration(3));
        battle.drain_events();
        battle.set_stat(hero, StatType::Ctr, 100, true);
        assert!(battle.drain_events().is_empty());
    }

    #[test]
    fn unknown_entity_writes_are_no_ops() {
        let (mut battle, _, _) = two_sided_battle();
        assert!(!battle.set_stat(EntityId(99), StatType::Hp, 10, true));
        assert_eq!(battle.stat(EntityId(99), StatType::Hp), 0);
    }
}

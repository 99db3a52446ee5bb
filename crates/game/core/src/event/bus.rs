//! Subscriber registry with snapshot-then-iterate dispatch semantics.

use std::collections::HashMap;

use crate::entity::EntityId;

use super::{Hook, Topic};

/// Handle for one registered subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// One registered interceptor on a channel.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Subscriber {
    pub id: SubscriberId,
    /// Entity on whose behalf the hook runs (clamp/status owner).
    pub owner: EntityId,
    pub hook: Hook,
    /// Lower values run first; ties keep subscription order.
    pub sort_order: i32,
    /// Monotonic registration sequence; the tie-breaker.
    seq: u64,
}

type Channel = (Topic, Option<EntityId>);

/// Synchronous pub/sub registry.
///
/// The bus never invokes handlers itself; the battle asks for a dispatch
/// [`snapshot`](EventBus::snapshot) and iterates the copy, so handlers can
/// mutate the live subscriber lists mid-dispatch without invalidating the
/// iteration.
#[derive(Debug, Default)]
pub struct EventBus {
    next_seq: u64,
    channels: HashMap<Channel, Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook on `(topic, scope)`. A `None` scope receives the
    /// topic for every sender.
    pub fn subscribe(
        &mut self,
        topic: Topic,
        scope: Option<EntityId>,
        owner: EntityId,
        hook: Hook,
        sort_order: i32,
    ) -> SubscriberId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = SubscriberId(seq);
        self.channels.entry((topic, scope)).or_default().push(Subscriber {
            id,
            owner,
            hook,
            sort_order,
            seq,
        });
        id
    }

    /// Removes a subscription. Returns false if the handle was already gone.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        for subscribers in self.channels.values_mut() {
            if let Some(index) = subscribers.iter().position(|s| s.id == id) {
                subscribers.remove(index);
                return true;
            }
        }
        false
    }

    /// Copies the subscribers that should observe `(topic, sender)`:
    /// the sender-scoped channel merged with the global channel, ordered by
    /// `(sort_order, registration)`.
    pub(crate) fn snapshot(&self, topic: Topic, sender: Option<EntityId>) -> Vec<Subscriber> {
        let mut merged: Vec<Subscriber> = Vec::new();
        if let Some(scope) = sender
            && let Some(subscribers) = self.channels.get(&(topic, Some(scope)))
        {
            merged.extend_from_slice(subscribers);
        }
        if let Some(subscribers) = self.channels.get(&(topic, None)) {
            merged.extend_from_slice(subscribers);
        }
        merged.sort_by_key(|s| (s.sort_order, s.seq));
        merged
    }

    /// Number of live subscriptions across all channels.
    pub fn len(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Request objects passed through the event bus.
//!
//! Cancellation is exception-free: vetoing flips a toggle on the request,
//! and a vetoed mutation simply never commits. Subscribers may also append
//! modifiers; the final value is produced by one fold at commit time.

use super::block::StatType;
use super::modifier::{Modifier, fold};

/// A single proposed stat write, mutable by every pre-write subscriber
/// before it commits.
#[derive(Clone, Debug)]
pub struct MutationRequest {
    /// The stat being written.
    pub stat: StatType,
    /// Committed value before this write.
    pub old_value: i32,
    /// The value the writer asked for.
    pub proposed: i32,
    /// Commit toggle; any subscriber may flip this to reject the write.
    pub proceed: bool,
    /// Modifier chain folded over `proposed` at commit time.
    pub modifiers: Vec<Modifier>,
}

impl MutationRequest {
    pub fn new(stat: StatType, old_value: i32, proposed: i32) -> Self {
        Self {
            stat,
            old_value,
            proposed,
            proceed: true,
            modifiers: Vec::new(),
        }
    }

    /// Signed change the writer originally asked for.
    #[inline]
    pub fn delta_at_start(&self) -> i32 {
        self.proposed - self.old_value
    }

    /// Reject this write.
    pub fn veto(&mut self) {
        self.proceed = false;
    }

    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    /// Folds the modifier chain and returns the value that would commit.
    pub(crate) fn resolve(&mut self) -> i32 {
        fold(&mut self.modifiers, self.proposed, self.old_value)
    }
}

/// A typed numeric query (attack stage, hit-rate stage, ...) carrying a
/// mutable modifier list. Reuses the mutation fold for ability math.
#[derive(Clone, Debug)]
pub struct ValueQuery {
    /// The stat this query concerns, if any. Lets a subscriber scoped to a
    /// broad stage (e.g. the defense stage) act only on the stat it cares
    /// about (protect on DEF, shell on RES).
    pub stat: Option<StatType>,
    /// Starting value supplied by the caller.
    pub base: i32,
    pub modifiers: Vec<Modifier>,
}

impl ValueQuery {
    pub fn new(stat: Option<StatType>, base: i32) -> Self {
        Self {
            stat,
            base,
            modifiers: Vec::new(),
        }
    }

    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    /// Folds the modifier chain over the base value.
    pub fn resolve(&mut self) -> i32 {
        fold(&mut self.modifiers, self.base, self.base)
    }
}

/// A cancellable boolean question (turn check, can-perform, can-move,
/// automatic hit/miss).
#[derive(Clone, Copy, Debug)]
pub struct CheckRequest {
    /// Current answer; subscribers may flip it either way.
    pub allow: bool,
    /// Set when the checked action is a magical ability, so effects like
    /// silence can veto selectively. False for non-ability checks.
    pub magical: bool,
}

impl CheckRequest {
    pub fn new(allow: bool) -> Self {
        Self {
            allow,
            magical: false,
        }
    }

    pub fn for_ability(allow: bool, magical: bool) -> Self {
        Self { allow, magical }
    }

    pub fn veto(&mut self) {
        self.allow = false;
    }
}

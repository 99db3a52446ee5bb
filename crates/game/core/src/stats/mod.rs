//! Stat storage and the cancellable mutation pipeline.
//!
//! Every stat write flows through one entry point (`Battle::set_stat`), which
//! builds a [`MutationRequest`], lets subscribers modify or veto it, folds
//! the accumulated [`Modifier`] chain, and only then commits. The fold
//! primitive is shared with ability math (attack/defense/power queries), so
//! damage formulas and stat alterations compose the same way.

mod block;
mod clamps;
mod modifier;
mod mutation;

pub use block::{StatBlock, StatType};
pub(crate) use clamps::vitals_hook;
pub use modifier::{Modifier, ModifierOp};
pub use mutation::{CheckRequest, MutationRequest, ValueQuery};

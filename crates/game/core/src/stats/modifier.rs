//! Ordered, composable transformations over a proposed numeric change.
//!
//! A modifier chain is folded in ascending `sort_order`; ties keep
//! subscription (append) order, which the stable sort guarantees. The same
//! fold drives stat writes and ability-formula stages, so any status effect
//! that knows how to alter one knows how to alter the other.

/// The transformation a modifier applies to the running value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ModifierOp {
    /// Add a flat amount.
    Add(i32),
    /// Multiply the absolute value.
    MultiplyValue(f32),
    /// Multiply only the signed delta relative to the pre-change value.
    /// Used by counter/speed effects (haste, slow, stop).
    MultiplyDelta(f32),
    /// Clamp into an inclusive range.
    Clamp(i32, i32),
    /// Raise to a floor.
    Min(i32),
    /// Lower to a ceiling.
    Max(i32),
}

/// A single entry in a modifier chain.
///
/// Lower `sort_order` applies first. Subscribers appending at the same order
/// are folded in append order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Modifier {
    pub op: ModifierOp,
    pub sort_order: i32,
}

impl Modifier {
    pub const fn new(op: ModifierOp, sort_order: i32) -> Self {
        Self { op, sort_order }
    }

    fn apply(&self, value: f32, origin: f32) -> f32 {
        match self.op {
            ModifierOp::Add(amount) => value + amount as f32,
            ModifierOp::MultiplyValue(factor) => value * factor,
            ModifierOp::MultiplyDelta(factor) => origin + (value - origin) * factor,
            ModifierOp::Clamp(min, max) => value.clamp(min as f32, max as f32),
            ModifierOp::Min(floor) => value.max(floor as f32),
            ModifierOp::Max(ceiling) => value.min(ceiling as f32),
        }
    }
}

/// Folds a modifier chain over `start`, with `origin` available to
/// delta-relative modifiers. The result is floored to an integer.
pub fn fold(modifiers: &mut Vec<Modifier>, start: i32, origin: i32) -> i32 {
    modifiers.sort_by_key(|m| m.sort_order);
    let origin = origin as f32;
    let result = modifiers
        .iter()
        .fold(start as f32, |value, modifier| modifier.apply(value, origin));
    result.floor() as i32
}

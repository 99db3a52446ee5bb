//! External collaborator boundary.
//!
//! The core never owns tile storage, random state, or authored content; it
//! consumes them through the oracle traits here. Implementations must be
//! deterministic where the trait says so; battle replay depends on it.

mod board;
mod rng;

pub use board::{BoardOracle, GridBoard, SearchResult};
pub use rng::{PcgRng, RngOracle, compose_seed};

use crate::ability::AbilityDefinition;

/// Read-only ability catalog supplied by the content layer.
///
/// The core never mutates definitions; a missing name is a content defect
/// the caller resolves (skip and log), never a crash.
pub trait CatalogOracle: Send + Sync {
    fn ability(&self, name: &str) -> Option<&AbilityDefinition>;
}

/// Bundle of collaborator references handed to resolution entry points.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    pub board: &'a dyn BoardOracle,
    pub rng: &'a dyn RngOracle,
}

impl<'a> BattleEnv<'a> {
    pub fn new(board: &'a dyn BoardOracle, rng: &'a dyn RngOracle) -> Self {
        Self { board, rng }
    }
}

/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Seed for the deterministic RNG stream. Two battles created with the
    /// same seed and driven with the same inputs replay identically.
    pub seed: u64,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of simultaneous status effects per entity.
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Maximum subscription handles a single status effect may hold.
    pub const MAX_STATUS_SUBSCRIPTIONS: usize = 4;

    // ===== fixed gameplay values =====
    // These are compatibility constants; changing any of them changes
    // observable battle outcomes.
    /// CTR value at which an entity's turn activates.
    pub const TURN_ACTIVATION: i32 = 1000;
    /// Base CTR cost charged for every completed turn.
    pub const TURN_COST: i32 = 500;
    /// Additional CTR cost when the actor moved during its turn.
    pub const MOVE_COST: i32 = 300;
    /// Additional CTR cost when the actor used an ability during its turn.
    pub const ACTION_COST: i32 = 200;

    /// Damage and healing magnitudes are clamped to this bound.
    pub const DAMAGE_CAP: i32 = 999;
    /// Applied (not predicted) effect values vary by up to this percentage.
    pub const VARIANCE_PERCENT: i32 = 10;
    /// HP fraction (percent of MHP) at or below which Critical attaches.
    pub const CRITICAL_PERCENT: i32 = 25;

    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

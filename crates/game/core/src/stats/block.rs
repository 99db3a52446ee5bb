//! Per-entity stat table.

use strum::EnumCount;

/// Enumeration of every stat a combatant carries.
///
/// The block is a fixed-size array indexed by this enum, so adding a stat is
/// a single variant. Counter (`Ctr`) is the initiative accumulator; see the
/// scheduler for its activation and cost constants.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumCount,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatType {
    /// Current hit points.
    Hp,
    /// Maximum hit points.
    MaxHp,
    /// Current magic points.
    Mp,
    /// Maximum magic points.
    MaxMp,
    /// Physical attack.
    Atk,
    /// Physical defense.
    Def,
    /// Magical attack.
    Mat,
    /// Magical defense. Carried for collaborators; the base formulas
    /// mitigate magical hits through `Res`.
    Mdf,
    /// Speed: CTR gained per round.
    Spd,
    /// Evasion.
    Evd,
    /// Magical resistance (shell-able defense used by magical hits).
    Res,
    /// Movement range in tiles.
    Mov,
    /// Jump height in tiles.
    Jmp,
    /// Character level.
    Lvl,
    /// Accumulated experience.
    Exp,
    /// Initiative counter; activates a turn at the scheduler threshold.
    Ctr,
}

/// Fixed-size table of stat values for one entity.
///
/// The inner array is private to the stats module: outside code can read any
/// stat but the only write path is the battle's mutation pipeline, so
/// interception can never be bypassed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    values: [i32; StatType::COUNT],
}

impl StatBlock {
    pub fn new() -> Self {
        Self {
            values: [0; StatType::COUNT],
        }
    }

    /// Current value of a stat.
    #[inline]
    pub fn get(&self, stat: StatType) -> i32 {
        self.values[stat as usize]
    }

    /// Raw committed write. Crate-private by design; callers go through
    /// `Battle::set_stat`.
    #[inline]
    pub(crate) fn commit(&mut self, stat: StatType, value: i32) {
        self.values[stat as usize] = value;
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn block_starts_zeroed() {
        let block = StatBlock::new();
        assert_eq!(block.get(StatType::Hp), 0);
        assert_eq!(block.get(StatType::Ctr), 0);
    }

    #[test]
    fn stat_names_round_trip() {
        // Content files reference stats by snake_case name.
        assert_eq!(StatType::from_str("max_hp").unwrap(), StatType::MaxHp);
        assert_eq!(StatType::from_str("SPD").unwrap(), StatType::Spd);
        assert!(StatType::from_str("bravery").is_err());
    }
}

use crate::battle::Battle;
use crate::entity::EntityId;

/// Which occupants of an affected tile an effect may touch.
///
/// Every filter except [`TargetFilter::KoOnly`] skips downed combatants;
/// `KoOnly` exists for revival effects and matches nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetFilter {
    SelfOnly,
    Ally,
    Enemy,
    KoOnly,
    Anyone,
}

impl TargetFilter {
    pub fn is_target(self, battle: &Battle, caster: EntityId, candidate: EntityId) -> bool {
        let Some(caster_ref) = battle.entity(caster) else {
            return false;
        };
        let Some(candidate_ref) = battle.entity(candidate) else {
            return false;
        };
        let downed = battle.is_ko(candidate);
        match self {
            TargetFilter::SelfOnly => candidate == caster && !downed,
            TargetFilter::Ally => caster_ref.alliance.is_ally_of(candidate_ref.alliance) && !downed,
            TargetFilter::Enemy => {
                !caster_ref.alliance.is_ally_of(candidate_ref.alliance) && !downed
            }
            TargetFilter::KoOnly => downed,
            TargetFilter::Anyone => !downed,
        }
    }
}

//! Raw RON file structures and their validation into core definitions.
//!
//! Shapes (range, area, hit rule) deserialize straight into the core types;
//! anything that names a closed enumeration travels as a string and is
//! checked here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tactics_core::ability::{
    AbilityDefinition, AbilityEffect, Area, DamageStyle, EffectKind, HitRule, Range, TargetFilter,
};
use tactics_core::status::StatusKind;

use crate::error::ContentError;

/// Top-level structure of an ability catalog RON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityCatalogFile {
    pub abilities: Vec<AbilitySpec>,
}

/// One authored ability, names unvalidated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySpec {
    pub name: String,
    pub range: Range,
    pub area: Area,
    #[serde(default)]
    pub mp_cost: i32,
    pub effects: Vec<EffectSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectSpec {
    pub kind: EffectKindSpec,
    pub filter: String,
    pub hit: HitRule,
}

/// Effect payload with string-typed enumeration names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EffectKindSpec {
    Damage { style: String, power: i32 },
    Heal { percent: i32 },
    Inflict { status: String, duration: u32 },
    Revive { percent: i32 },
    Absorb { percent: i32 },
}

impl AbilitySpec {
    /// Validates every name and produces the core definition.
    pub fn into_definition(self) -> Result<AbilityDefinition, ContentError> {
        let mut effects = Vec::with_capacity(self.effects.len());
        for effect in self.effects {
            let kind = match effect.kind {
                EffectKindSpec::Damage { style, power } => EffectKind::Damage {
                    style: DamageStyle::from_str(&style).map_err(|_| {
                        ContentError::UnknownStyle {
                            ability: self.name.clone(),
                            style,
                        }
                    })?,
                    power,
                },
                EffectKindSpec::Heal { percent } => EffectKind::Heal { percent },
                EffectKindSpec::Inflict { status, duration } => {
                    let parsed = StatusKind::from_str(&status).map_err(|_| {
                        ContentError::UnknownStatus {
                            ability: self.name.clone(),
                            status: status.clone(),
                        }
                    })?;
                    if parsed.is_vital_marker() {
                        return Err(ContentError::VitalMarkerInflict {
                            ability: self.name.clone(),
                            status,
                        });
                    }
                    EffectKind::Inflict {
                        status: parsed,
                        duration,
                    }
                }
                EffectKindSpec::Revive { percent } => EffectKind::Revive { percent },
                EffectKindSpec::Absorb { percent } => EffectKind::Absorb { percent },
            };
            let filter = TargetFilter::from_str(&effect.filter).map_err(|_| {
                ContentError::UnknownFilter {
                    ability: self.name.clone(),
                    filter: effect.filter,
                }
            })?;
            effects.push(AbilityEffect {
                kind,
                filter,
                hit: effect.hit,
            });
        }
        Ok(AbilityDefinition {
            name: self.name,
            range: self.range,
            area: self.area,
            mp_cost: self.mp_cost,
            effects,
        })
    }
}

//! The loaded, validated ability catalog.

use std::collections::HashMap;
use std::path::Path;

use tactics_core::ability::AbilityDefinition;
use tactics_core::env::CatalogOracle;

use crate::error::ContentError;
use crate::formats::AbilityCatalogFile;

/// Validated ability definitions, looked up by name during resolution.
#[derive(Debug, Default)]
pub struct AbilityCatalog {
    abilities: HashMap<String, AbilityDefinition>,
}

impl AbilityCatalog {
    /// Parses and validates a catalog from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ContentError> {
        let file: AbilityCatalogFile = ron::from_str(text)?;
        let mut abilities = HashMap::with_capacity(file.abilities.len());
        for spec in file.abilities {
            let definition = spec.into_definition()?;
            let name = definition.name.clone();
            if abilities.insert(name.clone(), definition).is_some() {
                return Err(ContentError::DuplicateAbility(name));
            }
        }
        Ok(Self { abilities })
    }

    /// Loads a catalog from a RON file on disk.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let text = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.abilities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

impl CatalogOracle for AbilityCatalog {
    fn ability(&self, name: &str) -> Option<&AbilityDefinition> {
        self.abilities.get(name)
    }
}

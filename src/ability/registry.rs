//! Ability registry
//!
//! In-memory registration of progression tracks. Entries live for the
//! session only; collaborators re-register on every session start.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::key::AbilityKey;
use crate::curve::{CurveDefinition, CurveError, CurveKind};

/// Everything a collaborator supplies when registering an ability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySpec {
    pub owner_id: String,
    pub ability_id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub curve: CurveKind,
    pub level_cap: u32,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A validated registry entry.
#[derive(Debug, Clone)]
pub struct AbilityEntry {
    pub owner_id: String,
    pub ability_id: String,
    pub display_name: String,
    pub description: String,
    pub icon: Option<String>,
    pub tags: Vec<String>,
    pub curve: CurveDefinition,
}

/// Why a registration was rejected. The registry is left untouched on error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("owner id must not be empty")]
    EmptyOwnerId,
    #[error("ability id must not be empty")]
    EmptyAbilityId,
    #[error("invalid curve for {owner_id}/{ability_id}: {source}")]
    InvalidCurve {
        owner_id: String,
        ability_id: String,
        #[source]
        source: CurveError,
    },
}

/// Session-scoped mapping from ability key to curve and metadata.
#[derive(Debug, Clone, Default)]
pub struct AbilityRegistry {
    entries: HashMap<AbilityKey, AbilityEntry>,
}

impl AbilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and upsert. Fully replaces any prior entry under the same
    /// key; never partially applies.
    pub fn register(&mut self, spec: AbilitySpec) -> Result<(), RegistryError> {
        if spec.owner_id.trim().is_empty() {
            return Err(RegistryError::EmptyOwnerId);
        }
        if spec.ability_id.trim().is_empty() {
            return Err(RegistryError::EmptyAbilityId);
        }

        let curve = CurveDefinition::new(spec.curve, spec.level_cap).map_err(|source| {
            RegistryError::InvalidCurve {
                owner_id: spec.owner_id.clone(),
                ability_id: spec.ability_id.clone(),
                source,
            }
        })?;

        let key = AbilityKey::new(spec.owner_id.clone(), spec.ability_id.clone());
        log::debug!(
            "registered ability {}/{} (cap {})",
            spec.owner_id,
            spec.ability_id,
            curve.effective_cap()
        );
        self.entries.insert(
            key,
            AbilityEntry {
                owner_id: spec.owner_id,
                ability_id: spec.ability_id,
                display_name: spec.display_name,
                description: spec.description,
                icon: spec.icon,
                tags: spec.tags,
                curve,
            },
        );
        Ok(())
    }

    pub fn get(&self, owner_id: &str, ability_id: &str) -> Option<&AbilityEntry> {
        self.entries.get(&AbilityKey::new(owner_id, ability_id))
    }

    /// All registered entries, in no particular order.
    pub fn list(&self) -> impl Iterator<Item = &AbilityEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

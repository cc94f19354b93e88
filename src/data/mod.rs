//! Data loading
//!
//! Loads ability definitions from an external RON file, with fallback to
//! hardcoded defaults, so hosts can ship data-driven progression tracks.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ability::AbilitySpec;
use crate::curve::CurveKind;
use crate::engine::ProgressionEngine;

/// Ability definitions registered at session start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilityDefs {
    pub abilities: Vec<AbilitySpec>,
}

impl AbilityDefs {
    /// Load definitions from a RON file, falling back to the built-in
    /// defaults when the file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match ron::from_str(&content) {
                    Ok(defs) => return defs,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse {}: {}", path.display(), e)
                    }
                },
                Err(e) => eprintln!("Warning: Failed to read {}: {}", path.display(), e),
            }
        }
        default_ability_defs()
    }

    /// Register every definition, skipping (and logging) invalid ones.
    /// Returns how many registered successfully.
    pub fn register_all(&self, engine: &mut ProgressionEngine) -> usize {
        let mut registered = 0;
        for spec in &self.abilities {
            match engine.register_ability(spec.clone()) {
                Ok(()) => registered += 1,
                Err(e) => log::warn!(
                    "skipping ability {}/{}: {}",
                    spec.owner_id,
                    spec.ability_id,
                    e
                ),
            }
        }
        registered
    }
}

/// Built-in ability definitions, used when no data file is present.
pub fn default_ability_defs() -> AbilityDefs {
    AbilityDefs {
        abilities: vec![
            AbilitySpec {
                owner_id: "wellspring.core".to_string(),
                ability_id: "focus".to_string(),
                display_name: "Focus".to_string(),
                description: "Steady the mind; every level sharpens concentration.".to_string(),
                curve: CurveKind::Linear { cost_per_level: 100 },
                level_cap: 10,
                icon: None,
                tags: vec!["mental".to_string()],
            },
            AbilitySpec {
                owner_id: "wellspring.core".to_string(),
                ability_id: "second_wind".to_string(),
                display_name: "Second Wind".to_string(),
                description: "Recover faster after exertion.".to_string(),
                curve: CurveKind::Step {
                    base_cost: 100,
                    increment: 50,
                },
                level_cap: 5,
                icon: None,
                tags: vec!["stamina".to_string()],
            },
            AbilitySpec {
                owner_id: "wellspring.core".to_string(),
                ability_id: "forage_sense".to_string(),
                display_name: "Forage Sense".to_string(),
                description: "Spot hidden forageables at a distance.".to_string(),
                curve: CurveKind::Table {
                    level_costs: vec![100, 200, 300],
                },
                level_cap: 3,
                icon: None,
                tags: vec!["outdoors".to_string()],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn test_defaults_all_register() {
        let mut engine = ProgressionEngine::new(EngineConfig::default());
        let defs = default_ability_defs();
        assert_eq!(defs.register_all(&mut engine), defs.abilities.len());
        assert!(engine.list_abilities().count() >= 3);
    }

    #[test]
    fn test_defaults_round_trip_through_ron() {
        let defs = default_ability_defs();
        let text = ron::to_string(&defs).unwrap();
        let back: AbilityDefs = ron::from_str(&text).unwrap();
        assert_eq!(back.abilities.len(), defs.abilities.len());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let defs = AbilityDefs::load(Path::new("does/not/exist.ron"));
        assert_eq!(defs.abilities.len(), default_ability_defs().abilities.len());
    }
}

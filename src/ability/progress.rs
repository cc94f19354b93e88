//! Ability progression store
//!
//! Persisted total-experience-spent counters, one per ability key. Counters
//! only grow through the grant path; explicit overwrites happen only when a
//! save is restored.

use std::collections::HashMap;

use super::key::AbilityKey;
use super::registry::AbilityRegistry;

/// Persisted mapping from ability key to total experience spent.
#[derive(Debug, Clone, Default)]
pub struct AbilityProgressStore {
    totals: HashMap<AbilityKey, u64>,
}

impl AbilityProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total experience spent on an ability. Zero for unknown keys.
    pub fn total(&self, owner_id: &str, ability_id: &str) -> u64 {
        self.totals
            .get(&AbilityKey::new(owner_id, ability_id))
            .copied()
            .unwrap_or(0)
    }

    /// Add experience, clamped to the curve cap. Returns the amount actually
    /// applied; the excess is silently dropped. An unregistered key has no
    /// known cap this session, so the full amount applies.
    pub fn grant(
        &mut self,
        registry: &AbilityRegistry,
        owner_id: &str,
        ability_id: &str,
        amount: u64,
    ) -> u64 {
        if amount == 0 {
            return 0;
        }
        let key = AbilityKey::new(owner_id, ability_id);
        let total = self.totals.get(&key).copied().unwrap_or(0);

        let applied = match registry.get(owner_id, ability_id) {
            Some(entry) => amount.min(entry.curve.total_to_cap().saturating_sub(total)),
            None => amount,
        };
        if applied == 0 {
            return 0;
        }

        let new_total = total
            .checked_add(applied)
            .expect("ability experience counter overflow");
        self.totals.insert(key, new_total);
        log::debug!(
            "granted {} xp to {}/{} (total {})",
            applied,
            owner_id,
            ability_id,
            new_total
        );
        applied
    }

    /// Overwrite a counter outright. Used when restoring a save.
    pub fn set_total(&mut self, owner_id: &str, ability_id: &str, total: u64) {
        self.totals
            .insert(AbilityKey::new(owner_id, ability_id), total);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AbilityKey, u64)> {
        self.totals.iter().map(|(k, &v)| (k, v))
    }

    pub fn clear(&mut self) {
        self.totals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::registry::AbilitySpec;
    use crate::curve::CurveKind;

    fn registry_with_cap() -> AbilityRegistry {
        let mut registry = AbilityRegistry::new();
        registry
            .register(AbilitySpec {
                owner_id: "mod".to_string(),
                ability_id: "focus".to_string(),
                display_name: "Focus".to_string(),
                description: String::new(),
                curve: CurveKind::Linear { cost_per_level: 100 },
                level_cap: 5,
                icon: None,
                tags: Vec::new(),
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_grant_accumulates() {
        let registry = registry_with_cap();
        let mut store = AbilityProgressStore::new();
        assert_eq!(store.grant(&registry, "mod", "focus", 120), 120);
        assert_eq!(store.grant(&registry, "mod", "focus", 80), 80);
        assert_eq!(store.total("mod", "focus"), 200);
    }

    #[test]
    fn test_grant_clamps_to_cap() {
        let registry = registry_with_cap();
        let mut store = AbilityProgressStore::new();
        // Cap is 5 * 100 = 500.
        assert_eq!(store.grant(&registry, "mod", "focus", 450), 450);
        assert_eq!(store.grant(&registry, "mod", "focus", 100), 50);
        assert_eq!(store.total("mod", "focus"), 500);
    }

    #[test]
    fn test_grant_at_cap_is_a_noop() {
        let registry = registry_with_cap();
        let mut store = AbilityProgressStore::new();
        store.grant(&registry, "mod", "focus", 500);
        for _ in 0..3 {
            assert_eq!(store.grant(&registry, "mod", "focus", 100), 0);
        }
        assert_eq!(store.total("mod", "focus"), 500);
    }

    #[test]
    fn test_zero_grant_is_a_noop() {
        let registry = registry_with_cap();
        let mut store = AbilityProgressStore::new();
        assert_eq!(store.grant(&registry, "mod", "focus", 0), 0);
        assert_eq!(store.total("mod", "focus"), 0);
    }

    #[test]
    fn test_unregistered_key_is_uncapped() {
        let registry = AbilityRegistry::new();
        let mut store = AbilityProgressStore::new();
        assert_eq!(store.grant(&registry, "mod", "mystery", 10_000), 10_000);
        assert_eq!(store.total("mod", "mystery"), 10_000);
    }
}

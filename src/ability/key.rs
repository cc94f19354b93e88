//! Ability keys
//!
//! Composite (owner, ability) identifier with case-insensitive equality.

use std::hash::{Hash, Hasher};

/// Identifies one registered progression track.
///
/// The original casing is kept for display and persistence, but equality and
/// hashing ignore ASCII case, matching how hosts compare collaborator ids.
#[derive(Debug, Clone)]
pub struct AbilityKey {
    pub owner_id: String,
    pub ability_id: String,
}

impl AbilityKey {
    pub fn new(owner_id: impl Into<String>, ability_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            ability_id: ability_id.into(),
        }
    }
}

impl PartialEq for AbilityKey {
    fn eq(&self, other: &Self) -> bool {
        self.owner_id.eq_ignore_ascii_case(&other.owner_id)
            && self.ability_id.eq_ignore_ascii_case(&other.ability_id)
    }
}

impl Eq for AbilityKey {}

impl Hash for AbilityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.owner_id.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        // Separator so ("ab", "c") and ("a", "bc") hash differently.
        state.write_u8(0);
        for b in self.ability_id.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_equality_ignores_case() {
        let a = AbilityKey::new("Some.Mod", "Focus");
        let b = AbilityKey::new("some.mod", "FOCUS");
        assert_eq!(a, b);
        assert_ne!(a, AbilityKey::new("some.mod", "other"));
    }

    #[test]
    fn test_map_lookup_ignores_case() {
        let mut map = HashMap::new();
        map.insert(AbilityKey::new("Some.Mod", "Focus"), 42u64);
        assert_eq!(map.get(&AbilityKey::new("SOME.MOD", "focus")), Some(&42));
    }

    #[test]
    fn test_separator_keeps_fields_distinct() {
        let a = AbilityKey::new("ab", "c");
        let b = AbilityKey::new("a", "bc");
        assert_ne!(a, b);
    }
}

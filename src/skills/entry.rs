//! Tracked skill entries

use serde::{Deserialize, Serialize};

/// Where a tracked skill's experience lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillSource {
    /// The host's own per-skill table.
    Native,
    /// An external custom-skill provider.
    Custom,
}

/// One skill the engine tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub id: String,
    pub display_name: String,
    pub source: SkillSource,
}

/// Prettify a provider skill id: keep the trailing dot-segment and
/// capitalize it ("some.mod.herbalism" becomes "Herbalism").
pub fn display_name_from_id(raw: &str) -> String {
    let tail = raw.rsplit('.').next().unwrap_or(raw);
    let mut chars = tail.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => raw.to_string(),
    }
}

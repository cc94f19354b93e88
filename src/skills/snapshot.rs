//! Start-of-day snapshot
//!
//! Per-skill experience and level baselines, rebuilt at the start of every
//! in-game day and consumed by the interception pass until the next rebuild.

use std::collections::HashMap;

/// Start-of-day baselines for every tracked skill.
#[derive(Debug, Clone, Default)]
pub struct DaySnapshot {
    exp: HashMap<String, u64>,
    level: HashMap<String, u32>,
}

impl DaySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.exp.clear();
        self.level.clear();
    }

    /// Baseline experience for a skill, if one was recorded this day.
    pub fn exp(&self, skill_id: &str) -> Option<u64> {
        self.exp.get(skill_id).copied()
    }

    pub fn set_exp(&mut self, skill_id: &str, xp: u64) {
        self.exp.insert(skill_id.to_string(), xp);
    }

    pub fn all_exp(&self) -> &HashMap<String, u64> {
        &self.exp
    }

    /// Replace the experience baselines wholesale.
    pub fn replace_all_exp(&mut self, map: HashMap<String, u64>) {
        self.exp = map;
    }

    /// Baseline level for a natively-leveled skill.
    pub fn level(&self, skill_id: &str) -> Option<u32> {
        self.level.get(skill_id).copied()
    }

    pub fn set_level(&mut self, skill_id: &str, level: u32) {
        self.level.insert(skill_id.to_string(), level);
    }

    pub fn all_levels(&self) -> &HashMap<String, u32> {
        &self.level
    }

    /// Replace the level baselines wholesale.
    pub fn replace_all_levels(&mut self, map: HashMap<String, u32>) {
        self.level = map;
    }
}

//! Host collaborator contracts
//!
//! Abstract interfaces over the two external systems the engine touches:
//! the host's native skill table (which also owns the level-up marker queue
//! its day-end celebration reads) and an optional provider for skills the
//! host does not model natively.

/// Descriptor for one natively modeled skill.
#[derive(Debug, Clone)]
pub struct NativeSkill {
    pub id: String,
    pub display_name: String,
}

/// The host's per-skill experience and level table, plus its level-up
/// marker queue. One host object backs both in practice, so one trait.
pub trait SkillStore {
    /// Natively modeled skills, in display order.
    fn skills(&self) -> Vec<NativeSkill>;

    /// Current experience. Misbehaving hosts may report negatives; the
    /// engine clamps every read to zero.
    fn experience(&self, skill_id: &str) -> i64;

    fn set_experience(&mut self, skill_id: &str, experience: u64);

    fn level(&self, skill_id: &str) -> u32;

    fn set_level(&mut self, skill_id: &str, level: u32);

    /// Add experience through the host's own gain path. The host may clamp
    /// internally; the engine compares before/after and corrects.
    fn add_experience(&mut self, skill_id: &str, amount: u64);

    /// Total experience at which the skill maxes out, or `None` when other
    /// collaborators leave it effectively uncapped.
    fn experience_cap(&self, skill_id: &str) -> Option<u64>;

    /// Queue a level-up marker for the host's day-end celebration.
    fn queue_level_up(&mut self, skill_id: &str, level: u32);

    /// Drop every queued marker for a skill.
    fn remove_queued_level_ups(&mut self, skill_id: &str);

    fn has_queued_level_up(&self, skill_id: &str, level: u32) -> bool;
}

/// Optional provider for skills outside the native table. Consulted only
/// when present; the engine treats absence as "zero experience, no-op add".
pub trait CustomSkillProvider {
    fn skill_ids(&self) -> Vec<String>;

    fn experience(&self, skill_id: &str) -> i64;

    /// Signed: negative deltas take experience away.
    fn add_experience(&mut self, skill_id: &str, delta: i64);

    fn level(&self, skill_id: &str) -> u32;
}

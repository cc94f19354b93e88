//! Point allocation
//!
//! The player-facing write path: spending unspent points on a native skill
//! or a registered ability, with exact cap clamping and whole-point refunds.

use super::ProgressionEngine;
use crate::skills::{CustomSkillProvider, SkillSource, SkillStore};

/// What one allocation call actually did. All-zero when nothing happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub points_spent: u64,
    pub experience_applied: u64,
    pub new_level: u32,
    /// Levels crossed by this allocation, lowest first.
    pub levels_gained: Vec<u32>,
}

impl AllocationOutcome {
    pub fn leveled_up(&self) -> bool {
        !self.levels_gained.is_empty()
    }
}

impl ProgressionEngine {
    /// Spend points on a tracked skill.
    ///
    /// Converts up to `points_per_click` points into experience at the
    /// session exchange rate, clamped to the store's cap contract. Only
    /// points that actually converted are deducted.
    pub fn allocate_to_skill(
        &mut self,
        skill_id: &str,
        store: &mut dyn SkillStore,
        mut provider: Option<&mut dyn CustomSkillProvider>,
    ) -> AllocationOutcome {
        if self.pool.unspent_points() == 0 {
            return AllocationOutcome::default();
        }
        let Some(entry) = self.skills.iter().find(|s| s.id == skill_id).cloned() else {
            log::warn!("allocation requested for untracked skill {}", skill_id);
            return AllocationOutcome::default();
        };
        if entry.source == SkillSource::Custom && provider.is_none() {
            return AllocationOutcome::default();
        }

        let exp_per_point = self.config.exp_per_point;
        let points_to_spend = self
            .config
            .points_per_click
            .max(1)
            .min(self.pool.unspent_points());

        let before = match entry.source {
            SkillSource::Native => store.experience(&entry.id).max(0) as u64,
            SkillSource::Custom => provider
                .as_deref()
                .map(|p| p.experience(&entry.id).max(0) as u64)
                .unwrap_or(0),
        };
        let room = match entry.source {
            SkillSource::Native => store
                .experience_cap(&entry.id)
                .map(|cap| cap.saturating_sub(before)),
            // No cap contract on the provider side.
            SkillSource::Custom => None,
        };
        if room == Some(0) {
            // Already capped: consumes zero points, charges nothing.
            return AllocationOutcome::default();
        }

        let points_used = match room {
            Some(room) => points_to_spend.min(room.div_ceil(exp_per_point)),
            None => points_to_spend,
        };
        let want = points_used
            .checked_mul(exp_per_point)
            .expect("point spend overflow");
        let to_apply = match room {
            Some(room) => want.min(room),
            None => want,
        };

        let old_level = match entry.source {
            SkillSource::Native => store.level(&entry.id),
            SkillSource::Custom => provider.as_deref().map(|p| p.level(&entry.id)).unwrap_or(0),
        };

        self.allocating = true;
        match entry.source {
            SkillSource::Native => {
                store.add_experience(&entry.id, to_apply);
                let after = store.experience(&entry.id).max(0) as u64;
                let applied = after.saturating_sub(before);
                if applied != to_apply {
                    log::warn!(
                        "store applied {} of a requested {} xp to {}; forcing the exact value",
                        applied,
                        to_apply,
                        entry.id
                    );
                    store.set_experience(&entry.id, before + to_apply);
                }
            }
            SkillSource::Custom => {
                if let Some(p) = provider.as_deref_mut() {
                    p.add_experience(&entry.id, to_apply as i64);
                }
            }
        }

        let new_level = match entry.source {
            SkillSource::Native => store.level(&entry.id),
            SkillSource::Custom => provider.as_deref().map(|p| p.level(&entry.id)).unwrap_or(0),
        };
        let mut levels_gained = Vec::new();
        for level in old_level + 1..=new_level {
            levels_gained.push(level);
            if entry.source == SkillSource::Native {
                self.manually_allocated.insert((entry.id.clone(), level));
            }
        }

        // Advance the baseline so the next tick does not re-divert this
        // grant as organic gain.
        self.snapshot.set_exp(&entry.id, before + to_apply);
        if entry.source == SkillSource::Native {
            self.snapshot.set_level(&entry.id, new_level);
        }
        self.pool.spend_points(points_used);
        self.allocating = false;

        log::info!(
            "allocated {} point(s) ({} xp) to skill {}",
            points_used,
            to_apply,
            entry.id
        );
        AllocationOutcome {
            points_spent: points_used,
            experience_applied: to_apply,
            new_level,
            levels_gained,
        }
    }

    /// Spend points on a registered ability.
    ///
    /// Same exchange and refund rules as the skill path, with the room
    /// taken from the ability's curve. An unregistered ability has no
    /// known cap this session and accepts the full spend.
    pub fn allocate_to_ability(&mut self, owner_id: &str, ability_id: &str) -> AllocationOutcome {
        if self.pool.unspent_points() == 0 {
            return AllocationOutcome::default();
        }

        let exp_per_point = self.config.exp_per_point;
        let points_to_spend = self
            .config
            .points_per_click
            .max(1)
            .min(self.pool.unspent_points());

        let room = self.ability_remaining_to_cap(owner_id, ability_id);
        if room == Some(0) {
            return AllocationOutcome::default();
        }

        let points_used = match room {
            Some(room) => points_to_spend.min(room.div_ceil(exp_per_point)),
            None => points_to_spend,
        };
        let want = points_used
            .checked_mul(exp_per_point)
            .expect("point spend overflow");
        let to_apply = match room {
            Some(room) => want.min(room),
            None => want,
        };

        let old_level = self.ability_level(owner_id, ability_id);

        self.allocating = true;
        let applied = self
            .progress
            .grant(&self.registry, owner_id, ability_id, to_apply);
        self.pool.spend_points(points_used);
        self.allocating = false;

        let new_level = self.ability_level(owner_id, ability_id);
        let levels_gained: Vec<u32> = (old_level + 1..=new_level).collect();

        log::info!(
            "allocated {} point(s) ({} xp) to ability {}/{}",
            points_used,
            applied,
            owner_id,
            ability_id
        );
        AllocationOutcome {
            points_spent: points_used,
            experience_applied: applied,
            new_level,
            levels_gained,
        }
    }
}

//! Interception and redirection
//!
//! The per-tick pass that pulls organic skill gains back out of the host
//! and credits them to the global pool, then converts the pool into points.

use super::ProgressionEngine;
use crate::skills::{CustomSkillProvider, SkillSource, SkillStore};

impl ProgressionEngine {
    /// Run the interception pass and the point conversion.
    ///
    /// Call once per host update tick with the running tick number; the
    /// work happens every `update_interval_ticks` ticks (a latency knob,
    /// never a correctness one) and is skipped entirely while an
    /// allocation is in flight.
    pub fn tick(
        &mut self,
        tick: u64,
        store: &mut dyn SkillStore,
        mut provider: Option<&mut dyn CustomSkillProvider>,
    ) {
        if self.allocating {
            return;
        }
        let interval = self.config.update_interval_ticks.max(1);
        if tick % interval != 0 {
            return;
        }

        let mut redirected: u64 = 0;
        for entry in &self.skills {
            // No baseline means the skill appeared mid-day; it gets picked
            // up at the next day start.
            let Some(base) = self.snapshot.exp(&entry.id) else {
                continue;
            };
            let current = match entry.source {
                SkillSource::Native => store.experience(&entry.id).max(0) as u64,
                SkillSource::Custom => provider
                    .as_deref()
                    .map(|p| p.experience(&entry.id).max(0) as u64)
                    .unwrap_or(0),
            };
            if current <= base {
                continue;
            }
            let delta = current - base;

            self.pool.credit(delta);
            redirected += delta;

            match entry.source {
                SkillSource::Native => {
                    // Pull the level back down before the experience, then
                    // drop the markers the native level-up left behind.
                    if let Some(expected) = self.snapshot.level(&entry.id) {
                        if store.level(&entry.id) > expected {
                            store.set_level(&entry.id, expected);
                        }
                    }
                    store.set_experience(&entry.id, base);
                    store.remove_queued_level_ups(&entry.id);
                }
                SkillSource::Custom => {
                    if let Some(p) = provider.as_deref_mut() {
                        p.add_experience(&entry.id, -(delta as i64));
                    }
                }
            }
            log::debug!("redirected {} xp from {}", delta, entry.id);
        }

        let minted = self.pool.convert(self.config.exp_per_point);
        if redirected > 0 || minted > 0 {
            log::debug!(
                "tick {}: redirected {} xp, minted {} point(s) (pool {}, points {})",
                tick,
                redirected,
                minted,
                self.pool.global_exp(),
                self.pool.unspent_points()
            );
        }
    }
}

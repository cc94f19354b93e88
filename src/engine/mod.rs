//! Progression engine
//!
//! The context object that ties the pieces together: tracked skills and
//! their start-of-day snapshots, the global pool, the ability registry and
//! progression store, and the allocation paths. One instance per active
//! game session; every operation is synchronous on the host's update thread.

mod allocate;
mod tick;

pub use allocate::AllocationOutcome;

use std::collections::{HashMap, HashSet};

use crate::ability::{AbilityEntry, AbilityProgressStore, AbilityRegistry, AbilitySpec, RegistryError};
use crate::config::EngineConfig;
use crate::energy::EnergyPool;
use crate::pool::GlobalPool;
use crate::save::{AbilityProgressData, SaveData, SAVE_VERSION};
use crate::skills::{
    display_name_from_id, CustomSkillProvider, DaySnapshot, SkillEntry, SkillSource, SkillStore,
};

/// The unified progression engine.
///
/// Collaborator handles (the native skill store and the optional custom
/// skill provider) are threaded through each call rather than owned, so a
/// test process can run several isolated engines against different hosts.
pub struct ProgressionEngine {
    config: EngineConfig,
    registry: AbilityRegistry,
    progress: AbilityProgressStore,
    pool: GlobalPool,
    snapshot: DaySnapshot,
    skills: Vec<SkillEntry>,
    /// Levels gained through manual allocation today; re-queued at day end
    /// so the host's celebration still fires for them.
    manually_allocated: HashSet<(String, u32)>,
    /// Set while an allocation is mutating collaborator state, so the tick
    /// pass does not re-read the grant as organic gain.
    allocating: bool,
    energy: EnergyPool,
}

impl ProgressionEngine {
    pub fn new(mut config: EngineConfig) -> Self {
        if config.exp_per_point == 0 {
            log::warn!("exp_per_point of 0 is not usable, falling back to 1");
            config.exp_per_point = 1;
        }
        let energy = EnergyPool::new(config.energy_max);
        Self {
            config,
            registry: AbilityRegistry::new(),
            progress: AbilityProgressStore::new(),
            pool: GlobalPool::new(),
            snapshot: DaySnapshot::new(),
            skills: Vec::new(),
            manually_allocated: HashSet::new(),
            allocating: false,
            energy,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Experience cost of one allocation point, fixed for the session.
    pub fn exp_per_point(&self) -> u64 {
        self.config.exp_per_point
    }

    pub fn energy(&self) -> &EnergyPool {
        &self.energy
    }

    pub fn energy_mut(&mut self) -> &mut EnergyPool {
        &mut self.energy
    }

    // ------------------------------------------------------------------
    // Day lifecycle
    // ------------------------------------------------------------------

    /// Rebuild the tracked skill list and snapshot every skill's current
    /// experience (and, for native skills, level) as the day's baseline.
    /// Must run before any tick of the new day.
    pub fn start_of_day(
        &mut self,
        store: &dyn SkillStore,
        provider: Option<&dyn CustomSkillProvider>,
    ) {
        self.snapshot.clear();
        self.manually_allocated.clear();
        self.skills = collect_skills(store, provider, &self.config.ignored_skill_ids);

        for entry in &self.skills {
            let xp = match entry.source {
                SkillSource::Native => store.experience(&entry.id).max(0) as u64,
                SkillSource::Custom => provider
                    .map(|p| p.experience(&entry.id).max(0) as u64)
                    .unwrap_or(0),
            };
            self.snapshot.set_exp(&entry.id, xp);
            if entry.source == SkillSource::Native {
                self.snapshot.set_level(&entry.id, store.level(&entry.id));
            }
            log::debug!("day start: {} xp={}", entry.id, xp);
        }
    }

    /// Re-queue level-up markers for levels gained through manual
    /// allocation, so the host's day-end celebration still shows them.
    pub fn end_of_day(&mut self, store: &mut dyn SkillStore) {
        for (skill_id, level) in &self.manually_allocated {
            if !store.has_queued_level_up(skill_id, *level) {
                store.queue_level_up(skill_id, *level);
            }
        }
    }

    /// Session teardown ("return to main menu"): drop all persisted counters
    /// and day state. Registrations survive; owners re-register anyway.
    pub fn reset_session(&mut self) {
        self.pool = GlobalPool::new();
        self.progress.clear();
        self.snapshot.clear();
        self.skills.clear();
        self.manually_allocated.clear();
        self.allocating = false;
        self.energy.reset_full();
        log::debug!("session state cleared");
    }

    // ------------------------------------------------------------------
    // Abilities
    // ------------------------------------------------------------------

    /// Register or fully replace an ability. Validation failures leave the
    /// registry untouched.
    pub fn register_ability(&mut self, spec: AbilitySpec) -> Result<(), RegistryError> {
        self.registry.register(spec)
    }

    /// All registered abilities, in no particular order.
    pub fn list_abilities(&self) -> impl Iterator<Item = &AbilityEntry> {
        self.registry.list()
    }

    /// Total experience spent on an ability. Zero for unknown keys.
    pub fn ability_total_exp(&self, owner_id: &str, ability_id: &str) -> u64 {
        self.progress.total(owner_id, ability_id)
    }

    /// Current level, or zero if the ability is not registered this session.
    pub fn ability_level(&self, owner_id: &str, ability_id: &str) -> u32 {
        match self.registry.get(owner_id, ability_id) {
            Some(entry) => entry
                .curve
                .evaluate(self.progress.total(owner_id, ability_id))
                .level,
            None => 0,
        }
    }

    /// (experience into the current level, cost of the next level, cap).
    /// Neutral zeros for unregistered keys.
    pub fn ability_progress(&self, owner_id: &str, ability_id: &str) -> (u64, u64, u32) {
        match self.registry.get(owner_id, ability_id) {
            Some(entry) => {
                let eval = entry
                    .curve
                    .evaluate(self.progress.total(owner_id, ability_id));
                (eval.into_level, eval.needed, entry.curve.effective_cap())
            }
            None => (0, 0, 0),
        }
    }

    pub fn ability_at_cap(&self, owner_id: &str, ability_id: &str) -> bool {
        match self.registry.get(owner_id, ability_id) {
            Some(entry) => entry
                .curve
                .evaluate(self.progress.total(owner_id, ability_id))
                .at_cap,
            None => false,
        }
    }

    /// Experience still obtainable before the cap, or `None` when the key is
    /// not registered this session (no cap is known).
    pub fn ability_remaining_to_cap(&self, owner_id: &str, ability_id: &str) -> Option<u64> {
        self.registry.get(owner_id, ability_id).map(|entry| {
            entry
                .curve
                .total_to_cap()
                .saturating_sub(self.progress.total(owner_id, ability_id))
        })
    }

    /// Push experience straight into an ability without spending points (the
    /// grant path other collaborators call). Clamped to the curve cap like
    /// any grant; returns the amount actually applied.
    pub fn grant_ability_exp(&mut self, owner_id: &str, ability_id: &str, amount: u64) -> u64 {
        self.progress.grant(&self.registry, owner_id, ability_id, amount)
    }

    // ------------------------------------------------------------------
    // Global pool
    // ------------------------------------------------------------------

    pub fn global_exp(&self) -> u64 {
        self.pool.global_exp()
    }

    pub fn set_global_exp(&mut self, value: u64) {
        self.pool.set_global_exp(value);
    }

    pub fn unspent_points(&self) -> u64 {
        self.pool.unspent_points()
    }

    pub fn set_unspent_points(&mut self, value: u64) {
        self.pool.set_unspent_points(value);
    }

    // ------------------------------------------------------------------
    // Snapshots and skill enumeration
    // ------------------------------------------------------------------

    /// The skills tracked since the last day start.
    pub fn skill_entries(&self) -> &[SkillEntry] {
        &self.skills
    }

    pub fn start_of_day_exp(&self, skill_id: &str) -> u64 {
        self.snapshot.exp(skill_id).unwrap_or(0)
    }

    pub fn set_start_of_day_exp(&mut self, skill_id: &str, xp: u64) {
        self.snapshot.set_exp(skill_id, xp);
    }

    pub fn all_start_of_day_exp(&self) -> HashMap<String, u64> {
        self.snapshot.all_exp().clone()
    }

    pub fn set_all_start_of_day_exp(&mut self, map: HashMap<String, u64>) {
        self.snapshot.replace_all_exp(map);
    }

    pub fn start_of_day_level(&self, skill_id: &str) -> u32 {
        self.snapshot.level(skill_id).unwrap_or(0)
    }

    pub fn set_start_of_day_level(&mut self, skill_id: &str, level: u32) {
        self.snapshot.set_level(skill_id, level);
    }

    pub fn all_start_of_day_levels(&self) -> HashMap<String, u32> {
        self.snapshot.all_levels().clone()
    }

    pub fn set_all_start_of_day_levels(&mut self, map: HashMap<String, u32>) {
        self.snapshot.replace_all_levels(map);
    }

    // ------------------------------------------------------------------
    // Save bridge
    // ------------------------------------------------------------------

    /// Extract the persisted counters for the host's save pipeline.
    pub fn to_save_data(&self) -> SaveData {
        let mut abilities: Vec<AbilityProgressData> = self
            .progress
            .iter()
            .map(|(key, total)| AbilityProgressData {
                owner_id: key.owner_id.clone(),
                ability_id: key.ability_id.clone(),
                total_exp_spent: total,
            })
            .collect();
        abilities.sort_by(|a, b| {
            (a.owner_id.to_ascii_lowercase(), a.ability_id.to_ascii_lowercase())
                .cmp(&(b.owner_id.to_ascii_lowercase(), b.ability_id.to_ascii_lowercase()))
        });
        SaveData {
            version: SAVE_VERSION,
            global_exp: self.pool.global_exp(),
            unspent_points: self.pool.unspent_points(),
            abilities,
        }
    }

    /// Overwrite the persisted counters from loaded save data.
    pub fn restore_save_data(&mut self, data: SaveData) {
        self.pool.set_global_exp(data.global_exp);
        self.pool.set_unspent_points(data.unspent_points);
        self.progress.clear();
        for record in data.abilities {
            self.progress
                .set_total(&record.owner_id, &record.ability_id, record.total_exp_spent);
        }
        log::info!("restored progression state from save");
    }

    /// Deterministic handle on the re-entrancy guard for tests.
    #[cfg(test)]
    pub(crate) fn force_allocating(&mut self, value: bool) {
        self.allocating = value;
    }
}

/// Native skills first, then provider skills with prettified display names.
fn collect_skills(
    store: &dyn SkillStore,
    provider: Option<&dyn CustomSkillProvider>,
    ignored: &[String],
) -> Vec<SkillEntry> {
    let mut entries = Vec::new();
    for skill in store.skills() {
        if ignored.iter().any(|s| s.eq_ignore_ascii_case(&skill.id)) {
            continue;
        }
        entries.push(SkillEntry {
            id: skill.id,
            display_name: skill.display_name,
            source: SkillSource::Native,
        });
    }
    if let Some(provider) = provider {
        for id in provider.skill_ids() {
            if ignored.iter().any(|s| s.eq_ignore_ascii_case(&id)) {
                continue;
            }
            let display_name = display_name_from_id(&id);
            entries.push(SkillEntry {
                id,
                display_name,
                source: SkillSource::Custom,
            });
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::testing::{TestProvider, TestStore};
    use super::*;
    use crate::curve::CurveKind;

    fn engine() -> ProgressionEngine {
        ProgressionEngine::new(EngineConfig {
            update_interval_ticks: 1,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_start_of_day_snapshots_every_tracked_skill() {
        let mut store = TestStore::new(&["farming", "fishing"]);
        store.set_experience("farming", 400);
        store.set_level("farming", 4);
        let mut provider = TestProvider::new(&["some.mod.herbalism"]);
        provider.exp.insert("some.mod.herbalism".to_string(), 75);

        let mut eng = engine();
        eng.start_of_day(&store, Some(&provider));

        assert_eq!(eng.skill_entries().len(), 3);
        assert_eq!(eng.start_of_day_exp("farming"), 400);
        assert_eq!(eng.start_of_day_level("farming"), 4);
        assert_eq!(eng.start_of_day_exp("some.mod.herbalism"), 75);
        // Provider skills are not natively leveled.
        assert_eq!(eng.start_of_day_level("some.mod.herbalism"), 0);

        let custom = &eng.skill_entries()[2];
        assert_eq!(custom.display_name, "Herbalism");
        assert_eq!(custom.source, SkillSource::Custom);
    }

    #[test]
    fn test_negative_host_reads_clamp_to_zero() {
        let mut store = TestStore::new(&["farming"]);
        store.exp.insert("farming".to_string(), -50);
        let mut eng = engine();
        eng.start_of_day(&store, None);
        assert_eq!(eng.start_of_day_exp("farming"), 0);
    }

    #[test]
    fn test_bulk_snapshot_accessors_replace_wholesale() {
        let store = TestStore::new(&["farming"]);
        let mut eng = engine();
        eng.start_of_day(&store, None);

        eng.set_all_start_of_day_exp(HashMap::from([("fishing".to_string(), 250)]));
        assert_eq!(eng.start_of_day_exp("farming"), 0);
        assert_eq!(eng.start_of_day_exp("fishing"), 250);

        eng.set_start_of_day_level("fishing", 2);
        assert_eq!(eng.all_start_of_day_levels()["fishing"], 2);
    }

    #[test]
    fn test_save_bridge_round_trips() {
        let mut eng = engine();
        eng.register_ability(AbilitySpec {
            owner_id: "mod".to_string(),
            ability_id: "focus".to_string(),
            display_name: "Focus".to_string(),
            description: String::new(),
            curve: CurveKind::Linear { cost_per_level: 100 },
            level_cap: 10,
            icon: None,
            tags: Vec::new(),
        })
        .unwrap();
        eng.set_global_exp(80);
        eng.set_unspent_points(3);
        eng.grant_ability_exp("mod", "focus", 400);

        let data = eng.to_save_data();
        assert_eq!(data.global_exp, 80);
        assert_eq!(data.unspent_points, 3);
        assert_eq!(data.abilities.len(), 1);

        let mut restored = engine();
        restored.restore_save_data(data);
        assert_eq!(restored.global_exp(), 80);
        assert_eq!(restored.unspent_points(), 3);
        assert_eq!(restored.ability_total_exp("mod", "focus"), 400);
        // Level still reads zero until the owner re-registers this session.
        assert_eq!(restored.ability_level("mod", "focus"), 0);
    }

    #[test]
    fn test_reset_session_clears_counters_but_keeps_registrations() {
        let mut eng = engine();
        eng.register_ability(AbilitySpec {
            owner_id: "mod".to_string(),
            ability_id: "focus".to_string(),
            display_name: "Focus".to_string(),
            description: String::new(),
            curve: CurveKind::Linear { cost_per_level: 100 },
            level_cap: 10,
            icon: None,
            tags: Vec::new(),
        })
        .unwrap();
        eng.set_unspent_points(5);
        eng.grant_ability_exp("mod", "focus", 300);

        eng.reset_session();

        assert_eq!(eng.unspent_points(), 0);
        assert_eq!(eng.global_exp(), 0);
        assert_eq!(eng.ability_total_exp("mod", "focus"), 0);
        assert_eq!(eng.list_abilities().count(), 1);
    }

    #[test]
    fn test_zero_exchange_rate_falls_back_to_one() {
        let eng = ProgressionEngine::new(EngineConfig {
            exp_per_point: 0,
            ..EngineConfig::default()
        });
        assert_eq!(eng.exp_per_point(), 1);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared in-memory host doubles for engine tests.

    use std::collections::HashMap;

    use crate::skills::{CustomSkillProvider, NativeSkill, SkillStore};

    /// In-memory native store. Levels up at a fixed cost per level and
    /// queues markers on the way, like a real host's gain path would.
    pub struct TestStore {
        pub skill_list: Vec<NativeSkill>,
        pub exp: HashMap<String, i64>,
        pub level: HashMap<String, u32>,
        pub caps: HashMap<String, u64>,
        pub queued: Vec<(String, u32)>,
        /// Added on top of every `add_experience` request, to simulate a
        /// host that applies more or less than asked.
        pub add_bonus: i64,
        pub level_cost: i64,
    }

    impl TestStore {
        pub fn new(ids: &[&str]) -> Self {
            Self {
                skill_list: ids
                    .iter()
                    .map(|id| NativeSkill {
                        id: id.to_string(),
                        display_name: id.to_string(),
                    })
                    .collect(),
                exp: HashMap::new(),
                level: HashMap::new(),
                caps: HashMap::new(),
                queued: Vec::new(),
                add_bonus: 0,
                level_cost: 100,
            }
        }
    }

    impl SkillStore for TestStore {
        fn skills(&self) -> Vec<NativeSkill> {
            self.skill_list.clone()
        }

        fn experience(&self, skill_id: &str) -> i64 {
            self.exp.get(skill_id).copied().unwrap_or(0)
        }

        fn set_experience(&mut self, skill_id: &str, experience: u64) {
            self.exp.insert(skill_id.to_string(), experience as i64);
        }

        fn level(&self, skill_id: &str) -> u32 {
            self.level.get(skill_id).copied().unwrap_or(0)
        }

        fn set_level(&mut self, skill_id: &str, level: u32) {
            self.level.insert(skill_id.to_string(), level);
        }

        fn add_experience(&mut self, skill_id: &str, amount: u64) {
            let mut next = self.experience(skill_id) + amount as i64 + self.add_bonus;
            if let Some(&cap) = self.caps.get(skill_id) {
                next = next.min(cap as i64);
            }
            self.exp.insert(skill_id.to_string(), next);

            let old_level = self.level(skill_id);
            let new_level = (next / self.level_cost).max(0) as u32;
            if new_level > old_level {
                for l in old_level + 1..=new_level {
                    self.queued.push((skill_id.to_string(), l));
                }
                self.level.insert(skill_id.to_string(), new_level);
            }
        }

        fn experience_cap(&self, skill_id: &str) -> Option<u64> {
            self.caps.get(skill_id).copied()
        }

        fn queue_level_up(&mut self, skill_id: &str, level: u32) {
            self.queued.push((skill_id.to_string(), level));
        }

        fn remove_queued_level_ups(&mut self, skill_id: &str) {
            self.queued.retain(|(id, _)| id != skill_id);
        }

        fn has_queued_level_up(&self, skill_id: &str, level: u32) -> bool {
            self.queued
                .iter()
                .any(|(id, l)| id == skill_id && *l == level)
        }
    }

    /// In-memory custom-skill provider.
    pub struct TestProvider {
        pub ids: Vec<String>,
        pub exp: HashMap<String, i64>,
        pub level_cost: i64,
    }

    impl TestProvider {
        pub fn new(ids: &[&str]) -> Self {
            Self {
                ids: ids.iter().map(|s| s.to_string()).collect(),
                exp: HashMap::new(),
                level_cost: 100,
            }
        }
    }

    impl CustomSkillProvider for TestProvider {
        fn skill_ids(&self) -> Vec<String> {
            self.ids.clone()
        }

        fn experience(&self, skill_id: &str) -> i64 {
            self.exp.get(skill_id).copied().unwrap_or(0)
        }

        fn add_experience(&mut self, skill_id: &str, delta: i64) {
            *self.exp.entry(skill_id.to_string()).or_insert(0) += delta;
        }

        fn level(&self, skill_id: &str) -> u32 {
            (self.experience(skill_id).max(0) / self.level_cost) as u32
        }
    }
}

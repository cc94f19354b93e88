//! Wellspring - Demo Driver
//!
//! Runs the progression engine against a small simulated host for a few
//! in-game days: random skill gains get redirected into the pool, points
//! get minted, and the day's points are spent on abilities and skills.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use wellspring::data::AbilityDefs;
use wellspring::skills::{NativeSkill, SkillStore};
use wellspring::{EngineConfig, ProgressionEngine};

/// Simulated in-game days to run
const DAYS: u32 = 3;
/// Host update ticks per day
const TICKS_PER_DAY: u64 = 360;
/// Wall-clock seconds one tick represents
const TICK_SECONDS: f32 = 1.0 / 60.0;
/// Energy cost of one allocation click
const ALLOCATE_ENERGY_COST: f32 = 2.0;
/// Host-side leveling: one level per this much experience
const HOST_EXP_PER_LEVEL: i64 = 500;

/// Minimal in-memory host: a handful of skills that level up natively and
/// queue level-up markers, the way a real game's gain path would.
struct SimFarm {
    skill_list: Vec<NativeSkill>,
    exp: HashMap<String, i64>,
    level: HashMap<String, u32>,
    queued: Vec<(String, u32)>,
}

impl SimFarm {
    fn new() -> Self {
        let names = ["farming", "fishing", "foraging", "mining", "combat"];
        Self {
            skill_list: names
                .iter()
                .map(|id| NativeSkill {
                    id: id.to_string(),
                    display_name: {
                        let mut name = id.to_string();
                        name[..1].make_ascii_uppercase();
                        name
                    },
                })
                .collect(),
            exp: HashMap::new(),
            level: HashMap::new(),
            queued: Vec::new(),
        }
    }
}

impl SkillStore for SimFarm {
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
        let next = self.experience(skill_id) + amount as i64;
        self.exp.insert(skill_id.to_string(), next);

        let old_level = self.level(skill_id);
        let new_level = (next / HOST_EXP_PER_LEVEL) as u32;
        if new_level > old_level {
            for l in old_level + 1..=new_level {
                self.queued.push((skill_id.to_string(), l));
            }
            self.level.insert(skill_id.to_string(), new_level);
        }
    }

    fn experience_cap(&self, _skill_id: &str) -> Option<u64> {
        // Ten host levels, then the skill is maxed.
        Some(10 * HOST_EXP_PER_LEVEL as u64)
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

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Wellspring demo v{}", env!("CARGO_PKG_VERSION"));

    let mut engine = ProgressionEngine::new(EngineConfig::default());
    let defs = AbilityDefs::load(Path::new("assets/data/abilities.ron"));
    let registered = defs.register_all(&mut engine);
    log::info!("Registered {} abilities", registered);

    let mut farm = SimFarm::new();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    for day in 1..=DAYS {
        engine.start_of_day(&farm, None);

        for tick in 0..TICKS_PER_DAY {
            // Random organic gains: the host grants xp, the engine diverts it.
            if rng.gen_bool(0.05) {
                let idx = rng.gen_range(0..farm.skill_list.len());
                let skill = farm.skill_list[idx].id.clone();
                farm.add_experience(&skill, rng.gen_range(5..60));
            }
            engine.tick(tick, &mut farm, None);

            let rate = engine.config().energy_regen_per_second;
            engine.energy_mut().regen(TICK_SECONDS, rate);
        }

        log::info!(
            "Day {}: {} unspent point(s), {} xp pooled",
            day,
            engine.unspent_points(),
            engine.global_exp()
        );

        // Spend the day's points: abilities first, leftovers into farming.
        // Each click is gated on the energy pool.
        while engine.unspent_points() > 0 {
            if !engine.energy_mut().try_spend(ALLOCATE_ENERGY_COST) {
                log::info!("Out of energy, keeping the remaining points");
                break;
            }
            let outcome = engine.allocate_to_ability("wellspring.core", "focus");
            let outcome = if outcome.points_spent == 0 {
                engine.allocate_to_skill("farming", &mut farm, None)
            } else {
                outcome
            };
            if outcome.points_spent == 0 {
                break;
            }
            for level in &outcome.levels_gained {
                log::info!("Level up! Reached level {}", level);
            }
        }

        engine.end_of_day(&mut farm);
    }

    println!("After {} days:", DAYS);
    for entry in engine.skill_entries() {
        println!(
            "  {:<10} level {:>2}, {:>5} xp",
            entry.display_name,
            farm.level(&entry.id),
            farm.experience(&entry.id)
        );
    }
    let mut abilities: Vec<_> = engine.list_abilities().collect();
    abilities.sort_by(|a, b| a.ability_id.cmp(&b.ability_id));
    for entry in abilities {
        let (into, needed, cap) = engine.ability_progress(&entry.owner_id, &entry.ability_id);
        let level = engine.ability_level(&entry.owner_id, &entry.ability_id);
        println!(
            "  {:<12} level {}/{} ({}/{} into next)",
            entry.display_name, level, cap, into, needed
        );
    }
    println!(
        "  {} point(s) unspent, {} xp in the pool, {:.0}/{:.0} energy",
        engine.unspent_points(),
        engine.global_exp(),
        engine.energy().current(),
        engine.energy().max()
    );

    log::info!("Demo finished cleanly");
    Ok(())
}

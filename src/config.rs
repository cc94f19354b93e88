//! Engine configuration

use serde::{Deserialize, Serialize};

/// Tunables the host reads from its own settings surface and hands to the
/// engine at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Experience cost of one allocation point. Fixed for the session.
    pub exp_per_point: u64,
    /// The interception pass runs once every this many host ticks.
    pub update_interval_ticks: u64,
    /// Points spent per allocation request.
    pub points_per_click: u64,
    /// Native skill ids the engine should not track or redirect.
    pub ignored_skill_ids: Vec<String>,
    /// Energy pool capacity.
    pub energy_max: f32,
    /// Energy regenerated per second.
    pub energy_regen_per_second: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exp_per_point: 100,
            update_interval_ticks: 6,
            points_per_click: 1,
            ignored_skill_ids: Vec::new(),
            energy_max: 100.0,
            energy_regen_per_second: 0.5,
        }
    }
}

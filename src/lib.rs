//! Wellspring - a unified experience pool and ability progression engine
//!
//! Intercepts per-skill experience gains in a host RPG, redirects them into
//! a single global pool, converts the pool into allocation points at a fixed
//! exchange rate, and lets the player spend those points on native skills or
//! on abilities registered by any collaborator.

pub mod ability;
pub mod config;
pub mod curve;
pub mod data;
pub mod energy;
pub mod engine;
pub mod pool;
pub mod save;
pub mod skills;

// Re-export commonly used types
pub use ability::{AbilityEntry, AbilitySpec, RegistryError};
pub use config::EngineConfig;
pub use curve::{CurveDefinition, CurveEval, CurveKind};
pub use engine::{AllocationOutcome, ProgressionEngine};
pub use skills::{CustomSkillProvider, NativeSkill, SkillStore};

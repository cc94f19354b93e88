//! Tracked skills and host contracts
//!
//! The collaborator traits the engine reads from and writes to, the tracked
//! skill list, and the start-of-day snapshot it compares against.

mod entry;
mod host;
mod snapshot;

pub use entry::{display_name_from_id, SkillEntry, SkillSource};
pub use host::{CustomSkillProvider, NativeSkill, SkillStore};
pub use snapshot::DaySnapshot;

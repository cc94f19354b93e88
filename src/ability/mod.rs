//! Ability registry and progression
//!
//! Session-scoped registration of progression tracks and the persisted
//! experience counters behind them.

mod key;
mod progress;
mod registry;

pub use key::AbilityKey;
pub use progress::AbilityProgressStore;
pub use registry::{AbilityEntry, AbilityRegistry, AbilitySpec, RegistryError};

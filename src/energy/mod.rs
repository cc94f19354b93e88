//! Energy pool
//!
//! Secondary resource with an atomic check-then-deduct spend gate and
//! time-based regeneration.

use serde::{Deserialize, Serialize};

/// Tolerance for float comparison when spending.
const SPEND_TOLERANCE: f32 = 1e-3;

/// Clamped 0..max energy resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnergyPool {
    current: f32,
    max: f32,
}

impl EnergyPool {
    /// Create a full pool.
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }

    pub fn add(&mut self, amount: f32) {
        if amount == 0.0 {
            return;
        }
        self.set(self.current + amount);
    }

    /// Succeeds and deducts iff enough energy is available; otherwise leaves
    /// the pool untouched and reports failure.
    pub fn try_spend(&mut self, cost: f32) -> bool {
        if cost <= 0.0 {
            return true;
        }
        if self.current + SPEND_TOLERANCE < cost {
            return false;
        }
        self.current = (self.current - cost).max(0.0);
        true
    }

    pub fn reset_full(&mut self) {
        self.current = self.max;
    }

    /// Regenerate at `rate_per_second` over `dt_secs` of elapsed time.
    pub fn regen(&mut self, dt_secs: f32, rate_per_second: f32) {
        if dt_secs > 0.0 && rate_per_second > 0.0 {
            self.add(dt_secs * rate_per_second);
        }
    }
}

impl Default for EnergyPool {
    fn default() -> Self {
        Self::new(100.0)
    }
}

//! Global experience pool
//!
//! The shared accumulator every redirected skill gain lands in, and the
//! allocation points minted from it at a fixed exchange rate.

use serde::{Deserialize, Serialize};

/// Shared experience pool and the points minted from it. Persisted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GlobalPool {
    global_exp: u64,
    unspent_points: u64,
}

impl GlobalPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global_exp(&self) -> u64 {
        self.global_exp
    }

    pub fn set_global_exp(&mut self, value: u64) {
        self.global_exp = value;
    }

    pub fn unspent_points(&self) -> u64 {
        self.unspent_points
    }

    pub fn set_unspent_points(&mut self, value: u64) {
        self.unspent_points = value;
    }

    /// Credit redirected experience into the pool.
    pub fn credit(&mut self, amount: u64) {
        self.global_exp = self
            .global_exp
            .checked_add(amount)
            .expect("global experience counter overflow");
    }

    /// Drain the pool into whole points and return how many were minted.
    ///
    /// A loop rather than one division: the same path handles a single point
    /// and an offline backlog of thousands, and leaves `global_exp` strictly
    /// below the exchange rate either way.
    pub fn convert(&mut self, exp_per_point: u64) -> u64 {
        if exp_per_point == 0 {
            return 0;
        }
        let mut minted = 0;
        while self.global_exp >= exp_per_point {
            self.global_exp -= exp_per_point;
            self.unspent_points = self
                .unspent_points
                .checked_add(1)
                .expect("unspent point counter overflow");
            minted += 1;
        }
        minted
    }

    /// Remove up to `points` from the unspent balance; returns how many
    /// actually came off.
    pub fn spend_points(&mut self, points: u64) -> u64 {
        let spent = points.min(self.unspent_points);
        self.unspent_points -= spent;
        spent
    }
}

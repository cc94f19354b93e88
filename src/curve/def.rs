//! Curve definitions
//!
//! The cost shapes an ability can be registered with, validated once at
//! construction so an invalid curve can never exist.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cost shape of a progression curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    /// Every level costs the same amount.
    Linear { cost_per_level: u64 },
    /// Level `k` costs `base_cost + increment * (k - 1)`.
    Step { base_cost: u64, increment: u64 },
    /// Explicit cost table, one entry per level.
    Table { level_costs: Vec<u64> },
}

/// Why a curve was rejected at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("level cap must be at least 1")]
    ZeroLevelCap,
    #[error("cost per level must be at least 1")]
    ZeroCostPerLevel,
    #[error("step curve needs a positive base cost or increment")]
    FreeStepCurve,
    #[error("cost table must not be empty")]
    EmptyCostTable,
    #[error("cost table entry for level {level} must be positive")]
    ZeroTableCost { level: u32 },
    #[error("cumulative curve cost overflows")]
    CostOverflow,
}

/// A validated curve plus its level cap.
///
/// For table curves the cumulative cost of every level up to the effective
/// cap is precomputed here, so evaluation is a single binary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveDefinition {
    kind: CurveKind,
    level_cap: u32,
    /// Cumulative cost to reach each level; `prefix[0] == 0`. Table only.
    prefix: Vec<u64>,
}

impl CurveDefinition {
    /// Validate curve parameters and build the definition.
    pub fn new(kind: CurveKind, level_cap: u32) -> Result<Self, CurveError> {
        if level_cap == 0 {
            return Err(CurveError::ZeroLevelCap);
        }

        match &kind {
            CurveKind::Linear { cost_per_level } => {
                if *cost_per_level == 0 {
                    return Err(CurveError::ZeroCostPerLevel);
                }
            }
            CurveKind::Step {
                base_cost,
                increment,
            } => {
                // Both zero would make every level free and the curve
                // permanently at cap.
                if *base_cost == 0 && *increment == 0 {
                    return Err(CurveError::FreeStepCurve);
                }
            }
            CurveKind::Table { level_costs } => {
                if level_costs.is_empty() {
                    return Err(CurveError::EmptyCostTable);
                }
                if let Some(i) = level_costs.iter().position(|&c| c == 0) {
                    return Err(CurveError::ZeroTableCost {
                        level: i as u32 + 1,
                    });
                }
            }
        }

        let prefix = match &kind {
            CurveKind::Table { level_costs } => {
                let cap = level_cap.min(level_costs.len() as u32) as usize;
                let mut prefix = Vec::with_capacity(cap + 1);
                let mut sum: u64 = 0;
                prefix.push(sum);
                for &cost in &level_costs[..cap] {
                    sum = sum.checked_add(cost).ok_or(CurveError::CostOverflow)?;
                    prefix.push(sum);
                }
                prefix
            }
            CurveKind::Linear { cost_per_level } => {
                if (*cost_per_level as u128) * (level_cap as u128) > u64::MAX as u128 {
                    return Err(CurveError::CostOverflow);
                }
                Vec::new()
            }
            CurveKind::Step {
                base_cost,
                increment,
            } => {
                if step_series_total(*base_cost, *increment, level_cap) > u64::MAX as u128 {
                    return Err(CurveError::CostOverflow);
                }
                Vec::new()
            }
        };

        Ok(Self {
            kind,
            level_cap,
            prefix,
        })
    }

    pub fn kind(&self) -> &CurveKind {
        &self.kind
    }

    pub fn level_cap(&self) -> u32 {
        self.level_cap
    }

    /// Table curves cap out at the shorter of the cap and the table length.
    pub fn effective_cap(&self) -> u32 {
        match &self.kind {
            CurveKind::Table { level_costs } => self.level_cap.min(level_costs.len() as u32),
            _ => self.level_cap,
        }
    }

    /// Cost of going from level `k - 1` to level `k` (1-based, within cap).
    pub fn cost_of_level(&self, k: u32) -> u64 {
        match &self.kind {
            CurveKind::Linear { cost_per_level } => *cost_per_level,
            CurveKind::Step {
                base_cost,
                increment,
            } => base_cost + increment * (k as u64 - 1),
            CurveKind::Table { level_costs } => level_costs[k as usize - 1],
        }
    }

    /// Total experience needed to reach the cap from zero.
    pub fn total_to_cap(&self) -> u64 {
        let cap = self.effective_cap();
        match &self.kind {
            CurveKind::Linear { cost_per_level } => cost_per_level * cap as u64,
            CurveKind::Step { .. } => self.step_total(cap) as u64,
            CurveKind::Table { .. } => *self.prefix.last().unwrap_or(&0),
        }
    }

    /// Cumulative cost to reach level `l` on a step curve.
    pub(crate) fn step_total(&self, l: u32) -> u128 {
        match &self.kind {
            CurveKind::Step {
                base_cost,
                increment,
            } => step_series_total(*base_cost, *increment, l),
            _ => 0,
        }
    }

    pub(crate) fn table_prefix(&self) -> &[u64] {
        &self.prefix
    }
}

/// Sum of an arithmetic series: total cost to reach level `l` from zero on a
/// step curve. Wide intermediate so large caps cannot wrap.
fn step_series_total(base_cost: u64, increment: u64, l: u32) -> u128 {
    if l == 0 {
        return 0;
    }
    let l = l as u128;
    l * (2 * base_cost as u128 + (l - 1) * increment as u128) / 2
}

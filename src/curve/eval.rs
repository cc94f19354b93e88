//! Curve evaluation
//!
//! Pure mapping from a total-experience value to level and progress.

use super::def::{CurveDefinition, CurveKind};

/// Result of evaluating a curve at a total-experience value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveEval {
    /// Level reached with the given experience.
    pub level: u32,
    /// Experience accumulated toward the next level. Zero at cap.
    pub into_level: u64,
    /// Cost of the next level. Zero at cap.
    pub needed: u64,
    /// Whether the effective cap has been reached.
    pub at_cap: bool,
}

impl CurveEval {
    fn capped(level: u32) -> Self {
        Self {
            level,
            into_level: 0,
            needed: 0,
            at_cap: true,
        }
    }
}

impl CurveDefinition {
    /// Compute level and into-level progress at `total_exp`.
    ///
    /// Pure and side-effect free. Callers are responsible for clamping
    /// negative host reads to zero before calling.
    pub fn evaluate(&self, total_exp: u64) -> CurveEval {
        let cap = self.effective_cap();
        match self.kind() {
            CurveKind::Linear { cost_per_level } => {
                let level = (total_exp / cost_per_level).min(cap as u64) as u32;
                if level == cap {
                    CurveEval::capped(level)
                } else {
                    CurveEval {
                        level,
                        into_level: total_exp % cost_per_level,
                        needed: *cost_per_level,
                        at_cap: false,
                    }
                }
            }
            CurveKind::Step { .. } => {
                // Largest level whose cumulative cost fits in total_exp.
                let (mut lo, mut hi) = (0u32, cap);
                while lo < hi {
                    let mid = (lo + hi + 1) / 2;
                    if self.step_total(mid) <= total_exp as u128 {
                        lo = mid;
                    } else {
                        hi = mid - 1;
                    }
                }
                let level = lo;
                if level == cap {
                    CurveEval::capped(level)
                } else {
                    CurveEval {
                        level,
                        into_level: total_exp - self.step_total(level) as u64,
                        needed: self.cost_of_level(level + 1),
                        at_cap: false,
                    }
                }
            }
            CurveKind::Table { .. } => {
                let prefix = self.table_prefix();
                // prefix[0] == 0, so the partition point is always >= 1.
                let level = prefix.partition_point(|&c| c <= total_exp) as u32 - 1;
                if level == cap {
                    CurveEval::capped(level)
                } else {
                    CurveEval {
                        level,
                        into_level: total_exp - prefix[level as usize],
                        needed: self.cost_of_level(level + 1),
                        at_cap: false,
                    }
                }
            }
        }
    }
}

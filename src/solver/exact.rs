//! Held-Karp dynamic programming over event subsets.
//!
//! `best[mask][last]` is the cheapest penalised path visiting exactly `mask`
//! and ending at `last`. For closed walks every path starts at the lowest
//! index in its mask, which fixes one rotation of each cycle.

use rayon::prelude::*;

use crate::error::{Result, SolverError};
use crate::feasibility::DecisionFunction;
use crate::matrix::{Cost, CostMatrix};
use crate::solver::{Solution, SolverConfig, Walk, WalkKind, WalkSolver};

/// Subsets are `u32` masks and predecessors are stored as `u8`.
pub const EXACT_HARD_LIMIT: usize = 24;

const UNREACHED: Cost = Cost::MAX;
const NO_PARENT: u8 = u8::MAX;

#[derive(Debug, Clone, Copy)]
pub struct ExactSolver {
    config: SolverConfig,
}

struct Table {
    size: usize,
    best: Vec<Cost>,
    parent: Vec<u8>,
}

impl Table {
    fn slot(&self, mask: u32, last: usize) -> usize {
        mask as usize * self.size + last
    }
}

impl ExactSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn limit(&self) -> usize {
        self.config.max_exact_events.min(EXACT_HARD_LIMIT)
    }

    fn fill(&self, costs: &CostMatrix) -> Table {
        let size = costs.len();
        let closed = self.config.walk_kind == WalkKind::Closed;
        let states = (1usize << size) * size;
        let mut table = Table {
            size,
            best: vec![UNREACHED; states],
            parent: vec![NO_PARENT; states],
        };
        for event in 0..size {
            let slot = table.slot(1 << event, event);
            table.best[slot] = 0;
        }

        // Ascending masks visit every subset before its supersets.
        for mask in 1u32..(1u32 << size) {
            let start = mask.trailing_zeros() as usize;
            for last in 0..size {
                if mask & (1 << last) == 0 {
                    continue;
                }
                let current = table.best[table.slot(mask, last)];
                if current == UNREACHED {
                    continue;
                }
                for (next, cost) in costs.successors(last) {
                    if mask & (1 << next) != 0 || (closed && next < start) {
                        continue;
                    }
                    let candidate = current
                        .saturating_add(cost)
                        .saturating_add(self.config.edge_penalty);
                    let slot = table.slot(mask | (1 << next), next);
                    if candidate < table.best[slot] {
                        table.best[slot] = candidate;
                        table.parent[slot] = last as u8;
                    }
                }
            }
        }
        table
    }

    /// Cheapest finished walk over exactly `mask` and the event it ends on.
    fn finish(&self, table: &Table, costs: &CostMatrix, mask: u32) -> Option<(Cost, usize)> {
        let start = mask.trailing_zeros() as usize;
        let single = mask.count_ones() == 1;
        (0..table.size)
            .filter(|&last| mask & (1 << last) != 0)
            .filter_map(|last| {
                let path = table.best[table.slot(mask, last)];
                if path == UNREACHED {
                    return None;
                }
                match self.config.walk_kind {
                    WalkKind::Open => Some((path, last)),
                    WalkKind::Closed if single => Some((path, last)),
                    WalkKind::Closed => costs.get(last, start).map(|back| {
                        (
                            path.saturating_add(back)
                                .saturating_add(self.config.edge_penalty),
                            last,
                        )
                    }),
                }
            })
            .min()
    }

    fn trace(table: &Table, mask: u32, last: usize) -> Vec<usize> {
        let mut events = vec![last];
        let (mut mask, mut last) = (mask, last);
        loop {
            let parent = table.parent[table.slot(mask, last)];
            if parent == NO_PARENT {
                break;
            }
            mask &= !(1 << last);
            last = parent as usize;
            events.push(last);
        }
        events.reverse();
        events
    }
}

fn members(mask: u32, size: usize) -> Vec<usize> {
    (0..size).filter(|&event| mask & (1 << event) != 0).collect()
}

impl WalkSolver for ExactSolver {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn solve(&self, costs: &CostMatrix, decision: &dyn DecisionFunction) -> Result<Solution> {
        let size = costs.len();
        if size > self.limit() {
            return Err(SolverError::TooManyEvents {
                count: size,
                limit: self.limit(),
            });
        }
        if decision.accepts(&[]) {
            return Ok(Solution::empty(self.config.walk_kind));
        }

        let table = self.fill(costs);
        let best = (1u32..(1u32 << size))
            .into_par_iter()
            .filter_map(|mask| {
                self.finish(&table, costs, mask)
                    .map(|(objective, last)| (objective, mask.count_ones(), mask, last))
            })
            .filter(|&(_, _, mask, _)| decision.accepts(&members(mask, size)))
            .min();

        let Some((objective, _, mask, last)) = best else {
            return Err(SolverError::Infeasible);
        };
        let walk = Walk {
            events: Self::trace(&table, mask, last),
            kind: self.config.walk_kind,
        };
        let solution = Solution::from_walk(costs, walk, self.config.edge_penalty)
            .ok_or(SolverError::Infeasible)?;
        debug_assert_eq!(solution.objective, objective);
        tracing::debug!(
            objective,
            events = solution.walk.events.len(),
            "exact solver finished"
        );
        Ok(solution)
    }
}

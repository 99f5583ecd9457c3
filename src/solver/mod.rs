//! Optimal walks over accepted event subsets.
//!
//! Two solvers share the [WalkSolver] seam: [ExactSolver] enumerates subsets
//! with dynamic programming and handles any decision function, while
//! [CoverageSolver] runs a label search that scales with the number of events
//! but needs a coverage requirement over a time-ordered (acyclic) schedule.

pub mod coverage;
pub mod exact;
pub mod search;

pub use coverage::CoverageSolver;
pub use exact::ExactSolver;
pub use search::min_feasible_hours;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::feasibility::DecisionFunction;
use crate::matrix::{Cost, CostMatrix};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkKind {
    /// Ends at the last selected event.
    #[default]
    Open,
    /// Returns from the last selected event to the first.
    Closed,
}

/// Which solver [solve] dispatches to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStrategy {
    /// Coverage label search when the instance allows it, otherwise exact.
    #[default]
    Auto,
    Exact,
    Coverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub strategy: SolveStrategy,
    pub walk_kind: WalkKind,
    /// Added per leg so that, among equal-cost walks, fewer events win.
    pub edge_penalty: Cost,
    pub max_exact_events: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: SolveStrategy::Auto,
            walk_kind: WalkKind::Open,
            edge_penalty: 0,
            max_exact_events: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walk {
    pub events: Vec<usize>,
    pub kind: WalkKind,
}

impl Walk {
    pub fn open(events: Vec<usize>) -> Self {
        Self {
            events,
            kind: WalkKind::Open,
        }
    }

    pub fn closed(events: Vec<usize>) -> Self {
        Self {
            events,
            kind: WalkKind::Closed,
        }
    }

    /// Consecutive (from, to) pairs, including the return leg of a closed walk.
    pub fn legs(&self) -> Vec<(usize, usize)> {
        let mut legs: Vec<_> = self.events.windows(2).map(|pair| (pair[0], pair[1])).collect();
        if self.kind == WalkKind::Closed && self.events.len() >= 2 {
            legs.push((self.events[self.events.len() - 1], self.events[0]));
        }
        legs
    }

    /// Events in ascending index order.
    pub fn subset(&self) -> Vec<usize> {
        let mut subset = self.events.clone();
        subset.sort_unstable();
        subset
    }
}

/// Total travel cost of `walk`, or `None` if any leg is infinite.
pub fn walk_cost(costs: &CostMatrix, walk: &Walk) -> Option<Cost> {
    walk.legs()
        .into_iter()
        .try_fold(0, |total: Cost, (from, to)| {
            costs.get(from, to).map(|cost| total.saturating_add(cost))
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub walk: Walk,
    pub travel_cost: Cost,
    /// `travel_cost` plus the edge penalty for every leg.
    pub objective: Cost,
}

impl Solution {
    pub fn empty(kind: WalkKind) -> Self {
        Self {
            walk: Walk {
                events: Vec::new(),
                kind,
            },
            travel_cost: 0,
            objective: 0,
        }
    }

    pub fn from_walk(costs: &CostMatrix, walk: Walk, edge_penalty: Cost) -> Option<Self> {
        let travel_cost = walk_cost(costs, &walk)?;
        let legs = walk.legs().len() as Cost;
        Some(Self {
            objective: travel_cost.saturating_add(edge_penalty.saturating_mul(legs)),
            travel_cost,
            walk,
        })
    }

    pub fn events(&self) -> &[usize] {
        &self.walk.events
    }

    /// Lower objective first, then fewer events.
    pub fn is_better_than(&self, other: &Solution) -> bool {
        (self.objective, self.walk.events.len()) < (other.objective, other.walk.events.len())
    }
}

pub trait WalkSolver {
    fn name(&self) -> &'static str;

    fn solve(&self, costs: &CostMatrix, decision: &dyn DecisionFunction) -> Result<Solution>;
}

/// Solve with the solver chosen by `config.strategy`.
pub fn solve(
    costs: &CostMatrix,
    decision: &dyn DecisionFunction,
    config: &SolverConfig,
) -> Result<Solution> {
    let solver: Box<dyn WalkSolver> = match config.strategy {
        SolveStrategy::Exact => Box::new(ExactSolver::new(*config)),
        SolveStrategy::Coverage => Box::new(CoverageSolver::new(*config)),
        SolveStrategy::Auto => {
            if CoverageSolver::supports(costs, decision, config) {
                Box::new(CoverageSolver::new(*config))
            } else {
                Box::new(ExactSolver::new(*config))
            }
        }
    };
    tracing::debug!(
        solver = solver.name(),
        events = costs.len(),
        kind = ?config.walk_kind,
        "solving"
    );
    solver.solve(costs, decision)
}

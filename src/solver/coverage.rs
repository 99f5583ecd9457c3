//! Best-first label search for coverage requirements on acyclic schedules.
//!
//! A label is (last event, covered groups). On an acyclic finite-edge graph
//! every walk is a simple path, so with an admissible estimate of the cost
//! still to come the first label popped with every group covered is an
//! optimal trip. Labels ending on the same event are kept only while no other
//! label there covers a superset of their groups at a score no worse.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::error::{Result, SolverError};
use crate::feasibility::{Coverage, DecisionFunction};
use crate::matrix::{Cost, CostMatrix};
use crate::solver::{Solution, SolverConfig, Walk, WalkKind, WalkSolver};

type Label = (usize, u64);
/// (objective, events in walk). Compared lexicographically; both only grow along a walk.
type Score = (Cost, usize);
/// (estimated objective, estimated events, missing groups, last, covered, objective, events).
type Entry = (Cost, usize, u32, usize, u64, Cost, usize);

const UNREACHABLE: Cost = Cost::MAX;

#[derive(Debug, Clone, Copy)]
pub struct CoverageSolver {
    config: SolverConfig,
}

/// Lower bounds on the rest of a walk, given where it stands.
struct Bounds {
    groups: usize,
    /// `reach[event * groups + group]` is the cheapest unpenalised path from
    /// `event` to any later event of `group`.
    reach: Vec<Cost>,
    /// Most groups a single event covers.
    widest: u32,
    edge_penalty: Cost,
}

impl Bounds {
    fn new(costs: &CostMatrix, coverage: &Coverage, order: &[usize], edge_penalty: Cost) -> Self {
        let size = costs.len();
        let groups = coverage.groups().len();
        let mut rank = vec![0; size];
        for (position, &event) in order.iter().enumerate() {
            rank[event] = position;
        }

        let mut reach = vec![UNREACHABLE; size * groups];
        let mut distance = vec![UNREACHABLE; size];
        for source in 0..size {
            distance.fill(UNREACHABLE);
            distance[source] = 0;
            for &event in &order[rank[source]..] {
                let base = distance[event];
                if base == UNREACHABLE {
                    continue;
                }
                for (next, cost) in costs.successors(event) {
                    distance[next] = distance[next].min(base.saturating_add(cost));
                }
                if event == source {
                    continue;
                }
                let mut members = coverage.mask_of(event);
                while members != 0 {
                    let slot = &mut reach[source * groups + members.trailing_zeros() as usize];
                    *slot = (*slot).min(base);
                    members &= members - 1;
                }
            }
        }

        let widest = (0..size)
            .map(|event| coverage.mask_of(event).count_ones())
            .max()
            .unwrap_or(0)
            .max(1);
        Self {
            groups,
            reach,
            widest,
            edge_penalty,
        }
    }

    /// Optimistic score still needed from `last` to cover `missing`, or `None`
    /// when some missing group cannot be reached at all.
    fn remaining(&self, last: usize, missing: u64) -> Option<Score> {
        if missing == 0 {
            return Some((0, 0));
        }
        let mut drive = 0;
        let mut bits = missing;
        while bits != 0 {
            let reach = self.reach[last * self.groups + bits.trailing_zeros() as usize];
            if reach == UNREACHABLE {
                return None;
            }
            drive = drive.max(reach);
            bits &= bits - 1;
        }
        let legs = missing.count_ones().div_ceil(self.widest) as usize;
        Some((
            drive.saturating_add(self.edge_penalty.saturating_mul(legs as Cost)),
            legs,
        ))
    }
}

/// Non-dominated labels ending on one event.
#[derive(Debug, Default)]
struct Front(Vec<(u64, Score)>);

impl Front {
    fn dominates(&self, covered: u64, score: Score) -> bool {
        self.0
            .iter()
            .any(|&(mask, seen)| mask & covered == covered && seen <= score)
    }

    fn insert(&mut self, covered: u64, score: Score) {
        self.0
            .retain(|&(mask, seen)| !(covered & mask == mask && score <= seen));
        self.0.push((covered, score));
    }

    fn holds(&self, covered: u64, score: Score) -> bool {
        self.0.contains(&(covered, score))
    }
}

struct Search<'a> {
    coverage: &'a Coverage,
    goal: u64,
    bounds: Bounds,
    fronts: Vec<Front>,
    parent: HashMap<Label, Label>,
    open: BinaryHeap<Reverse<Entry>>,
}

impl Search<'_> {
    fn offer(&mut self, (last, covered): Label, score: Score, from: Option<Label>) {
        let missing = self.goal & !covered;
        let Some(rest) = self.bounds.remaining(last, missing) else {
            return;
        };
        let front = &mut self.fronts[last];
        if front.dominates(covered, score) {
            return;
        }
        front.insert(covered, score);
        if let Some(from) = from {
            self.parent.insert((last, covered), from);
        }
        // Among equal estimates, labels closer to the goal go first.
        self.open.push(Reverse((
            score.0.saturating_add(rest.0),
            score.1 + rest.1,
            missing.count_ones(),
            last,
            covered,
            score.0,
            score.1,
        )));
    }

    fn trace(&self, end: Label) -> Vec<usize> {
        let mut events = vec![end.0];
        let mut label = end;
        while let Some(&previous) = self.parent.get(&label) {
            events.push(previous.0);
            label = previous;
        }
        events.reverse();
        events
    }
}

impl CoverageSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Whether this solver can handle the instance at all.
    pub fn supports(costs: &CostMatrix, decision: &dyn DecisionFunction, config: &SolverConfig) -> bool {
        config.walk_kind == WalkKind::Open
            && decision
                .coverage()
                .is_some_and(|coverage| coverage.event_count() == costs.len())
            && costs.topological_order().is_ok()
    }

    fn search(&self, costs: &CostMatrix, coverage: &Coverage, order: &[usize]) -> Option<Vec<usize>> {
        let mut search = Search {
            coverage,
            goal: coverage.full_mask(),
            bounds: Bounds::new(costs, coverage, order, self.config.edge_penalty),
            fronts: (0..costs.len()).map(|_| Front::default()).collect(),
            parent: HashMap::new(),
            open: BinaryHeap::new(),
        };

        for event in 0..costs.len() {
            let mask = coverage.mask_of(event);
            // Starting on an event that covers nothing never beats starting on the next one.
            if mask != 0 {
                search.offer((event, mask), (0, 1), None);
            }
        }

        let mut expanded = 0usize;
        while let Some(Reverse((_, _, _, last, covered, objective, length))) = search.open.pop() {
            if !search.fronts[last].holds(covered, (objective, length)) {
                continue;
            }
            if covered == search.goal {
                tracing::debug!(expanded, "coverage goal reached");
                return Some(search.trace((last, covered)));
            }
            expanded += 1;
            for (next, cost) in costs.successors(last) {
                let score = (
                    objective
                        .saturating_add(cost)
                        .saturating_add(self.config.edge_penalty),
                    length + 1,
                );
                let label = (next, covered | search.coverage.mask_of(next));
                search.offer(label, score, Some((last, covered)));
            }
        }
        tracing::debug!(expanded, "coverage search exhausted");
        None
    }
}

impl WalkSolver for CoverageSolver {
    fn name(&self) -> &'static str {
        "coverage"
    }

    fn solve(&self, costs: &CostMatrix, decision: &dyn DecisionFunction) -> Result<Solution> {
        if self.config.walk_kind == WalkKind::Closed {
            return Err(SolverError::Unsupported(
                "closed walks need the exact solver".to_string(),
            ));
        }
        let coverage = decision.coverage().ok_or_else(|| {
            SolverError::Unsupported("label search needs a coverage requirement".to_string())
        })?;
        if coverage.event_count() != costs.len() {
            return Err(SolverError::DimensionMismatch {
                rows: coverage.event_count(),
                cols: coverage.event_count(),
                expected: costs.len(),
            });
        }
        let order = costs.topological_order()?;

        if coverage.full_mask() == 0 {
            return Ok(Solution::empty(WalkKind::Open));
        }
        let events = self
            .search(costs, coverage, &order)
            .ok_or(SolverError::Infeasible)?;
        let solution = Solution::from_walk(costs, Walk::open(events), self.config.edge_penalty)
            .ok_or(SolverError::Infeasible)?;
        tracing::debug!(
            objective = solution.objective,
            events = solution.walk.events.len(),
            groups = coverage.groups().len(),
            "coverage solver finished"
        );
        Ok(solution)
    }
}

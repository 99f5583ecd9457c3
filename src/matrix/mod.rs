//! Dense pairwise cost matrices.
//!
//! Entries are `Option<Cost>`; `None` is the infinite cost, meaning the two
//! events cannot be attended back to back in that order.

pub mod builder;

pub use builder::{build_cost_matrix, driving_matrix, trip_duration_matrix, CostMeasure};

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use crate::error::{Result, SolverError};

pub type Cost = u64;

/// Venue- or event-keyed costs as stored on disk. A missing key is infinite.
pub type SparseCostMatrix = HashMap<String, HashMap<String, Cost>>;

const INFINITE: Cost = Cost::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    size: usize,
    entries: Vec<Cost>,
}

impl CostMatrix {
    /// All off-diagonal entries infinite, diagonal zero.
    pub fn new(size: usize) -> Self {
        let mut entries = vec![INFINITE; size * size];
        for i in 0..size {
            entries[i * size + i] = 0;
        }
        Self { size, entries }
    }

    /// Fill off-diagonal entries from `f`. The diagonal is always zero.
    pub fn from_fn<F>(size: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Option<Cost>,
    {
        let mut matrix = Self::new(size);
        for from in 0..size {
            for to in 0..size {
                if from != to {
                    matrix.set(from, to, f(from, to));
                }
            }
        }
        matrix
    }

    pub fn from_rows(rows: Vec<Vec<Option<Cost>>>) -> Result<Self> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != size) {
            return Err(SolverError::DimensionMismatch {
                rows: size,
                cols: row.len(),
                expected: size,
            });
        }
        Ok(Self::from_fn(size, |from, to| rows[from][to]))
    }

    /// Build a matrix over `ids` (in that order) from the keyed form.
    pub fn from_sparse<S: AsRef<str>>(ids: &[S], sparse: &SparseCostMatrix) -> Self {
        Self::from_fn(ids.len(), |from, to| {
            sparse
                .get(ids[from].as_ref())
                .and_then(|row| row.get(ids[to].as_ref()))
                .copied()
        })
    }

    pub fn to_sparse<S: AsRef<str>>(&self, ids: &[S]) -> SparseCostMatrix {
        let mut sparse = SparseCostMatrix::new();
        for from in 0..self.size.min(ids.len()) {
            let row = sparse.entry(ids[from].as_ref().to_string()).or_default();
            for to in 0..self.size.min(ids.len()) {
                if let Some(cost) = self.get(from, to) {
                    row.insert(ids[to].as_ref().to_string(), cost);
                }
            }
        }
        sparse
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> Option<Cost> {
        let cost = self.entries[from * self.size + to];
        (cost != INFINITE).then_some(cost)
    }

    #[inline]
    pub fn is_finite(&self, from: usize, to: usize) -> bool {
        self.entries[from * self.size + to] != INFINITE
    }

    pub fn set(&mut self, from: usize, to: usize, cost: Option<Cost>) {
        // Cost::MAX is reserved for the infinite marker.
        self.entries[from * self.size + to] = cost.map_or(INFINITE, |c| c.min(INFINITE - 1));
    }

    /// Finite off-diagonal edges leaving `from`.
    pub fn successors(&self, from: usize) -> impl Iterator<Item = (usize, Cost)> + '_ {
        (0..self.size)
            .filter(move |&to| to != from)
            .filter_map(move |to| self.get(from, to).map(|cost| (to, cost)))
    }

    /// Copy with every edge for which `keep` is false made infinite. `keep` only
    /// sees finite edges.
    pub fn restrict<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        Self::from_fn(self.size, |from, to| {
            if self.is_finite(from, to) && keep(from, to) {
                self.get(from, to)
            } else {
                None
            }
        })
    }

    /// Append a depot node (index `len()`) with zero cost to and from every event.
    /// A closed walk through the depot is an open walk over the remaining events.
    pub fn with_depot(&self) -> Self {
        let depot = self.size;
        Self::from_fn(self.size + 1, |from, to| {
            if from == depot || to == depot {
                Some(0)
            } else {
                self.get(from, to)
            }
        })
    }

    /// Topological order of the finite-edge graph, or the first index left on a cycle.
    pub fn topological_order(&self) -> Result<Vec<usize>> {
        let mut in_degree = vec![0usize; self.size];
        for from in 0..self.size {
            for (to, _) in self.successors(from) {
                in_degree[to] += 1;
            }
        }
        let mut ready: VecDeque<usize> = (0..self.size).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(self.size);
        while let Some(node) = ready.pop_front() {
            order.push(node);
            for (to, _) in self.successors(node) {
                in_degree[to] -= 1;
                if in_degree[to] == 0 {
                    ready.push_back(to);
                }
            }
        }
        if order.len() == self.size {
            Ok(order)
        } else {
            let stuck = (0..self.size)
                .find(|&i| in_degree[i] > 0)
                .unwrap_or_default();
            Err(SolverError::CyclicSchedule(stuck))
        }
    }
}

pub fn load_sparse_matrix(path: impl AsRef<Path>) -> Result<SparseCostMatrix> {
    crate::model::read_json(path.as_ref())
}

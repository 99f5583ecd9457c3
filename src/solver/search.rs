//! Smallest resource allowance (e.g. daily driving hours) that admits a solution.

use crate::error::{Result, SolverError};
use crate::solver::Solution;

/// Binary search over `min..=max` for the smallest value where `attempt` succeeds.
///
/// `attempt` must be monotone: once it succeeds for some value it succeeds for
/// every larger one. [SolverError::Infeasible] marks a failed attempt; any
/// other error aborts the search.
pub fn min_feasible_hours<F>(min: u32, max: u32, mut attempt: F) -> Result<(u32, Solution)>
where
    F: FnMut(u32) -> Result<Solution>,
{
    if min > max {
        return Err(SolverError::Unsupported(format!(
            "empty hour range {min}..={max}"
        )));
    }
    let mut best = (max, attempt(max)?);
    let (mut low, mut high) = (min, max);
    while low < high {
        let middle = low + (high - low) / 2;
        match attempt(middle) {
            Ok(solution) => {
                best = (middle, solution);
                high = middle;
            }
            Err(SolverError::Infeasible) => low = middle + 1,
            Err(err) => return Err(err),
        }
    }
    tracing::debug!(hours = best.0, "smallest feasible allowance found");
    Ok(best)
}

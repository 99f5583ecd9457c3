//! Solution files written per team: `<measure>.txt` and `<measure>.csv`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, SolverError};
use crate::planner::{MeasuredSolution, TeamPlan};
use crate::solver::Solution;

/// Objective on the first line, daily driving hours on the second, then one
/// event id per line in visiting order.
pub fn format_solution<S: AsRef<str>>(
    solution: &Solution,
    driving_hours: u32,
    event_ids: &[S],
) -> String {
    let mut lines = vec![solution.objective.to_string(), driving_hours.to_string()];
    lines.extend(event_ids.iter().map(|id| id.as_ref().to_string()));
    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItineraryRow {
    pub stop: usize,
    pub event_id: String,
    pub time: String,
    pub venue_id: String,
    pub home_team_id: String,
    pub away_team_id: String,
    /// Cost of the leg arriving at this stop; empty for the first stop.
    pub leg_cost: Option<u64>,
}

pub fn itinerary_rows(plan: &TeamPlan, measured: &MeasuredSolution) -> Vec<ItineraryRow> {
    measured
        .solution
        .events()
        .iter()
        .enumerate()
        .map(|(stop, &index)| {
            let event = &plan.events[index];
            ItineraryRow {
                stop: stop + 1,
                event_id: event.id.clone(),
                time: event.time.to_rfc3339(),
                venue_id: event.venue_id.clone(),
                home_team_id: event.home_team_id.clone(),
                away_team_id: event.away_team_id.clone(),
                leg_cost: stop
                    .checked_sub(1)
                    .and_then(|leg| measured.leg_costs.get(leg).copied()),
            }
        })
        .collect()
}

pub fn write_itinerary_csv(path: impl AsRef<Path>, rows: &[ItineraryRow]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .map_err(|err| SolverError::io(format!("unable to flush '{}'", path.display()), err))
}

/// Write every measured solution of `plan` under `output_dir/<team slug>/`.
pub fn write_team_plan(plan: &TeamPlan, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let team_dir = output_dir.as_ref().join(plan.team.slug());
    fs::create_dir_all(&team_dir)
        .map_err(|err| SolverError::io(format!("unable to create '{}'", team_dir.display()), err))?;

    for measured in &plan.solutions {
        let name = measured.measure.as_str();
        let ids = plan.event_ids(&measured.solution);
        let text_path = team_dir.join(format!("{name}.txt"));
        fs::write(
            &text_path,
            format_solution(&measured.solution, plan.driving_hours, &ids),
        )
        .map_err(|err| SolverError::io(format!("unable to write '{}'", text_path.display()), err))?;

        write_itinerary_csv(
            team_dir.join(format!("{name}.csv")),
            &itinerary_rows(plan, measured),
        )?;
    }
    Ok(team_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{Walk, WalkKind};

    #[test]
    fn solution_text_lists_objective_hours_and_ids() {
        let solution = Solution {
            walk: Walk::open(vec![2, 0]),
            travel_cost: 5,
            objective: 7,
        };
        assert_eq!(format_solution(&solution, 9, &["g3", "g1"]), "7\n9\ng3\ng1");
    }

    #[test]
    fn empty_solution_text_has_two_lines() {
        let solution = Solution::empty(WalkKind::Open);
        assert_eq!(format_solution::<&str>(&solution, 1, &[]), "0\n1");
    }
}

//! Fan-trip planning: for one focus team, find the cheapest drive that sees
//! it play every opponent at least once.

pub mod batch;
pub mod dataset;
pub mod output;

pub use batch::{plan_all, run_directory, BatchReport, TeamFailure, TeamSummary, SUMMARY_FILE};
pub use dataset::{load_dataset, Dataset, REQUIRED_FILES};
pub use output::{
    format_solution, itinerary_rows, write_itinerary_csv, write_team_plan, ItineraryRow,
};

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::PlannerConfig;
use crate::error::{Result, SolverError};
use crate::feasibility::{focus_events, one_sided_matchup_matrix, restrict_to_schedule, Coverage};
use crate::matrix::{build_cost_matrix, CostMatrix, CostMeasure};
use crate::model::{Event, Team};
use crate::solver::{min_feasible_hours, solve, Solution};

#[derive(Debug, Clone, Serialize)]
pub struct MeasuredSolution {
    pub measure: CostMeasure,
    pub solution: Solution,
    /// Unpenalised cost of each leg in visiting order.
    pub leg_costs: Vec<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamPlan {
    pub team: Team,
    /// Smallest daily driving allowance, in hours, under which a trip exists.
    pub driving_hours: u32,
    /// The focus team's candidate events, in the order solution indices refer to.
    pub events: Vec<Event>,
    /// Opponent team ids every trip must include.
    pub opponents: Vec<String>,
    pub solutions: Vec<MeasuredSolution>,
}

impl TeamPlan {
    pub fn solution(&self, measure: CostMeasure) -> Option<&Solution> {
        self.solutions
            .iter()
            .find(|measured| measured.measure == measure)
            .map(|measured| &measured.solution)
    }

    pub fn event_ids(&self, solution: &Solution) -> Vec<&str> {
        solution
            .events()
            .iter()
            .map(|&index| self.events[index].id.as_str())
            .collect()
    }
}

/// Cost matrices and coverage for one focus team, reused across measures and allowances.
struct TripModel {
    events: Vec<Event>,
    opponents: Vec<String>,
    coverage: Coverage,
    /// One matrix per entry of [CostMeasure::ALL], in that order.
    matrices: Vec<CostMatrix>,
}

impl TripModel {
    fn build(dataset: &Dataset, team: &Team, config: &PlannerConfig) -> Result<Self> {
        let chronological = dataset.events.chronological();
        let events = focus_events(&chronological, &team.id, config.side);

        let excluded: BTreeSet<&str> = config
            .excluded_opponents(&team.name)
            .into_iter()
            .filter_map(|name| dataset.teams.find_by_name(name))
            .map(|excluded| excluded.id.as_str())
            .collect();
        let opponents: Vec<String> = events
            .iter()
            .filter_map(|event| event.opponent_of(&team.id))
            .filter(|opponent| dataset.teams.find(opponent).is_some())
            .filter(|opponent| !excluded.contains(opponent))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let matchups = one_sided_matchup_matrix(&events, &team.id, config.side);
        let ids: Vec<&str> = events.iter().map(|event| event.id.as_str()).collect();
        let coverage = Coverage::from_matchups(&matchups, &ids, opponents.clone())?;

        let offset = config.schedule.offset()?;
        let matrices = CostMeasure::ALL
            .into_iter()
            .map(|measure| build_cost_matrix(&events, measure, dataset.route(measure), offset))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            matrices,
            events,
            opponents,
            coverage,
        })
    }

    fn costs(&self, measure: CostMeasure) -> &CostMatrix {
        let slot = CostMeasure::ALL
            .iter()
            .position(|candidate| *candidate == measure)
            .unwrap_or_default();
        &self.matrices[slot]
    }

    fn measured(&self, measure: CostMeasure, solution: Solution) -> MeasuredSolution {
        let costs = self.costs(measure);
        let leg_costs = solution
            .walk
            .legs()
            .into_iter()
            .filter_map(|(from, to)| costs.get(from, to))
            .collect();
        MeasuredSolution {
            measure,
            solution,
            leg_costs,
        }
    }

    fn solve(&self, measure: CostMeasure, hours: u32, config: &PlannerConfig) -> Result<Solution> {
        let costs = restrict_to_schedule(
            self.costs(measure),
            &self.events,
            self.costs(CostMeasure::DrivingDuration),
            &config.schedule,
            hours,
        )?;
        solve(&costs, &self.coverage, &config.solver)
    }
}

/// Measure the daily driving allowance is searched with.
const ALLOWANCE_MEASURE: CostMeasure = CostMeasure::TripDuration;

/// Plan every measure for `team_id` at the smallest feasible daily driving allowance.
///
/// The allowance is searched with the trip-duration measure, then reused for
/// driving distance and driving duration.
pub fn plan_team(dataset: &Dataset, team_id: &str, config: &PlannerConfig) -> Result<TeamPlan> {
    config.validate()?;
    let team = dataset
        .teams
        .find(team_id)
        .ok_or_else(|| SolverError::UnknownTeam(team_id.to_string()))?;
    let model = TripModel::build(dataset, team, config)?;

    let (driving_hours, shortest) =
        min_feasible_hours(config.min_hours, config.max_hours, |hours| {
            model.solve(ALLOWANCE_MEASURE, hours, config)
        })?;

    let mut solutions = Vec::with_capacity(CostMeasure::ALL.len());
    for measure in CostMeasure::ALL {
        let solution = if measure == ALLOWANCE_MEASURE {
            shortest.clone()
        } else {
            model.solve(measure, driving_hours, config)?
        };
        solutions.push(model.measured(measure, solution));
    }

    tracing::info!(
        team = %team.name,
        driving_hours,
        events = model.events.len(),
        opponents = model.opponents.len(),
        "planned trips"
    );
    Ok(TeamPlan {
        team: team.clone(),
        driving_hours,
        events: model.events,
        opponents: model.opponents,
        solutions,
    })
}

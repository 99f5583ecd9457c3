//! Plan every team in a dataset in parallel and write the results.

use std::fs;
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::PlannerConfig;
use crate::error::{Result, SolverError};
use crate::matrix::CostMeasure;
use crate::parallel::WorkerPool;
use crate::planner::{
    load_dataset, plan_team, write_team_plan, Dataset, TeamPlan, REQUIRED_FILES,
};
use crate::validate::{validate_dataset, Severity};

pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamSummary {
    pub team_id: String,
    pub team_name: String,
    pub driving_hours: u32,
    pub objectives: Vec<(CostMeasure, u64)>,
}

impl From<&TeamPlan> for TeamSummary {
    fn from(plan: &TeamPlan) -> Self {
        Self {
            team_id: plan.team.id.clone(),
            team_name: plan.team.name.clone(),
            driving_hours: plan.driving_hours,
            objectives: plan
                .solutions
                .iter()
                .map(|measured| (measured.measure, measured.solution.objective))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamFailure {
    pub team_id: String,
    pub team_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub solved: Vec<TeamSummary>,
    pub failed: Vec<TeamFailure>,
}

/// Plan every team without touching the filesystem. Order follows `dataset.teams`.
pub fn plan_all(dataset: &Dataset, config: &PlannerConfig) -> Result<Vec<(String, Result<TeamPlan>)>> {
    WorkerPool::with_workers(config.workers).install(|| {
        dataset
            .teams
            .teams
            .par_iter()
            .map(|team| (team.id.clone(), plan_team(dataset, &team.id, config)))
            .collect()
    })
}

/// Read the four input files from `input_dir`, plan every team and write
/// `<team>/<measure>.{txt,csv}` plus a JSON summary under `output_dir`.
///
/// A team without a feasible trip is recorded in the report; it does not stop the batch.
pub fn run_directory(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &PlannerConfig,
) -> Result<BatchReport> {
    config.validate()?;
    let input_dir = input_dir.as_ref();
    if !input_dir.is_dir() {
        return Err(SolverError::MissingInput(input_dir.to_path_buf()));
    }
    if let Some(missing) = REQUIRED_FILES
        .iter()
        .map(|name| input_dir.join(name))
        .find(|path| !path.is_file())
    {
        return Err(SolverError::MissingInput(missing));
    }
    let dataset = load_dataset(input_dir)?;

    let validation = validate_dataset(&dataset);
    for finding in &validation.findings {
        match finding.severity() {
            Severity::Error => tracing::error!(%finding, "invalid input"),
            Severity::Warning => tracing::warn!(%finding, "suspicious input"),
            Severity::Note => tracing::debug!(%finding, "input note"),
        }
    }
    if !validation.is_usable() {
        return Err(SolverError::InvalidDataset(validation.error_count()));
    }

    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)
        .map_err(|err| SolverError::io(format!("unable to create '{}'", output_dir.display()), err))?;

    let mut report = BatchReport::default();
    for (team_id, outcome) in plan_all(&dataset, config)? {
        let team_name = dataset
            .teams
            .find(&team_id)
            .map(|team| team.name.clone())
            .unwrap_or_else(|| team_id.clone());
        match outcome.and_then(|plan| write_team_plan(&plan, output_dir).map(|_| plan)) {
            Ok(plan) => report.solved.push(TeamSummary::from(&plan)),
            Err(err) => {
                tracing::warn!(team = %team_name, error = %err, "no trip written");
                report.failed.push(TeamFailure {
                    team_id,
                    team_name,
                    reason: err.to_string(),
                });
            }
        }
    }

    let summary_path = output_dir.join(SUMMARY_FILE);
    fs::write(&summary_path, serde_json::to_string_pretty(&report)?)
        .map_err(|err| SolverError::io(format!("unable to write '{}'", summary_path.display()), err))?;

    tracing::info!(
        solved = report.solved.len(),
        failed = report.failed.len(),
        output = %output_dir.display(),
        "batch finished"
    );
    Ok(report)
}

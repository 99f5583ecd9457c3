use std::path::Path;

use crate::error::Result;
use crate::matrix::{load_sparse_matrix, CostMeasure, SparseCostMatrix};
use crate::model::{load_events, load_teams, Events, Teams};

pub const TEAMS_FILE: &str = "teams.json";
pub const EVENTS_FILE: &str = "events.json";
/// Venue-to-venue driving distance in meters.
pub const DISTANCE_MATRIX_FILE: &str = "distance_matrix.json";
/// Venue-to-venue driving duration in seconds.
pub const DURATION_MATRIX_FILE: &str = "duration_matrix.json";

pub const REQUIRED_FILES: [&str; 4] = [
    DISTANCE_MATRIX_FILE,
    DURATION_MATRIX_FILE,
    EVENTS_FILE,
    TEAMS_FILE,
];

/// Everything batch planning reads from an input directory.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub teams: Teams,
    pub events: Events,
    pub distance: SparseCostMatrix,
    pub duration: SparseCostMatrix,
}

impl Dataset {
    /// Venue route matrix backing `measure`, if it has one.
    pub fn route(&self, measure: CostMeasure) -> Option<&SparseCostMatrix> {
        match measure {
            CostMeasure::DrivingDistance => Some(&self.distance),
            CostMeasure::DrivingDuration => Some(&self.duration),
            CostMeasure::TripDuration => None,
        }
    }
}

pub fn load_dataset(input_dir: impl AsRef<Path>) -> Result<Dataset> {
    let dir = input_dir.as_ref();
    Ok(Dataset {
        teams: load_teams(dir.join(TEAMS_FILE))?,
        events: load_events(dir.join(EVENTS_FILE))?,
        distance: load_sparse_matrix(dir.join(DISTANCE_MATRIX_FILE))?,
        duration: load_sparse_matrix(dir.join(DURATION_MATRIX_FILE))?,
    })
}

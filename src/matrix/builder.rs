//! Event cost matrices for each supported measure.

use std::fmt;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};
use crate::matrix::{CostMatrix, SparseCostMatrix};
use crate::model::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMeasure {
    /// Meters, from a venue route matrix.
    DrivingDistance,
    /// Seconds, from a venue route matrix.
    DrivingDuration,
    /// Calendar days between the two events.
    TripDuration,
}

impl CostMeasure {
    pub const ALL: [CostMeasure; 3] = [
        CostMeasure::TripDuration,
        CostMeasure::DrivingDistance,
        CostMeasure::DrivingDuration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DrivingDistance => "driving_distance",
            Self::DrivingDuration => "driving_duration",
            Self::TripDuration => "trip_duration",
        }
    }

    pub fn needs_route_matrix(&self) -> bool {
        matches!(self, Self::DrivingDistance | Self::DrivingDuration)
    }
}

impl fmt::Display for CostMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Days between local calendar dates; only defined from an earlier event to a later one.
/// A trip of two events on the same day costs 0.
pub fn trip_duration_matrix(events: &[Event], offset: FixedOffset) -> CostMatrix {
    let dates: Vec<_> = events
        .iter()
        .map(|event| event.time.with_timezone(&offset).date_naive())
        .collect();
    CostMatrix::from_fn(events.len(), |from, to| {
        if events[from].time >= events[to].time {
            return None;
        }
        u64::try_from((dates[to] - dates[from]).num_days()).ok()
    })
}

/// Event-indexed costs looked up from a venue-indexed route matrix.
/// Events at the same venue cost 0; pairs the route matrix lacks are infinite.
pub fn driving_matrix(events: &[Event], route: &SparseCostMatrix) -> CostMatrix {
    CostMatrix::from_fn(events.len(), |from, to| {
        let (origin, destination) = (&events[from].venue_id, &events[to].venue_id);
        if origin == destination {
            return Some(0);
        }
        route.get(origin).and_then(|row| row.get(destination)).copied()
    })
}

/// Cost matrix over `events` for `measure`. Driving measures read `route`,
/// which is venue-indexed and must be present for them.
pub fn build_cost_matrix(
    events: &[Event],
    measure: CostMeasure,
    route: Option<&SparseCostMatrix>,
    offset: FixedOffset,
) -> Result<CostMatrix> {
    if measure.needs_route_matrix() {
        let route = route.ok_or(SolverError::MissingRouteMatrix)?;
        return Ok(driving_matrix(events, route));
    }
    Ok(trip_duration_matrix(events, offset))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn event(id: &str, time: &str, venue: &str) -> Event {
        Event {
            id: id.to_string(),
            time: time.parse().expect("valid time"),
            venue_id: venue.to_string(),
            home_team_id: "h".to_string(),
            away_team_id: "a".to_string(),
        }
    }

    fn eastern() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).expect("valid offset")
    }

    #[test]
    fn trip_duration_uses_local_dates() {
        // 02:00 UTC on the 2nd is still the 1st at UTC-5.
        let events = vec![
            event("a", "2025-11-02T02:00:00Z", "v1"),
            event("b", "2025-11-02T23:00:00Z", "v2"),
            event("c", "2025-11-04T23:00:00Z", "v3"),
        ];
        let matrix = trip_duration_matrix(&events, eastern());
        assert_eq!(matrix.get(0, 1), Some(1));
        assert_eq!(matrix.get(0, 2), Some(3));
        assert_eq!(matrix.get(1, 2), Some(2));
        assert_eq!(matrix.get(2, 0), None);
    }

    #[test]
    fn driving_matrix_reads_route_by_venue() {
        let events = vec![
            event("a", "2025-01-01T00:00:00Z", "v1"),
            event("b", "2025-01-02T00:00:00Z", "v2"),
            event("c", "2025-01-03T00:00:00Z", "v1"),
        ];
        let route: SparseCostMatrix =
            HashMap::from([("v1".to_string(), HashMap::from([("v2".to_string(), 500)]))]);
        let matrix = driving_matrix(&events, &route);
        assert_eq!(matrix.get(0, 1), Some(500));
        assert_eq!(matrix.get(1, 0), None);
        assert_eq!(matrix.get(0, 2), Some(0));
    }

    #[test]
    fn driving_measures_require_route_matrix() {
        let err = build_cost_matrix(&[], CostMeasure::DrivingDistance, None, eastern())
            .expect_err("missing route matrix");
        assert!(matches!(err, SolverError::MissingRouteMatrix));
        assert!(build_cost_matrix(&[], CostMeasure::TripDuration, None, eastern()).is_ok());
    }
}

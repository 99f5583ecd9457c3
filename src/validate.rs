//! Consistency checks for a planning dataset before any solving happens.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::matrix::CostMeasure;
use crate::planner::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Planning cannot run on this dataset.
    Error,
    /// Planning runs but some trips may be missed.
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
        })
    }
}

/// The record a finding points at. Indices are positions in the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Team { index: usize, id: String },
    Event { index: usize, id: String },
    Routes(CostMeasure),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team { index, id } => write!(f, "team #{index} '{id}'"),
            Self::Event { index, id } => write!(f, "event #{index} '{id}'"),
            Self::Routes(measure) => write!(f, "{measure} routes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Problem {
    EmptyId,
    /// Same id as the record at this earlier index.
    DuplicateId(usize),
    PlaysItself,
    UnknownTeam(String),
    NoRoutesFrom(String),
    /// Venue pairs, among venues that host events, with no route.
    MissingPairs(usize),
    NoEvents,
}

impl Problem {
    pub fn severity(&self) -> Severity {
        match self {
            Self::EmptyId | Self::DuplicateId(_) | Self::PlaysItself | Self::UnknownTeam(_) => {
                Severity::Error
            }
            Self::NoRoutesFrom(_) | Self::MissingPairs(_) => Severity::Warning,
            Self::NoEvents => Severity::Note,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => f.write_str("id is empty"),
            Self::DuplicateId(first) => write!(f, "id already used by #{first}"),
            Self::PlaysItself => f.write_str("home and away team are the same"),
            Self::UnknownTeam(team) => write!(f, "team '{team}' is not in teams.json"),
            Self::NoRoutesFrom(venue) => write!(f, "no routes leave venue '{venue}'"),
            Self::MissingPairs(count) => {
                write!(f, "{count} venue pair(s) have no route and are unreachable")
            }
            Self::NoEvents => f.write_str("plays no events"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub subject: Subject,
    pub problem: Problem,
}

impl Finding {
    pub fn severity(&self) -> Severity {
        self.problem.severity()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.subject, self.problem)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DatasetReport {
    pub findings: Vec<Finding>,
}

impl DatasetReport {
    fn flag(&mut self, subject: Subject, problem: Problem) {
        self.findings.push(Finding { subject, problem });
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity() == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// No finding blocks planning.
    pub fn is_usable(&self) -> bool {
        self.error_count() == 0
    }
}

pub fn validate_dataset(dataset: &Dataset) -> DatasetReport {
    let mut report = DatasetReport::default();

    let mut team_ids: HashMap<&str, usize> = HashMap::new();
    for (index, team) in dataset.teams.teams.iter().enumerate() {
        let subject = || Subject::Team {
            index,
            id: team.id.clone(),
        };
        if team.id.trim().is_empty() {
            report.flag(subject(), Problem::EmptyId);
        } else if let Some(&first) = team_ids.get(team.id.as_str()) {
            report.flag(subject(), Problem::DuplicateId(first));
        } else {
            team_ids.insert(&team.id, index);
        }
    }

    let mut event_ids: HashMap<&str, usize> = HashMap::new();
    let mut venues = BTreeSet::new();
    let mut playing = HashSet::new();
    for (index, event) in dataset.events.events.iter().enumerate() {
        let subject = || Subject::Event {
            index,
            id: event.id.clone(),
        };
        match event_ids.get(event.id.as_str()) {
            Some(&first) => report.flag(subject(), Problem::DuplicateId(first)),
            None => {
                event_ids.insert(&event.id, index);
            }
        }
        if event.home_team_id == event.away_team_id {
            report.flag(subject(), Problem::PlaysItself);
        }
        for team_id in [&event.home_team_id, &event.away_team_id] {
            if !team_ids.contains_key(team_id.as_str()) {
                report.flag(subject(), Problem::UnknownTeam(team_id.clone()));
            }
            playing.insert(team_id.as_str());
        }
        venues.insert(event.venue_id.as_str());
    }

    for (measure, matrix) in [
        (CostMeasure::DrivingDistance, &dataset.distance),
        (CostMeasure::DrivingDuration, &dataset.duration),
    ] {
        let mut missing = 0usize;
        for origin in &venues {
            let Some(row) = matrix.get(*origin) else {
                report.flag(Subject::Routes(measure), Problem::NoRoutesFrom(origin.to_string()));
                continue;
            };
            missing += venues
                .iter()
                .filter(|destination| *destination != origin && !row.contains_key(**destination))
                .count();
        }
        if missing > 0 {
            report.flag(Subject::Routes(measure), Problem::MissingPairs(missing));
        }
    }

    for (index, team) in dataset.teams.teams.iter().enumerate() {
        if !playing.contains(team.id.as_str()) {
            report.flag(
                Subject::Team {
                    index,
                    id: team.id.clone(),
                },
                Problem::NoEvents,
            );
        }
    }

    report
}

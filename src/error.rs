use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("io error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid yaml config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("required input '{}' not found", .0.display())]
    MissingInput(PathBuf),

    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error("unknown team '{0}'")]
    UnknownTeam(String),

    #[error("route matrix has no entry for venue '{0}'")]
    UnknownVenue(String),

    #[error("driving cost measures need a route matrix")]
    MissingRouteMatrix,

    #[error("matrix is {rows}x{cols}, expected {expected}x{expected}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
    },

    #[error("{count} events exceed the exact solver limit of {limit}")]
    TooManyEvents { count: usize, limit: usize },

    #[error("{count} coverage groups exceed the limit of {limit}")]
    TooManyGroups { count: usize, limit: usize },

    #[error("finite edges form a cycle through event index {0}")]
    CyclicSchedule(usize),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("dataset failed validation with {0} error(s)")]
    InvalidDataset(usize),

    #[error("no accepted subset can be visited by a finite walk")]
    Infeasible,
}

impl SolverError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;

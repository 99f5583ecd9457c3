pub mod event;
pub mod team;

pub use event::{load_events, Event, Events};
pub use team::{load_teams, load_venues, LatLng, Team, Teams, Venue, Venues};

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Result, SolverError};

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(SolverError::MissingInput(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path)
        .map_err(|err| SolverError::io(format!("unable to read '{}'", path.display()), err))?;
    Ok(serde_json::from_str(&raw)?)
}

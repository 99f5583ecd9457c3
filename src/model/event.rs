use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::read_json;

/// A scheduled game. Extra fields in the source JSON are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub time: DateTime<Utc>,
    pub venue_id: String,
    pub home_team_id: String,
    pub away_team_id: String,
}

impl Event {
    pub fn involves(&self, team_id: &str) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// The other team in this event, if `team_id` plays in it.
    pub fn opponent_of(&self, team_id: &str) -> Option<&str> {
        if self.home_team_id == team_id {
            Some(&self.away_team_id)
        } else if self.away_team_id == team_id {
            Some(&self.home_team_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Events {
    pub events: Vec<Event>,
}

impl Events {
    /// Events sorted by start time, ties broken by id.
    pub fn chronological(&self) -> Vec<Event> {
        let mut sorted = self.events.clone();
        sorted.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.id.cmp(&b.id)));
        sorted
    }
}

pub fn load_events(path: impl AsRef<Path>) -> Result<Events> {
    read_json(path.as_ref())
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::read_json;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
}

impl Team {
    /// Lowercase name with spaces replaced by underscores, used for output directories.
    pub fn slug(&self) -> String {
        self.name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Teams {
    pub teams: Vec<Team>,
}

impl Teams {
    pub fn find(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|team| team.id == team_id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|team| team.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub place_id: String,
    #[serde(default)]
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Venues {
    pub venues: Vec<Venue>,
}

pub fn load_teams(path: impl AsRef<Path>) -> Result<Teams> {
    read_json(path.as_ref())
}

pub fn load_venues(path: impl AsRef<Path>) -> Result<Venues> {
    read_json(path.as_ref())
}

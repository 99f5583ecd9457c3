use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::Event;

/// Event id to the team ids that event counts for.
pub type MatchupMatrix = HashMap<String, BTreeSet<String>>;

/// Which of the focus team's games a trip may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    #[default]
    Away,
    Any,
}

impl Side {
    pub fn admits(&self, event: &Event, focus_team: &str) -> bool {
        match self {
            Self::Home => event.home_team_id == focus_team,
            Self::Away => event.away_team_id == focus_team,
            Self::Any => event.involves(focus_team),
        }
    }
}

/// Both teams of every event.
pub fn matchup_matrix(events: &[Event]) -> MatchupMatrix {
    events
        .iter()
        .map(|event| {
            (
                event.id.clone(),
                BTreeSet::from([event.home_team_id.clone(), event.away_team_id.clone()]),
            )
        })
        .collect()
}

/// Only the focus team's games on `side`, each marked with the opponent alone.
pub fn one_sided_matchup_matrix(events: &[Event], focus_team: &str, side: Side) -> MatchupMatrix {
    events
        .iter()
        .filter(|event| side.admits(event, focus_team))
        .filter_map(|event| {
            event
                .opponent_of(focus_team)
                .map(|opponent| (event.id.clone(), BTreeSet::from([opponent.to_string()])))
        })
        .collect()
}

/// The focus team's games on `side`, in the input order.
pub fn focus_events(events: &[Event], focus_team: &str, side: Side) -> Vec<Event> {
    events
        .iter()
        .filter(|event| side.admits(event, focus_team))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: &str, home: &str, away: &str) -> Event {
        Event {
            id: id.to_string(),
            time: "2025-01-01T00:00:00Z".parse().expect("time"),
            venue_id: format!("{home}-arena"),
            home_team_id: home.to_string(),
            away_team_id: away.to_string(),
        }
    }

    #[test]
    fn one_sided_matrix_marks_opponents_only() {
        let events = vec![game("g1", "bos", "nyr"), game("g2", "nyr", "mtl"), game("g3", "tor", "mtl")];
        let away = one_sided_matchup_matrix(&events, "nyr", Side::Away);
        assert_eq!(away.len(), 1);
        assert_eq!(away["g1"], BTreeSet::from(["bos".to_string()]));

        let any = one_sided_matchup_matrix(&events, "nyr", Side::Any);
        assert_eq!(any.len(), 2);
        assert_eq!(any["g2"], BTreeSet::from(["mtl".to_string()]));

        let full = matchup_matrix(&events);
        assert_eq!(full["g3"].len(), 2);
    }

    #[test]
    fn focus_events_respects_side() {
        let events = vec![game("g1", "bos", "nyr"), game("g2", "nyr", "mtl")];
        assert_eq!(focus_events(&events, "nyr", Side::Home)[0].id, "g2");
        assert_eq!(focus_events(&events, "nyr", Side::Away)[0].id, "g1");
        assert!(focus_events(&events, "sea", Side::Any).is_empty());
    }
}

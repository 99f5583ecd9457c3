//! Decision functions over event subsets, matchup bookkeeping and schedule feasibility.

pub mod matchup;
pub mod schedule;

pub use matchup::{focus_events, matchup_matrix, one_sided_matchup_matrix, MatchupMatrix, Side};
pub use schedule::{available_driving_minutes, restrict_to_schedule, ScheduleRules};

use crate::error::{Result, SolverError};

/// Upper bound on coverage groups; covered groups are tracked in a `u64`.
pub const MAX_GROUPS: usize = 64;

/// Predicate selecting which subsets of events are acceptable.
///
/// `subset` holds event indices in ascending order.
pub trait DecisionFunction: Sync {
    fn accepts(&self, subset: &[usize]) -> bool;

    /// Set when the predicate is a group-coverage requirement, which lets the
    /// solver use label search instead of subset enumeration.
    fn coverage(&self) -> Option<&Coverage> {
        None
    }
}

impl<F> DecisionFunction for F
where
    F: Fn(&[usize]) -> bool + Sync,
{
    fn accepts(&self, subset: &[usize]) -> bool {
        self(subset)
    }
}

/// Every required group must be represented by at least one selected event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    groups: Vec<String>,
    masks: Vec<u64>,
}

impl Coverage {
    /// `memberships[i]` lists the groups event `i` covers. Groups outside
    /// `groups` are ignored.
    pub fn new<S: AsRef<str>>(groups: Vec<String>, memberships: &[Vec<S>]) -> Result<Self> {
        if groups.len() > MAX_GROUPS {
            return Err(SolverError::TooManyGroups {
                count: groups.len(),
                limit: MAX_GROUPS,
            });
        }
        let masks = memberships
            .iter()
            .map(|members| {
                members.iter().fold(0u64, |mask, member| {
                    match groups.iter().position(|g| g == member.as_ref()) {
                        Some(bit) => mask | (1u64 << bit),
                        None => mask,
                    }
                })
            })
            .collect();
        Ok(Self { groups, masks })
    }

    /// Coverage over `event_ids` (in matrix order) using the teams recorded in `matchups`.
    pub fn from_matchups<S: AsRef<str>>(
        matchups: &MatchupMatrix,
        event_ids: &[S],
        required: Vec<String>,
    ) -> Result<Self> {
        let memberships: Vec<Vec<&str>> = event_ids
            .iter()
            .map(|id| {
                matchups
                    .get(id.as_ref())
                    .map(|teams| teams.iter().map(String::as_str).collect())
                    .unwrap_or_default()
            })
            .collect();
        Self::new(required, &memberships)
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn event_count(&self) -> usize {
        self.masks.len()
    }

    pub fn full_mask(&self) -> u64 {
        match self.groups.len() {
            MAX_GROUPS => u64::MAX,
            n => (1u64 << n) - 1,
        }
    }

    pub fn mask_of(&self, event: usize) -> u64 {
        self.masks.get(event).copied().unwrap_or(0)
    }

    pub fn covered(&self, subset: &[usize]) -> u64 {
        subset.iter().fold(0, |mask, &event| mask | self.mask_of(event))
    }

    pub fn missing_groups(&self, subset: &[usize]) -> Vec<&str> {
        let covered = self.covered(subset);
        self.groups
            .iter()
            .enumerate()
            .filter(|(bit, _)| covered & (1u64 << bit) == 0)
            .map(|(_, group)| group.as_str())
            .collect()
    }
}

impl DecisionFunction for Coverage {
    fn accepts(&self, subset: &[usize]) -> bool {
        self.covered(subset) == self.full_mask()
    }

    fn coverage(&self) -> Option<&Coverage> {
        Some(self)
    }
}

/// The listed events must all be selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MustInclude(pub Vec<usize>);

impl DecisionFunction for MustInclude {
    fn accepts(&self, subset: &[usize]) -> bool {
        self.0.iter().all(|event| subset.binary_search(event).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage() -> Coverage {
        Coverage::new(
            vec!["red".to_string(), "blue".to_string()],
            &[vec!["red"], vec!["blue", "green"], vec![]],
        )
        .expect("two groups")
    }

    #[test]
    fn coverage_accepts_only_full_cover() {
        let cov = coverage();
        assert!(!cov.accepts(&[0]));
        assert!(cov.accepts(&[0, 1]));
        assert!(cov.accepts(&[0, 1, 2]));
        assert_eq!(cov.missing_groups(&[2]), vec!["red", "blue"]);
        assert!(cov.coverage().is_some());
    }

    #[test]
    fn coverage_without_groups_accepts_empty_subset() {
        let cov = Coverage::new(Vec::new(), &[Vec::<String>::new()]).expect("no groups");
        assert_eq!(cov.full_mask(), 0);
        assert!(cov.accepts(&[]));
    }

    #[test]
    fn coverage_rejects_more_than_sixty_four_groups() {
        let groups = (0..65).map(|i| i.to_string()).collect();
        let err = Coverage::new(groups, &[Vec::<String>::new()]).expect_err("too many");
        assert!(matches!(err, SolverError::TooManyGroups { count: 65, .. }));
    }

    #[test]
    fn closures_and_must_include_are_decision_functions() {
        let at_least_two = |subset: &[usize]| subset.len() >= 2;
        assert!(at_least_two.accepts(&[1, 3]));
        assert!(at_least_two.coverage().is_none());
        assert!(MustInclude(vec![1, 3]).accepts(&[0, 1, 3]));
        assert!(!MustInclude(vec![1, 3]).accepts(&[0, 1]));
    }
}

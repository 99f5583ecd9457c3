//! Whether a driver can get from one event to the next under a daily driving allowance.

use chrono::{FixedOffset, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};
use crate::matrix::CostMatrix;
use crate::model::Event;

const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleRules {
    /// Assumed length of every event.
    pub event_length_minutes: i64,
    /// Slack after an event ends before driving, and before the next one starts.
    pub buffer_minutes: i64,
    /// Offset used to decide where calendar days begin. Defaults to US Eastern standard time.
    pub utc_offset_minutes: i32,
}

impl Default for ScheduleRules {
    fn default() -> Self {
        Self {
            event_length_minutes: 180,
            buffer_minutes: 60,
            utc_offset_minutes: -300,
        }
    }
}

impl ScheduleRules {
    /// Event length and buffer must each fit in a day; the offset must be under a day either way.
    pub fn validate(&self) -> Result<()> {
        for (name, minutes) in [
            ("event_length_minutes", self.event_length_minutes),
            ("buffer_minutes", self.buffer_minutes),
        ] {
            if !(0..=MINUTES_PER_DAY).contains(&minutes) {
                return Err(SolverError::InvalidConfig(format!(
                    "schedule.{name} must be within 0..={MINUTES_PER_DAY}, got {minutes}"
                )));
            }
        }
        self.offset().map(|_| ())
    }

    pub fn offset(&self) -> Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                SolverError::InvalidConfig(format!(
                    "schedule.utc_offset_minutes {} is not a valid UTC offset",
                    self.utc_offset_minutes
                ))
            })
    }
}

/// Minutes of driving available between the end of `from` and the start of `to`.
///
/// Driving may begin `event_length + buffer` after `from` starts and must end
/// `buffer` before `to` starts. Each local calendar day contributes at most
/// `hours_per_day` hours. Returns `None` unless `from` starts strictly before `to`,
/// and also when `rules` fail [ScheduleRules::validate].
pub fn available_driving_minutes(
    from: &Event,
    to: &Event,
    rules: &ScheduleRules,
    hours_per_day: u32,
) -> Option<i64> {
    if from.time >= to.time {
        return None;
    }
    let offset = rules.offset().ok()?;
    let cap = i64::from(hours_per_day) * 60;
    let after = rules.event_length_minutes.checked_add(rules.buffer_minutes)?;
    let depart = from
        .time
        .with_timezone(&offset)
        .checked_add_signed(TimeDelta::try_minutes(after)?)?;
    let arrive = to
        .time
        .with_timezone(&offset)
        .checked_sub_signed(TimeDelta::try_minutes(rules.buffer_minutes)?)?;
    if arrive <= depart {
        return Some(0);
    }

    let (depart_day, arrive_day) = (depart.date_naive(), arrive.date_naive());
    if depart_day == arrive_day {
        return Some((arrive - depart).num_minutes().min(cap));
    }

    let first_day = (MINUTES_PER_DAY - i64::from(depart.num_seconds_from_midnight()) / 60).min(cap);
    let last_day = (i64::from(arrive.num_seconds_from_midnight()) / 60).min(cap);
    let full_days = ((arrive_day - depart_day).num_days() - 1).max(0);
    Some(full_days * cap + first_day + last_day)
}

/// Copy of `cost` keeping only the pairs whose drive fits the schedule.
///
/// `driving_seconds` is event-indexed like `cost`; durations round up to whole minutes.
pub fn restrict_to_schedule(
    cost: &CostMatrix,
    events: &[Event],
    driving_seconds: &CostMatrix,
    rules: &ScheduleRules,
    hours_per_day: u32,
) -> Result<CostMatrix> {
    for len in [events.len(), driving_seconds.len()] {
        if len != cost.len() {
            return Err(SolverError::DimensionMismatch {
                rows: len,
                cols: len,
                expected: cost.len(),
            });
        }
    }
    rules.validate()?;
    Ok(cost.restrict(|from, to| {
        let Some(seconds) = driving_seconds.get(from, to) else {
            return false;
        };
        let Some(available) = available_driving_minutes(&events[from], &events[to], rules, hours_per_day)
        else {
            return false;
        };
        let needed = i64::try_from(seconds.div_ceil(60)).unwrap_or(i64::MAX);
        available >= needed
    }))
}

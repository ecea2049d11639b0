use crate::error::RenameError;
use crate::naming::TIMESTAMP_FORMAT;
use chrono::{NaiveDateTime, TimeDelta};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Direction {
    Add,
    Subtract,
    #[default]
    None,
}

/// Raw adjustment flags as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjustmentFlags {
    pub add: bool,
    pub subtract: bool,
    pub days: Option<i64>,
    pub hours: Option<i64>,
    pub minutes: Option<i64>,
    pub seconds: Option<i64>,
}

impl AdjustmentFlags {
    fn has_magnitude(&self) -> bool {
        [self.days, self.hours, self.minutes, self.seconds]
            .iter()
            .any(Option::is_some)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAdjustment {
    direction: Direction,
    delta: TimeDelta,
}

impl Default for TimeAdjustment {
    fn default() -> Self {
        Self::none()
    }
}

impl TimeAdjustment {
    pub fn none() -> Self {
        Self {
            direction: Direction::None,
            delta: TimeDelta::zero(),
        }
    }

    pub fn new(direction: Direction, delta: TimeDelta) -> Self {
        Self { direction, delta }
    }

    pub fn from_flags(flags: &AdjustmentFlags) -> Result<Self, RenameError> {
        let direction = match (flags.add, flags.subtract) {
            (true, true) => {
                return Err(RenameError::Config(
                    "add と subtract は同時に指定できません".to_string(),
                ))
            }
            (true, false) => Direction::Add,
            (false, true) => Direction::Subtract,
            (false, false) => {
                if flags.has_magnitude() {
                    warn!("add / subtract が指定されていないため日時の補正は行いません");
                }
                return Ok(Self::none());
            }
        };

        let delta = compose_delta(flags.days, flags.hours, flags.minutes, flags.seconds)?;
        Ok(Self::new(direction, delta))
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn delta(&self) -> TimeDelta {
        self.delta
    }

    pub fn is_noop(&self) -> bool {
        self.direction == Direction::None || self.delta.is_zero()
    }

    pub fn apply(&self, timestamp: NaiveDateTime) -> Result<NaiveDateTime, RenameError> {
        adjust(timestamp, self.delta, self.direction)
    }
}

type DeltaCtor = fn(i64) -> Option<TimeDelta>;

/// Sums the optional components; missing ones count as zero.
pub fn compose_delta(
    days: Option<i64>,
    hours: Option<i64>,
    minutes: Option<i64>,
    seconds: Option<i64>,
) -> Result<TimeDelta, RenameError> {
    let parts: [(&str, Option<i64>, DeltaCtor); 4] = [
        ("day", days, TimeDelta::try_days),
        ("hour", hours, TimeDelta::try_hours),
        ("minute", minutes, TimeDelta::try_minutes),
        ("second", seconds, TimeDelta::try_seconds),
    ];

    parts
        .into_iter()
        .try_fold(TimeDelta::zero(), |total, (label, value, to_delta)| {
            let Some(value) = value else {
                return Ok(total);
            };
            to_delta(value)
                .and_then(|part| total.checked_add(&part))
                .ok_or_else(|| RenameError::Config(format!("{label} の値が大きすぎます: {value}")))
        })
}

pub fn adjust(
    timestamp: NaiveDateTime,
    delta: TimeDelta,
    direction: Direction,
) -> Result<NaiveDateTime, RenameError> {
    let adjusted = match direction {
        Direction::None => return Ok(timestamp),
        Direction::Add => timestamp.checked_add_signed(delta),
        Direction::Subtract => timestamp.checked_sub_signed(delta),
    }
    .ok_or_else(|| RenameError::DateOutOfRange(format!("{timestamp} {direction:?} {delta}")))?;

    debug!("補正前: {}", timestamp.format(TIMESTAMP_FORMAT));
    debug!("補正後: {}", adjusted.format(TIMESTAMP_FORMAT));
    Ok(adjusted)
}

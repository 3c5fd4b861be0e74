//! Time specifications understood by [`TokioScheduler`](crate::TokioScheduler).
//!
//! Accepted forms:
//!
//! | Form | Example | Meaning |
//! |------|---------|---------|
//! | relative | `+30s`, `+5m`, `+1h`, `+10`, `45` | after that many seconds/minutes/hours |
//! | time of day | `08:00`, `22:15:30` | next occurrence, UTC |
//! | timestamp | `2026-10-19T08:00:00Z` | at that instant; past instants fire immediately |

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};

use crate::error::SchedulerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSpec {
    After(Duration),
    Daily(NaiveTime),
    At(DateTime<Utc>),
}

impl TimeSpec {
    /// How long to wait, counted from `now`.
    #[must_use]
    pub fn delay_from(&self, now: DateTime<Utc>) -> Duration {
        match self {
            Self::After(delay) => *delay,
            Self::Daily(time) => {
                let today = now.date_naive().and_time(*time).and_utc();
                let next = if today > now {
                    today
                } else {
                    today + TimeDelta::days(1)
                };
                to_std(next - now)
            }
            Self::At(instant) => to_std(*instant - now),
        }
    }
}

fn to_std(delta: TimeDelta) -> Duration {
    delta.to_std().unwrap_or(Duration::ZERO)
}

fn parse_relative(spec: &str) -> Option<Duration> {
    let (digits, multiplier) = match spec.char_indices().last()? {
        (i, 's') => (&spec[..i], 1),
        (i, 'm') => (&spec[..i], 60),
        (i, 'h') => (&spec[..i], 3600),
        _ => (spec, 1),
    };
    let amount: u64 = digits.trim().parse().ok()?;
    Some(Duration::from_secs(amount.checked_mul(multiplier)?))
}

impl FromStr for TimeSpec {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        let invalid = || SchedulerError::InvalidTime(s.to_string());

        if let Some(relative) = spec.strip_prefix('+') {
            return parse_relative(relative).map(Self::After).ok_or_else(invalid);
        }
        if !spec.is_empty() && spec.bytes().all(|b| b.is_ascii_digit()) {
            return parse_relative(spec).map(Self::After).ok_or_else(invalid);
        }
        if let Ok(time) = NaiveTime::parse_from_str(spec, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(spec, "%H:%M"))
        {
            return Ok(Self::Daily(time));
        }
        if let Ok(instant) = DateTime::parse_from_rfc3339(spec) {
            return Ok(Self::At(instant.with_timezone(&Utc)));
        }
        Err(invalid())
    }
}

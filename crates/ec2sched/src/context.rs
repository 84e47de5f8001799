//! Evaluation context
//!
//! All time-based decisions in one pass read from a single
//! [`EvaluationContext`], built once from the resolved timezone and
//! one wall-clock reading, then threaded as a parameter. No decision
//! consults the clock or the environment mid-pass.

use crate::config::Config;
use crate::error::Result;
use chrono::{DateTime, Datelike, Duration, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

/// Half-width of the schedule match window, in minutes
pub const WINDOW_MINUTES: i64 = 5;

/// Frozen view of "now" for one evaluation pass
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    /// Local wall-clock time, timezone already applied
    pub now: NaiveDateTime,

    /// ISO weekday, Monday = 1 through Sunday = 7
    pub weekday: u32,

    /// Lower window edge, `now - 5m` formatted "HH:MM"
    pub window_low: String,

    /// Upper window edge, `now + 5m` formatted "HH:MM"
    pub window_high: String,
}

impl EvaluationContext {
    /// Freeze a context from a timezone-aware instant
    pub fn new<Tz: TimeZone>(now: DateTime<Tz>) -> Self {
        let local = now.naive_local();
        Self {
            weekday: local.weekday().number_from_monday(),
            window_low: (local - Duration::minutes(WINDOW_MINUTES))
                .format("%H:%M")
                .to_string(),
            window_high: (local + Duration::minutes(WINDOW_MINUTES))
                .format("%H:%M")
                .to_string(),
            now: local,
        }
    }

    /// Build a context for the current instant in the configured timezone
    pub fn current(config: &Config) -> Result<Self> {
        let tz = config.resolve_timezone()?;
        debug!("Effective timezone: {}", tz);
        Ok(Self::new(Utc::now().with_timezone(&tz)))
    }

    /// Whether today is Saturday or Sunday
    pub fn is_weekend(&self) -> bool {
        self.weekday >= 6
    }

    /// Whether a "HH:MM" candidate falls inside the match window.
    ///
    /// Edges are plain "HH:MM" strings compared lexicographically
    /// (equivalent to numeric order at this fixed width). Within five
    /// minutes of midnight the low edge formats as the previous day's
    /// "23:5x" and the range inverts, so nothing matches there. Known
    /// limitation, kept for parity with schedules already deployed
    /// against this behavior.
    pub fn in_window(&self, candidate: &str) -> bool {
        self.window_low.as_str() <= candidate && candidate <= self.window_high.as_str()
    }
}

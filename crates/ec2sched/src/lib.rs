//! # ec2sched
//!
//! Tag-driven start/stop scheduling for EC2 fleets.
//!
//! ## Architecture
//!
//! ```text
//! Trigger (cron/EventBridge)
//!   └── one pass per policy:  Fetch ──► Decide ──► Act
//!                             EC2        pure       EC2
//!                           snapshot   selection  start/stop
//! ```
//!
//! Three always-on policies plus two weekday variants:
//! - `AutoStart=true` — start stopped instances, unconditionally
//! - `AutoStop=true` — stop running instances, unconditionally
//! - `StartWeekEnd=HH:MM` — start stopped instances within ±5 minutes
//!   of the tagged local time, Saturdays and Sundays only
//! - `StartWeekDay=HH:MM` / `StopWeekDay=HH:MM` — the Monday–Friday
//!   counterparts, skipping autoscaling-group members
//!
//! All decisions are pure functions over an immutable fleet snapshot
//! and a per-pass [`context::EvaluationContext`]; the EC2 client is
//! kept behind the [`fleet::Fleet`] and [`fleet::Transitions`] seams.
//! A pass has no retries and no cross-pass state — failures abort it,
//! and the next trigger starts fresh.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod error;
pub mod fleet;
pub mod instance;
pub mod policy;
pub mod weekday;
pub mod weekend;

#[cfg(test)]
pub(crate) mod testutil;

// Error handling
pub use error::{Result, SchedulerError};

// Configuration
pub use config::Config;

// Snapshot model
pub use instance::{Instance, InstanceState, create_ec2_client};

// Fleet access
pub use fleet::{Ec2Fleet, Fleet, Transitions};

// Evaluation context
pub use context::{EvaluationContext, WINDOW_MINUTES};

// Policies
pub use policy::{
    AUTO_START, AUTO_STOP, TRUE_TAG_VALUES, TagPolicy, Transition, run_tag_policy, select_by_tag,
    tag_value_authorizes,
};
pub use weekday::{
    WEEKDAY_START, WEEKDAY_START_TAG, WEEKDAY_STOP, WEEKDAY_STOP_TAG, WeekdayDecision,
    WeekdayPolicy, evaluate_weekday, run_weekday_policy,
};
pub use weekend::{WEEKEND_START_TAG, WeekendReport, run_weekend_start, select_weekend_starts};

//! Process configuration
//!
//! The environment is read exactly once, at startup, into an explicit
//! [`Config`]. Nothing in the scheduler reads or writes process-wide
//! state after that; in particular the resolved timezone is threaded
//! through as a value instead of mutating `TZ`.

use crate::error::{Result, SchedulerError};
use chrono_tz::Tz;

/// Required: the AWS region to operate in
pub const REGION_ENV: &str = "AWS_REGION";

/// Optional: region-specific timezone override (takes precedence)
pub const REGION_TZ_ENV: &str = "REGION_TZ";

/// Optional: generic timezone override
pub const TZ_ENV: &str = "TZ";

/// Scheduler configuration, populated once from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// AWS region identifier
    pub region: String,

    /// Region-specific timezone override (IANA name)
    pub region_tz: Option<String>,

    /// Generic timezone override (IANA name)
    pub tz: Option<String>,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// Fails fast when the required region variable is absent; the
    /// timezone overrides are optional.
    pub fn from_env() -> Result<Self> {
        let region = std::env::var(REGION_ENV)
            .map_err(|_| SchedulerError::config(format!("{REGION_ENV} must be set")))?;

        Ok(Self {
            region,
            region_tz: std::env::var(REGION_TZ_ENV).ok(),
            tz: std::env::var(TZ_ENV).ok(),
        })
    }

    /// Create a configuration with explicit values
    pub fn new(
        region: impl Into<String>,
        region_tz: Option<String>,
        tz: Option<String>,
    ) -> Self {
        Self {
            region: region.into(),
            region_tz,
            tz,
        }
    }

    /// Resolve the effective local timezone.
    ///
    /// Two-tier fallback: the region-specific override wins, then the
    /// generic override, then UTC when both are absent or empty. A
    /// non-empty value that the tz database does not know is an error
    /// rather than a silent fallback.
    pub fn resolve_timezone(&self) -> Result<Tz> {
        let name = self
            .region_tz
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.tz.as_deref().filter(|s| !s.is_empty()));

        match name {
            None => Ok(Tz::UTC),
            Some(name) => name
                .parse()
                .map_err(|_| SchedulerError::UnknownTimezone(name.to_string())),
        }
    }
}

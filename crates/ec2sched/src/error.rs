//! Error types for the scheduler

use thiserror::Error;

/// Scheduler result type
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors that can occur during a scheduling pass
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(#[from] aws_sdk_ec2::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timezone override names a zone the tz database does not know
    #[error("Unknown time zone {0}")]
    UnknownTimezone(String),
}

impl SchedulerError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Convert from EC2 SDK error
    pub fn from_ec2<E>(err: E) -> Self
    where
        aws_sdk_ec2::Error: From<E>,
    {
        Self::Aws(aws_sdk_ec2::Error::from(err))
    }
}

//! Fleet snapshot model
//!
//! An [`Instance`] is a point-in-time read of one EC2 instance: id,
//! lifecycle state, and tag set. Snapshots are immutable once taken;
//! every scheduling decision is a pure function over them.

use aws_config::BehaviorVersion;
use aws_sdk_ec2::Client;
use aws_sdk_ec2::types::InstanceStateName;
use aws_types::region::Region;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Create EC2 client for a region
pub async fn create_ec2_client(region: &str) -> Client {
    debug!("Creating EC2 client for region: {}", region);

    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await;

    Client::new(&config)
}

/// Instance lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceState {
    /// Instance is pending
    Pending,
    /// Instance is running
    Running,
    /// Instance is stopping
    Stopping,
    /// Instance is stopped
    Stopped,
    /// Instance is shutting down
    ShuttingDown,
    /// Instance is terminated
    Terminated,
}

impl InstanceState {
    /// Map from the SDK's state name
    pub fn from_aws(name: &InstanceStateName) -> Self {
        match name {
            InstanceStateName::Pending => Self::Pending,
            InstanceStateName::Running => Self::Running,
            InstanceStateName::Stopping => Self::Stopping,
            InstanceStateName::Stopped => Self::Stopped,
            InstanceStateName::ShuttingDown => Self::ShuttingDown,
            InstanceStateName::Terminated => Self::Terminated,
            _ => Self::Pending,
        }
    }

    /// EC2 wire name, as used in `instance-state-name` filters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One instance in a fleet snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Instance ID
    pub id: String,

    /// Current lifecycle state
    pub state: InstanceState,

    /// Tag set in EC2 enumeration order. Keys are unique; the order
    /// matters to the schedule scan, so this is not a map.
    pub tags: Vec<(String, String)>,
}

impl Instance {
    /// Parse an SDK instance into the snapshot model.
    ///
    /// Returns `None` for instances the API reports without an id or
    /// state (possible mid-launch).
    pub fn from_aws(instance: &aws_sdk_ec2::types::Instance) -> Option<Self> {
        let id = instance.instance_id()?.to_string();
        let state = instance
            .state()
            .and_then(|s| s.name())
            .map(InstanceState::from_aws)?;

        let tags = instance
            .tags()
            .iter()
            .filter_map(|t| Some((t.key()?.to_string(), t.value()?.to_string())))
            .collect();

        Some(Self { id, state, tags })
    }

    /// Look up a tag value by key
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

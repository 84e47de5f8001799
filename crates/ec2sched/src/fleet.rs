//! EC2 fleet access
//!
//! [`Fleet`] enumerates snapshots, [`Transitions`] issues start/stop
//! calls. [`Ec2Fleet`] implements both over the EC2 SDK; the traits
//! exist so the pass runners can be exercised against in-memory
//! fleets in tests.
//!
//! Describe calls are paginated — a fleet can exceed one API page.

use crate::error::{Result, SchedulerError};
use crate::instance::{Instance, InstanceState, create_ec2_client};
use crate::policy::TRUE_TAG_VALUES;
use aws_sdk_ec2::Client;
use aws_sdk_ec2::types::Filter;
use tracing::{debug, warn};

/// Fleet snapshot provider
#[allow(async_fn_in_trait)]
pub trait Fleet {
    /// Instances in `state` whose `tag_key` tag carries an authorizing
    /// value, in enumeration order.
    async fn list_matching(&self, tag_key: &str, state: InstanceState) -> Result<Vec<Instance>>;

    /// Instances carrying `tag_key` at all, any state, value ignored.
    async fn list_with_tag_key(&self, tag_key: &str) -> Result<Vec<Instance>>;

    /// The whole fleet, unfiltered.
    async fn list_all(&self) -> Result<Vec<Instance>>;
}

/// Transition executor
#[allow(async_fn_in_trait)]
pub trait Transitions {
    /// Start the given instances. Must not be called with an empty set.
    async fn start(&self, ids: &[String]) -> Result<()>;

    /// Stop the given instances. Must not be called with an empty set.
    async fn stop(&self, ids: &[String]) -> Result<()>;
}

/// EC2-backed fleet
pub struct Ec2Fleet {
    client: Client,
}

impl Ec2Fleet {
    /// Wrap an existing EC2 client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect to EC2 in the given region
    pub async fn connect(region: &str) -> Self {
        Self::new(create_ec2_client(region).await)
    }

    /// Run a filtered describe-instances, following pagination, and
    /// collect the fleet in API enumeration order.
    async fn describe(&self, filters: Vec<Filter>) -> Result<Vec<Instance>> {
        let mut req = self.client.describe_instances();
        for filter in filters {
            req = req.filters(filter);
        }

        let mut pages = req.into_paginator().send();
        let mut fleet = Vec::new();

        while let Some(page) = pages.next().await {
            let page = page.map_err(SchedulerError::from_ec2)?;
            for reservation in page.reservations() {
                for inst in reservation.instances() {
                    match Instance::from_aws(inst) {
                        Some(parsed) => fleet.push(parsed),
                        None => warn!("Skipping instance with incomplete description"),
                    }
                }
            }
        }

        debug!("Snapshot contains {} instances", fleet.len());
        Ok(fleet)
    }
}

impl Fleet for Ec2Fleet {
    async fn list_matching(&self, tag_key: &str, state: InstanceState) -> Result<Vec<Instance>> {
        let tag_filter = Filter::builder()
            .name(format!("tag:{tag_key}"))
            .set_values(Some(
                TRUE_TAG_VALUES.iter().map(|v| v.to_string()).collect(),
            ))
            .build();

        let state_filter = Filter::builder()
            .name("instance-state-name")
            .values(state.as_str())
            .build();

        self.describe(vec![tag_filter, state_filter]).await
    }

    async fn list_with_tag_key(&self, tag_key: &str) -> Result<Vec<Instance>> {
        let key_filter = Filter::builder().name("tag-key").values(tag_key).build();
        self.describe(vec![key_filter]).await
    }

    async fn list_all(&self) -> Result<Vec<Instance>> {
        self.describe(Vec::new()).await
    }
}

impl Transitions for Ec2Fleet {
    async fn start(&self, ids: &[String]) -> Result<()> {
        self.client
            .start_instances()
            .set_instance_ids(Some(ids.to_vec()))
            .send()
            .await
            .map_err(SchedulerError::from_ec2)?;
        Ok(())
    }

    async fn stop(&self, ids: &[String]) -> Result<()> {
        self.client
            .stop_instances()
            .set_instance_ids(Some(ids.to_vec()))
            .send()
            .await
            .map_err(SchedulerError::from_ec2)?;
        Ok(())
    }
}

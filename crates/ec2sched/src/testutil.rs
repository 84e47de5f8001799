//! In-memory Fleet/Transitions doubles for pass-runner tests

use crate::error::{Result, SchedulerError};
use crate::fleet::{Fleet, Transitions};
use crate::instance::{Instance, InstanceState};
use crate::policy::tag_value_authorizes;
use std::sync::Mutex;

/// Build a snapshot instance from literals
pub fn inst(id: &str, state: InstanceState, tags: &[(&str, &str)]) -> Instance {
    Instance {
        id: id.to_string(),
        state,
        tags: tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// Fixed in-memory fleet, applying the same predicates the EC2-side
/// filters apply
pub struct MockFleet {
    /// Snapshot returned by every listing, in order
    pub instances: Vec<Instance>,
}

impl Fleet for MockFleet {
    async fn list_matching(&self, tag_key: &str, state: InstanceState) -> Result<Vec<Instance>> {
        Ok(self
            .instances
            .iter()
            .filter(|i| i.state == state)
            .filter(|i| i.tag(tag_key).is_some_and(tag_value_authorizes))
            .cloned()
            .collect())
    }

    async fn list_with_tag_key(&self, tag_key: &str) -> Result<Vec<Instance>> {
        Ok(self
            .instances
            .iter()
            .filter(|i| i.tag(tag_key).is_some())
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Instance>> {
        Ok(self.instances.clone())
    }
}

/// Records every transition call; panics if handed an empty id set,
/// which the runners promise never to do
#[derive(Default)]
pub struct MockTransitions {
    started: Mutex<Vec<Vec<String>>>,
    stopped: Mutex<Vec<Vec<String>>>,
}

impl MockTransitions {
    /// Started id batches, in call order
    pub fn started_calls(&self) -> Vec<Vec<String>> {
        self.started.lock().unwrap().clone()
    }

    /// Stopped id batches, in call order
    pub fn stopped_calls(&self) -> Vec<Vec<String>> {
        self.stopped.lock().unwrap().clone()
    }
}

impl Transitions for MockTransitions {
    async fn start(&self, ids: &[String]) -> Result<()> {
        assert!(!ids.is_empty(), "start called with empty id set");
        self.started.lock().unwrap().push(ids.to_vec());
        Ok(())
    }

    async fn stop(&self, ids: &[String]) -> Result<()> {
        assert!(!ids.is_empty(), "stop called with empty id set");
        self.stopped.lock().unwrap().push(ids.to_vec());
        Ok(())
    }
}

/// Fleet whose every describe call fails
pub struct FailingFleet;

impl Fleet for FailingFleet {
    async fn list_matching(&self, _: &str, _: InstanceState) -> Result<Vec<Instance>> {
        Err(SchedulerError::config("describe failed"))
    }

    async fn list_with_tag_key(&self, _: &str) -> Result<Vec<Instance>> {
        Err(SchedulerError::config("describe failed"))
    }

    async fn list_all(&self) -> Result<Vec<Instance>> {
        Err(SchedulerError::config("describe failed"))
    }
}

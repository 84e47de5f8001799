//! Unconditional tag policies
//!
//! AutoStart and AutoStop are stateless filters over a fleet
//! snapshot: an instance is selected iff it sits in the policy's
//! required state and carries the policy's tag with an authorizing
//! value. Selection is computed in full before any transition is
//! issued, and the whole selection goes out as one batched call.

use crate::error::Result;
use crate::fleet::{Fleet, Transitions};
use crate::instance::{Instance, InstanceState};
use tracing::info;

/// Tag values that authorize an action, as accepted by the EC2-side
/// tag filter. Client-side the comparison is case-insensitive
/// equality with "true" — the same set.
pub const TRUE_TAG_VALUES: [&str; 3] = ["TRUE", "True", "true"];

/// Whether a tag value authorizes the action.
///
/// Case-insensitive equality with "true", nothing else: no trimming,
/// and no other truthy spellings ("1", "yes") are accepted.
pub fn tag_value_authorizes(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Direction of a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Start a stopped instance
    Start,
    /// Stop a running instance
    Stop,
}

impl Transition {
    /// Present-progressive label for logs
    pub fn gerund(&self) -> &'static str {
        match self {
            Self::Start => "Starting",
            Self::Stop => "Stopping",
        }
    }

    /// Past-tense label for logs
    pub fn past(&self) -> &'static str {
        match self {
            Self::Start => "Started",
            Self::Stop => "Stopped",
        }
    }
}

/// An unconditional tag policy
#[derive(Debug, Clone)]
pub struct TagPolicy {
    /// Tag key that opts an instance in
    pub tag_key: &'static str,

    /// State an instance must currently be in
    pub required_state: InstanceState,

    /// Transition issued for selected instances
    pub transition: Transition,
}

/// Start stopped instances tagged `AutoStart=true`
pub const AUTO_START: TagPolicy = TagPolicy {
    tag_key: "AutoStart",
    required_state: InstanceState::Stopped,
    transition: Transition::Start,
};

/// Stop running instances tagged `AutoStop=true`
pub const AUTO_STOP: TagPolicy = TagPolicy {
    tag_key: "AutoStop",
    required_state: InstanceState::Running,
    transition: Transition::Stop,
};

/// Select instance ids matching the policy, in snapshot order.
///
/// Pure over the snapshot: same snapshot in, same ids out.
pub fn select_by_tag(fleet: &[Instance], policy: &TagPolicy) -> Vec<String> {
    fleet
        .iter()
        .filter(|inst| inst.state == policy.required_state)
        .filter(|inst| inst.tag(policy.tag_key).is_some_and(tag_value_authorizes))
        .map(|inst| inst.id.clone())
        .collect()
}

/// Run one AutoStart/AutoStop pass: fetch, decide, transition.
///
/// The executor is never invoked with an empty selection. Provider or
/// executor failures propagate to the caller; there is no retry and
/// nothing to roll back, since transitions are only issued after the
/// full selection is computed.
pub async fn run_tag_policy<F, T>(
    fleet: &F,
    transitions: &T,
    policy: &TagPolicy,
) -> Result<Vec<String>>
where
    F: Fleet,
    T: Transitions,
{
    let snapshot = fleet
        .list_matching(policy.tag_key, policy.required_state)
        .await?;
    let selected = select_by_tag(&snapshot, policy);

    info!(
        "{} instances with {} tag: {:?}",
        policy.required_state, policy.tag_key, selected
    );

    if selected.is_empty() {
        info!(
            "Instance not in {} state or {} tag not set, nothing to do",
            policy.required_state, policy.tag_key
        );
        return Ok(selected);
    }

    for id in &selected {
        info!("{} instance: {}", policy.transition.gerund(), id);
    }

    match policy.transition {
        Transition::Start => transitions.start(&selected).await?,
        Transition::Stop => transitions.stop(&selected).await?,
    }

    info!("{} instances: {:?}", policy.transition.past(), selected);
    Ok(selected)
}

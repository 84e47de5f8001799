//! Weekday start/stop policies
//!
//! Instances tagged `StartWeekDay=HH:MM` (or `StopWeekDay=HH:MM`) are
//! started or stopped Monday through Friday when the current time is
//! strictly inside five minutes of the tagged time. The snapshot is
//! filtered server-side by tag presence only; the value check happens
//! client-side.
//!
//! Window semantics differ from the weekend policy: the tag value is
//! parsed as a time of day and compared with exclusive bounds, and a
//! value that does not parse is reported per instance without failing
//! the pass. Instances belonging to an autoscaling group are skipped —
//! their lifecycle is the ASG's business.

use crate::context::{EvaluationContext, WINDOW_MINUTES};
use crate::error::Result;
use crate::fleet::{Fleet, Transitions};
use crate::instance::{Instance, InstanceState};
use crate::policy::Transition;
use chrono::{NaiveTime, Timelike};
use tracing::{info, warn};

/// Tag key carrying the weekday start time
pub const WEEKDAY_START_TAG: &str = "StartWeekDay";

/// Tag key carrying the weekday stop time
pub const WEEKDAY_STOP_TAG: &str = "StopWeekDay";

/// Tag key EC2 puts on autoscaling-group members
pub const ASG_TAG: &str = "aws:autoscaling:groupName";

/// A weekday schedule policy
#[derive(Debug, Clone)]
pub struct WeekdayPolicy {
    /// Tag key carrying the scheduled time
    pub tag_key: &'static str,

    /// State meaning "nothing to do" (already running / already stopped)
    pub skip_state: InstanceState,

    /// Transition issued on a schedule match
    pub transition: Transition,
}

/// Start instances on their `StartWeekDay` schedule, Monday–Friday
pub const WEEKDAY_START: WeekdayPolicy = WeekdayPolicy {
    tag_key: WEEKDAY_START_TAG,
    skip_state: InstanceState::Running,
    transition: Transition::Start,
};

/// Stop instances on their `StopWeekDay` schedule, Monday–Friday
pub const WEEKDAY_STOP: WeekdayPolicy = WeekdayPolicy {
    tag_key: WEEKDAY_STOP_TAG,
    skip_state: InstanceState::Stopped,
    transition: Transition::Stop,
};

/// Per-instance outcome of a weekday evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeekdayDecision {
    /// Schedule matched; issue the transition
    Transition,
    /// Instance is already in the policy's target state
    AlreadyInState,
    /// Instance belongs to the named autoscaling group; not supported
    AutoscalingGroup(String),
    /// Scheduled time is outside the match window
    OutsideWindow,
    /// Tag value is missing or not a valid "HH:MM" time
    BadScheduleValue(String),
}

/// Whether a time of day lies strictly inside the ±5 minute window
/// around the context's current time.
///
/// Both times are anchored to the same nominal day, so a window that
/// spans midnight does not wrap; near-midnight schedules miss, as
/// they always have.
fn in_exclusive_window(ctx: &EvaluationContext, candidate: NaiveTime) -> bool {
    let now = (ctx.now.hour() * 60 + ctx.now.minute()) as i64;
    let cand = (candidate.hour() * 60 + candidate.minute()) as i64;
    cand > now - WINDOW_MINUTES && cand < now + WINDOW_MINUTES
}

/// Evaluate one instance against a weekday policy.
///
/// Pure; the weekday guard is applied once per pass by the runner,
/// not here.
pub fn evaluate_weekday(
    inst: &Instance,
    policy: &WeekdayPolicy,
    ctx: &EvaluationContext,
) -> WeekdayDecision {
    if let Some(group) = inst.tag(ASG_TAG) {
        return WeekdayDecision::AutoscalingGroup(group.to_string());
    }

    if inst.state == policy.skip_state {
        return WeekdayDecision::AlreadyInState;
    }

    let value = inst.tag(policy.tag_key).unwrap_or_default();
    let Ok(scheduled) = NaiveTime::parse_from_str(value, "%H:%M") else {
        return WeekdayDecision::BadScheduleValue(value.to_string());
    };

    if in_exclusive_window(ctx, scheduled) {
        WeekdayDecision::Transition
    } else {
        WeekdayDecision::OutsideWindow
    }
}

/// Run one weekday pass: skip wholesale on weekends, otherwise fetch
/// the tag-keyed snapshot and transition matching instances one call
/// each, in discovery order.
///
/// A bad schedule value on one instance is reported and does not
/// affect the rest of the pass; executor failures still propagate.
pub async fn run_weekday_policy<F, T>(
    fleet: &F,
    transitions: &T,
    policy: &WeekdayPolicy,
    ctx: &EvaluationContext,
) -> Result<Vec<String>>
where
    F: Fleet,
    T: Transitions,
{
    if ctx.is_weekend() {
        info!(
            "Week day is {}, {} only runs Monday through Friday",
            ctx.weekday, policy.tag_key
        );
        return Ok(Vec::new());
    }

    let snapshot = fleet.list_with_tag_key(policy.tag_key).await?;
    let mut transitioned = Vec::new();

    for inst in &snapshot {
        match evaluate_weekday(inst, policy, ctx) {
            WeekdayDecision::Transition => {
                info!("{} instance: {}", policy.transition.gerund(), inst.id);
                match policy.transition {
                    Transition::Start => {
                        transitions.start(std::slice::from_ref(&inst.id)).await?
                    }
                    Transition::Stop => transitions.stop(std::slice::from_ref(&inst.id)).await?,
                }
                transitioned.push(inst.id.clone());
            }
            WeekdayDecision::AlreadyInState => {
                info!("Instance {} is already {}", inst.id, policy.skip_state);
            }
            WeekdayDecision::AutoscalingGroup(group) => {
                info!(
                    "Skipping {}, part of autoscaling group {}",
                    inst.id, group
                );
            }
            WeekdayDecision::OutsideWindow => {
                info!("{} schedule not matched for {}", policy.tag_key, inst.id);
            }
            WeekdayDecision::BadScheduleValue(value) => {
                warn!(
                    "Instance {} has unparseable {} value {:?}",
                    inst.id, policy.tag_key, value
                );
            }
        }
    }

    info!(
        "Instance count evaluated with {} tag: {}",
        policy.tag_key,
        snapshot.len()
    );
    Ok(transitioned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MockFleet, MockTransitions, inst};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn ctx_at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> EvaluationContext {
        let naive = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap();
        EvaluationContext::new(Utc.from_utc_datetime(&naive))
    }

    // 2025-08-20 is a Wednesday, 2025-08-23 a Saturday.
    fn wednesday_10_03() -> EvaluationContext {
        ctx_at(2025, 8, 20, 10, 3)
    }

    #[test]
    fn test_exclusive_window_bounds() {
        let ctx = wednesday_10_03();
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();

        assert!(in_exclusive_window(&ctx, t(10, 3)));
        assert!(in_exclusive_window(&ctx, t(10, 7)));
        assert!(in_exclusive_window(&ctx, t(9, 59)));

        // Exactly five minutes out sits on the open bound.
        assert!(!in_exclusive_window(&ctx, t(9, 58)));
        assert!(!in_exclusive_window(&ctx, t(10, 8)));
    }

    #[test]
    fn test_evaluate_matches_inside_window() {
        let i = inst("i-1", InstanceState::Stopped, &[("StartWeekDay", "10:05")]);
        assert_eq!(
            evaluate_weekday(&i, &WEEKDAY_START, &wednesday_10_03()),
            WeekdayDecision::Transition
        );
    }

    #[test]
    fn test_evaluate_outside_window() {
        let i = inst("i-1", InstanceState::Stopped, &[("StartWeekDay", "10:20")]);
        assert_eq!(
            evaluate_weekday(&i, &WEEKDAY_START, &wednesday_10_03()),
            WeekdayDecision::OutsideWindow
        );
    }

    #[test]
    fn test_evaluate_skips_running_for_start() {
        let i = inst("i-1", InstanceState::Running, &[("StartWeekDay", "10:03")]);
        assert_eq!(
            evaluate_weekday(&i, &WEEKDAY_START, &wednesday_10_03()),
            WeekdayDecision::AlreadyInState
        );
    }

    #[test]
    fn test_evaluate_skips_asg_members() {
        let i = inst(
            "i-1",
            InstanceState::Stopped,
            &[
                ("StartWeekDay", "10:03"),
                ("aws:autoscaling:groupName", "batch-asg"),
            ],
        );
        assert_eq!(
            evaluate_weekday(&i, &WEEKDAY_START, &wednesday_10_03()),
            WeekdayDecision::AutoscalingGroup("batch-asg".to_string())
        );
    }

    #[test]
    fn test_evaluate_reports_bad_value() {
        let i = inst("i-1", InstanceState::Stopped, &[("StartWeekDay", "25:99")]);
        assert_eq!(
            evaluate_weekday(&i, &WEEKDAY_START, &wednesday_10_03()),
            WeekdayDecision::BadScheduleValue("25:99".to_string())
        );
    }

    #[test]
    fn test_stop_policy_inverts_states() {
        let running = inst("i-1", InstanceState::Running, &[("StopWeekDay", "10:03")]);
        let stopped = inst("i-2", InstanceState::Stopped, &[("StopWeekDay", "10:03")]);

        assert_eq!(
            evaluate_weekday(&running, &WEEKDAY_STOP, &wednesday_10_03()),
            WeekdayDecision::Transition
        );
        assert_eq!(
            evaluate_weekday(&stopped, &WEEKDAY_STOP, &wednesday_10_03()),
            WeekdayDecision::AlreadyInState
        );
    }

    #[tokio::test]
    async fn test_weekend_pass_does_nothing() {
        let fleet = MockFleet {
            instances: vec![inst(
                "i-1",
                InstanceState::Stopped,
                &[("StartWeekDay", "12:00")],
            )],
        };
        let transitions = MockTransitions::default();

        let done = run_weekday_policy(
            &fleet,
            &transitions,
            &WEEKDAY_START,
            &ctx_at(2025, 8, 23, 12, 0),
        )
        .await
        .unwrap();

        assert!(done.is_empty());
        assert!(transitions.started_calls().is_empty());
    }

    #[tokio::test]
    async fn test_pass_transitions_one_call_per_instance() {
        let fleet = MockFleet {
            instances: vec![
                inst("i-1", InstanceState::Stopped, &[("StartWeekDay", "10:05")]),
                inst("i-2", InstanceState::Stopped, &[("StartWeekDay", "bogus")]),
                inst("i-3", InstanceState::Stopped, &[("StartWeekDay", "10:01")]),
            ],
        };
        let transitions = MockTransitions::default();

        let done = run_weekday_policy(&fleet, &transitions, &WEEKDAY_START, &wednesday_10_03())
            .await
            .unwrap();

        // The bad value on i-2 is reported and skipped, the rest of
        // the pass proceeds.
        assert_eq!(done, vec!["i-1", "i-3"]);
        assert_eq!(
            transitions.started_calls(),
            vec![vec!["i-1".to_string()], vec!["i-3".to_string()]]
        );
    }
}

//! Weekend start policy
//!
//! Instances tagged `StartWeekEnd=HH:MM` are started when the current
//! local time falls within five minutes of the tagged time and the day
//! is Saturday or Sunday. Unlike the unconditional policies this scans
//! the whole fleet client-side, because the match depends on the tag
//! value, not just its presence.
//!
//! ## Scan contract
//!
//! Tags are scanned in enumeration order. Non-matching keys are
//! scanned past; the first `StartWeekEnd` key ends the scan for that
//! instance whether or not its value passes the window test. A known
//! limitation near midnight is documented on
//! [`EvaluationContext::in_window`].

use crate::context::EvaluationContext;
use crate::error::Result;
use crate::fleet::{Fleet, Transitions};
use crate::instance::{Instance, InstanceState};
use tracing::info;

/// Tag key carrying the weekend start time
pub const WEEKEND_START_TAG: &str = "StartWeekEnd";

/// Outcome of one weekend-start evaluation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekendReport {
    /// Ids selected for start, in snapshot enumeration order
    pub selected: Vec<String>,

    /// Total instances examined
    pub examined: usize,

    /// Whether any instance in the pass carried the tag at all
    pub tag_found: bool,
}

/// Evaluate the weekend-start policy over a snapshot.
///
/// Pure: selection is a function of the snapshot and the context
/// only, with no state carried between instances beyond the returned
/// accumulators.
pub fn select_weekend_starts(fleet: &[Instance], ctx: &EvaluationContext) -> WeekendReport {
    let mut report = WeekendReport::default();

    for inst in fleet {
        report.examined += 1;

        // Untagged instances can never match.
        if inst.tags.is_empty() {
            continue;
        }

        for (key, value) in &inst.tags {
            if key != WEEKEND_START_TAG {
                continue;
            }
            report.tag_found = true;
            info!("{} start time for {}: {}", WEEKEND_START_TAG, inst.id, value);

            if ctx.in_window(value) && ctx.is_weekend() {
                info!("{} schedule matched: {}", WEEKEND_START_TAG, inst.id);
                if inst.state == InstanceState::Stopped {
                    report.selected.push(inst.id.clone());
                } else {
                    info!("Instance not in stopped state: {}", inst.id);
                }
            } else {
                info!("{} schedule not matched: {}", WEEKEND_START_TAG, inst.id);
            }

            // A processed StartWeekEnd tag ends the scan for this
            // instance, pass or fail.
            break;
        }
    }

    report
}

/// Run one weekend-start pass: full describe, evaluate, then start
/// the selected instances one call each, in discovery order.
pub async fn run_weekend_start<F, T>(
    fleet: &F,
    transitions: &T,
    ctx: &EvaluationContext,
) -> Result<WeekendReport>
where
    F: Fleet,
    T: Transitions,
{
    info!("Time now: {}", ctx.now);
    info!("Week day: {}", ctx.weekday);
    info!("Match window: {} - {}", ctx.window_low, ctx.window_high);

    let snapshot = fleet.list_all().await?;
    let report = select_weekend_starts(&snapshot, ctx);

    for id in &report.selected {
        info!("Starting instance: {}", id);
        transitions.start(std::slice::from_ref(id)).await?;
    }

    if !report.tag_found {
        info!("{} tag not found on any instance", WEEKEND_START_TAG);
    }
    if report.selected.is_empty() {
        info!("No instances available to start");
    }
    info!("Total instance count: {}", report.examined);

    Ok(report)
}

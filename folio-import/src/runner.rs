//! Chunked execution of planned actions.
//!
//! Actions run in consecutive chunks of `batch_size`. A chunk starts only
//! after every operation of the previous chunk has settled; inside a chunk
//! operations are polled concurrently on the current task. Each outcome is
//! captured on its own, so one failure never cancels its siblings.

use std::future::Future;

use futures::future::join_all;

use crate::planner::{ActionKind, PlanTarget, PlannedAction};
use crate::progress::{JobObserver, JobProgress};
use crate::report::JobResult;
use crate::ItemError;

/// Run `actions` through `perform`.
///
/// Skip and Fail actions are reported straight from the plan without
/// calling `perform`. An `Err` from `perform` fails every item of that
/// action with the error's message; an `Ok` result is appended as is.
/// A `batch_size` of 0 is treated as 1.
pub async fn run<'a, T, F, Fut>(
    phase: &str,
    actions: &'a [PlannedAction<T>],
    batch_size: usize,
    perform: F,
    observer: &dyn JobObserver,
) -> JobResult
where
    T: PlanTarget,
    F: Fn(&'a PlannedAction<T>) -> Fut,
    Fut: Future<Output = Result<JobResult, ItemError>>,
{
    let total = actions.len();
    let mut result = JobResult::default();
    let mut done = 0;

    for (index, chunk) in actions.chunks(batch_size.max(1)).enumerate() {
        log::debug!("Chunk {}: {} action(s)", index + 1, chunk.len());

        let outcomes = join_all(chunk.iter().map(|action| {
            let pending = action.kind.is_actionable().then(|| perform(action));
            async move {
                match pending {
                    Some(fut) => Some(fut.await),
                    None => None,
                }
            }
        }))
        .await;

        let before = result.failed.len();
        for (action, outcome) in chunk.iter().zip(outcomes) {
            record_outcome(&mut result, action, outcome);
        }
        for item in &result.failed[before..] {
            observer.on_failure(item);
        }

        done += chunk.len();
        observer.on_progress(&JobProgress {
            phase: phase.to_string(),
            done,
            total,
        });
    }

    observer.on_complete(&result);
    result
}

/// The items a plan settles on its own (skips and fails), for dry runs.
pub fn preview<T: PlanTarget>(actions: &[PlannedAction<T>]) -> JobResult {
    let mut result = JobResult::default();
    for action in actions.iter().filter(|a| !a.kind.is_actionable()) {
        record_outcome(&mut result, action, None);
    }
    result
}

fn record_outcome<T: PlanTarget>(
    result: &mut JobResult,
    action: &PlannedAction<T>,
    outcome: Option<Result<JobResult, ItemError>>,
) {
    let names = action.target.item_names();
    match (action.kind, outcome) {
        (_, Some(Ok(items))) => result.extend(items),
        (_, Some(Err(e))) => {
            log::debug!("Action for {:?} failed: {}", action.record_id, e);
            for name in names {
                result.push_failed(action.record_id, name, e.to_string());
            }
        }
        (ActionKind::Fail, None) => {
            for name in names {
                result.push_failed(action.record_id, name, action.reason.to_string());
            }
        }
        (_, None) => {
            for name in names {
                result.push_skipped(action.record_id, Some(name), action.reason.to_string());
            }
        }
    }
}

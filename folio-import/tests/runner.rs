mod common;

use std::cell::Cell;

use common::RecordingObserver;
use folio_catalog::{ParsedEntry, parse_filename};
use folio_import::runner::run;
use folio_import::{ActionKind, ItemError, JobResult, PlanReason, PlannedAction, StoreError};

fn update(name: &str) -> PlannedAction<ParsedEntry> {
    let target = parse_filename(name);
    PlannedAction {
        record_id: target.record_id,
        kind: ActionKind::Update,
        reason: PlanReason::Overwrite,
        target,
    }
}

fn ten_actions() -> Vec<PlannedAction<ParsedEntry>> {
    (1..=10).map(|i| update(&format!("{i}.jpg"))).collect()
}

#[tokio::test]
async fn one_failure_does_not_stop_the_batch() {
    let actions = ten_actions();
    let observer = RecordingObserver::default();
    let performed = Cell::new(0);

    let result = run(
        "test",
        &actions,
        4,
        |action| {
            performed.set(performed.get() + 1);
            async move {
                let id = action.record_id.unwrap_or_default();
                if id == 3 {
                    return Err(ItemError::Store(StoreError::backend("disk full")));
                }
                let mut ok = JobResult::default();
                ok.push_success(id, action.target.source_name.clone(), None);
                Ok(ok)
            }
        },
        &observer,
    )
    .await;

    assert_eq!(performed.get(), 10);
    assert_eq!(result.success.len(), 9);
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].record_id, Some(3));
    assert_eq!(result.failed[0].filename, "3.jpg");
    assert_eq!(result.failed[0].reason, "store error: disk full");
    assert_eq!(observer.failures.get(), 1);

    let done: Vec<usize> = observer.progress.borrow().iter().map(|p| p.done).collect();
    assert_eq!(done, vec![4, 8, 10]);
    assert!(observer.progress.borrow().iter().all(|p| p.total == 10));
    assert!(observer.completed.get());
}

#[tokio::test]
async fn operations_overlap_only_within_a_chunk() {
    let actions = ten_actions();
    let in_flight = Cell::new(0usize);
    let peak = Cell::new(0usize);

    let in_flight = &in_flight;
    let peak = &peak;
    run(
        "test",
        &actions,
        3,
        |_| async move {
            in_flight.set(in_flight.get() + 1);
            peak.set(peak.get().max(in_flight.get()));
            tokio::task::yield_now().await;
            in_flight.set(in_flight.get() - 1);
            Ok::<_, ItemError>(JobResult::default())
        },
        &folio_import::SilentObserver,
    )
    .await;

    assert_eq!(peak.get(), 3);
    assert_eq!(in_flight.get(), 0);
}

#[tokio::test]
async fn results_keep_plan_order() {
    let actions = ten_actions();
    let result = run(
        "test",
        &actions,
        10,
        |action| async move {
            // Later actions yield less and finish first
            for _ in 0..(10 - action.record_id.unwrap_or_default()) {
                tokio::task::yield_now().await;
            }
            let mut ok = JobResult::default();
            ok.push_success(action.record_id.unwrap_or_default(), "x", None);
            Ok::<_, ItemError>(ok)
        },
        &folio_import::SilentObserver,
    )
    .await;

    let ids: Vec<u32> = result.success.iter().map(|s| s.record_id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn empty_plan_reports_nothing() {
    let actions: Vec<PlannedAction<ParsedEntry>> = Vec::new();
    let observer = RecordingObserver::default();
    let result = run(
        "test",
        &actions,
        5,
        |_| async { Ok::<_, ItemError>(JobResult::default()) },
        &observer,
    )
    .await;
    assert_eq!(result.total(), 0);
    assert!(observer.progress.borrow().is_empty());
    assert!(observer.completed.get());
}

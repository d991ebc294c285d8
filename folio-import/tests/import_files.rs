mod common;

use common::{MemoryBlobs, MemoryRecords, RecordingObserver};
use folio_catalog::RecordFields;
use folio_db::{get_record, open_memory};
use folio_import::{
    ActionKind, IncomingFile, JobError, JobOptions, ReconciliationPolicy, RecordStore,
    SilentObserver, SqliteRecords, import_files,
};
use folio_lib::MediaDir;
use tempfile::TempDir;

fn inline(names: &[&str]) -> Vec<IncomingFile> {
    names
        .iter()
        .map(|n| IncomingFile::inline(*n, n.as_bytes().to_vec()))
        .collect()
}

fn options(auto_create: bool, overwrite: bool, skip_if_media: bool) -> JobOptions {
    JobOptions {
        policy: ReconciliationPolicy {
            auto_create,
            overwrite_existing: overwrite,
            skip_if_target_has_media: skip_if_media,
        },
        ..JobOptions::default()
    }
}

#[tokio::test]
async fn creates_records_and_stores_canonical_names() {
    let tmp = TempDir::new().unwrap();
    let records = SqliteRecords::new(open_memory().unwrap());
    let media = MediaDir::new(tmp.path());

    let files = inline(&[
        "078.jpg",
        "001a_alternate_view.jpg",
        "366 Since You Died, Life Goes On and On (4).jpg",
        "414King.jpg",
        "cover.jpg",
    ]);
    let report = import_files(files, &records, &media, &options(true, false, false), &SilentObserver)
        .await
        .unwrap();

    assert!(!report.dry_run);
    assert_eq!(report.summary.create, 4);
    assert_eq!(report.result.success.len(), 4);
    assert!(report.result.failed.is_empty());
    assert_eq!(report.result.skipped.len(), 1);
    assert_eq!(report.result.skipped[0].filename.as_deref(), Some("cover.jpg"));
    assert_eq!(report.result.skipped[0].reason, "unrecognized name");

    assert_eq!(media.list_names(78).await.unwrap(), vec!["000078.jpg"]);
    assert_eq!(media.list_names(414).await.unwrap(), vec!["000414.jpg"]);
    // The only file of record 1 asked for slot "a" but the record had no
    // primary yet, so it becomes the primary.
    assert_eq!(media.list_names(1).await.unwrap(), vec!["000001.jpg"]);

    records
        .with_conn(|conn| {
            let r366 = get_record(conn, 366).unwrap().unwrap();
            assert_eq!(r366.title, "Since You Died, Life Goes On and On (4)");
            assert_eq!(r366.primary_media.as_deref(), Some("000366.jpg"));
            assert_eq!(get_record(conn, 78).unwrap().unwrap().title, "Record 78");
            assert_eq!(get_record(conn, 1).unwrap().unwrap().title, "alternate view");
        })
        .unwrap();
}

#[tokio::test]
async fn group_files_take_primary_then_letters() {
    let records = MemoryRecords::default();
    let blobs = MemoryBlobs::default();
    let files = inline(&["5b back.png", "5 Front.jpg", "5a side.jpg", "5 Other.jpg"]);

    let report = import_files(files, &records, &blobs, &options(true, false, false), &SilentObserver)
        .await
        .unwrap();

    assert_eq!(report.result.success.len(), 4);
    let stored: Vec<(String, Option<String>)> = report
        .result
        .success
        .iter()
        .map(|s| (s.filename.clone(), s.stored_name.clone()))
        .collect();
    assert_eq!(
        stored,
        vec![
            ("5 Front.jpg".to_string(), Some("000005.jpg".to_string())),
            ("5 Other.jpg".to_string(), Some("000005a.jpg".to_string())),
            ("5a side.jpg".to_string(), Some("000005b.jpg".to_string())),
            ("5b back.png".to_string(), Some("000005c.png".to_string())),
        ]
    );
    let record = records.get(5).unwrap();
    assert_eq!(record.title.as_deref(), Some("Front"));
    assert_eq!(record.primary_media.as_deref(), Some("000005.jpg"));
}

#[tokio::test]
async fn existing_primary_is_not_displaced() {
    let records = MemoryRecords::with_ids(&[9]);
    let blobs = MemoryBlobs::default();
    blobs.seed(9, &["000009.jpg", "000009a.jpg", "000009b.jpg", "000009d.jpg"]);

    let report = import_files(
        inline(&["9a detail.jpg"]),
        &records,
        &blobs,
        &options(false, true, false),
        &SilentObserver,
    )
    .await
    .unwrap();

    assert_eq!(report.summary.update, 1);
    assert_eq!(report.result.success[0].stored_name.as_deref(), Some("000009e.jpg"));
    assert_eq!(records.get(9).unwrap().primary_media, None);
}

#[tokio::test]
async fn primary_with_new_extension_leaves_old_file() {
    let records = MemoryRecords::with_ids(&[5]);
    let blobs = MemoryBlobs::default();
    blobs.seed(5, &["000005.jpg", "000005a.jpg"]);

    let report = import_files(
        inline(&["5 New.png"]),
        &records,
        &blobs,
        &options(false, true, false),
        &SilentObserver,
    )
    .await
    .unwrap();

    assert_eq!(report.result.success[0].stored_name.as_deref(), Some("000005.png"));
    assert_eq!(records.get(5).unwrap().primary_media.as_deref(), Some("000005.png"));
    assert_eq!(
        blobs.names(5),
        vec!["000005.jpg", "000005.png", "000005a.jpg"]
    );
}

#[tokio::test]
async fn missing_records_fail_without_auto_create() {
    let records = MemoryRecords::default();
    let blobs = MemoryBlobs::default();
    let report = import_files(
        inline(&["12 a.jpg", "12a b.jpg"]),
        &records,
        &blobs,
        &JobOptions::default(),
        &SilentObserver,
    )
    .await
    .unwrap();

    assert!(report.result.success.is_empty());
    assert_eq!(report.result.failed.len(), 2);
    assert!(
        report
            .result
            .failed
            .iter()
            .all(|f| f.reason == "record must be created first")
    );
    assert!(blobs.names(12).is_empty());
    assert!(records.get(12).is_none());
}

#[tokio::test]
async fn exhausted_record_fails_alone() {
    let records = MemoryRecords::with_ids(&[1, 2]);
    let blobs = MemoryBlobs::default();
    let full: Vec<String> = ('a'..='z').map(|c| format!("000001{c}.jpg")).collect();
    let mut names: Vec<&str> = full.iter().map(String::as_str).collect();
    names.push("000001.jpg");
    blobs.seed(1, &names);

    let report = import_files(
        inline(&["1c extra.jpg", "2a x.jpg"]),
        &records,
        &blobs,
        &options(false, true, false),
        &SilentObserver,
    )
    .await
    .unwrap();

    assert_eq!(report.result.failed.len(), 1);
    assert_eq!(report.result.failed[0].record_id, Some(1));
    assert!(report.result.failed[0].reason.contains("no free media slots"));
    assert_eq!(report.result.success.len(), 1);
    assert_eq!(report.result.success[0].stored_name.as_deref(), Some("000002.jpg"));
}

#[tokio::test]
async fn store_failure_is_reported_verbatim() {
    let records = MemoryRecords::default();
    let blobs = MemoryBlobs {
        fail_writes_for: [4].into_iter().collect(),
        ..MemoryBlobs::default()
    };
    let observer = RecordingObserver::default();

    let report = import_files(
        inline(&["3.jpg", "4.jpg", "5.jpg"]),
        &records,
        &blobs,
        &options(true, false, false),
        &observer,
    )
    .await
    .unwrap();

    assert_eq!(report.result.success.len(), 2);
    assert_eq!(report.result.failed.len(), 1);
    assert_eq!(report.result.failed[0].filename, "4.jpg");
    assert_eq!(report.result.failed[0].reason, "store error: quota exceeded");
    assert_eq!(observer.failures.get(), 1);
    assert_eq!(observer.progress.borrow().last().unwrap().done, 3);
}

#[tokio::test]
async fn duplicate_creation_conflict_fails_the_group() {
    // The snapshot says record 6 is missing, but it appears before the
    // create runs.
    struct LateRecords(MemoryRecords);

    impl RecordStore for LateRecords {
        async fn exists_record(&self, _id: u32) -> Result<bool, folio_import::StoreError> {
            Ok(false)
        }
        async fn create_record(
            &self,
            id: u32,
            fields: &RecordFields,
        ) -> Result<u32, folio_import::StoreError> {
            self.0.create_record(id, fields).await
        }
        async fn update_record(
            &self,
            id: u32,
            fields: &RecordFields,
        ) -> Result<(), folio_import::StoreError> {
            self.0.update_record(id, fields).await
        }
    }

    let records = LateRecords(MemoryRecords::with_ids(&[6]));
    let blobs = MemoryBlobs::default();
    let report = import_files(
        inline(&["6.jpg", "6a side.jpg"]),
        &records,
        &blobs,
        &options(true, false, false),
        &SilentObserver,
    )
    .await
    .unwrap();

    assert!(report.result.success.is_empty());
    assert_eq!(report.result.failed.len(), 2);
    assert!(
        report
            .result
            .failed
            .iter()
            .all(|f| f.reason == "record 6 already exists")
    );
}

#[tokio::test]
async fn rerun_with_skip_if_media_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    let records = SqliteRecords::new(open_memory().unwrap());
    let media = MediaDir::new(tmp.path());
    let opts = options(true, true, true);
    let names = ["10 Dune.jpg", "10a back.jpg", "11.png"];

    let first = import_files(inline(&names), &records, &media, &opts, &SilentObserver)
        .await
        .unwrap();
    assert_eq!(first.summary.create, 2);
    assert_eq!(first.result.success.len(), 3);

    let second = import_files(inline(&names), &records, &media, &opts, &SilentObserver)
        .await
        .unwrap();
    assert_eq!(second.summary.create + second.summary.update, 0);
    assert_eq!(second.summary.skip, 2);
    assert_eq!(second.result.skipped.len(), 3);
    assert!(
        second
            .result
            .skipped
            .iter()
            .all(|s| s.reason == "already has media, skip-if-exists on")
    );
    assert_eq!(media.list_names(10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn dry_run_touches_nothing() {
    let records = MemoryRecords::with_ids(&[2]);
    let blobs = MemoryBlobs::default();
    let opts = JobOptions {
        dry_run: true,
        ..options(true, false, false)
    };

    let report = import_files(
        inline(&["1.jpg", "2.jpg", "notes.txt"]),
        &records,
        &blobs,
        &opts,
        &SilentObserver,
    )
    .await
    .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.plan.len(), 3);
    assert_eq!(report.plan[0].kind, ActionKind::Create);
    assert_eq!(report.plan[1].reason, "already exists, overwrite off");
    assert!(report.result.success.is_empty());
    assert_eq!(report.result.skipped.len(), 2);
    assert!(records.get(1).is_none());
    assert!(blobs.names(1).is_empty());
}

#[tokio::test]
async fn files_are_read_from_disk() {
    let tmp = TempDir::new().unwrap();
    let drop = tmp.path().join("drop");
    std::fs::create_dir(&drop).unwrap();
    std::fs::write(drop.join("21 Tide.JPG"), b"jpeg bytes").unwrap();

    let records = MemoryRecords::default();
    let media = MediaDir::new(tmp.path().join("media"));
    let files = vec![
        IncomingFile::from_path(drop.join("21 Tide.JPG")).unwrap(),
        IncomingFile::from_path(drop.join("22 Gone.jpg")).unwrap(),
    ];

    let report = import_files(files, &records, &media, &options(true, false, false), &SilentObserver)
        .await
        .unwrap();

    assert_eq!(report.result.success[0].stored_name.as_deref(), Some("000021.JPG"));
    let stored = std::fs::read(media.record_dir(21).join("000021.JPG")).unwrap();
    assert_eq!(stored, b"jpeg bytes");
    assert_eq!(report.result.failed.len(), 1);
    assert!(report.result.failed[0].reason.starts_with("failed to read"));
}

#[tokio::test]
async fn zero_batch_size_is_rejected() {
    let records = MemoryRecords::default();
    let blobs = MemoryBlobs::default();
    let opts = JobOptions {
        batch_size: 0,
        ..JobOptions::default()
    };
    let err = import_files(inline(&["1.jpg"]), &records, &blobs, &opts, &SilentObserver)
        .await
        .unwrap_err();
    assert!(matches!(err, JobError::InvalidBatchSize));
}

#[tokio::test]
async fn refresh_recaptures_snapshot_once() {
    let records = MemoryRecords::default();
    let blobs = MemoryBlobs::default();
    let opts = JobOptions {
        refresh_snapshot: true,
        ..options(true, false, false)
    };
    import_files(inline(&["1.jpg", "2.jpg", "3.jpg"]), &records, &blobs, &opts, &SilentObserver)
        .await
        .unwrap();
    // One lookup per record at capture, and once more for the refresh
    assert_eq!(records.existence_checks.get(), 6);
}

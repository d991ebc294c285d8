//! Record import from CSV rows.
//!
//! Each row names a record by id and carries field values. Rows go through
//! the same planner and runner as file imports, so the report shape is
//! identical.

use std::collections::HashMap;
use std::io::Read;

use folio_catalog::{RecordFields, default_record_title, parse_record_id};

use crate::planner::{ActionKind, ExistenceSnapshot, PlanTarget, PlannedAction, plan};
use crate::progress::JobObserver;
use crate::report::JobResult;
use crate::store::{BlobStore, RecordStore};
use crate::{ItemError, JobError, JobOptions, JobReport, runner};

/// One CSV data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    /// 1-based line number in the source (the header is line 1).
    pub line: u64,
    /// The id cell as written.
    pub id_text: String,
    pub record_id: Option<u32>,
    pub fields: RecordFields,
}

impl RecordRow {
    /// Label used in reports, e.g. "row 4 (id 78)".
    pub fn label(&self) -> String {
        if self.id_text.is_empty() {
            format!("row {}", self.line)
        } else {
            format!("row {} (id {})", self.line, self.id_text)
        }
    }
}

impl PlanTarget for RecordRow {
    fn record_id(&self) -> Option<u32> {
        self.record_id
    }

    fn item_names(&self) -> Vec<String> {
        vec![self.label()]
    }
}

/// Column indices found in the header, matched case-insensitively.
struct Columns {
    id: usize,
    title: Option<usize>,
    year: Option<usize>,
    medium: Option<usize>,
    dimensions: Option<usize>,
    description: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, JobError> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();
        let find = |name: &str| index.get(name).copied();
        Ok(Self {
            id: find("id").ok_or(JobError::MissingColumn("id"))?,
            title: find("title"),
            year: find("year"),
            medium: find("medium"),
            dimensions: find("dimensions"),
            description: find("description"),
        })
    }
}

/// Read record rows from CSV with a header line.
///
/// Cells are trimmed and empty cells are treated as unset. A malformed
/// line is logged and skipped; an unparseable year is logged and dropped
/// from that row.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RecordRow>, JobError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(reader.headers()?)?;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping malformed CSV row: {e}");
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let cell = |i: Option<usize>| {
            i.and_then(|i| record.get(i))
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string())
        };

        let id_text = cell(Some(columns.id)).unwrap_or_default();
        let year = cell(columns.year).and_then(|y| match y.parse::<i32>() {
            Ok(year) => Some(year),
            Err(_) => {
                log::warn!("Line {line}: ignoring invalid year '{y}'");
                None
            }
        });

        rows.push(RecordRow {
            line,
            record_id: parse_record_id(&id_text),
            id_text,
            fields: RecordFields {
                title: cell(columns.title),
                year,
                medium: cell(columns.medium),
                dimensions: cell(columns.dimensions),
                description: cell(columns.description),
                primary_media: None,
            },
        });
    }

    Ok(rows)
}

/// Create or update records from CSV rows.
pub async fn import_rows<R, B>(
    rows: Vec<RecordRow>,
    records: &R,
    blobs: &B,
    options: &JobOptions,
    observer: &dyn JobObserver,
) -> Result<JobReport, JobError>
where
    R: RecordStore + ?Sized,
    B: BlobStore + ?Sized,
{
    options.validate()?;

    observer.on_phase(&format!("Planning {} row(s)", rows.len()));
    let ids: Vec<u32> = rows.iter().filter_map(|r| r.record_id).collect();
    let snapshot = ExistenceSnapshot::capture(records, blobs, &ids)
        .await
        .map_err(JobError::Snapshot)?;
    let mut actions = plan(rows, &snapshot, &options.policy);

    if options.dry_run {
        return Ok(JobReport::planned(&actions));
    }

    if options.refresh_snapshot {
        let snapshot = ExistenceSnapshot::capture(records, blobs, &ids)
            .await
            .map_err(JobError::Snapshot)?;
        let rows = actions.into_iter().map(|a| a.target).collect();
        actions = plan(rows, &snapshot, &options.policy);
    }

    observer.on_phase(&format!("Applying {} row(s)", actions.len()));
    let result = runner::run(
        "rows",
        &actions,
        options.batch_size,
        |action| apply_row(records, action),
        observer,
    )
    .await;

    Ok(JobReport::finished(&actions, result))
}

async fn apply_row<R: RecordStore + ?Sized>(
    records: &R,
    action: &PlannedAction<RecordRow>,
) -> Result<JobResult, ItemError> {
    let row = &action.target;
    let Some(id) = row.record_id else {
        return Ok(JobResult::default());
    };

    match action.kind {
        ActionKind::Create => {
            let mut fields = row.fields.clone();
            if fields.title.is_none() {
                fields.title = Some(default_record_title(id));
            }
            records.create_record(id, &fields).await?;
        }
        ActionKind::Update => records.update_record(id, &row.fields).await?,
        ActionKind::Skip | ActionKind::Fail => return Ok(JobResult::default()),
    }

    let mut result = JobResult::default();
    result.push_success(id, row.label(), None);
    Ok(result)
}

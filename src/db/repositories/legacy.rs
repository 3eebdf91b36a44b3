//! Import of logs exported from the browser versions of the app.
//!
//! Those logs are JSON arrays of `{photo, rating, greenness, date}` objects (plus
//! `location`/`thoughts` in the later version), newest first, keyed by their date text.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    db::{
        connection::Database,
        helpers::{non_empty, parse_display_date},
        models::{EntrySchema, RatingEntry, StarRating},
        repositories::entries::upsert,
    },
    greenness::{GreennessScore, ScoreScale},
    log_warn,
};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Deserialize)]
struct LegacyRecord {
    #[serde(default)]
    photo: String,
    rating: u8,
    greenness: u8,
    date: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    thoughts: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRecord {
    /// Position in the source array.
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: Vec<SkippedRecord>,
}

fn scale_for(schema: EntrySchema) -> ScoreScale {
    match schema {
        EntrySchema::V1 => ScoreScale::OutOfTen,
        EntrySchema::V2 => ScoreScale::OutOfHundred,
    }
}

fn convert(value: Value, schema: EntrySchema) -> Result<RatingEntry> {
    let record: LegacyRecord = serde_json::from_value(value).context("malformed record")?;
    if !schema.has_notes() && record.photo.trim().is_empty() {
        bail!("record has no photo");
    }
    let recorded_at = parse_display_date(&record.date)?;
    let (location, thoughts) = if schema.has_notes() {
        (non_empty(record.location), non_empty(record.thoughts))
    } else {
        (None, None)
    };

    Ok(RatingEntry {
        id: Uuid::new_v4().to_string(),
        schema,
        photo: record.photo,
        rating: StarRating::new(record.rating)?,
        greenness: GreennessScore::new(record.greenness, scale_for(schema))?,
        location,
        thoughts,
        date: record.date,
        recorded_at,
    })
}

/// Parse a browser export into entries, oldest first, collecting the records that
/// cannot be represented.
pub fn parse_legacy_log(json: &str, schema: EntrySchema) -> Result<(Vec<RatingEntry>, ImportReport)> {
    let values: Vec<Value> =
        serde_json::from_str(json).map_err(|err| anyhow!("legacy log is not a JSON array: {err}"))?;
    let total = values.len();

    let mut report = ImportReport::default();
    let mut entries = Vec::with_capacity(total);
    for (offset, value) in values.into_iter().rev().enumerate() {
        let index = total - 1 - offset;
        match convert(value, schema) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                log_warn!("Skipping legacy record {index}: {err:#}");
                report.skipped.push(SkippedRecord {
                    index,
                    reason: format!("{err:#}"),
                });
            }
        }
    }
    report.skipped.sort_by_key(|skipped| skipped.index);
    report.imported = entries.len();

    Ok((entries, report))
}

impl Database {
    /// Import a browser export in one transaction. Entries get fresh ids, so records
    /// that shared a date key in the browser are all kept.
    pub async fn import_legacy_log(&self, json: &str, schema: EntrySchema) -> Result<ImportReport> {
        let (entries, report) = parse_legacy_log(json, schema)?;
        self.execute(move |conn| {
            let tx = conn
                .transaction()
                .context("failed to open import transaction")?;
            for entry in &entries {
                upsert(&tx, entry)?;
            }
            tx.commit().context("failed to commit import")?;
            Ok(report)
        })
        .await
    }
}

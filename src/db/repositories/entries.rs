use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::{
    db::{
        connection::Database,
        helpers::{parse_datetime, to_u8},
        models::{EntrySchema, RatingEntry, StarRating},
    },
    greenness::{GreennessScore, ScoreScale},
};

const ENTRY_COLUMNS: &str = "id, schema_version, photo, rating, greenness, greenness_scale, \
                             location, thoughts, date, recorded_at";

fn row_to_entry(row: &Row) -> Result<RatingEntry> {
    let id: String = row.get("id")?;
    let scale = ScoreScale::from_max(row.get("greenness_scale")?)?;
    let recorded_at: String = row.get("recorded_at")?;

    let entry = RatingEntry {
        schema: EntrySchema::from_version(row.get("schema_version")?)?,
        photo: row.get("photo")?,
        rating: StarRating::new(to_u8(row.get("rating")?, "rating")?)?,
        greenness: GreennessScore::new(to_u8(row.get("greenness")?, "greenness")?, scale)?,
        location: row.get("location")?,
        thoughts: row.get("thoughts")?,
        date: row.get("date")?,
        recorded_at: parse_datetime(&recorded_at, "recorded_at")?,
        id,
    };
    entry.validate()?;
    Ok(entry)
}

pub(crate) fn upsert(conn: &Connection, entry: &RatingEntry) -> Result<()> {
    conn.execute(
        "INSERT INTO entries (id, schema_version, photo, rating, greenness, greenness_scale,
                              location, thoughts, date, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(id) DO UPDATE SET
             schema_version = excluded.schema_version,
             photo = excluded.photo,
             rating = excluded.rating,
             greenness = excluded.greenness,
             greenness_scale = excluded.greenness_scale,
             location = excluded.location,
             thoughts = excluded.thoughts,
             date = excluded.date,
             recorded_at = excluded.recorded_at",
        params![
            entry.id,
            entry.schema.version(),
            entry.photo,
            entry.rating.value(),
            entry.greenness.value(),
            entry.greenness.scale().max(),
            entry.location,
            entry.thoughts,
            entry.date,
            entry.recorded_at.to_rfc3339(),
        ],
    )
    .with_context(|| format!("failed to save entry {}", entry.id))?;
    Ok(())
}

impl Database {
    /// Insert the entry, or replace the stored one with the same id.
    pub async fn upsert_entry(&self, entry: &RatingEntry) -> Result<()> {
        entry.validate()?;
        let record = entry.clone();
        self.execute(move |conn| upsert(conn, &record)).await
    }

    /// Every stored entry, in insertion order.
    pub async fn get_all_entries(&self) -> Result<Vec<RatingEntry>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries ORDER BY rowid ASC"
            ))?;

            let mut rows = stmt.query([])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(row_to_entry(row).context("failed to read stored entry")?);
            }

            Ok(entries)
        })
        .await
    }

    pub async fn get_entry(&self, id: &str) -> Result<Option<RatingEntry>> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1"
            ))?;
            let mut rows = stmt.query(params![id])?;
            let entry = match rows.next()? {
                Some(row) => Some(row_to_entry(row)?),
                None => None,
            };
            Ok(entry)
        })
        .await
    }

    /// Returns whether an entry was removed.
    pub async fn delete_entry(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.execute(move |conn| {
            let removed = conn
                .execute("DELETE FROM entries WHERE id = ?1", params![id])
                .with_context(|| format!("failed to delete entry {id}"))?;
            Ok(removed > 0)
        })
        .await
    }

    pub async fn count_entries(&self) -> Result<u64> {
        self.execute(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
            Ok(count.max(0) as u64)
        })
        .await
    }
}

//! Rating entry data model.
//!
//! An entry is keyed by a generated `id`. `date` is display text only, and ordering by time
//! uses `recorded_at`.

use std::fmt;

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::greenness::GreennessScore;

/// Star rating, 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarRating(u8);

impl StarRating {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self> {
        if (1..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(anyhow!("rating must be between 1 and {}, got {value}", Self::MAX))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// `★★★☆☆` style rendering.
    pub fn stars(&self) -> String {
        let filled = self.0 as usize;
        format!(
            "{}{}",
            "★".repeat(filled),
            "☆".repeat(Self::MAX as usize - filled)
        )
    }
}

impl TryFrom<u8> for StarRating {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.0
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Which optional fields a record may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntrySchema {
    /// photo, rating, greenness, date.
    V1,
    /// V1 plus location and thoughts.
    V2,
}

impl EntrySchema {
    pub const CURRENT: EntrySchema = EntrySchema::V2;

    pub fn version(&self) -> i64 {
        match self {
            EntrySchema::V1 => 1,
            EntrySchema::V2 => 2,
        }
    }

    pub fn from_version(version: i64) -> Result<Self> {
        match version {
            1 => Ok(EntrySchema::V1),
            2 => Ok(EntrySchema::V2),
            other => bail!("unknown entry schema version {other}"),
        }
    }

    pub fn has_notes(&self) -> bool {
        matches!(self, EntrySchema::V2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingEntry {
    pub id: String,
    pub schema: EntrySchema,
    pub photo: String,
    pub rating: StarRating,
    pub greenness: GreennessScore,
    pub location: Option<String>,
    pub thoughts: Option<String>,
    pub date: String,
    pub recorded_at: DateTime<Utc>,
}

impl RatingEntry {
    /// A fresh current-schema entry with a new id, stamped at `recorded_at`.
    pub fn new(
        photo: String,
        rating: StarRating,
        greenness: GreennessScore,
        location: Option<String>,
        thoughts: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            schema: EntrySchema::CURRENT,
            photo,
            rating,
            greenness,
            location,
            thoughts,
            date: display_date(recorded_at),
            recorded_at,
        }
    }

    /// Checks the cross-field invariants a stored row must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            bail!("entry id is empty");
        }
        if !self.schema.has_notes() && (self.location.is_some() || self.thoughts.is_some()) {
            bail!("entry {} is schema v1 but carries notes", self.id);
        }
        Ok(())
    }
}

pub fn display_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

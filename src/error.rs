use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A required draft field that was still empty when saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingField {
    Photo,
    Rating,
    Greenness,
}

impl MissingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingField::Photo => "photo",
            MissingField::Rating => "rating",
            MissingField::Greenness => "greenness",
        }
    }
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures surfaced to whoever presents the log. All of them are recoverable.
#[derive(Debug, Error)]
pub enum MatchaError {
    #[error("unable to access camera")]
    CameraUnavailable,

    #[error("missing: {}", join_fields(.missing))]
    IncompleteEntry { missing: Vec<MissingField> },

    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("could not read image: {0}")]
    InvalidImage(String),

    #[error("failed to access the ratings log: {0}")]
    Storage(String),

    #[error("failed to access settings: {0}")]
    Settings(String),
}

impl MatchaError {
    pub fn storage(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }

    pub fn invalid_image(err: anyhow::Error) -> Self {
        Self::InvalidImage(format!("{err:#}"))
    }

    pub fn settings(err: anyhow::Error) -> Self {
        Self::Settings(format!("{err:#}"))
    }
}

fn join_fields(fields: &[MissingField]) -> String {
    fields
        .iter()
        .map(MissingField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_entry_lists_fields_in_order() {
        let err = MatchaError::IncompleteEntry {
            missing: vec![MissingField::Rating, MissingField::Greenness],
        };
        assert_eq!(err.to_string(), "missing: rating, greenness");
    }

    #[test]
    fn storage_error_keeps_context_chain() {
        let inner = anyhow::anyhow!("disk full").context("failed to insert entry");
        let err = MatchaError::storage(inner);
        assert_eq!(
            err.to_string(),
            "failed to access the ratings log: failed to insert entry: disk full"
        );
    }
}

//! The entry being composed, passed through each handler by value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db::{helpers::non_empty, RatingEntry, StarRating},
    error::{MatchaError, MissingField},
    greenness::GreennessScore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhotoPolicy {
    #[default]
    Required,
    Optional,
}

impl PhotoPolicy {
    pub fn from_required(required: bool) -> Self {
        if required {
            PhotoPolicy::Required
        } else {
            PhotoPolicy::Optional
        }
    }
}

/// Identifies one analysis request. Only the latest ticket may fill the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket(u64);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftEntry {
    photo: Option<String>,
    rating: Option<StarRating>,
    greenness: Option<GreennessScore>,
    location: String,
    thoughts: String,
    generation: u64,
}

impl DraftEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rating(mut self, rating: StarRating) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_thoughts(mut self, thoughts: impl Into<String>) -> Self {
        self.thoughts = thoughts.into();
        self
    }

    /// Start a new analysis. Any result still pending for an older ticket is
    /// discarded when it arrives.
    pub fn begin_analysis(mut self) -> (Self, AnalysisTicket) {
        self.generation += 1;
        let ticket = AnalysisTicket(self.generation);
        (self, ticket)
    }

    pub fn is_current(&self, ticket: AnalysisTicket) -> bool {
        ticket.0 == self.generation
    }

    pub fn apply_analysis(
        mut self,
        ticket: AnalysisTicket,
        photo: String,
        greenness: GreennessScore,
    ) -> Self {
        if self.is_current(ticket) {
            self.photo = Some(photo);
            self.greenness = Some(greenness);
        }
        self
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn rating(&self) -> Option<StarRating> {
        self.rating
    }

    pub fn greenness(&self) -> Option<GreennessScore> {
        self.greenness
    }

    pub fn missing_fields(&self, photo_policy: PhotoPolicy) -> Vec<MissingField> {
        let mut missing = Vec::new();
        if photo_policy == PhotoPolicy::Required && self.photo.is_none() {
            missing.push(MissingField::Photo);
        }
        if self.rating.is_none() {
            missing.push(MissingField::Rating);
        }
        if self.greenness.is_none() {
            missing.push(MissingField::Greenness);
        }
        missing
    }

    /// Build the entry to persist. Nothing is produced while a required field is empty.
    pub fn finalize(
        &self,
        photo_policy: PhotoPolicy,
        now: DateTime<Utc>,
    ) -> Result<RatingEntry, MatchaError> {
        let missing = self.missing_fields(photo_policy);
        let (Some(rating), Some(greenness), true) =
            (self.rating, self.greenness, missing.is_empty())
        else {
            return Err(MatchaError::IncompleteEntry { missing });
        };

        Ok(RatingEntry::new(
            self.photo.clone().unwrap_or_default(),
            rating,
            greenness,
            non_empty(Some(self.location.clone())),
            non_empty(Some(self.thoughts.clone())),
            now,
        ))
    }

    /// A blank draft. Tickets issued before the reset stay stale.
    pub fn reset(&self) -> Self {
        Self {
            generation: self.generation + 1,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::EntrySchema, greenness::ScoreScale};

    fn score(value: u8) -> GreennessScore {
        GreennessScore::new(value, ScoreScale::OutOfHundred).unwrap()
    }

    #[test]
    fn empty_draft_reports_every_missing_field() {
        let err = DraftEntry::new()
            .finalize(PhotoPolicy::Required, Utc::now())
            .unwrap_err();
        match err {
            MatchaError::IncompleteEntry { missing } => assert_eq!(
                missing,
                vec![
                    MissingField::Photo,
                    MissingField::Rating,
                    MissingField::Greenness
                ]
            ),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn optional_photo_policy_allows_photo_less_entries() {
        let draft = DraftEntry::new().with_rating(StarRating::new(3).unwrap());
        let (draft, ticket) = draft.begin_analysis();
        let mut draft = draft.apply_analysis(ticket, "cup.png".into(), score(40));
        draft.photo = None;

        assert!(draft.finalize(PhotoPolicy::Required, Utc::now()).is_err());
        let entry = draft.finalize(PhotoPolicy::Optional, Utc::now()).unwrap();
        assert_eq!(entry.photo, "");
    }

    #[test]
    fn stale_analysis_is_discarded() {
        let (draft, first) = DraftEntry::new().begin_analysis();
        let (draft, second) = draft.begin_analysis();

        let draft = draft.apply_analysis(second, "new.png".into(), score(80));
        let draft = draft.apply_analysis(first, "old.png".into(), score(10));

        assert_eq!(draft.photo(), Some("new.png"));
        assert_eq!(draft.greenness(), Some(score(80)));
    }

    #[test]
    fn finalize_trims_notes_and_stamps_current_schema() {
        let (draft, ticket) = DraftEntry::new()
            .with_rating(StarRating::new(5).unwrap())
            .with_location("  Uji  ")
            .with_thoughts("   ")
            .begin_analysis();
        let draft = draft.apply_analysis(ticket, "cup.png".into(), score(91));

        let entry = draft.finalize(PhotoPolicy::Required, Utc::now()).unwrap();
        assert_eq!(entry.location.as_deref(), Some("Uji"));
        assert_eq!(entry.thoughts, None);
        assert_eq!(entry.schema, EntrySchema::V2);
        assert_eq!(entry.greenness.value(), 91);
    }

    #[test]
    fn reset_clears_fields_and_invalidates_tickets() {
        let (draft, ticket) = DraftEntry::new()
            .with_rating(StarRating::new(2).unwrap())
            .begin_analysis();
        let fresh = draft.reset();

        assert_eq!(fresh.rating(), None);
        let fresh = fresh.apply_analysis(ticket, "late.png".into(), score(50));
        assert_eq!(fresh.photo(), None);
    }
}

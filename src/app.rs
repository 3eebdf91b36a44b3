//! The presenter: wires scoring, drafts and the entry store together and turns every
//! failure into a `MatchaError` the caller can show.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use tokio::task;

use crate::{
    capture::{capture_frame, FrameSource},
    db::{Database, EntrySchema, ImportReport, RatingEntry},
    draft::DraftEntry,
    error::MatchaError,
    greenness::{analyze, GreennessScore, ImageFrame, ScoringProfile},
    log_error, log_info,
    log_view::{project, render, LogRow},
    settings::{SettingsStore, UserSettings},
};

const ENABLE_LOGS: bool = true;

pub const DATABASE_FILE: &str = "matcha_log.sqlite3";
pub const SETTINGS_FILE: &str = "settings.json";

/// Where a photo comes from. The reference is what gets stored on the entry.
#[derive(Debug, Clone)]
pub enum PhotoSource {
    File(PathBuf),
    DataUrl(String),
    Frame(ImageFrame),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPhoto {
    pub photo: String,
    pub score: GreennessScore,
}

fn decode_and_score(
    source: PhotoSource,
    profile: &ScoringProfile,
) -> anyhow::Result<ScoredPhoto> {
    let (photo, frame) = match source {
        PhotoSource::File(path) => {
            let frame = ImageFrame::open(&path)?;
            (path.display().to_string(), frame)
        }
        PhotoSource::DataUrl(url) => {
            let frame = ImageFrame::from_data_url(&url)?;
            (url, frame)
        }
        PhotoSource::Frame(frame) => {
            let url = frame
                .to_png_data_url()
                .context("failed to store captured frame")?;
            (url, frame)
        }
    };

    Ok(ScoredPhoto {
        photo,
        score: analyze(&frame, profile),
    })
}

pub struct MatchaApp {
    db: Database,
    settings: SettingsStore,
}

impl MatchaApp {
    pub fn open(data_dir: &Path) -> Result<Self, MatchaError> {
        let db = Database::new(data_dir.join(DATABASE_FILE)).map_err(MatchaError::storage)?;
        let settings =
            SettingsStore::new(data_dir.join(SETTINGS_FILE)).map_err(MatchaError::settings)?;
        Ok(Self { db, settings })
    }

    pub fn settings(&self) -> UserSettings {
        self.settings.get()
    }

    pub fn update_settings(&self, settings: UserSettings) -> Result<(), MatchaError> {
        self.settings
            .update(settings)
            .map_err(MatchaError::settings)
    }

    /// Decode and score a photo off the async executor.
    pub async fn score_photo(&self, source: PhotoSource) -> Result<ScoredPhoto, MatchaError> {
        let profile = ScoringProfile::for_kind(self.settings.get().scoring_profile);
        let scored = task::spawn_blocking(move || decode_and_score(source, &profile))
            .await
            .map_err(|err| MatchaError::InvalidImage(format!("analysis task failed: {err}")))?
            .map_err(MatchaError::invalid_image)?;

        log_info!("Scored photo: greenness {}", scored.score);
        Ok(scored)
    }

    /// Score a photo into a copy of the draft. The caller's draft is left untouched,
    /// so a failed analysis loses nothing. If the draft starts another analysis
    /// first, this result is dropped.
    pub async fn analyze_into(
        &self,
        draft: &DraftEntry,
        source: PhotoSource,
    ) -> Result<DraftEntry, MatchaError> {
        let (draft, ticket) = draft.clone().begin_analysis();
        let scored = self.score_photo(source).await?;
        Ok(draft.apply_analysis(ticket, scored.photo, scored.score))
    }

    pub async fn capture_into(
        &self,
        draft: &DraftEntry,
        camera: &mut dyn FrameSource,
    ) -> Result<DraftEntry, MatchaError> {
        let frame = capture_frame(camera)?;
        self.analyze_into(draft, PhotoSource::Frame(frame)).await
    }

    /// Persist the draft. Returns the stored entry and a fresh draft. On failure the
    /// caller still holds the original draft and may retry.
    pub async fn save_entry(
        &self,
        draft: &DraftEntry,
    ) -> Result<(RatingEntry, DraftEntry), MatchaError> {
        let policy = self.settings.get().photo_policy();
        let entry = draft.finalize(policy, Utc::now())?;
        if let Err(err) = self.db.upsert_entry(&entry).await {
            log_error!("Failed to save entry {}: {err:#}", entry.id);
            return Err(MatchaError::storage(err));
        }

        log_info!("Saved entry {} ({}, greenness {})", entry.id, entry.rating, entry.greenness);
        Ok((entry, draft.reset()))
    }

    pub async fn load_entries(&self) -> Result<Vec<RatingEntry>, MatchaError> {
        self.db
            .get_all_entries()
            .await
            .map_err(MatchaError::storage)
    }

    /// Stored entries in the configured display order.
    pub async fn sorted_entries(&self) -> Result<Vec<RatingEntry>, MatchaError> {
        let entries = self.load_entries().await?;
        Ok(project(&entries, self.settings.get().sort_policy))
    }

    pub async fn render_log(&self) -> Result<Vec<LogRow>, MatchaError> {
        let entries = self.load_entries().await?;
        Ok(render(&entries, self.settings.get().sort_policy))
    }

    pub async fn delete_entry(&self, id: &str) -> Result<bool, MatchaError> {
        self.db.delete_entry(id).await.map_err(MatchaError::storage)
    }

    pub async fn import_legacy(
        &self,
        json: &str,
        schema: EntrySchema,
    ) -> Result<ImportReport, MatchaError> {
        let report = self
            .db
            .import_legacy_log(json, schema)
            .await
            .map_err(MatchaError::storage)?;
        log_info!(
            "Imported {} legacy entries, skipped {}",
            report.imported,
            report.skipped.len()
        );
        Ok(report)
    }
}

//! Matcha rating log: photo greenness scoring and a local, sorted log of rated cups.

pub mod app;
pub mod capture;
pub mod db;
pub mod draft;
pub mod error;
pub mod greenness;
pub mod log_view;
pub mod settings;
mod utils;

pub use app::{MatchaApp, PhotoSource, ScoredPhoto};
pub use db::{Database, EntrySchema, ImportReport, RatingEntry, StarRating};
pub use draft::{AnalysisTicket, DraftEntry, PhotoPolicy};
pub use error::{MatchaError, MissingField};
pub use greenness::{analyze, GreennessScore, ImageFrame, ProfileKind, ScoreScale, ScoringProfile};
pub use log_view::{project, render, LogRow, SortPolicy};
pub use settings::{SettingsStore, UserSettings};
pub use utils::logging::init_logging;

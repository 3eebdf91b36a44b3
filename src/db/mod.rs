//! Local entry store backed by SQLite.

mod connection;
pub(crate) mod helpers;
mod migrations;
pub mod models;
pub mod repositories;

pub use connection::Database;
pub use helpers::parse_display_date;
pub use models::{EntrySchema, RatingEntry, StarRating};
pub use repositories::{legacy::parse_legacy_log, ImportReport, SkippedRecord};

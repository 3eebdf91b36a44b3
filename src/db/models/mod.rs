pub mod entry;

pub use entry::{display_date, EntrySchema, RatingEntry, StarRating};

pub mod entries;
pub mod legacy;

pub use legacy::{ImportReport, SkippedRecord};

pub mod projector;
pub mod render;

pub use projector::{project, SortPolicy};
pub use render::{render, LogRow};

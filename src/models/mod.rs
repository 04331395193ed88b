//! Data types shared across the pipeline.

pub mod item;
pub mod outcome;
pub mod seen;

pub use item::Item;
pub use outcome::{PublishResult, RunOutcome};
pub use seen::SeenRecord;

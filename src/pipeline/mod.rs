//! Pipeline entry point: fetch, filter, publish, record.

pub mod run;

pub use run::{run_pipeline, run_with_notifier};

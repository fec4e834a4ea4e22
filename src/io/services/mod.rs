//! Export service implementations.
//!
//! Orchestrates row splitting, file output and background execution.

pub mod export;
pub mod job;

pub use export::{ExportService, ProgressCallback};
pub use job::{ExportHandle, spawn_export, spawn_export_with_token};

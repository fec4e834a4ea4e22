//! Source loading and units export.
//!
//! Reads the `;`-delimited source table and writes one units file per row.
//!
//! # Architecture
//!
//! - **Format adapters** load the source table and implement [`UnitsSink`]
//! - **Export service** walks rows in order, reporting progress and honoring
//!   a cancel token at every row boundary
//! - **Jobs** run load and export on a blocking worker and publish events
//!
//! # Examples
//!
//! ## Export in the current thread
//!
//! ```rust,ignore
//! use tokio_util::sync::CancellationToken;
//! use unitsplit::io::{ExportService, load};
//!
//! let table = load("remessa/file.csv".as_ref())?;
//! let outcome = ExportService::new("unidades_recebiveis").export(&table, None, &CancellationToken::new());
//! println!("Wrote {} files", outcome.summary().files_written);
//! ```
//!
//! ## Export in the background
//!
//! ```rust,ignore
//! use unitsplit::io::spawn_export;
//!
//! let mut handle = spawn_export("remessa/file.csv", "unidades_recebiveis");
//! while let Some(event) = handle.next_event().await {
//!     println!("{event:?}");
//! }
//! let outcome = handle.join().await?;
//! ```

pub mod formats;
pub mod services;
pub mod traits;

// Re-exports for convenience
pub use formats::{DirectorySink, load, load_from_reader};
pub use services::{
    ExportHandle, ExportService, ProgressCallback, spawn_export, spawn_export_with_token,
};
pub use traits::UnitsSink;

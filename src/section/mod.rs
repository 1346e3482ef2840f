//! Sectioned motion-capture export reader.
//!
//! A source export is a text stream of repeating sections, each shaped
//!
//! ```text
//! [description]
//! [frame count]
//! [attributes]\t...
//! [column names]\t...
//! [units]\t...
//! <tab-separated data rows>
//! <blank line>
//! ```
//!
//! with an unknown number of sections per file. Each section is classified
//! by content, its headers aligned around an injected time axis, its rows
//! parsed into a [`rows::MeasurementMatrix`] and the result written out as
//! one normalized artifact per category.
//!
//! # Quick start
//! ```no_run
//! use std::path::Path;
//! use kinescan::section::ingest_file;
//! use kinescan::Heuristics;
//!
//! let heur = Heuristics::default();
//! let records = ingest_file(
//!     Path::new("P01 CMJ PRE 01.txt"),
//!     Path::new("estudio/P01"),
//!     &heur,
//! ).unwrap();
//! for rec in &records {
//!     println!("section {} → {} ({} rows)", rec.index, rec.category, rec.rows);
//! }
//! ```
pub mod classify;
pub mod header;
pub mod reader;
pub mod rows;
pub mod summary;

// Re-export the most commonly used items.
pub use classify::{classify, Category};
pub use header::{align_headers, AlignedHeaders};
pub use reader::{ingest_file, SectionRecord};
pub use rows::{format_value, Cell, MeasurementMatrix, RowReader};
pub use summary::{summarize, SectionSummary};

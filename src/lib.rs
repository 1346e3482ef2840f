//! # kinescan — motion-capture export ingestion in pure Rust
//!
//! `kinescan` ingests the multi-section text exports produced by
//! motion-capture acquisition software (kinematic, kinetic and
//! electromyographic signals mixed in one stream) and enforces the
//! file-naming grammar a study's metadata is encoded in (subject id,
//! one descriptor per independent variable, attempt number).
//!
//! ## Pipeline overview
//!
//! ```text
//! P01 CMJ PRE 01.txt, …
//!   │
//!   ├─ grammar::parse_filename()   subject / descriptors / attempt
//!   ├─ layout::collect_*()         existing files → validation state
//!   ├─ batch::validate_batch()     combination rules + study limits
//!   │     └─ any violation → whole batch rejected, all problems reported
//!   └─ section::ingest_file()      per accepted file:
//!        │
//!        ├─ classify    "Model Outputs" / "Force Plate" keyword rules
//!        ├─ align       headers + injected time axis
//!        ├─ parse       rows → MeasurementMatrix (missing = None)
//!        ├─ summarize   per-column max / min / range
//!        └─ write       {subject}/{category}/{stem}_{category}.{ext}
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use kinescan::{ingest_batch, Heuristics, IndependentVariable};
//!
//! let variables = vec![
//!     IndependentVariable::single("Salto", &["CMJ", "SJ"]),
//!     IndependentVariable::single("Momento", &["PRE", "POST"]),
//! ];
//!
//! let report = ingest_batch(
//!     Path::new("estudios/Saltos"),
//!     &[PathBuf::from("exports/P01 CMJ PRE 01.txt")],
//!     &variables,
//!     None,
//!     &Heuristics::default(),
//! ).unwrap();
//!
//! for violation in &report.outcome.violations {
//!     eprintln!("{violation}");
//! }
//! for file in &report.ingested {
//!     println!("{}: {} sections", file.source.display(), file.sections.len());
//! }
//! ```
//!
//! Processing is single-threaded and blocking: files are handled one at a
//! time, sections strictly in source order, and the batch decision is made
//! before the first byte of ingestion output is written.

pub mod batch;
pub mod config;
pub mod error;
pub mod grammar;
pub mod layout;
pub mod schema;
pub mod section;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// Everything a downstream user is likely to need is available directly as
// `kinescan::Foo` without having to know the internal module layout.

// config
pub use config::Heuristics;

// error
pub use error::{FormatError, IngestError, SchemaError};

// schema
pub use schema::{validate_schema, IndependentVariable};

// grammar
pub use grammar::{parse_filename, FilenameToken, GrammarReject};

// batch
pub use batch::{
    validate_batch, BatchOutcome, CandidateFile, RejectedFile, StudyLimits, Violation,
};

// layout
pub use layout::{collect_attempts, collect_descriptors, ensure_subject_layout};

// section — classifier, aligner, row parser, summary, engine
pub use section::{
    classify, ingest_file, Category, Cell, MeasurementMatrix, SectionRecord,
};

/// One source file that made it all the way through ingestion.
#[derive(Debug)]
pub struct IngestedFile {
    pub source: PathBuf,
    pub subject_id: String,
    pub sections: Vec<SectionRecord>,
}

/// One source file that failed mid-ingestion. The rest of the batch keeps
/// going; the failure is reported here.
#[derive(Debug)]
pub struct FileFailure {
    pub source: PathBuf,
    pub error: IngestError,
}

/// Everything that happened to one submitted batch.
#[derive(Debug)]
pub struct BatchReport {
    /// Grammar rejects and rule violations.
    pub outcome: BatchOutcome,
    /// Files ingested, in submission order. Empty when the batch was
    /// rejected.
    pub ingested: Vec<IngestedFile>,
    /// Files that failed during ingestion (malformed sections, I/O).
    pub failures: Vec<FileFailure>,
}

/// Validate and ingest a batch of source exports into a study folder.
///
/// The full validation runs first: every filename through the grammar, then
/// the study's limits and combination rules over the candidate batch plus
/// everything already on disk. Grammar rejects only exclude their own file;
/// any rule [`Violation`] rejects the whole batch before a single file is
/// touched. Once validation passes, each accepted file is copied into its
/// subject's `OG` folder and sectioned; a [`FormatError`] in one file
/// aborts that file only.
///
/// # Errors
///
/// Returns an error when the variable schema itself is invalid or the
/// existing study state cannot be read. Per-file problems never error:
/// they land in the report.
pub fn ingest_batch(
    study_dir: &Path,
    sources: &[PathBuf],
    variables: &[IndependentVariable],
    limits: Option<StudyLimits>,
    heur: &Heuristics,
) -> Result<BatchReport> {
    validate_schema(variables, heur)?;

    let existing = collect_descriptors(study_dir, variables, heur)
        .with_context(|| format!("scanning study folder {}", study_dir.display()))?;
    let attempts = collect_attempts(study_dir, variables, heur)
        .with_context(|| format!("scanning study folder {}", study_dir.display()))?;

    let filenames: Vec<String> = sources
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.to_string_lossy().into_owned())
        })
        .collect();
    let outcome = validate_batch(&filenames, &existing, &attempts, variables, limits, heur);

    if !outcome.is_accepted() {
        warn!(
            violations = outcome.violations.len(),
            "batch rejected, nothing ingested"
        );
        return Ok(BatchReport {
            outcome,
            ingested: Vec::new(),
            failures: Vec::new(),
        });
    }

    let mut ingested = Vec::new();
    let mut failures = Vec::new();
    // Candidates preserve submission order, so each one is found by walking
    // the source list forward.
    let mut remaining = filenames.iter().zip(sources);
    for cand in &outcome.accepted {
        let (_, source) = remaining
            .by_ref()
            .find(|(name, _)| **name == cand.filename)
            .expect("every candidate comes from the source list");

        match ingest_source(study_dir, source, &cand.token, heur) {
            Ok(sections) => {
                info!(
                    source = %source.display(),
                    subject = %cand.token.subject_id,
                    sections = sections.len(),
                    "file ingested"
                );
                ingested.push(IngestedFile {
                    source: source.clone(),
                    subject_id: cand.token.subject_id.clone(),
                    sections,
                });
            }
            Err(error) => {
                warn!(source = %source.display(), %error, "file failed, continuing with the batch");
                failures.push(FileFailure {
                    source: source.clone(),
                    error,
                });
            }
        }
    }

    Ok(BatchReport {
        outcome,
        ingested,
        failures,
    })
}

/// Copy one accepted source into its subject's `OG` folder and section it.
fn ingest_source(
    study_dir: &Path,
    source: &Path,
    token: &FilenameToken,
    heur: &Heuristics,
) -> Result<Vec<SectionRecord>, IngestError> {
    let subject_dir = ensure_subject_layout(study_dir, &token.subject_id)
        .map_err(|e| IngestError::io(study_dir, e))?;
    layout::copy_into_originals(source, &subject_dir)
        .map_err(|e| IngestError::io(source, e))?;
    ingest_file(source, &subject_dir, heur)
}

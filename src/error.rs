//! Error taxonomy for source-file ingestion.
//!
//! Two deliberately separate strategies live in this crate:
//!
//! * **Fatal parse failures** — the types below. A [`FormatError`] inside a
//!   section aborts the whole source file; callers re-submit a corrected
//!   file, nothing is repaired or retried.
//! * **Accumulated diagnostics** — [`crate::grammar::GrammarReject`] and
//!   [`crate::batch::Violation`] are plain values collected into lists so
//!   the caller sees every problem in one pass. They are never raised
//!   mid-computation.
use std::path::PathBuf;
use thiserror::Error;

/// A malformed construct inside one section of a source file.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The line after a section description was not a frame count.
    #[error("expected a frame count, got {0:?}")]
    BadFrameCount(String),

    /// The one-line recovery read after a kinematic description also failed
    /// to produce a frame count.
    #[error("expected a frame count after a model-outputs description, got {0:?}")]
    BadRecoveryFrameCount(String),

    /// The frame count parsed but the sampling step 1/frames is undefined.
    #[error("frame count must be a positive integer")]
    ZeroFrameCount,

    /// EOF while the attribute/column/unit header triplet was still open.
    #[error("unexpected end of file inside the section header")]
    TruncatedHeader,

    /// A data row did not match the aligned header width.
    #[error("row {row}: expected {expected} fields, found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A non-empty field that is not a number. Empty fields become missing
    /// values instead; anything else is a hard failure.
    #[error("row {row}, field {field}: {value:?} is not a number")]
    BadNumber {
        row: usize,
        field: usize,
        value: String,
    },
}

/// Failure that aborts ingestion of one source file.
///
/// Format failures carry the offending file and the 1-based section index so
/// the report names exactly where the file went wrong. A failed file never
/// stops the batch; the caller moves on to the next source.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{}: section {section}: {source}", file.display())]
    Format {
        file: PathBuf,
        section: usize,
        source: FormatError,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IngestError::Io { path: path.into(), source }
    }
}

/// An invalid study definition, detected before any file is accepted.
///
/// Descriptor sets are immutable once a study exists, so these checks run
/// exactly once, at definition time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("a study needs at least one independent variable")]
    NoVariables,

    #[error("independent variable #{0} has an empty name")]
    EmptyName(usize),

    #[error("duplicate independent variable name {0:?}")]
    DuplicateName(String),

    #[error("independent variable {name:?} needs at least two descriptors")]
    TooFewDescriptors { name: String },

    #[error("independent variable {name:?} contains an empty descriptor")]
    EmptyDescriptor { name: String },

    #[error("descriptor {descriptor:?} of {name:?} cannot contain whitespace")]
    DescriptorWhitespace { name: String, descriptor: String },

    #[error("descriptor {descriptor:?} of {name:?} collides with the reserved null marker")]
    ReservedDescriptor { name: String, descriptor: String },

    #[error("duplicate descriptor {descriptor:?} in {name:?}")]
    DuplicateDescriptor { name: String, descriptor: String },

    #[error("variable {name:?}: mandatory coverage requires combination to be allowed")]
    MandatoryWithoutCombination { name: String },
}

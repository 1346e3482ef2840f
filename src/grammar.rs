//! Filename grammar.
//!
//! Study files are named
//! `"{SubjectId} {Descriptor_1} … {Descriptor_n} {Attempt}[_Category].{ext}"`:
//! a subject identifier (letters then digits), one whitespace-separated
//! descriptor slot per independent variable — each slot either a descriptor
//! defined for *that* position's variable or the null marker — and a
//! positive attempt number. The grammar is positional, not name-tagged:
//! a valid descriptor in the wrong slot is a reject.
//!
//! Parsing never panics and never returns partial data: a reject carries
//! only its reason.
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;

use crate::config::{Heuristics, SUBJECT_ID_PATTERN};
use crate::layout::PROCESSED_DIRS;
use crate::schema::IndependentVariable;

static SUBJECT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(SUBJECT_ID_PATTERN).expect("subject-id pattern is valid"));

/// Parsed pieces of one study filename. Ephemeral: produced per validation
/// call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameToken {
    /// Letters-then-digits subject identifier, e.g. `P01`.
    pub subject_id: String,
    /// One slot per independent variable, in definition order; `None` for
    /// the null marker.
    pub descriptors: Vec<Option<String>>,
    /// Positive trial index.
    pub attempt: u32,
}

/// Why a filename failed the grammar. Non-fatal: the file is excluded from
/// the batch and reported, the rest of the batch continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarReject {
    #[error("expected at least a subject id and an attempt number")]
    TooFewTokens,

    #[error("{0:?} is not a subject id (letters followed by digits)")]
    BadSubjectId(String),

    #[error("{0:?} is not a positive attempt number")]
    BadAttempt(String),

    #[error("expected {expected} descriptor tokens, found {found}")]
    DescriptorCount { expected: usize, found: usize },

    #[error("{token:?} is not a descriptor of variable {variable:?} (slot {slot})")]
    UnknownDescriptor {
        slot: usize,
        token: String,
        variable: String,
    },

    #[error("every descriptor slot is null; at least one must apply")]
    AllNull,
}

/// Reduce a filename to the bare stem the grammar applies to: drop the
/// extension, then drop one trailing `_{Category}` suffix if present
/// (processed artifacts carry one).
fn grammar_stem(filename: &str) -> &str {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    match stem.rsplit_once('_') {
        Some((base, suffix)) if PROCESSED_DIRS.contains(&suffix) => base,
        _ => stem,
    }
}

/// Parse `filename` against the study's ordered variable list.
///
/// On success returns the subject id, one descriptor slot per variable
/// (`None` where the filename used the null marker) and the attempt number.
/// On failure returns the reject reason; none of the partially-parsed
/// fields survive.
pub fn parse_filename(
    filename: &str,
    variables: &[IndependentVariable],
    heur: &Heuristics,
) -> Result<FilenameToken, GrammarReject> {
    let parts: Vec<&str> = grammar_stem(filename).split_whitespace().collect();
    if parts.len() < 2 {
        return Err(GrammarReject::TooFewTokens);
    }

    let subject = parts[0];
    if !SUBJECT_ID_RE.is_match(subject) {
        return Err(GrammarReject::BadSubjectId(subject.to_string()));
    }

    let attempt_part = parts[parts.len() - 1];
    if attempt_part.is_empty() || !attempt_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GrammarReject::BadAttempt(attempt_part.to_string()));
    }
    let attempt: u32 = attempt_part
        .parse()
        .map_err(|_| GrammarReject::BadAttempt(attempt_part.to_string()))?;
    if attempt == 0 {
        return Err(GrammarReject::BadAttempt(attempt_part.to_string()));
    }

    let intermediate = &parts[1..parts.len() - 1];
    if intermediate.len() != variables.len() {
        return Err(GrammarReject::DescriptorCount {
            expected: variables.len(),
            found: intermediate.len(),
        });
    }

    let mut descriptors = Vec::with_capacity(variables.len());
    let mut any_concrete = false;
    for (slot, (&token, var)) in intermediate.iter().zip(variables).enumerate() {
        if token == heur.null_token {
            descriptors.push(None);
        } else if var.has_descriptor(token) {
            descriptors.push(Some(token.to_string()));
            any_concrete = true;
        } else {
            return Err(GrammarReject::UnknownDescriptor {
                slot: slot + 1,
                token: token.to_string(),
                variable: var.name.clone(),
            });
        }
    }

    if !any_concrete && !variables.is_empty() {
        return Err(GrammarReject::AllNull);
    }

    Ok(FilenameToken {
        subject_id: subject.to_string(),
        descriptors,
        attempt,
    })
}

//! Batch acceptance rules.
//!
//! Before any file of a batch is ingested, the whole candidate list is
//! checked against the study's combination policy and size limits,
//! *together with* every file the study already holds. Violations are
//! accumulated — never thrown — so one pass reports every problem, and the
//! batch is accepted only when the list comes back empty (all-or-nothing
//! gating).
//!
//! The per-subject state is rebuilt from scratch on every call from the
//! current on-disk snapshot; nothing is cached across calls.
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Heuristics;
use crate::grammar::{parse_filename, FilenameToken, GrammarReject};
use crate::schema::IndependentVariable;

/// Descriptor lists of already-accepted files, grouped by subject. One
/// inner `Vec<Option<String>>` per file, one slot per variable.
pub type DescriptorsBySubject = BTreeMap<String, Vec<Vec<Option<String>>>>;

/// Attempt numbers of already-accepted files, grouped by subject.
pub type AttemptsBySubject = BTreeMap<String, BTreeSet<u32>>;

/// A candidate that passed the filename grammar.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub filename: String,
    pub token: FilenameToken,
}

/// A candidate the grammar refused, excluded from the batch but reported.
#[derive(Debug, Clone)]
pub struct RejectedFile {
    pub filename: String,
    pub reason: GrammarReject,
}

/// Per-study ceilings fixed at definition time.
#[derive(Debug, Clone, Copy)]
pub struct StudyLimits {
    /// Maximum number of distinct subjects.
    pub max_subjects: usize,
    /// Maximum number of distinct attempts per subject.
    pub max_attempts: usize,
}

/// One batch-level constraint failure. All violations across all subjects
/// and variables are gathered before the batch verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// A single-valued variable saw more than one distinct descriptor for
    /// one subject.
    #[error(
        "subject {subject}: variable {variable:?} takes a single descriptor, found {}",
        found.join(", ")
    )]
    MultipleDescriptors {
        subject: String,
        variable: String,
        found: Vec<String>,
    },

    /// A mandatory multi-valued variable is missing descriptors for one
    /// subject.
    #[error(
        "subject {subject}: variable {variable:?} requires every descriptor at least once, missing {}",
        missing.join(", ")
    )]
    MissingCoverage {
        subject: String,
        variable: String,
        missing: Vec<String>,
    },

    /// Adding the batch would exceed the study's subject ceiling.
    #[error("study allows {max} subjects, the batch would make {found}")]
    TooManySubjects { max: usize, found: usize },

    /// Adding the batch would exceed a subject's attempt ceiling.
    #[error("subject {subject}: study allows {max} attempts, found {found}")]
    TooManyAttempts {
        subject: String,
        max: usize,
        found: usize,
    },
}

/// Aggregated decision for one candidate batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Grammar-valid candidates, in submission order.
    pub accepted: Vec<CandidateFile>,
    /// Grammar rejects, excluded from all further checks.
    pub rejected: Vec<RejectedFile>,
    /// Combination and limit violations over existing ∪ accepted.
    pub violations: Vec<Violation>,
}

impl BatchOutcome {
    /// True when ingestion may proceed. Grammar rejects alone do not block
    /// the batch; violations do.
    pub fn is_accepted(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check the combination policy of every variable for every subject over
/// existing files plus the candidate batch.
pub fn check_combination_rules(
    candidates: &[CandidateFile],
    existing: &DescriptorsBySubject,
    variables: &[IndependentVariable],
) -> Vec<Violation> {
    if variables.is_empty() {
        return Vec::new();
    }

    // Merge existing and candidate descriptor lists per subject.
    let mut by_subject: BTreeMap<&str, Vec<&[Option<String>]>> = BTreeMap::new();
    for (subject, lists) in existing {
        let entry = by_subject.entry(subject.as_str()).or_default();
        entry.extend(lists.iter().map(|l| l.as_slice()));
    }
    for cand in candidates {
        by_subject
            .entry(cand.token.subject_id.as_str())
            .or_default()
            .push(cand.token.descriptors.as_slice());
    }

    let mut violations = Vec::new();
    for (slot, var) in variables.iter().enumerate() {
        for (&subject, lists) in &by_subject {
            let observed: BTreeSet<&str> = lists
                .iter()
                .filter_map(|l| l.get(slot).and_then(|d| d.as_deref()))
                .collect();

            if !var.allows_combination && observed.len() > 1 {
                violations.push(Violation::MultipleDescriptors {
                    subject: subject.to_string(),
                    variable: var.name.clone(),
                    found: observed.iter().map(|d| d.to_string()).collect(),
                });
            }

            if var.allows_combination && var.is_mandatory {
                let mut missing: Vec<String> = var
                    .descriptors
                    .iter()
                    .filter(|d| !observed.contains(d.as_str()))
                    .cloned()
                    .collect();
                if !missing.is_empty() {
                    missing.sort();
                    violations.push(Violation::MissingCoverage {
                        subject: subject.to_string(),
                        variable: var.name.clone(),
                        missing,
                    });
                }
            }
        }
    }
    violations
}

/// Check the study's subject and attempt ceilings against the state the
/// batch would leave behind.
pub fn check_limits(
    candidates: &[CandidateFile],
    existing_attempts: &AttemptsBySubject,
    limits: StudyLimits,
) -> Vec<Violation> {
    let mut simulated: AttemptsBySubject = existing_attempts.clone();
    for cand in candidates {
        simulated
            .entry(cand.token.subject_id.clone())
            .or_default()
            .insert(cand.token.attempt);
    }

    let mut violations = Vec::new();
    if simulated.len() > limits.max_subjects {
        violations.push(Violation::TooManySubjects {
            max: limits.max_subjects,
            found: simulated.len(),
        });
    }
    for (subject, attempts) in &simulated {
        if attempts.len() > limits.max_attempts {
            violations.push(Violation::TooManyAttempts {
                subject: subject.clone(),
                max: limits.max_attempts,
                found: attempts.len(),
            });
        }
    }
    violations
}

/// Run the full batch validation: grammar per filename, then limits, then
/// combination rules over everything the grammar accepted.
pub fn validate_batch(
    filenames: &[String],
    existing: &DescriptorsBySubject,
    existing_attempts: &AttemptsBySubject,
    variables: &[IndependentVariable],
    limits: Option<StudyLimits>,
    heur: &Heuristics,
) -> BatchOutcome {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for filename in filenames {
        match parse_filename(filename, variables, heur) {
            Ok(token) => accepted.push(CandidateFile {
                filename: filename.clone(),
                token,
            }),
            Err(reason) => {
                warn!(%filename, %reason, "filename rejected by the study grammar");
                rejected.push(RejectedFile {
                    filename: filename.clone(),
                    reason,
                });
            }
        }
    }

    let mut violations = Vec::new();
    if let Some(limits) = limits {
        violations.extend(check_limits(&accepted, existing_attempts, limits));
    }
    violations.extend(check_combination_rules(&accepted, existing, variables));

    debug!(
        accepted = accepted.len(),
        rejected = rejected.len(),
        violations = violations.len(),
        "batch validated"
    );
    BatchOutcome {
        accepted,
        rejected,
        violations,
    }
}

//! Study directory layout.
//!
//! A study folder holds one directory per subject; each subject holds an
//! `OG` folder with the untouched originals plus one folder per category
//! for the normalized artifacts:
//!
//! ```text
//! estudio/
//!   P01/
//!     OG/            P01 CMJ PRE 01.txt          (original export)
//!     Cinematica/    P01 CMJ PRE 01_Cinematica.txt
//!     Cinetica/      P01 CMJ PRE 01_Cinetica.txt
//!     ...
//! ```
//!
//! Study and subject lifecycle is owned by the caller; this module only
//! creates category folders on demand and reads the layout back to rebuild
//! the validation state from the current on-disk snapshot.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::batch::{AttemptsBySubject, DescriptorsBySubject};
use crate::config::Heuristics;
use crate::grammar::{parse_filename, FilenameToken};
use crate::schema::IndependentVariable;
use crate::section::classify::Category;

/// Folder holding the untouched original exports of a subject.
pub const ORIGINALS_DIR: &str = "OG";

/// Category folders that hold processed artifacts and are scanned when the
/// existing-file state is rebuilt. `Desconocida` artifacts exist on disk
/// but never count toward validation.
pub const PROCESSED_DIRS: [&str; 3] = ["Cinematica", "Cinetica", "Electromiografica"];

/// Extensions the ingestion pipeline accepts.
pub const SOURCE_EXTENSIONS: [&str; 2] = ["txt", "csv"];

/// Study-level folders that are not subjects (compared case-insensitively).
const SKIPPED_DIRS: [&str; 3] = ["reportes", "temp", "og"];

/// `{study_dir}/{subject_id}`, with the `OG` and category folders created.
pub fn ensure_subject_layout(study_dir: &Path, subject_id: &str) -> io::Result<PathBuf> {
    let subject_dir = study_dir.join(subject_id);
    fs::create_dir_all(subject_dir.join(ORIGINALS_DIR))?;
    for dir in PROCESSED_DIRS {
        fs::create_dir_all(subject_dir.join(dir))?;
    }
    Ok(subject_dir)
}

/// Copy a source export into the subject's `OG` folder, returning the copy's
/// path.
pub fn copy_into_originals(source: &Path, subject_dir: &Path) -> io::Result<PathBuf> {
    let name = source.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "source path has no file name")
    })?;
    let dest = subject_dir.join(ORIGINALS_DIR).join(name);
    fs::copy(source, &dest)?;
    Ok(dest)
}

/// Artifact path for one classified section: the category name is appended
/// to the source stem and the file routed into the category folder.
pub fn artifact_path(subject_dir: &Path, source_name: &str, category: Category) -> PathBuf {
    let source = Path::new(source_name);
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source_name);
    let name = match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{category}.{ext}"),
        None => format!("{stem}_{category}"),
    };
    subject_dir.join(category.dir_name()).join(name)
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|s| ext.eq_ignore_ascii_case(s))
        })
}

/// Walk every processed category folder of every subject and hand each
/// grammar-valid artifact's parsed token to `visit`. Files that fail the
/// grammar are skipped: only valid names count toward the existing state.
fn scan_processed_files(
    study_dir: &Path,
    variables: &[IndependentVariable],
    heur: &Heuristics,
    mut visit: impl FnMut(FilenameToken),
) -> io::Result<()> {
    if !study_dir.is_dir() {
        debug!(study_dir = %study_dir.display(), "study folder does not exist yet, nothing to scan");
        return Ok(());
    }

    for entry in fs::read_dir(study_dir)? {
        let entry = entry?;
        let subject_dir = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !subject_dir.is_dir() || SKIPPED_DIRS.iter().any(|s| name.eq_ignore_ascii_case(s)) {
            continue;
        }

        for category_dir in PROCESSED_DIRS {
            let dir = subject_dir.join(category_dir);
            if !dir.is_dir() {
                continue;
            }
            for file in fs::read_dir(&dir)? {
                let file = file?;
                let path = file.path();
                if !path.is_file() || !has_source_extension(&path) {
                    continue;
                }
                let filename = file.file_name();
                if let Ok(token) =
                    parse_filename(&filename.to_string_lossy(), variables, heur)
                {
                    visit(token);
                }
            }
        }
    }
    Ok(())
}

/// Rebuild the per-subject descriptor lists from the processed artifacts on
/// disk. Built fresh on every call; nothing is cached.
pub fn collect_descriptors(
    study_dir: &Path,
    variables: &[IndependentVariable],
    heur: &Heuristics,
) -> io::Result<DescriptorsBySubject> {
    let mut by_subject = DescriptorsBySubject::new();
    scan_processed_files(study_dir, variables, heur, |token| {
        by_subject
            .entry(token.subject_id)
            .or_default()
            .push(token.descriptors);
    })?;
    Ok(by_subject)
}

/// Rebuild the per-subject attempt sets from the processed artifacts on
/// disk.
pub fn collect_attempts(
    study_dir: &Path,
    variables: &[IndependentVariable],
    heur: &Heuristics,
) -> io::Result<AttemptsBySubject> {
    let mut by_subject = AttemptsBySubject::new();
    scan_processed_files(study_dir, variables, heur, |token| {
        by_subject
            .entry(token.subject_id)
            .or_default()
            .insert(token.attempt);
    })?;
    Ok(by_subject)
}

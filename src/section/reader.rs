//! Section ingestion engine.
//!
//! # Algorithm
//! 1. Read one description line; EOF here is a clean end of file.
//! 2. Read the frame-count line. A non-numeric line after a kinematic
//!    description triggers exactly one recovery read (some exports slip an
//!    extra line in there); anything else is a format failure.
//! 3. Read the attribute/column/unit header triplet, classify the section,
//!    align the headers to `original column count + 1`.
//! 4. Parse data rows until a blank line or EOF.
//! 5. Write the normalized artifact (headers, formatted rows, summary) into
//!    the category folder and loop back to 1.
//!
//! Sections are strictly sequential: a section's start is only known once
//! the previous one is fully consumed. A format failure anywhere aborts the
//! remaining sections of the file — the caller re-submits a corrected
//! export, nothing is repaired.
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Heuristics;
use crate::error::{FormatError, IngestError};
use crate::layout::artifact_path;
use crate::section::classify::{classify, Category};
use crate::section::header::{align_headers, AlignedHeaders};
use crate::section::rows::{format_value, MeasurementMatrix, RowReader};
use crate::section::summary::{summarize, MAXIMUM_LABEL, MINIMUM_LABEL, RANGE_LABEL};

/// What one section of a source file became.
#[derive(Debug, Clone)]
pub struct SectionRecord {
    /// 1-based position within the source file.
    pub index: usize,
    pub category: Category,
    pub frame_count: u32,
    /// Number of data rows parsed.
    pub rows: usize,
    /// Where the normalized artifact was written.
    pub artifact: PathBuf,
}

/// Ingest every section of `source`, writing one artifact per section under
/// `subject_dir`. Returns the records in source order.
pub fn ingest_file(
    source: &Path,
    subject_dir: &Path,
    heur: &Heuristics,
) -> Result<Vec<SectionRecord>, IngestError> {
    let file = File::open(source).map_err(|e| IngestError::io(source, e))?;
    let mut lines = BufReader::new(file).lines();

    let source_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut records = Vec::new();
    let mut section = 0usize;
    loop {
        let Some(description) = read_line(&mut lines, source)? else {
            break;
        };
        section += 1;
        let fail = |kind| IngestError::Format {
            file: source.to_path_buf(),
            section,
            source: kind,
        };

        // The original export sometimes ends in stray separator lines; EOF
        // while looking for the next frame count is treated as a clean end.
        let Some(frame_line) = read_line(&mut lines, source)? else {
            break;
        };
        let frame_line = frame_line.trim().to_string();
        let frame_count = match parse_frame_count(&frame_line) {
            Some(n) => n,
            None if description.contains(&heur.kinematic_marker) => {
                // Kinematic headers can carry one extra line before the
                // count; allow a single recovery read.
                let Some(retry) = read_line(&mut lines, source)? else {
                    break;
                };
                let retry = retry.trim().to_string();
                parse_frame_count(&retry)
                    .ok_or_else(|| fail(FormatError::BadRecoveryFrameCount(retry)))?
            }
            None => return Err(fail(FormatError::BadFrameCount(frame_line))),
        };
        if frame_count == 0 {
            return Err(fail(FormatError::ZeroFrameCount));
        }

        // Header triplet: attributes, column names, units.
        let attr_line = read_line(&mut lines, source)?
            .ok_or_else(|| fail(FormatError::TruncatedHeader))?;
        let col_line = read_line(&mut lines, source)?
            .ok_or_else(|| fail(FormatError::TruncatedHeader))?;
        let unit_line = read_line(&mut lines, source)?
            .ok_or_else(|| fail(FormatError::TruncatedHeader))?;

        let category = classify(&description, &attr_line, heur);

        let columns = split_header(&col_line, heur);
        let target_width = columns.len() + 1;
        let headers = align_headers(
            split_header(&attr_line, heur),
            columns,
            split_header(&unit_line, heur),
            target_width,
            heur,
        );

        let mut rows = RowReader::new(frame_count, target_width, heur);
        loop {
            let Some(line) = read_line(&mut lines, source)? else {
                break;
            };
            if line.is_empty() {
                break;
            }
            rows.push_line(&line).map_err(fail)?;
        }
        let matrix = rows.finish();
        if matrix.is_empty() {
            warn!(
                source = %source.display(),
                section,
                %category,
                "section has no measurements"
            );
        }

        let artifact = artifact_path(subject_dir, &source_name, category);
        if let Some(parent) = artifact.parent() {
            fs::create_dir_all(parent).map_err(|e| IngestError::io(parent, e))?;
        }
        write_artifact(&artifact, frame_count, &headers, &matrix, heur)
            .map_err(|e| IngestError::io(&artifact, e))?;

        info!(
            source = %source.display(),
            section,
            %category,
            frame_count,
            rows = matrix.n_rows(),
            artifact = %artifact.display(),
            "section ingested"
        );
        records.push(SectionRecord {
            index: section,
            category,
            frame_count,
            rows: matrix.n_rows(),
            artifact,
        });
    }

    Ok(records)
}

fn read_line(
    lines: &mut Lines<BufReader<File>>,
    path: &Path,
) -> Result<Option<String>, IngestError> {
    match lines.next() {
        None => Ok(None),
        Some(Ok(line)) => Ok(Some(line)),
        Some(Err(e)) => Err(IngestError::io(path, e)),
    }
}

/// Digits-only frame count. Signs, decimals and overflow all fail.
fn parse_frame_count(line: &str) -> Option<u32> {
    if line.is_empty() || !line.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    line.parse().ok()
}

fn split_header(line: &str, heur: &Heuristics) -> Vec<String> {
    line.split(heur.source_separator).map(str::to_string).collect()
}

/// Artifact layout: frame count, the three aligned headers, the formatted
/// rows, then the three summary rows. The summary label sits in the time
/// slot, after the two leading placeholder fields.
fn write_artifact(
    path: &Path,
    frame_count: u32,
    headers: &AlignedHeaders,
    matrix: &MeasurementMatrix,
    heur: &Heuristics,
) -> std::io::Result<()> {
    let sep = heur.artifact_separator.to_string();
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "{frame_count}")?;
    writeln!(out, "{}", headers.attributes.join(&sep))?;
    writeln!(out, "{}", headers.columns.join(&sep))?;
    writeln!(out, "{}", headers.units.join(&sep))?;

    for row in matrix.data.rows() {
        let line: Vec<String> = row
            .iter()
            .map(|cell| format_value(*cell, heur.decimals))
            .collect();
        writeln!(out, "{}", line.join(&sep))?;
    }

    if !matrix.is_empty() {
        let stats = summarize(matrix, heur);
        for (label, values) in [
            (MAXIMUM_LABEL, &stats.max),
            (MINIMUM_LABEL, &stats.min),
            (RANGE_LABEL, &stats.range),
        ] {
            let joined: Vec<String> = values
                .iter()
                .map(|cell| format_value(*cell, heur.decimals))
                .collect();
            writeln!(out, "{sep}{sep}{label}{sep}{}", joined.join(&sep))?;
        }
    }

    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_accepts_digits_only() {
        assert_eq!(parse_frame_count("100"), Some(100));
        assert_eq!(parse_frame_count("0"), Some(0));
        assert_eq!(parse_frame_count(""), None);
        assert_eq!(parse_frame_count("-5"), None);
        assert_eq!(parse_frame_count("+5"), None);
        assert_eq!(parse_frame_count("10.5"), None);
        assert_eq!(parse_frame_count("Model Outputs"), None);
        // Overflow is not a frame count either.
        assert_eq!(parse_frame_count("99999999999999999999"), None);
    }
}

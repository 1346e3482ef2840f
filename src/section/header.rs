//! Header alignment.
//!
//! A section carries three parallel header lines — attributes, column
//! names, units — whose lengths rarely agree with each other or with the
//! data rows. Alignment splices the derived time column into all three and
//! forces every array to one target width so the artifact's header block
//! and data block always line up.
use crate::config::Heuristics;

/// The three aligned header arrays. All are exactly the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedHeaders {
    pub attributes: Vec<String>,
    pub columns: Vec<String>,
    pub units: Vec<String>,
}

/// Splice the time column in at [`Heuristics::time_index`] (empty attribute
/// slot, the time label as column name, empty unit slot), then pad with
/// empty strings or truncate so each array is exactly `target_width` long.
///
/// Never fails. Re-applying with the same target width is a no-op: the
/// splice is skipped when the column array already carries the time label
/// at its slot, so alignment pads and truncates but never accumulates.
pub fn align_headers(
    mut attributes: Vec<String>,
    mut columns: Vec<String>,
    mut units: Vec<String>,
    target_width: usize,
    heur: &Heuristics,
) -> AlignedHeaders {
    let already_aligned = columns
        .get(heur.time_index)
        .is_some_and(|c| *c == heur.time_label);
    if !already_aligned {
        // Splice positions clamp to the array end for degenerate short headers.
        attributes.insert(heur.time_index.min(attributes.len()), String::new());
        columns.insert(heur.time_index.min(columns.len()), heur.time_label.clone());
        units.insert(heur.time_index.min(units.len()), String::new());
    }

    for array in [&mut attributes, &mut columns, &mut units] {
        array.resize(target_width, String::new());
    }

    AlignedHeaders {
        attributes,
        columns,
        units,
    }
}

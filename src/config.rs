//! Ingestion heuristics.
//!
//! [`Heuristics`] holds every content rule the ingestion and naming engines
//! key off: classifier keywords, the reserved null marker, separators and
//! number formatting. All fields have defaults matching the export dialect
//! the studies were recorded with.

/// Pattern a subject identifier must match: one or more letters followed by
/// one or more digits (`P01`, `Sujeto007`).
pub const SUBJECT_ID_PATTERN: &str = "^[A-Za-z]+[0-9]+$";

/// Content rules for section classification and filename parsing.
///
/// All fields are `pub` so a caller with a different export dialect can
/// construct one with struct-update syntax:
///
/// ```
/// use kinescan::Heuristics;
///
/// let heur = Heuristics {
///     kinematic_marker: "Joint Angles".into(),
///     ..Heuristics::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Heuristics {
    /// Substring of a section *description* line that marks a kinematic
    /// section. Checked first: kinetic text can appear inside a kinematic
    /// header, so this marker takes precedence.
    ///
    /// Default: `"Model Outputs"`.
    pub kinematic_marker: String,

    /// Substring of a section *attribute-header* line that marks a kinetic
    /// section.
    ///
    /// Default: `"Force Plate"`.
    pub kinetic_marker: String,

    /// Reserved filename token meaning "this variable does not apply".
    /// Never a valid descriptor (the schema validator rejects it,
    /// case-insensitively).
    ///
    /// Default: `"Nulo"`.
    pub null_token: String,

    /// Field separator of the source export.
    ///
    /// Default: `'\t'`.
    pub source_separator: char,

    /// Field separator of the normalized artifacts.
    ///
    /// Default: `';'`.
    pub artifact_separator: char,

    /// Index at which the derived time column is spliced into both the
    /// header arrays and every data row.
    ///
    /// Default: `2` (after the frame and sub-frame columns).
    pub time_index: usize,

    /// Label of the injected time column.
    ///
    /// Default: `"Time"`.
    pub time_label: String,

    /// Maximum decimal places when formatting artifact values. Trailing
    /// zeros and a trailing decimal point are trimmed afterwards.
    ///
    /// Default: `6`.
    pub decimals: usize,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            kinematic_marker: "Model Outputs".into(),
            kinetic_marker: "Force Plate".into(),
            null_token: "Nulo".into(),
            source_separator: '\t',
            artifact_separator: ';',
            time_index: 2,
            time_label: "Time".into(),
            decimals: 6,
        }
    }
}

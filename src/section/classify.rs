//! Section classification by content keywords.
//!
//! The export puts no explicit type marker on a section, so the category is
//! inferred from two header lines. The precedence is deliberate: kinematic
//! sections can mention force plates inside their attribute header, so the
//! kinematic marker is checked first.
//!
//! There is no electromyographic rule yet; EMG sections land in
//! [`Category::Unknown`] until a reliable keyword is confirmed.
// TODO: classify EMG sections once a marker is confirmed ("Delsys"?).
use std::fmt;

use crate::config::Heuristics;

/// The signal family a section belongs to. Also names the subdirectory its
/// normalized artifact is routed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Kinematic,
    Kinetic,
    Unknown,
}

impl Category {
    /// Subdirectory (and filename suffix) for this category's artifacts.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Kinematic => "Cinematica",
            Category::Kinetic => "Cinetica",
            Category::Unknown => "Desconocida",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Classify one section from its description line and its attribute-header
/// line. First match wins:
///
/// 1. description contains the kinematic marker → [`Category::Kinematic`]
/// 2. attribute line contains the kinetic marker → [`Category::Kinetic`]
/// 3. otherwise → [`Category::Unknown`]
pub fn classify(description: &str, attributes: &str, heur: &Heuristics) -> Category {
    if description.contains(&heur.kinematic_marker) {
        Category::Kinematic
    } else if attributes.contains(&heur.kinetic_marker) {
        Category::Kinetic
    } else {
        Category::Unknown
    }
}

//! Study schema: independent variables and their descriptor sets.
//!
//! A study fixes an *ordered* list of independent variables at definition
//! time. Order matters: the filename grammar is positional, so variable
//! *i* owns the *i*-th descriptor slot of every filename. The descriptor
//! sets are immutable once the study exists.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::Heuristics;
use crate::error::SchemaError;

/// One experimental factor with a closed set of permitted descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndependentVariable {
    /// Unique name within the study.
    pub name: String,

    /// Permitted descriptor tokens, in definition order.
    pub descriptors: Vec<String>,

    /// May one subject contribute more than one distinct descriptor for
    /// this variable across its attempts?
    #[serde(default)]
    pub allows_combination: bool,

    /// When combination is allowed: must every defined descriptor appear at
    /// least once per subject? Meaningless (and rejected) otherwise.
    #[serde(default)]
    pub is_mandatory: bool,
}

impl IndependentVariable {
    /// Convenience constructor for the common single-valued case.
    pub fn single(name: &str, descriptors: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            descriptors: descriptors.iter().map(|d| d.to_string()).collect(),
            allows_combination: false,
            is_mandatory: false,
        }
    }

    /// True when `token` is one of this variable's descriptors.
    pub fn has_descriptor(&self, token: &str) -> bool {
        self.descriptors.iter().any(|d| d == token)
    }
}

/// Check a whole variable list at study-definition time.
///
/// Enforces: at least one variable, unique non-empty names, at least two
/// descriptors per variable, descriptors unique within their variable,
/// non-empty, free of whitespace and never the reserved null marker
/// (case-insensitive), and `is_mandatory ⇒ allows_combination`.
pub fn validate_schema(
    variables: &[IndependentVariable],
    heur: &Heuristics,
) -> Result<(), SchemaError> {
    if variables.is_empty() {
        return Err(SchemaError::NoVariables);
    }

    let mut names = HashSet::new();
    for (i, var) in variables.iter().enumerate() {
        let name = var.name.trim();
        if name.is_empty() {
            return Err(SchemaError::EmptyName(i + 1));
        }
        if !names.insert(name.to_string()) {
            return Err(SchemaError::DuplicateName(name.to_string()));
        }

        if var.descriptors.len() < 2 {
            return Err(SchemaError::TooFewDescriptors { name: name.to_string() });
        }

        // Descriptor names may repeat across variables, just not within one.
        let mut seen = HashSet::new();
        for desc in &var.descriptors {
            let desc = desc.trim();
            if desc.is_empty() {
                return Err(SchemaError::EmptyDescriptor { name: name.to_string() });
            }
            if desc.chars().any(char::is_whitespace) {
                return Err(SchemaError::DescriptorWhitespace {
                    name: name.to_string(),
                    descriptor: desc.to_string(),
                });
            }
            if desc.eq_ignore_ascii_case(&heur.null_token) {
                return Err(SchemaError::ReservedDescriptor {
                    name: name.to_string(),
                    descriptor: desc.to_string(),
                });
            }
            if !seen.insert(desc.to_string()) {
                return Err(SchemaError::DuplicateDescriptor {
                    name: name.to_string(),
                    descriptor: desc.to_string(),
                });
            }
        }

        if var.is_mandatory && !var.allows_combination {
            return Err(SchemaError::MandatoryWithoutCombination { name: name.to_string() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heur() -> Heuristics {
        Heuristics::default()
    }

    #[test]
    fn accepts_a_well_formed_schema() {
        let vars = vec![
            IndependentVariable::single("Salto", &["CMJ", "SJ"]),
            IndependentVariable {
                name: "Momento".into(),
                descriptors: vec!["PRE".into(), "POST".into()],
                allows_combination: true,
                is_mandatory: true,
            },
        ];
        assert!(validate_schema(&vars, &heur()).is_ok());
    }

    #[test]
    fn rejects_empty_variable_list() {
        assert_eq!(validate_schema(&[], &heur()), Err(SchemaError::NoVariables));
    }

    #[test]
    fn rejects_duplicate_variable_names() {
        let vars = vec![
            IndependentVariable::single("Salto", &["CMJ", "SJ"]),
            IndependentVariable::single("Salto", &["PRE", "POST"]),
        ];
        assert_eq!(
            validate_schema(&vars, &heur()),
            Err(SchemaError::DuplicateName("Salto".into()))
        );
    }

    #[test]
    fn rejects_single_descriptor_variable() {
        let vars = vec![IndependentVariable::single("Salto", &["CMJ"])];
        assert!(matches!(
            validate_schema(&vars, &heur()),
            Err(SchemaError::TooFewDescriptors { .. })
        ));
    }

    #[test]
    fn rejects_null_marker_as_descriptor_case_insensitive() {
        let vars = vec![IndependentVariable::single("Salto", &["CMJ", "nulo"])];
        assert!(matches!(
            validate_schema(&vars, &heur()),
            Err(SchemaError::ReservedDescriptor { .. })
        ));
    }

    #[test]
    fn rejects_descriptor_with_spaces() {
        let vars = vec![IndependentVariable::single("Salto", &["CMJ", "drop jump"])];
        assert!(matches!(
            validate_schema(&vars, &heur()),
            Err(SchemaError::DescriptorWhitespace { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_descriptor_within_variable() {
        let vars = vec![IndependentVariable::single("Salto", &["CMJ", "CMJ"])];
        assert!(matches!(
            validate_schema(&vars, &heur()),
            Err(SchemaError::DuplicateDescriptor { .. })
        ));
    }

    #[test]
    fn same_descriptor_in_two_variables_is_fine() {
        let vars = vec![
            IndependentVariable::single("Pierna", &["IZQ", "DER"]),
            IndependentVariable::single("Lado", &["IZQ", "DER"]),
        ];
        assert!(validate_schema(&vars, &heur()).is_ok());
    }

    #[test]
    fn mandatory_requires_combination() {
        let vars = vec![IndependentVariable {
            name: "Momento".into(),
            descriptors: vec!["PRE".into(), "POST".into()],
            allows_combination: false,
            is_mandatory: true,
        }];
        assert_eq!(
            validate_schema(&vars, &heur()),
            Err(SchemaError::MandatoryWithoutCombination { name: "Momento".into() })
        );
    }
}

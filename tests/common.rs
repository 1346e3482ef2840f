/// Shared helpers for building study fixtures on disk.
use std::fs;
use std::path::{Path, PathBuf};

use kinescan::IndependentVariable;

/// `[Salto: {CMJ, SJ}] [Momento: {PRE, POST}]`, both single-valued.
#[allow(unused)]
pub fn single_valued_schema() -> Vec<IndependentVariable> {
    vec![
        IndependentVariable::single("Salto", &["CMJ", "SJ"]),
        IndependentVariable::single("Momento", &["PRE", "POST"]),
    ]
}

/// Same variables, but `Momento` is multi-valued with mandatory coverage.
#[allow(unused)]
pub fn mandatory_schema() -> Vec<IndependentVariable> {
    vec![
        IndependentVariable::single("Salto", &["CMJ", "SJ"]),
        IndependentVariable {
            name: "Momento".into(),
            descriptors: vec!["PRE".into(), "POST".into()],
            allows_combination: true,
            is_mandatory: true,
        },
    ]
}

/// Write `content` to `dir/name` and return the full path.
#[allow(unused)]
pub fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// One kinetic section: force-plate attributes, five columns, two rows,
/// one missing cell.
#[allow(unused)]
pub fn kinetic_section() -> &'static str {
    "Devices\n\
     1000\n\
     \t\tForce Plate #1 - Force\t\t\n\
     Frame\tSub Frame\tFx\tFy\tFz\n\
     \t\tN\tN\tN\n\
     1\t0\t0.5\t\t9.81\n\
     2\t0\t-0.25\t3\t9.81\n\
     \n"
}

/// One kinematic section, including the extra line before the frame count
/// that the recovery read exists for.
#[allow(unused)]
pub fn kinematic_section_with_recovery() -> &'static str {
    "Model Outputs - Gait\n\
     not a frame count\n\
     100\n\
     \t\tP01:LAnkleAngles\n\
     Frame\tSub Frame\tLAnkleX\n\
     \t\tdeg\n\
     1\t0\t12.5\n\
     2\t0\t13\n\
     3\t0\t13.5\n\
     \n"
}

/// Read an artifact back as lines.
#[allow(unused)]
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("artifact not found: {}", path.display()))
        .lines()
        .map(String::from)
        .collect()
}

/// Drop an empty processed artifact into a subject's category folder, so the
/// scanners see it as existing study state. Only the name matters.
#[allow(unused)]
pub fn seed_artifact(study_dir: &Path, subject: &str, category_dir: &str, name: &str) {
    let dir = study_dir.join(subject).join(category_dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), "").unwrap();
}

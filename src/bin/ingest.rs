use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use kinescan::{ingest_batch, Heuristics, IndependentVariable, StudyLimits};

#[derive(Parser)]
#[command(name = "ingest", about = "Validate and ingest motion-capture exports into a study folder")]
struct Args {
    /// Study folder (subject directories are created beneath it)
    #[arg(long)]
    study_dir: PathBuf,

    /// JSON file with the study's independent variables:
    /// [{"name": "...", "descriptors": ["...", ...],
    ///   "allows_combination": false, "is_mandatory": false}, ...]
    #[arg(long)]
    schema: PathBuf,

    /// Maximum number of subjects in the study
    #[arg(long)]
    max_subjects: Option<usize>,

    /// Maximum number of attempts per subject
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Only validate: report the batch decision without ingesting
    #[arg(long)]
    dry_run: bool,

    /// Source export files to add
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let schema_text = std::fs::read_to_string(&args.schema)
        .with_context(|| format!("reading schema {}", args.schema.display()))?;
    let variables: Vec<IndependentVariable> = serde_json::from_str(&schema_text)
        .with_context(|| format!("parsing schema {}", args.schema.display()))?;

    let limits = match (args.max_subjects, args.max_attempts) {
        (Some(max_subjects), Some(max_attempts)) => Some(StudyLimits {
            max_subjects,
            max_attempts,
        }),
        (None, None) => None,
        _ => bail!("--max-subjects and --max-attempts must be given together"),
    };

    if args.dry_run {
        let heur = Heuristics::default();
        let existing = kinescan::collect_descriptors(&args.study_dir, &variables, &heur)?;
        let attempts = kinescan::collect_attempts(&args.study_dir, &variables, &heur)?;
        let names: Vec<String> = args
            .files
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        let outcome =
            kinescan::validate_batch(&names, &existing, &attempts, &variables, limits, &heur);
        report_outcome(&outcome);
        if !outcome.is_accepted() {
            bail!("batch rejected");
        }
        return Ok(());
    }

    let report = ingest_batch(
        &args.study_dir,
        &args.files,
        &variables,
        limits,
        &Heuristics::default(),
    )?;

    report_outcome(&report.outcome);
    for file in &report.ingested {
        println!(
            "{}: {} section(s) ingested for {}",
            file.source.display(),
            file.sections.len(),
            file.subject_id
        );
    }
    for failure in &report.failures {
        eprintln!("FAILED {}", failure.error);
    }

    if !report.outcome.is_accepted() {
        bail!("batch rejected");
    }
    if !report.failures.is_empty() {
        bail!("{} file(s) failed during ingestion", report.failures.len());
    }
    Ok(())
}

fn report_outcome(outcome: &kinescan::BatchOutcome) {
    for rejected in &outcome.rejected {
        eprintln!("REJECTED {}: {}", rejected.filename, rejected.reason);
    }
    for violation in &outcome.violations {
        eprintln!("VIOLATION {violation}");
    }
}

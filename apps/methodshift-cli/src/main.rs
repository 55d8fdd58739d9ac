//! methodshift - record engine CLI
//!
//! Usage:
//!   methodshift validate --input rows.jsonl [--lenient]
//!   methodshift dedupe --input rows.jsonl --out deduped.jsonl
//!   methodshift tag --input deduped.jsonl --dictionary method_dict.yaml --out tagged.jsonl

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use methodshift_core::{
    default_config_path, tag_records, validate_table, validate_table_lenient, DedupeConfig,
    Deduplicator, MethodDictionary, RawRecord, Record, ScorerChoice,
};
use tracing_subscriber::EnvFilter;

mod table;

#[derive(Parser)]
#[command(
    name = "methodshift",
    version,
    about = "Validate, deduplicate and tag bibliographic records"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate rows and print normalized records as JSON Lines
    Validate {
        /// Input rows (.json array or JSON Lines)
        #[arg(short, long)]
        input: PathBuf,
        /// Quarantine invalid rows instead of failing
        #[arg(long)]
        lenient: bool,
    },
    /// Collapse duplicate records into one canonical record each
    Dedupe {
        /// Input rows (.json array or JSON Lines)
        #[arg(short, long)]
        input: PathBuf,
        /// Output file for deduplicated records
        #[arg(short, long)]
        out: PathBuf,
        /// TOML config file (defaults to the user config if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Minimum similarity (0-100) for merging
        #[arg(long)]
        threshold: Option<u8>,
        /// Title tokens kept in fingerprints
        #[arg(long)]
        max_tokens: Option<usize>,
        /// Similarity scorer: auto, token-set or sorted-tokens
        #[arg(long)]
        scorer: Option<ScorerChoice>,
        /// Also write merge decisions as JSON
        #[arg(long)]
        decisions: Option<PathBuf>,
    },
    /// Tag records with statistical methods from a phrase dictionary
    Tag {
        /// Input records (.json array or JSON Lines)
        #[arg(short, long)]
        input: PathBuf,
        /// YAML method dictionary
        #[arg(short, long)]
        dictionary: PathBuf,
        /// Output file for tagged records
        #[arg(short, long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so `validate` can stream records on stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Validate { input, lenient } => run_validate(&input, lenient),
        Command::Dedupe {
            input,
            out,
            config,
            threshold,
            max_tokens,
            scorer,
            decisions,
        } => {
            let mut config = resolve_config(config.as_deref())?;
            if let Some(threshold) = threshold {
                config.similarity_threshold = threshold;
            }
            if let Some(max_tokens) = max_tokens {
                config.max_fingerprint_tokens = max_tokens;
            }
            if let Some(scorer) = scorer {
                config.scorer = scorer;
            }
            run_dedupe(&input, &out, config, decisions.as_deref())
        }
        Command::Tag {
            input,
            dictionary,
            out,
        } => run_tag(&input, &dictionary, &out),
    }
}

/// `--config`, else the user config file if it exists, else defaults
fn resolve_config(explicit: Option<&Path>) -> Result<DedupeConfig> {
    if let Some(path) = explicit {
        return DedupeConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }
    match default_config_path() {
        Some(path) if path.exists() => {
            tracing::info!("Using config {}", path.display());
            DedupeConfig::load(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        }
        _ => Ok(DedupeConfig::default()),
    }
}

fn run_validate(input: &Path, lenient: bool) -> Result<()> {
    let rows: Vec<RawRecord> = table::read_rows(input)?;
    let records = if lenient {
        let report = validate_table_lenient(&rows);
        tracing::info!(
            valid = report.records.len(),
            rejected = report.rejected.len(),
            "Validated {} rows",
            rows.len()
        );
        report.records
    } else {
        validate_table(&rows).with_context(|| format!("Invalid rows in {}", input.display()))?
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    table::write_json_lines(&mut handle, &records)?;
    handle.flush()?;
    Ok(())
}

fn run_dedupe(
    input: &Path,
    out: &Path,
    config: DedupeConfig,
    decisions_path: Option<&Path>,
) -> Result<()> {
    let engine = Deduplicator::from_config(config).context("Invalid deduplication config")?;
    tracing::info!(
        scorer = engine.scorer().name(),
        threshold = engine.config().similarity_threshold,
        "Deduplicating {}",
        input.display()
    );

    let rows: Vec<RawRecord> = table::read_rows(input)?;
    let outcome = engine
        .deduplicate(&rows)
        .with_context(|| format!("Invalid rows in {}", input.display()))?;

    table::write_rows(out, &outcome.records)?;
    if let Some(path) = decisions_path {
        table::write_rows(path, &outcome.decisions)?;
    }

    outcome.stats.report();
    tracing::info!("Saved {} records to {}", outcome.records.len(), out.display());
    Ok(())
}

fn run_tag(input: &Path, dictionary_path: &Path, out: &Path) -> Result<()> {
    let dictionary = MethodDictionary::load(dictionary_path)
        .with_context(|| format!("Failed to load dictionary {}", dictionary_path.display()))?;
    let rows: Vec<RawRecord> = table::read_rows(input)?;
    let records: Vec<Record> =
        validate_table(&rows).with_context(|| format!("Invalid rows in {}", input.display()))?;

    let tagged = tag_records(&records, &dictionary);
    table::write_rows(out, &tagged)?;
    tracing::info!("Tagged {} records and saved to {}", tagged.len(), out.display());
    Ok(())
}

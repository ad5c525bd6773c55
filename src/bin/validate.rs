//! Instance Validation CLI
//!
//! Discovers example instance documents and validates each one, either by
//! walking the model definitions or against the projected JSON Schemas.
//!
//! Usage:
//!   rap-validate
//!   rap-validate --dir samples --kind participant
//!   rap-validate --engine schema

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rap_spec::config::ValidationConfig;
use rap_spec::{
    InstanceValidator, ModelCatalog, RapConfig, SchemaConformance, SchemaKind, SchemaProjector,
};
use serde_json::Value;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "rap-validate")]
#[command(about = "Validate RAP instance documents")]
struct Cli {
    /// Directory scanned for instances (default: validation.instances_dir from configuration)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Kind every instance is validated as (default: validation.default_kind)
    #[arg(short, long)]
    kind: Option<SchemaKind>,

    /// Validation engine
    #[arg(short, long, value_enum, default_value_t = Engine::Model)]
    engine: Engine,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Engine {
    /// Walk the model definitions (fail-fast, one error per file)
    Model,
    /// Check against the projected JSON Schema documents
    Schema,
}

/// The selected engine, ready to check documents
enum Checker<'a> {
    Model(InstanceValidator<'a>),
    Schema(SchemaConformance),
}

impl Checker<'_> {
    /// `Ok(())` when valid, otherwise the error detail to print
    fn check(&self, document: &Value, kind: SchemaKind) -> Result<(), String> {
        match self {
            Checker::Model(validator) => validator
                .validate(document, kind)
                .map(|_| ())
                .map_err(|e| e.to_string()),
            Checker::Schema(engine) => match engine.violations(document, kind) {
                Ok(violations) if violations.is_empty() => Ok(()),
                Ok(violations) => Err(violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n  Error: ")),
                Err(e) => Err(e.to_string()),
            },
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = RapConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    let dir = cli.dir.clone().unwrap_or_else(|| config.validation.instances_dir.clone());
    let kind = cli.kind.unwrap_or(config.validation.default_kind);

    let catalog = ModelCatalog::standard()?;
    let checker = match cli.engine {
        Engine::Model => Checker::Model(InstanceValidator::from_config(&catalog, &config)?),
        Engine::Schema => {
            let projector = SchemaProjector::new(&catalog, &config.policy);
            Checker::Schema(SchemaConformance::new(&projector)?)
        }
    };

    println!("Validating {} files in {} as {}...\n", engine_label(cli.engine), dir.display(), kind);

    let files = discover(&dir, &config.validation);
    if files.is_empty() {
        println!("⚠ No example files found");
        return Ok(false);
    }

    let mut valid = 0;
    let mut invalid = 0;
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let outcome = load(path).and_then(|document| checker.check(&document, kind));
        match outcome {
            Ok(()) => {
                println!("✓ Valid: {}", name);
                valid += 1;
            }
            Err(detail) => {
                println!("✗ Invalid: {}", name);
                println!("  Error: {}", detail);
                invalid += 1;
            }
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("Results: {} valid, {} invalid", valid, invalid);
    println!("{}", "=".repeat(60));

    Ok(invalid == 0)
}

fn engine_label(engine: Engine) -> &'static str {
    match engine {
        Engine::Model => "example",
        Engine::Schema => "example (JSON Schema engine)",
    }
}

/// Instance files under `dir`, recursively, sorted by path
fn discover(dir: &Path, config: &ValidationConfig) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| config.matches_extension(path))
        .collect();
    files.sort();
    debug!(count = files.len(), dir = %dir.display(), "Discovered instance files");
    files
}

fn load(path: &Path) -> Result<Value, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid JSON: {}", e))
}

//! Schema Generation CLI
//!
//! Regenerates every published RAP schema from the model definitions, or with
//! `--check` compares the published files against a fresh projection.
//!
//! Usage:
//!   rap-generate
//!   rap-generate --output schemas/v1
//!   rap-generate --check

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use rap_spec::drift::{self, DriftStatus};
use rap_spec::model::{standard_definitions, ModelCatalog};
use rap_spec::{RapConfig, SchemaGroup, SchemaKind, SchemaProjector};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rap-generate")]
#[command(about = "Generate RAP JSON Schema files from the model definitions")]
struct Cli {
    /// Output directory (default: output.schemas_dir from configuration)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compare published files with a fresh projection instead of writing
    #[arg(long)]
    check: bool,
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
    let output_dir = cli.output.unwrap_or_else(|| config.output.schemas_dir.clone());

    let catalog = ModelCatalog::from_definitions(standard_definitions())?;
    // The projector rejects undeclared references and conflicting wire names
    // per schema, so an inconsistent definition fails only the kinds reaching it
    if let Err(e) = catalog.verify() {
        warn!(error = %e, "Model catalog is inconsistent");
        eprintln!("⚠ Definition error: {}", e);
    }

    let projector = SchemaProjector::new(&catalog, &config.policy)
        .with_format(config.output.format);

    if cli.check {
        check(&projector, &output_dir)
    } else {
        Ok(generate(&projector, &output_dir))
    }
}

fn print_group_heading(current: &mut Option<SchemaGroup>, kind: SchemaKind) {
    let group = kind.group();
    if *current != Some(group) {
        if current.is_some() {
            println!();
        }
        println!("{}:", group.heading());
        *current = Some(group);
    }
}

fn generate(projector: &SchemaProjector<'_>, output_dir: &Path) -> bool {
    println!("Generating JSON Schemas from the RAP model definitions...\n");

    let mut group = None;
    let mut failed = 0;
    for kind in SchemaKind::all() {
        print_group_heading(&mut group, *kind);
        match projector.write(*kind, output_dir) {
            Ok((_, path)) => println!("✓ Generated: {}", path.display()),
            Err(e) => {
                println!("✗ Failed: {}", output_dir.join(kind.relative_path()).display());
                println!("  Error: {}", e);
                failed += 1;
            }
        }
    }

    if failed == 0 {
        println!("\n✅ All schemas generated successfully!");
        println!("   Output directory: {}", output_dir.display());
        true
    } else {
        println!("\n❌ {} of {} schemas failed to generate", failed, SchemaKind::ALL.len());
        println!("   Output directory: {}", output_dir.display());
        false
    }
}

fn check(projector: &SchemaProjector<'_>, output_dir: &Path) -> anyhow::Result<bool> {
    println!("🔍 Checking published schemas in {}\n", output_dir.display());

    let mut group = None;
    let mut clean = true;
    for kind in SchemaKind::all() {
        print_group_heading(&mut group, *kind);
        let generated = match projector.generate(*kind) {
            Ok(generated) => generated,
            Err(e) => {
                println!("✗ Failed: {}", kind);
                println!("  Error: {}", e);
                clean = false;
                continue;
            }
        };

        let path = output_dir.join(kind.relative_path());
        let entry = drift::compare(&generated, &path)?;
        match &entry.status {
            DriftStatus::InSync => {
                println!("✓ In sync: {} ({})", path.display(), entry.expected.short());
            }
            DriftStatus::Drifted { on_disk, added, removed, diff } => {
                println!(
                    "✗ Drifted: {} ({} on disk, {} expected, +{} -{})",
                    path.display(),
                    on_disk.short(),
                    entry.expected.short(),
                    added,
                    removed
                );
                println!("{}", diff);
                clean = false;
            }
            DriftStatus::Missing => {
                println!("✗ Missing: {}", path.display());
                clean = false;
            }
        }
    }

    if clean {
        println!("\n✅ No drift detected - schemas are in sync");
    } else {
        println!("\n❌ Drift detected - run rap-generate to regenerate");
    }
    Ok(clean)
}

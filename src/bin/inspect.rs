//! Schema Inspect CLI
//!
//! Decodes schema JSON files, prints their contents and checks them for
//! duplicate ids.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use attribute_schemas::{
    init_schemas, schemas, DecodeConfig, Schema, SchemaConfig, SchemaRegistry,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-inspect")]
#[command(about = "Decode and inspect schema files")]
struct Cli {
    /// Config file to load in addition to the default locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print id, name, description, attributes and checksum of each schema
    Show {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Decode and register each schema, reporting failures and duplicate ids
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = SchemaConfig::load_from(cli.config.as_deref())?;
    init_schemas(config.registry.clone());

    match cli.command {
        Commands::Show { files } => {
            for path in files {
                let raw = std::fs::read(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let schema = Schema::decode_with(&raw, &config.decode)
                    .with_context(|| format!("decoding {}", path.display()))?;
                print_schema(&schema)?;
            }
            Ok(())
        }

        Commands::Check { files } => {
            let report = check_files(&files, &config.decode, schemas());

            println!();
            if report.failures > 0 {
                bail!("{} of {} schema files failed", report.failures, report.total());
            }
            println!("✅ {} schemas registered", report.registered);
            Ok(())
        }
    }
}

/// Outcome of checking a batch of schema files
#[derive(Debug, Default, PartialEq, Eq)]
struct CheckReport {
    registered: usize,
    failures: usize,
}

impl CheckReport {
    fn total(&self) -> usize {
        self.registered + self.failures
    }
}

/// Decode each file and register it, failing files that don't decode or
/// reuse an id seen earlier in the batch
fn check_files(files: &[PathBuf], decode: &DecodeConfig, registry: &SchemaRegistry) -> CheckReport {
    let mut seen: HashMap<String, &PathBuf> = HashMap::new();
    let mut report = CheckReport::default();

    for path in files {
        let decoded = std::fs::read(path)
            .map_err(anyhow::Error::from)
            .and_then(|raw| Ok(Schema::decode_with(&raw, decode)?));

        let schema = match decoded {
            Ok(schema) => schema,
            Err(e) => {
                println!("❌ {} - {:#}", path.display(), e);
                report.failures += 1;
                continue;
            }
        };

        if let Some(first) = seen.get(schema.id()) {
            println!(
                "❌ {} - duplicate id '{}' (first defined in {})",
                path.display(),
                schema.id(),
                first.display()
            );
            report.failures += 1;
            continue;
        }

        println!("✅ {} - {} ({})", path.display(), schema.id(), schema.name());
        seen.insert(schema.id().to_string(), path);
        registry.register(schema);
        report.registered += 1;
    }

    report
}

fn print_schema(schema: &Schema) -> anyhow::Result<()> {
    println!("{} ({})", schema.name(), schema.id());
    if !schema.description().is_empty() {
        println!("  {}", schema.description());
    }
    println!("  checksum: {}", schema.checksum()?);
    schema.for_each_attribute(|attr| {
        let mut flags = Vec::new();
        if attr.required {
            flags.push("required");
        }
        if attr.multi_valued {
            flags.push("multi");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        println!("  └─ {}: {:?}{}", attr.name, attr.attr_type, flags);
        for sub in &attr.sub_attributes {
            println!("     └─ {}: {:?}", sub.name, sub.attr_type);
        }
    });
    println!();
    Ok(())
}

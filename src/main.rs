use anyhow::{Context, Result};
use clap::Parser;
use proto_compat::{Detector, DetectorConfig, Snapshot, UnresolvedTypePolicy, logging};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "proto-compat")]
#[command(about = "Detect breaking changes between two versions of a Protobuf API")]
#[command(version)]
struct Args {
    #[arg(help = "Original API definition: a directory of .proto files or a serialized FileDescriptorSet")]
    original: PathBuf,
    #[arg(help = "Updated API definition: a directory of .proto files or a serialized FileDescriptorSet")]
    update: PathBuf,
    #[arg(long, default_value = "findings.json", help = "Where to write the findings as JSON")]
    output_json_path: PathBuf,
    #[arg(long, value_delimiter = ',', help = "Package prefixes of the API under check (comma-separated)")]
    package_prefixes: Vec<String>,
    #[arg(long, help = "Print one line per finding")]
    human_readable_message: bool,
    #[arg(long, help = "YAML configuration file")]
    config: Option<PathBuf>,
    #[arg(long, help = "Severity of unresolvable type references: ignore, minor or major")]
    unresolved_types: Option<UnresolvedTypePolicy>,
    #[arg(short = 'I', long = "proto-path", help = "Extra import directory for .proto sources")]
    includes: Vec<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => DetectorConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => DetectorConfig::default(),
    };
    if !args.package_prefixes.is_empty() {
        config.package_prefixes = args.package_prefixes.clone();
    }
    if let Some(policy) = args.unresolved_types {
        config.unresolved_types = policy;
    }

    let original = Snapshot::load(&args.original, &args.includes)
        .with_context(|| format!("Failed to load original API '{}'", args.original.display()))?;
    let update = Snapshot::load(&args.update, &args.includes)
        .with_context(|| format!("Failed to load updated API '{}'", args.update.display()))?;

    let findings = Detector::new(&original, &update, &config).detect();

    fs::write(&args.output_json_path, findings.to_json()?).with_context(|| {
        format!("Failed to write findings to '{}'", args.output_json_path.display())
    })?;

    if args.human_readable_message {
        for message in findings.human_readable_messages() {
            println!("{message}");
        }
    }

    if findings.has_breaking_changes() {
        std::process::exit(1);
    }
    Ok(())
}

//! `cutline` CLI: validate a JSON timeline or export it as FCPXML.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use cutline::{
    AssetResource, ExportOptions, FcpxmlVersion, StaticResolver, Timeline, ValidateOptions,
    export_to_string, validate,
};

#[derive(Parser, Debug)]
#[command(name = "cutline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a timeline against an asset catalog and print findings.
    Validate(ValidateArgs),
    /// Export a timeline as FCPXML.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Asset catalog JSON (array of asset records).
    #[arg(long)]
    assets: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Asset catalog JSON (array of asset records).
    #[arg(long)]
    assets: PathBuf,

    /// Output FCPXML path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Target FCPXML version: 1.9, 1.10, or 1.11.
    #[arg(long, default_value = "1.11")]
    format_version: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn load_timeline(path: &PathBuf) -> anyhow::Result<Timeline> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read timeline '{}'", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parse timeline '{}'", path.display()))
}

fn load_resolver(path: &PathBuf) -> anyhow::Result<StaticResolver> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read asset catalog '{}'", path.display()))?;
    let assets: Vec<AssetResource> = serde_json::from_str(&json)
        .with_context(|| format!("parse asset catalog '{}'", path.display()))?;
    Ok(StaticResolver::new(assets))
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let timeline = load_timeline(&args.in_path)?;
    let resolver = load_resolver(&args.assets)?;
    let report = validate(&timeline, &resolver, &ValidateOptions::default());

    for error in &report.errors {
        println!("error: {error}");
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    if report.is_clean() {
        println!("ok: {} clips, end {}", timeline.len(), timeline.end_time());
    }
    if !report.is_exportable() {
        anyhow::bail!("{} validation error(s)", report.errors.len());
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let timeline = load_timeline(&args.in_path)?;
    let resolver = load_resolver(&args.assets)?;
    let version = parse_version(&args.format_version)?;

    let options = ExportOptions {
        version,
        ..ExportOptions::default()
    };
    let xml = export_to_string(&timeline, &resolver, &options)?;

    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(out, xml)
                .with_context(|| format!("write output '{}'", out.display()))?;
        }
        None => print!("{xml}"),
    }
    Ok(())
}

fn parse_version(s: &str) -> anyhow::Result<FcpxmlVersion> {
    FcpxmlVersion::ALL
        .iter()
        .copied()
        .find(|v| v.as_str() == s)
        .ok_or_else(|| {
            let supported: Vec<&str> = FcpxmlVersion::ALL.iter().map(|v| v.as_str()).collect();
            anyhow::anyhow!("unsupported version '{s}' (supported: {})", supported.join(", "))
        })
}

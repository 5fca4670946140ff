use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use netobj_compare::kind::ObjectKind;

#[derive(Parser, Debug)]
#[command(name = "netobj-compare")]
#[command(about = "Compare firewall objects and policies between two devices")]
pub struct Cli {
    /// Log progress to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Align and diff the object lists of two device snapshots.
    Compare(CompareArgs),
    /// List object kinds and whether their order is compared.
    Kinds(KindsArgs),
}

#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Snapshot of device A.
    pub left: PathBuf,
    /// Snapshot of device B.
    pub right: PathBuf,
    /// Restrict the comparison to these kinds. Defaults to every kind
    /// present in both snapshots.
    #[arg(long = "kind", value_parser = parse_kind)]
    pub kinds: Vec<ObjectKind>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[arg(long)]
    pub summary: bool,
    #[arg(short, long)]
    pub quiet: bool,
    /// Write create actions for entries missing on either side as JSON.
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Comparison profile TOML. Defaults to the built-in profile.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Exit non-zero when any kind has a difference.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct KindsArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Comparison profile TOML. Defaults to the built-in profile.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_kind(raw: &str) -> Result<ObjectKind, String> {
    raw.parse::<ObjectKind>().map_err(|err| err.to_string())
}

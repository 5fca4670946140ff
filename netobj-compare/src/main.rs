use std::io;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use netobj_compare::kind::ObjectKind;
use netobj_compare::profile::{default_profile, load_profile, CompareProfile};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod compare_cmd;
mod path_guard;

use cli::{Cli, Command, KindsArgs, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Compare(args) => compare_cmd::run_compare(args),
        Command::Kinds(args) => run_kinds(args),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[derive(Debug, Serialize)]
struct KindRow {
    kind: ObjectKind,
    label: &'static str,
    preserve_order: bool,
}

fn run_kinds(args: KindsArgs) -> Result<()> {
    let (profile, _) = resolve_profile(args.config.as_deref());
    let rows: Vec<KindRow> = ObjectKind::ALL
        .into_iter()
        .map(|kind| KindRow {
            kind,
            label: kind.label(),
            preserve_order: profile.preserve_order(kind),
        })
        .collect();

    match args.format {
        OutputFormat::Text => {
            for row in rows {
                let order = if row.preserve_order {
                    "device order"
                } else {
                    "sorted by name"
                };
                println!("{:<20} {order}", row.kind);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}

/// Load the comparison profile, falling back to the built-in one when the
/// given file cannot be used.
pub(crate) fn resolve_profile(path: Option<&Path>) -> (CompareProfile, String) {
    let Some(path) = path else {
        return (default_profile(), "embedded".to_string());
    };

    match load_profile(path) {
        Ok(profile) => (profile, format!("file:{}", path.display())),
        Err(err) => {
            warn!("{err}; using embedded profile");
            (default_profile(), "embedded".to_string())
        }
    }
}

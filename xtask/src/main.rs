// SPDX-License-Identifier: MIT OR Apache-2.0
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ember_error::{ErrorCode, LogicErrorKind};
use schemars::schema_for;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "xtask", version, about = "Repo maintenance tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate JSON Schemas for failure codes, reports and diagnostics config.
    Schema {
        /// Output directory.
        #[arg(long, default_value = "contracts/schemas")]
        out_dir: PathBuf,
    },
    /// Print the catalog of failure codes and logic error kinds.
    Catalog {
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Schema { out_dir } => schema(out_dir),
        Command::Catalog { format } => catalog(format),
    }
}

fn schema(out_dir: PathBuf) -> Result<()> {
    std::fs::create_dir_all(&out_dir).context("create schema output dir")?;

    write_schema(
        &out_dir.join("error_code.schema.json"),
        &schema_for!(ember_error::ErrorCode),
    )?;
    write_schema(
        &out_dir.join("logic_error_kind.schema.json"),
        &schema_for!(ember_error::LogicErrorKind),
    )?;
    write_schema(
        &out_dir.join("failure_report.schema.json"),
        &schema_for!(ember_error::FailureReport),
    )?;
    write_schema(
        &out_dir.join("diagnostics_config.schema.json"),
        &schema_for!(ember_config::DiagnosticsConfig),
    )?;

    eprintln!("wrote schemas to {}", out_dir.display());
    Ok(())
}

fn write_schema(path: &Path, schema: &schemars::Schema) -> Result<()> {
    let s = serde_json::to_string_pretty(schema)?;
    std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn catalog(format: Format) -> Result<()> {
    match format {
        Format::Text => {
            println!("{:<32} {:<11} {:<12} decorated", "code", "category", "blame");
            for code in ErrorCode::ALL {
                let category = code.category();
                println!(
                    "{:<32} {:<11} {:<12} {}",
                    code.as_str(),
                    category.to_string(),
                    category.responsibility().to_string(),
                    if code.is_decorated() { "yes" } else { "no" }
                );
            }
            println!();
            println!("{:<32} message", "logic_kind");
            for kind in LogicErrorKind::ALL {
                println!("{:<32} {}", kind.as_str(), kind.message());
            }
        }
        Format::Json => {
            let codes: Vec<_> = ErrorCode::ALL
                .iter()
                .map(|code| {
                    serde_json::json!({
                        "code": code,
                        "category": code.category(),
                        "responsibility": code.category().responsibility(),
                        "decorated": code.is_decorated(),
                    })
                })
                .collect();
            let kinds: Vec<_> = LogicErrorKind::ALL
                .iter()
                .map(|kind| serde_json::json!({ "kind": kind, "message": kind.message() }))
                .collect();
            let doc = serde_json::json!({ "codes": codes, "logic_kinds": kinds });
            println!(
                "{}",
                serde_json::to_string_pretty(&doc).context("serialize catalog")?
            );
        }
    }
    Ok(())
}

//! `lexicon csv` commands: preview, import and export.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use lexicon_csv::CsvEngine;
use lexicon_types::ImportMapping;

use crate::shared::{diagnose, Context};
use crate::{input, output};

/// Preview, import or export CSV.
#[derive(Debug, Args)]
pub struct CsvArgs {
    /// Project holding the table.
    #[arg(short, long)]
    pub project: String,

    #[command(subcommand)]
    pub action: CsvAction,
}

#[derive(Debug, Subcommand)]
pub enum CsvAction {
    /// Print the header row and data-row count as JSON.
    Preview {
        table: String,
        /// CSV file, or `-` for stdin.
        file: String,
    },
    /// Import rows, upserting by code.
    Import {
        table: String,
        /// CSV file, or `-` for stdin.
        file: String,
        /// Inline JSON mapping of table column to CSV header or "(skip)".
        #[arg(short, long)]
        mapping: Option<String>,
        /// Mapping JSON file. Without any mapping, headers map onto
        /// columns of the same name.
        #[arg(long)]
        mapping_file: Option<String>,
    },
    /// Export every row ordered by code.
    Export {
        table: String,
        /// Write to this path instead of stdout.
        #[arg(short, long, conflicts_with = "save")]
        output: Option<String>,
        /// Write to `<project>/exports/<table>.csv`.
        #[arg(long)]
        save: bool,
    },
}

/// Executes a CSV command.
pub fn execute(ctx: &Context, args: &CsvArgs) -> anyhow::Result<()> {
    let store = ctx.open_project(&args.project)?;
    let engine = CsvEngine::new(store).with_max_payload(ctx.max_payload_bytes);

    match &args.action {
        CsvAction::Preview { table, file } => {
            let bytes = input::read_bytes(file)?;
            let preview = engine.preview(table, &bytes).map_err(diagnose)?;
            output::print_json(&preview)?;
        }
        CsvAction::Import {
            table,
            file,
            mapping,
            mapping_file,
        } => {
            let bytes = input::read_bytes(file)?;
            let mapping = if mapping.is_some() || mapping_file.is_some() {
                input::resolve_json::<ImportMapping>(mapping.as_deref(), mapping_file.as_deref())?
            } else {
                let preview = engine.preview(table, &bytes).map_err(diagnose)?;
                ImportMapping::identity(&preview.headers)
            };
            let result = engine.import(table, &bytes, &mapping).map_err(diagnose)?;
            output::print_json(&result)?;
        }
        CsvAction::Export {
            table,
            output: path,
            save,
        } => {
            let csv = engine.export(table).map_err(diagnose)?;
            let target = match (path, save) {
                (Some(p), _) => Some(PathBuf::from(p)),
                (None, true) => Some(
                    ctx.stores
                        .root()
                        .join(&args.project)
                        .join("exports")
                        .join(format!("{table}.csv")),
                ),
                (None, false) => None,
            };
            match target {
                Some(target) => {
                    std::fs::write(&target, csv)?;
                    output::print_success(&format!("Exported {table} to {}", target.display()));
                }
                None => print!("{csv}"),
            }
        }
    }
    Ok(())
}

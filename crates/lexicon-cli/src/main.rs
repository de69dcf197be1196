//! lexicon CLI - lookup-table registry for annotation projects.

use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;
mod input;
mod output;
pub(crate) mod shared;

/// lexicon - define, populate and export lookup tables per project.
#[derive(Debug, Parser)]
#[command(name = "lexicon", version, about)]
struct Cli {
    /// Configuration file path.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format: plain (default) or json (for log aggregation).
    #[arg(long, global = true, default_value = "plain", value_parser = ["plain", "json"])]
    log_format: String,

    /// Projects directory (overrides `store.projects_dir`).
    #[arg(long, global = true)]
    projects_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create, list or delete projects.
    Project(commands::project::ProjectArgs),
    /// Manage lookup tables and their schema.
    Table(commands::table::TableArgs),
    /// Manage entries of a lookup table.
    Entry(commands::entry::EntryArgs),
    /// Preview, import or export CSV.
    Csv(commands::csv::CsvArgs),
}

fn main() {
    let cli = Cli::parse();

    let config = match lexicon_config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&e.to_string());
            std::process::exit(2);
        }
    };

    // Initialize tracing. Logs go to stderr so stdout stays parseable.
    let filter = match cli.verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    match cli.log_format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    };

    tracing::debug!("lexicon starting with config: {:?}", cli.config);

    let ctx = shared::Context::new(&config, cli.projects_dir.as_deref());
    let result = match &cli.command {
        Commands::Project(args) => commands::project::execute(&ctx, args),
        Commands::Table(args) => commands::table::execute(&ctx, args),
        Commands::Entry(args) => commands::entry::execute(&ctx, args),
        Commands::Csv(args) => commands::csv::execute(&ctx, args),
    };

    if let Err(e) = result {
        output::print_error(&format!("{e:#}"));
        std::process::exit(shared::exit_code(&e));
    }
}

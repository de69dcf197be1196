//! `lexicon table` commands: lookup-table lifecycle and schema edits.

use clap::{Args, Subcommand};
use lexicon_registry::{parse_column_type, parse_template, SchemaRegistry, TableQuery};
use lexicon_types::ConfigUpdate;

use crate::output;
use crate::shared::{diagnose, Context};

/// Manage lookup tables and their schema.
#[derive(Debug, Args)]
pub struct TableArgs {
    /// Project holding the tables.
    #[arg(short, long)]
    pub project: String,

    #[command(subcommand)]
    pub action: TableAction,
}

#[derive(Debug, Subcommand)]
pub enum TableAction {
    /// List lookup tables as JSON.
    List {
        /// Only tables associated with this artifact-type code.
        #[arg(long)]
        artifact_type: Option<String>,
    },
    /// Create a lookup table from a template.
    Create {
        /// Table name ending in _types, _codes, _states or _roles.
        name: String,
        /// basic, with_category, with_sort_order or with_universe.
        #[arg(short, long, default_value = "basic")]
        template: String,
        /// Allow selecting several entries of this table at once.
        #[arg(long)]
        multi_select: bool,
    },
    /// Drop a lookup table and its bookkeeping.
    Delete { name: String },
    /// Delete every entry but keep the table.
    Clear { name: String },
    /// Print a table's schema as JSON.
    Schema { name: String },
    /// Add a nullable column.
    AddColumn {
        table: String,
        column: String,
        /// text_20, text_50, text_100, text_1000 or number.
        #[arg(short = 't', long = "type", default_value = "text_100")]
        column_type: String,
    },
    /// Drop a non-protected column.
    DropColumn { table: String, column: String },
    /// Update configuration flags. Omitted flags are left as they are.
    Config {
        table: String,
        #[arg(long, action = clap::ArgAction::Set)]
        multi_select: Option<bool>,
        #[arg(long, action = clap::ArgAction::Set)]
        image_processing: Option<bool>,
    },
    /// Replace the set of associated artifact-type codes.
    ArtifactTypes {
        table: String,
        /// Codes to associate. None clears all associations.
        codes: Vec<String>,
    },
    /// Set a column's display name. An empty name resets it.
    DisplayName {
        table: String,
        column: String,
        display_name: String,
    },
}

/// Executes a table command.
pub fn execute(ctx: &Context, args: &TableArgs) -> anyhow::Result<()> {
    let store = ctx.open_project(&args.project)?;

    match &args.action {
        TableAction::List { artifact_type } => {
            let query = match artifact_type {
                Some(code) => TableQuery::all().for_artifact_type(code),
                None => TableQuery::all(),
            };
            let tables = store.list_tables(&query).map_err(diagnose)?;
            output::print_json(&tables)?;
        }
        TableAction::Create {
            name,
            template,
            multi_select,
        } => {
            let template = parse_template(template).map_err(diagnose)?;
            store
                .create_table(name, template, *multi_select)
                .map_err(diagnose)?;
            output::print_success(&format!("Created {name} ({template})"));
        }
        TableAction::Delete { name } => {
            store.delete_table(name).map_err(diagnose)?;
            output::print_success(&format!("Deleted {name}"));
        }
        TableAction::Clear { name } => {
            let removed = store.clear_table(name).map_err(diagnose)?;
            output::print_success(&format!("Removed {removed} entries from {name}"));
        }
        TableAction::Schema { name } => {
            let schema = store.schema(name).map_err(diagnose)?;
            output::print_json(&schema)?;
        }
        TableAction::AddColumn {
            table,
            column,
            column_type,
        } => {
            let ty = parse_column_type(column_type).map_err(diagnose)?;
            store.add_column(table, column, ty).map_err(diagnose)?;
            output::print_success(&format!("Added {column} ({ty}) to {table}"));
        }
        TableAction::DropColumn { table, column } => {
            store.drop_column(table, column).map_err(diagnose)?;
            output::print_success(&format!("Dropped {column} from {table}"));
        }
        TableAction::Config {
            table,
            multi_select,
            image_processing,
        } => {
            let update = ConfigUpdate {
                is_multi_select: *multi_select,
                use_for_image_processing: *image_processing,
            };
            let config = store.update_config(table, update).map_err(diagnose)?;
            output::print_json(&config)?;
        }
        TableAction::ArtifactTypes { table, codes } => {
            store
                .update_artifact_types(table, codes)
                .map_err(diagnose)?;
            output::print_success(&format!("Associated {table} with {} artifact types", codes.len()));
        }
        TableAction::DisplayName {
            table,
            column,
            display_name,
        } => {
            store
                .set_display_name(table, column, display_name)
                .map_err(diagnose)?;
            output::print_success(&format!("Set display name of {table}.{column}"));
        }
    }
    Ok(())
}

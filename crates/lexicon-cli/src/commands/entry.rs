//! `lexicon entry` commands: row CRUD with JSON bodies.

use clap::{Args, Subcommand};
use lexicon_registry::RowStore;
use lexicon_types::Row;

use crate::shared::{diagnose, Context};
use crate::{input, output};

/// Manage entries of a lookup table.
#[derive(Debug, Args)]
pub struct EntryArgs {
    /// Project holding the table.
    #[arg(short, long)]
    pub project: String,

    #[command(subcommand)]
    pub action: EntryAction,
}

/// JSON body source shared by create and update.
#[derive(Debug, Args)]
pub struct BodyArgs {
    /// Inline JSON object.
    #[arg(short, long)]
    pub input: Option<String>,
    /// JSON file, or `-` for stdin.
    #[arg(short = 'f', long)]
    pub input_file: Option<String>,
}

impl BodyArgs {
    fn row(&self) -> anyhow::Result<Row> {
        input::resolve_json(self.input.as_deref(), self.input_file.as_deref())
    }
}

#[derive(Debug, Subcommand)]
pub enum EntryAction {
    /// List all entries ordered by code.
    List { table: String },
    /// Print one entry.
    Get { table: String, code: String },
    /// Create an entry. `code` and `full_name` are required.
    Create {
        table: String,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Update only the given fields of an entry.
    Update {
        table: String,
        code: String,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Delete an entry. Deleting a missing code succeeds.
    Delete { table: String, code: String },
}

/// Executes an entry command.
pub fn execute(ctx: &Context, args: &EntryArgs) -> anyhow::Result<()> {
    let store = ctx.open_project(&args.project)?;

    match &args.action {
        EntryAction::List { table } => {
            let rows = store.list(table).map_err(diagnose)?;
            output::print_json(&rows)?;
        }
        EntryAction::Get { table, code } => {
            let row = store.get(table, code).map_err(diagnose)?;
            output::print_json(&row)?;
        }
        EntryAction::Create { table, body } => {
            let row = store.create(table, body.row()?).map_err(diagnose)?;
            output::print_json(&row)?;
        }
        EntryAction::Update { table, code, body } => {
            let row = store.update(table, code, body.row()?).map_err(diagnose)?;
            output::print_json(&row)?;
        }
        EntryAction::Delete { table, code } => {
            store.delete(table, code).map_err(diagnose)?;
            output::print_success(&format!("Deleted {code} from {table}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_context;
    use lexicon_registry::SchemaRegistry;
    use lexicon_types::Template;

    fn run(ctx: &Context, action: EntryAction) -> anyhow::Result<()> {
        execute(
            ctx,
            &EntryArgs {
                project: "fleet".into(),
                action,
            },
        )
    }

    fn inline(json: &str) -> BodyArgs {
        BodyArgs {
            input: Some(json.into()),
            input_file: None,
        }
    }

    #[test]
    fn create_update_delete_entry() {
        let dir = tempfile::tempdir().expect("tmp");
        let ctx = test_context(dir.path());
        let store = ctx.stores.create("fleet").expect("project");
        store
            .create_table("ship_types", Template::Basic, false)
            .expect("table");

        run(
            &ctx,
            EntryAction::Create {
                table: "ship_types".into(),
                body: inline(r#"{"code":"FRG","full_name":"Frigate"}"#),
            },
        )
        .expect("create");
        run(
            &ctx,
            EntryAction::Update {
                table: "ship_types".into(),
                code: "FRG".into(),
                body: inline(r#"{"description":"Escort"}"#),
            },
        )
        .expect("update");

        let row = store.get("ship_types", "FRG").expect("get");
        assert_eq!(row.get_str("description"), Some("Escort"));
        assert_eq!(row.get_str("full_name"), Some("Frigate"));

        run(
            &ctx,
            EntryAction::Delete {
                table: "ship_types".into(),
                code: "FRG".into(),
            },
        )
        .expect("delete");
        assert!(store.list("ship_types").expect("list").is_empty());
    }

    #[test]
    fn duplicate_create_fails() {
        let dir = tempfile::tempdir().expect("tmp");
        let ctx = test_context(dir.path());
        let store = ctx.stores.create("fleet").expect("project");
        store
            .create_table("ship_types", Template::Basic, false)
            .expect("table");
        let create = || EntryAction::Create {
            table: "ship_types".into(),
            body: inline(r#"{"code":"FRG","full_name":"Frigate"}"#),
        };
        run(&ctx, create()).expect("first");
        let err = run(&ctx, create()).expect_err("dup");
        assert!(err.to_string().contains("duplicate code"));
    }
}

//! `lexicon project` commands.
//!
//! A project is a directory under the projects root holding one SQLite
//! database plus image and export folders.

use clap::{Args, Subcommand};

use crate::output;
use crate::shared::{diagnose, Context};

/// Create, list or delete projects.
#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Debug, Subcommand)]
pub enum ProjectAction {
    /// Create a project with an empty registry.
    Create {
        /// Project name (letters, digits, `_`, `-`).
        name: String,
    },
    /// List projects as JSON.
    List,
    /// Delete a project and everything in its directory.
    Delete {
        /// Project name.
        name: String,
    },
}

/// Executes a project command.
pub fn execute(ctx: &Context, args: &ProjectArgs) -> anyhow::Result<()> {
    match &args.action {
        ProjectAction::Create { name } => {
            ctx.stores.create(name).map_err(diagnose)?;
            output::print_success(&format!(
                "Created project {name} at {}",
                ctx.stores.root().join(name).display()
            ));
        }
        ProjectAction::List => {
            let projects = ctx.stores.list().map_err(diagnose)?;
            output::print_json(&projects)?;
        }
        ProjectAction::Delete { name } => {
            ctx.stores.delete(name).map_err(diagnose)?;
            output::print_success(&format!("Deleted project {name}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_context;

    #[test]
    fn create_list_delete() {
        let dir = tempfile::tempdir().expect("tmp");
        let ctx = test_context(dir.path());
        let create = ProjectArgs {
            action: ProjectAction::Create {
                name: "fleet".into(),
            },
        };
        execute(&ctx, &create).expect("create");
        assert!(ctx.stores.exists("fleet"));
        assert!(execute(&ctx, &create).is_err());

        execute(
            &ctx,
            &ProjectArgs {
                action: ProjectAction::List,
            },
        )
        .expect("list");

        execute(
            &ctx,
            &ProjectArgs {
                action: ProjectAction::Delete {
                    name: "fleet".into(),
                },
            },
        )
        .expect("delete");
        assert!(!ctx.stores.exists("fleet"));
    }

    #[test]
    fn invalid_name_is_rejected() {
        let dir = tempfile::tempdir().expect("tmp");
        let ctx = test_context(dir.path());
        let args = ProjectArgs {
            action: ProjectAction::Create {
                name: "../escape".into(),
            },
        };
        let err = execute(&ctx, &args).expect_err("invalid");
        assert!(err.to_string().contains("invalid project name"));
    }
}

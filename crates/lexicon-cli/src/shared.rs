//! Shared helpers used across CLI commands.
//!
//! Centralises opening project stores and turning registry errors into
//! CLI errors, so every command reports failures the same way.

use std::path::PathBuf;
use std::sync::Arc;

use lexicon_config::LexiconConfig;
use lexicon_registry::RegistryError;
use lexicon_store_sqlite::{ProjectStores, SqliteLexiconStore};
use lexicon_types::LexiconError;

/// Everything a command needs from configuration.
pub struct Context {
    pub stores: ProjectStores,
    pub max_payload_bytes: usize,
}

impl Context {
    /// Builds the context, letting `projects_dir` override the config.
    pub fn new(config: &LexiconConfig, projects_dir: Option<&str>) -> Self {
        let root = projects_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| config.store.projects_path());
        Self {
            stores: ProjectStores::new(root),
            max_payload_bytes: config.import.max_payload_bytes,
        }
    }

    /// Opens an existing project's store.
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not exist or its database
    /// cannot be opened.
    pub fn open_project(&self, project: &str) -> anyhow::Result<Arc<SqliteLexiconStore>> {
        self.stores.open(project).map_err(diagnose)
    }
}

/// Converts a registry error into an `anyhow` error wrapping a
/// [`LexiconError`], so `main` can pick the exit status from its kind.
/// The hint and fix, when present, ride along as context.
pub fn diagnose(err: RegistryError) -> anyhow::Error {
    anyhow::Error::new(LexiconError::from(err))
}

/// Exit status for a failed command. Errors that never passed through
/// [`diagnose`] (I/O, bad JSON input) exit with 1.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<LexiconError>()
        .map_or(1, LexiconError::exit_code)
}

/// Context rooted at a scratch directory.
#[cfg(test)]
pub(crate) fn test_context(dir: &std::path::Path) -> Context {
    Context::new(&LexiconConfig::default(), dir.to_str())
}

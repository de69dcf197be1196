//! Per-project store handles.
//!
//! Each project lives under `<root>/<project>/` with its database at
//! `data/<project>.db`. `ProjectStores` caches open handles so repeated
//! requests against one project share a single connection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use lexicon_registry::RegistryError;
use tracing::{debug, info};

use crate::store::SqliteLexiconStore;

/// Subdirectories created for every new project.
const PROJECT_DIRS: [&str; 4] = ["data", "images/raw", "images/training", "exports"];

/// Project names double as directory names.
fn validate_project_name(name: &str) -> Result<(), RegistryError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(RegistryError::InvalidProjectName {
            name: name.to_string(),
        })
    }
}

/// Cache of open project stores.
///
/// Handles are opened lazily by [`ProjectStores::open`] and released by
/// [`ProjectStores::close`]; a closed handle stays usable by whoever still
/// holds its `Arc` and the connection closes once the last clone drops.
pub struct ProjectStores {
    root: PathBuf,
    handles: Mutex<HashMap<String, Arc<SqliteLexiconStore>>>,
}

impl ProjectStores {
    /// Creates a cache rooted at `root`. Nothing is opened yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Directory holding all projects.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a project's database file.
    pub fn database_path(&self, project: &str) -> PathBuf {
        self.root
            .join(project)
            .join("data")
            .join(format!("{project}.db"))
    }

    /// True if the project's database file exists.
    pub fn exists(&self, project: &str) -> bool {
        validate_project_name(project).is_ok() && self.database_path(project).is_file()
    }

    fn lock_handles(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<String, Arc<SqliteLexiconStore>>>, RegistryError> {
        self.handles
            .lock()
            .map_err(|e| RegistryError::storage("lock project handles", e))
    }

    /// Creates the project layout and database, and caches the handle.
    pub fn create(&self, project: &str) -> Result<Arc<SqliteLexiconStore>, RegistryError> {
        validate_project_name(project)?;
        let mut handles = self.lock_handles()?;
        if self.database_path(project).exists() {
            return Err(RegistryError::ProjectExists {
                name: project.to_string(),
            });
        }

        let dir = self.root.join(project);
        for sub in PROJECT_DIRS {
            std::fs::create_dir_all(dir.join(sub))
                .map_err(|e| RegistryError::storage(format!("create {}", dir.join(sub).display()), e))?;
        }
        let store = Arc::new(SqliteLexiconStore::open(self.database_path(project))?);
        handles.insert(project.to_string(), Arc::clone(&store));
        info!(project, path = %dir.display(), "created project");
        Ok(store)
    }

    /// Returns the cached handle, opening the database on first use.
    pub fn open(&self, project: &str) -> Result<Arc<SqliteLexiconStore>, RegistryError> {
        validate_project_name(project)?;
        let mut handles = self.lock_handles()?;
        if let Some(store) = handles.get(project) {
            return Ok(Arc::clone(store));
        }
        let path = self.database_path(project);
        if !path.is_file() {
            return Err(RegistryError::ProjectNotFound {
                name: project.to_string(),
            });
        }
        let store = Arc::new(SqliteLexiconStore::open(&path)?);
        handles.insert(project.to_string(), Arc::clone(&store));
        debug!(project, "opened project store");
        Ok(store)
    }

    /// Drops the cached handle. Returns true if one was cached.
    pub fn close(&self, project: &str) -> Result<bool, RegistryError> {
        let closed = self.lock_handles()?.remove(project).is_some();
        if closed {
            debug!(project, "closed project store");
        }
        Ok(closed)
    }

    /// Names of all projects with a database, sorted.
    pub fn list(&self) -> Result<Vec<String>, RegistryError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RegistryError::storage("list projects", e)),
        };
        let mut projects: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| self.exists(name))
            .collect();
        projects.sort();
        Ok(projects)
    }

    /// Closes the project and removes its whole directory.
    pub fn delete(&self, project: &str) -> Result<(), RegistryError> {
        validate_project_name(project)?;
        self.close(project)?;
        let dir = self.root.join(project);
        if !dir.is_dir() {
            return Err(RegistryError::ProjectNotFound {
                name: project.to_string(),
            });
        }
        std::fs::remove_dir_all(&dir)
            .map_err(|e| RegistryError::storage(format!("delete {}", dir.display()), e))?;
        info!(project, "deleted project");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_traversal() {
        assert!(validate_project_name("../etc").is_err());
        assert!(validate_project_name("a/b").is_err());
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("fleet-2024_a").is_ok());
    }

    #[test]
    fn database_path_layout() {
        let stores = ProjectStores::new("/srv/projects");
        assert_eq!(
            stores.database_path("fleet"),
            PathBuf::from("/srv/projects/fleet/data/fleet.db")
        );
    }

    #[test]
    fn list_on_missing_root_is_empty() {
        let dir = tempfile::tempdir().expect("tmp");
        let stores = ProjectStores::new(dir.path().join("nope"));
        assert!(stores.list().expect("list").is_empty());
    }
}

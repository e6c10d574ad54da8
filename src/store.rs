//! Reading and writing the secrets file

use crate::error::{Result, UserSecretsError};
use serde_json::Value;
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// The contents of a secrets file: a JSON object, in file order.
pub type SecretsDocument = serde_json::Map<String, Value>;

/// Access to one secrets file on disk.
///
/// The file is read and written as a whole. There is no locking: two
/// processes mutating the same file race, and the last write wins.
///
/// # Example
///
/// ```no_run
/// use usersecrets::{SecretsStore, secrets_path_from_id};
///
/// let store = SecretsStore::new(secrets_path_from_id("my-app-secrets")?);
/// store.set("Database:Password", "hunter2")?;
/// # Ok::<(), usersecrets::UserSecretsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SecretsStore {
    path: PathBuf,
}

impl SecretsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, treating a missing file as an empty one.
    ///
    /// # Errors
    ///
    /// Returns [`UserSecretsError::Json`] or [`UserSecretsError::NotAnObject`]
    /// when the file exists but does not hold a JSON object.
    pub fn load(&self) -> Result<SecretsDocument> {
        if !self.path.exists() {
            return Ok(SecretsDocument::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|source| UserSecretsError::Json {
                path: self.path.clone(),
                source,
            })?;

        match value {
            Value::Object(document) => Ok(document),
            _ => Err(UserSecretsError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }

    /// Overwrites the file with `document`, creating parent directories.
    ///
    /// The write is not atomic.
    pub fn save(&self, document: &SecretsDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(document).map_err(|source| {
            UserSecretsError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, content)?;

        // Set file permissions to 600 (owner read/write only) on Unix systems
        #[cfg(unix)]
        {
            let mut permissions = fs::metadata(&self.path)?.permissions();
            permissions.set_mode(0o600);
            fs::set_permissions(&self.path, permissions)?;
        }

        Ok(())
    }

    /// Loads the document, lets `f` change it, and saves it back.
    pub fn mutate<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SecretsDocument) -> T,
    {
        let mut document = self.load()?;
        let result = f(&mut document);
        self.save(&document)?;
        Ok(result)
    }

    /// Replaces the file with an empty document without reading it first.
    pub fn clear(&self) -> Result<()> {
        self.save(&SecretsDocument::new())
    }

    /// Sets `name` to `value`, adding or overwriting the entry.
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        self.mutate(|document| {
            document.insert(name.to_string(), Value::String(value.to_string()));
        })
    }

    /// Removes `name`, returning whether it was present.
    pub fn remove(&self, name: &str) -> Result<bool> {
        self.mutate(|document| document.shift_remove(name).is_some())
    }
}

/// Renders a secret value for display: strings as-is, anything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

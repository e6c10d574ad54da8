use super::{ConfigurationSource, KEY_DELIMITER};
use crate::error::{Result, UserSecretsError};
use crate::file_provider::{FileProvider, PhysicalFileProvider};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A JSON file flattened into configuration pairs.
///
/// The file is read through a [`PhysicalFileProvider`] rooted at its parent
/// directory. Without a provider the file is treated as absent. The file is
/// read once per build and never watched for changes.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    provider: Option<PhysicalFileProvider>,
    path: String,
    optional: bool,
}

impl JsonFileSource {
    /// Reads `path` relative to `provider`.
    pub fn new(
        provider: Option<PhysicalFileProvider>,
        path: impl Into<String>,
        optional: bool,
    ) -> Self {
        Self {
            provider,
            path: path.into(),
            optional,
        }
    }

    /// Reads the file at `path`, anchored at its parent directory when that
    /// directory exists.
    pub fn for_path(path: &Path, optional: bool) -> Self {
        let provider = path
            .parent()
            .and_then(|dir| PhysicalFileProvider::for_existing_dir(dir));
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::new(provider, file_name, optional)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    fn missing(&self) -> Result<Vec<(String, String)>> {
        if self.optional {
            tracing::trace!("Optional configuration file '{}' not found", self.path);
            return Ok(Vec::new());
        }

        let path = self
            .provider
            .as_ref()
            .and_then(|p| p.root())
            .map(|root| root.join(&self.path))
            .unwrap_or_else(|| PathBuf::from(&self.path));
        Err(UserSecretsError::FileNotFound { path })
    }
}

impl ConfigurationSource for JsonFileSource {
    fn load(&self) -> Result<Vec<(String, String)>> {
        let Some(provider) = &self.provider else {
            return self.missing();
        };

        let file_info = provider.file_info(&self.path);
        let Some(path) = file_info.physical_path().filter(|_| file_info.is_readable_file()) else {
            return self.missing();
        };

        let content = file_info.read_to_string()?;
        let value: Value =
            serde_json::from_str(&content).map_err(|source| UserSecretsError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        flatten(&value, path)
    }
}

/// Flattens a JSON object into `:`-joined keys.
///
/// Arrays contribute their indices as key segments, `null` becomes an empty
/// string, and other scalars their JSON text.
pub(crate) fn flatten(value: &Value, path: &Path) -> Result<Vec<(String, String)>> {
    let Value::Object(root) = value else {
        return Err(UserSecretsError::NotAnObject {
            path: path.to_path_buf(),
        });
    };

    let mut pairs = Vec::new();
    let mut seen = HashSet::new();
    for (key, child) in root {
        visit(key.clone(), child, path, &mut pairs, &mut seen)?;
    }
    Ok(pairs)
}

fn visit(
    prefix: String,
    value: &Value,
    path: &Path,
    pairs: &mut Vec<(String, String)>,
    seen: &mut HashSet<String>,
) -> Result<()> {
    let child_key = |segment: &str| format!("{}{}{}", prefix, KEY_DELIMITER, segment);

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                visit(child_key(key), child, path, pairs, seen)?;
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                visit(child_key(&index.to_string()), child, path, pairs, seen)?;
            }
        }
        scalar => {
            if !seen.insert(prefix.to_lowercase()) {
                return Err(UserSecretsError::DuplicateKey {
                    key: prefix,
                    path: path.to_path_buf(),
                });
            }
            let text = match scalar {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            pairs.push((prefix, text));
        }
    }

    Ok(())
}

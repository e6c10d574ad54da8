//! # Layered configuration
//!
//! A [`ConfigurationBuilder`] holds an ordered list of
//! [`ConfigurationSource`]s. Building loads every source in registration
//! order into one flat key space; when two sources provide the same key, the
//! one registered later wins.
//!
//! Keys are hierarchical strings joined with [`KEY_DELIMITER`]
//! (`Facebook:AppSecret`) and compare case-insensitively.
//!
//! ```no_run
//! use usersecrets::ConfigurationBuilder;
//!
//! let configuration = ConfigurationBuilder::new()
//!     .add_json_file("appsettings.json", true)
//!     .add_user_secrets("webapp-0c1b7ed3")?
//!     .build()?;
//!
//! let secret = configuration.get("Facebook:AppSecret");
//! # Ok::<(), usersecrets::UserSecretsError>(())
//! ```

mod json;
mod user_secrets;

pub use json::JsonFileSource;

use crate::error::Result;
use crate::path::UserProfile;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Separator between the segments of a hierarchical key.
pub const KEY_DELIMITER: &str = ":";

/// A provider of configuration key/value pairs.
pub trait ConfigurationSource {
    /// Produces this source's pairs. Called once per build.
    fn load(&self) -> Result<Vec<(String, String)>>;
}

/// Fixed key/value pairs held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pairs: Vec<(String, String)>,
}

impl MemorySource {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigurationSource for MemorySource {
    fn load(&self) -> Result<Vec<(String, String)>> {
        Ok(self.pairs.clone())
    }
}

/// Collects configuration sources in priority order.
#[derive(Default)]
pub struct ConfigurationBuilder {
    base_path: Option<PathBuf>,
    user_profile: Option<UserProfile>,
    sources: Vec<Box<dyn ConfigurationSource>>,
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory that relative file sources are resolved against.
    pub fn set_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    /// Uses `profile` instead of the process environment when locating
    /// user secrets.
    pub fn set_user_profile(mut self, profile: UserProfile) -> Self {
        self.user_profile = Some(profile);
        self
    }

    pub(crate) fn user_profile(&self) -> UserProfile {
        self.user_profile
            .clone()
            .unwrap_or_else(UserProfile::from_env)
    }

    /// Appends `source`; it overrides every source added before it.
    pub fn add_source<S: ConfigurationSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Appends fixed key/value pairs.
    pub fn add_in_memory<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.add_source(MemorySource::new(pairs))
    }

    /// Appends a JSON file. Relative paths are resolved against the base path,
    /// or the current directory when none is set.
    pub fn add_json_file(self, path: impl AsRef<Path>, optional: bool) -> Self {
        let path = path.as_ref();
        let full_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            let base = self
                .base_path
                .clone()
                .or_else(|| std::env::current_dir().ok())
                .unwrap_or_default();
            base.join(path)
        };
        self.add_source(JsonFileSource::for_path(&full_path, optional))
    }

    /// Number of sources registered so far.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Loads every source and merges them, later sources winning.
    pub fn build(&self) -> Result<Configuration> {
        let mut configuration = Configuration::default();
        for source in &self.sources {
            for (key, value) in source.load()? {
                configuration.insert(key, value);
            }
        }
        Ok(configuration)
    }
}

/// The merged key space produced by [`ConfigurationBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    entries: IndexMap<String, (String, String)>,
}

impl Configuration {
    fn insert(&mut self, key: String, value: String) {
        let folded = key.to_lowercase();
        match self.entries.get_mut(&folded) {
            Some(entry) => entry.1 = value,
            None => {
                self.entries.insert(folded, (key, value));
            }
        }
    }

    /// Looks up `key`, ignoring case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_lowercase())
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over keys (as first seen) and values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

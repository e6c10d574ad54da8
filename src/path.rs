//! # Secrets path resolution
//!
//! Every project keeps its secrets in a single `secrets.json` file inside the
//! user profile, namespaced by the project's user secrets ID:
//!
//! ```text
//! %APPDATA%\Microsoft\UserSecrets\<id>\secrets.json     (APPDATA is set)
//! $HOME/.microsoft/usersecrets/<id>/secrets.json        (otherwise)
//! ```
//!
//! The two layouts differ in casing on purpose; existing secrets on disk
//! depend on both.
//!
//! The ID itself can come from several places. [`SecretsPathResolver`] offers
//! one named method per source, highest precedence first:
//!
//! 1. [`path_from_id`](SecretsPathResolver::path_from_id): the caller passes the ID
//! 2. [`path_from_unit`](SecretsPathResolver::path_from_unit): the ID declared on a [`ProgramUnit`]
//! 3. [`path_from_entry_unit`](SecretsPathResolver::path_from_entry_unit): the ID declared on
//!    the entry unit of the running process
//! 4. [`path_from_project`](SecretsPathResolver::path_from_project): the ID stored in a
//!    marker file inside the project directory (legacy)

use crate::error::{Result, UserSecretsError};
use crate::file_provider::{FileProvider, PhysicalFileProvider};
use crate::unit::{DEFAULT_MARKER_FILE_NAME, ProgramUnit, RuntimeEnvironment};
use serde::Deserialize;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Name of the file holding a project's secrets.
pub const SECRETS_FILE_NAME: &str = "secrets.json";

/// Environment variable holding the per-user application data directory.
pub const APP_DATA_VAR: &str = "APPDATA";

/// Environment variable holding the user's home directory.
pub const HOME_VAR: &str = "HOME";

/// Returns whether `c` may not appear in a filesystem path.
fn is_invalid_path_char(c: char) -> bool {
    matches!(c, '"' | '<' | '>' | '|' | '\0') || ('\u{1}'..='\u{1f}').contains(&c)
}

/// Checks that `id` can be used as a directory name for the secrets file.
///
/// # Errors
///
/// * [`UserSecretsError::EmptyUserSecretsId`] for an empty ID
/// * [`UserSecretsError::InvalidCharacter`] naming the first offending
///   character and its character index
pub fn validate_user_secrets_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(UserSecretsError::EmptyUserSecretsId);
    }

    match id.chars().enumerate().find(|(_, c)| is_invalid_path_char(*c)) {
        Some((index, character)) => Err(UserSecretsError::InvalidCharacter { character, index }),
        None => Ok(()),
    }
}

/// The directories the secrets root is derived from.
///
/// Captured once from the environment by [`UserProfile::from_env`], or built
/// explicitly to resolve paths for another profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    app_data: Option<PathBuf>,
    home: Option<PathBuf>,
}

impl UserProfile {
    /// Creates a profile from explicit directories. Empty paths count as unset.
    pub fn new(app_data: Option<PathBuf>, home: Option<PathBuf>) -> Self {
        Self {
            app_data: app_data.filter(|p| !p.as_os_str().is_empty()),
            home: home.filter(|p| !p.as_os_str().is_empty()),
        }
    }

    /// A profile with only a home directory, as on Unix-like systems.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self::new(None, Some(home.into()))
    }

    /// A profile with an application data directory, as on Windows.
    pub fn with_app_data(app_data: impl Into<PathBuf>) -> Self {
        Self::new(Some(app_data.into()), None)
    }

    /// Reads `APPDATA` and `HOME` from the process environment.
    ///
    /// When `HOME` is unset or empty, the platform's notion of the home
    /// directory is used instead.
    pub fn from_env() -> Self {
        let var = |key: &str| env::var_os(key).filter(|v: &OsString| !v.is_empty());

        let home = var(HOME_VAR).map(PathBuf::from).or_else(|| {
            directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
        });

        Self::new(var(APP_DATA_VAR).map(PathBuf::from), home)
    }

    pub fn app_data(&self) -> Option<&Path> {
        self.app_data.as_deref()
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// The directory holding one sub-directory per user secrets ID.
    pub fn secrets_root(&self) -> Result<PathBuf> {
        if let Some(app_data) = &self.app_data {
            return Ok(app_data.join("Microsoft").join("UserSecrets"));
        }

        match &self.home {
            Some(home) => Ok(home.join(".microsoft").join("usersecrets")),
            None => Err(UserSecretsError::NoUserProfile),
        }
    }
}

/// Where a user secrets ID should be read from.
///
/// Variants are listed highest precedence first.
pub enum IdentifierSource<'a> {
    /// The ID itself.
    Explicit(&'a str),
    /// The ID declared on a program unit.
    Unit(&'a ProgramUnit),
    /// The ID declared on the entry unit of the running process.
    EntryPoint(&'a dyn RuntimeEnvironment),
    /// A project directory or marker file path (legacy).
    Project(&'a Path),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkerFile {
    #[serde(default)]
    user_secrets_id: Option<serde_json::Value>,
}

/// Reads the user secrets ID from the JSON marker file `file_name`.
///
/// # Errors
///
/// * [`UserSecretsError::MarkerFileNotFound`] if the file does not exist, is a
///   directory, or has no physical location
/// * [`UserSecretsError::Json`] / [`UserSecretsError::NotAnObject`] if it is
///   not a JSON object
/// * [`UserSecretsError::MissingUserSecretsId`] if `userSecretsId` is absent,
///   not a string, or empty
pub fn user_secrets_id_from_marker(provider: &dyn FileProvider, file_name: &str) -> Result<String> {
    let file_info = provider.file_info(file_name);
    let path = match file_info.physical_path() {
        Some(path) if file_info.is_readable_file() => path.to_path_buf(),
        _ => {
            let root = provider
                .file_info("/")
                .physical_path()
                .or(provider.root())
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            return Err(UserSecretsError::MarkerFileNotFound {
                file_name: file_name.to_string(),
                root,
            });
        }
    };

    let content = file_info.read_to_string()?;
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| UserSecretsError::Json {
            path: path.clone(),
            source,
        })?;
    if !value.is_object() {
        return Err(UserSecretsError::NotAnObject { path });
    }

    let marker: MarkerFile =
        serde_json::from_value(value).map_err(|source| UserSecretsError::Json {
            path: path.clone(),
            source,
        })?;

    match marker.user_secrets_id {
        Some(serde_json::Value::String(id)) if !id.is_empty() => Ok(id),
        _ => Err(UserSecretsError::MissingUserSecretsId { path }),
    }
}

/// Resolves the secrets file location for a [`UserProfile`].
#[derive(Debug, Clone, Default)]
pub struct SecretsPathResolver {
    profile: UserProfile,
}

impl SecretsPathResolver {
    pub fn new(profile: UserProfile) -> Self {
        Self { profile }
    }

    /// A resolver for the profile described by the process environment.
    pub fn from_env() -> Self {
        Self::new(UserProfile::from_env())
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Resolves the secrets file from whichever source the caller picked.
    pub fn resolve(&self, source: &IdentifierSource<'_>) -> Result<PathBuf> {
        match source {
            IdentifierSource::Explicit(id) => self.path_from_id(id),
            IdentifierSource::Unit(unit) => self.path_from_unit(unit),
            IdentifierSource::EntryPoint(runtime) => self.path_from_entry_unit(*runtime),
            #[allow(deprecated)]
            IdentifierSource::Project(path) => self.path_from_project(path),
        }
    }

    /// Builds `<secrets-root>/<id>/secrets.json`.
    ///
    /// Performs no I/O.
    pub fn path_from_id(&self, user_secrets_id: &str) -> Result<PathBuf> {
        validate_user_secrets_id(user_secrets_id)?;

        Ok(self
            .profile
            .secrets_root()?
            .join(user_secrets_id)
            .join(SECRETS_FILE_NAME))
    }

    /// Reads the ID from the marker file `marker_file_name` under `provider`.
    pub fn path_from_marker(
        &self,
        provider: &dyn FileProvider,
        marker_file_name: &str,
    ) -> Result<PathBuf> {
        let id = user_secrets_id_from_marker(provider, marker_file_name)?;
        self.path_from_id(&id)
    }

    /// Reads the ID from the marker file `marker_file_name` in directory `root`.
    pub fn path_from_root(&self, root: &Path, marker_file_name: &str) -> Result<PathBuf> {
        self.path_from_marker(&PhysicalFileProvider::new(root), marker_file_name)
    }

    /// Uses the ID declared on `unit`.
    pub fn path_from_unit(&self, unit: &ProgramUnit) -> Result<PathBuf> {
        let id = unit
            .user_secrets_id()
            .ok_or_else(|| UserSecretsError::MissingUnitSecretsId {
                unit: unit.name().to_string(),
            })?;
        self.path_from_id(id)
    }

    /// Uses the ID declared on the entry unit of the running process.
    pub fn path_from_entry_unit(&self, runtime: &dyn RuntimeEnvironment) -> Result<PathBuf> {
        let unit = runtime
            .entry_unit()
            .ok_or(UserSecretsError::EntryUnitUnavailable)?;
        self.path_from_unit(&unit)
    }

    /// Reads the ID from the marker file the entry unit names, under `provider`.
    pub fn path_from_entry_marker(
        &self,
        provider: &dyn FileProvider,
        runtime: &dyn RuntimeEnvironment,
    ) -> Result<PathBuf> {
        let unit = runtime
            .entry_unit()
            .ok_or(UserSecretsError::EntryUnitUnavailable)?;
        self.path_from_marker(provider, unit.marker_file_name())
    }

    /// Locates the ID through a project path.
    ///
    /// A directory is searched for `project.json`; any other path is taken as
    /// the marker file itself.
    #[deprecated(note = "use path_from_root with an explicit marker file name instead")]
    pub fn path_from_project(&self, project_path: &Path) -> Result<PathBuf> {
        if project_path.is_dir() {
            return self.path_from_root(project_path, DEFAULT_MARKER_FILE_NAME);
        }

        let root = project_path.parent().unwrap_or(Path::new(""));
        let file_name = project_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.path_from_root(root, &file_name)
    }
}

/// Secrets file location for `user_secrets_id` in the current user profile.
pub fn secrets_path_from_id(user_secrets_id: &str) -> Result<PathBuf> {
    SecretsPathResolver::from_env().path_from_id(user_secrets_id)
}

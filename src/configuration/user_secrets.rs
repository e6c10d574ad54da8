use super::{ConfigurationBuilder, JsonFileSource};
use crate::error::{Result, UserSecretsError};
use crate::path::SecretsPathResolver;
use crate::unit::{ProgramUnit, RuntimeEnvironment};
use std::path::Path;

/// Registration of the user secrets file as a configuration source.
///
/// Each method appends an optional JSON source for the secrets file at the
/// current position in the chain. A missing secrets file contributes no keys.
impl ConfigurationBuilder {
    /// Appends the secrets file at `path`.
    ///
    /// When the file's directory does not exist yet the source is registered
    /// without file access and contributes nothing.
    pub fn add_secrets_file(self, path: &Path) -> Self {
        tracing::debug!("Adding user secrets from {}", path.display());
        self.add_source(JsonFileSource::for_path(path, true))
    }

    /// Appends the secrets for `user_secrets_id`.
    pub fn add_user_secrets(self, user_secrets_id: &str) -> Result<Self> {
        let path = self.resolver().path_from_id(user_secrets_id)?;
        Ok(self.add_secrets_file(&path))
    }

    /// Appends the secrets for the ID declared on `unit`.
    pub fn add_user_secrets_for(self, unit: &ProgramUnit) -> Result<Self> {
        let path = self.resolver().path_from_unit(unit)?;
        Ok(self.add_secrets_file(&path))
    }

    /// Appends the secrets for the entry unit of the running process.
    pub fn add_user_secrets_from_entry(self, runtime: &dyn RuntimeEnvironment) -> Result<Self> {
        let path = self.resolver().path_from_entry_unit(runtime)?;
        Ok(self.add_secrets_file(&path))
    }

    /// Appends the secrets for the project found at the base path.
    #[deprecated(note = "use add_user_secrets or add_user_secrets_for instead")]
    pub fn add_user_secrets_from_project(self) -> Result<Self> {
        let base_path = self
            .base_path()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(UserSecretsError::MissingBasePath)?
            .to_path_buf();

        #[allow(deprecated)]
        let path = self.resolver().path_from_project(&base_path)?;
        Ok(self.add_secrets_file(&path))
    }

    fn resolver(&self) -> SecretsPathResolver {
        SecretsPathResolver::new(self.user_profile())
    }
}

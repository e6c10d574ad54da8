//! usersecrets - per-project developer secrets outside the source tree
//!
//! Secrets that a developer needs locally (API keys, connection strings) are
//! kept in a JSON file inside the user profile instead of the project
//! directory, so they never end up in source control. Each project is
//! identified by a *user secrets ID*; the ID maps to exactly one file:
//!
//! ```text
//! $HOME/.microsoft/usersecrets/<id>/secrets.json
//! %APPDATA%\Microsoft\UserSecrets\<id>\secrets.json
//! ```
//!
//! # Features
//!
//! - **Path resolution**: find the secrets file from an explicit ID, a
//!   [`ProgramUnit`] descriptor, the process entry unit, or a marker file in
//!   the project directory
//! - **Store access**: read, mutate and write the secrets document
//! - **Layered configuration**: merge the secrets into a
//!   [`ConfigurationBuilder`] as an optional source
//! - **CLI**: the `user-secret` tool to set, remove, list and clear secrets
//!
//! # Example
//!
//! ```no_run
//! use usersecrets::{ConfigurationBuilder, SecretsStore, secrets_path_from_id};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Store a secret for the project
//!     let store = SecretsStore::new(secrets_path_from_id("webapp-0c1b7ed3")?);
//!     store.set("Facebook:AppSecret", "value1")?;
//!
//!     // Read it back through configuration
//!     let configuration = ConfigurationBuilder::new()
//!         .add_in_memory([("Facebook:AppSecret", "placeholder")])
//!         .add_user_secrets("webapp-0c1b7ed3")?
//!         .build()?;
//!     assert_eq!(configuration.get("Facebook:AppSecret"), Some("value1"));
//!
//!     Ok(())
//! }
//! ```

// Internal modules
mod error;
mod macros;

pub mod configuration;
pub mod file_provider;
pub mod path;
pub mod store;
pub mod unit;

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

// Public API exports
pub use configuration::{
    Configuration, ConfigurationBuilder, ConfigurationSource, JsonFileSource, MemorySource,
};
pub use error::{ErrorKind, Result, UserSecretsError};
pub use file_provider::{FileInfo, FileProvider, PhysicalFileProvider};
pub use path::{
    IdentifierSource, SecretsPathResolver, UserProfile, secrets_path_from_id,
    user_secrets_id_from_marker, validate_user_secrets_id,
};
pub use store::{SecretsDocument, SecretsStore};
pub use unit::{DEFAULT_MARKER_FILE_NAME, HostRuntime, ProgramUnit, RuntimeEnvironment};

// Used by declare_entry_unit!
#[doc(hidden)]
pub mod __private {
    pub use linkme;
}

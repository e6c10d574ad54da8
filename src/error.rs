//! Error types for user secrets operations

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for user secrets operations
///
/// Every fallible function in the library returns this type. Use
/// [`UserSecretsError::kind`] to branch on the broad category of a failure
/// without matching every variant.
#[derive(Error, Debug)]
pub enum UserSecretsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("The user secrets ID must not be empty")]
    EmptyUserSecretsId,
    #[error("Invalid character '{character}' found in the user secrets ID at index '{index}'")]
    InvalidCharacter { character: char, index: usize },
    #[error("Could not find '{file_name}' in '{root}'")]
    MarkerFileNotFound { file_name: String, root: String },
    #[error("The configuration file '{}' was not found and is not optional", path.display())]
    FileNotFound { path: PathBuf },
    #[error("Missing 'userSecretsId' in '{}'", path.display())]
    MissingUserSecretsId { path: PathBuf },
    #[error("Program unit '{unit}' does not declare a user secrets ID")]
    MissingUnitSecretsId { unit: String },
    #[error(
        "Could not determine the user profile directory. Set the APPDATA or HOME environment variable"
    )]
    NoUserProfile,
    #[error("A base path is required to locate the project. Call set_base_path on the builder first")]
    MissingBasePath,
    #[error("Could not parse '{}' as JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("'{}' must contain a JSON object", path.display())]
    NotAnObject { path: PathBuf },
    #[error("A duplicate key '{key}' was found in '{}'", path.display())]
    DuplicateKey { key: String, path: PathBuf },
    #[error(
        "Could not determine the entry unit of this process. Declare one with declare_entry_unit! or pass the user secrets ID explicitly"
    )]
    EntryUnitUnavailable,
}

/// Broad classification of [`UserSecretsError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required argument was empty or malformed
    InvalidArgument,
    /// A file the operation depends on does not exist
    NotFound,
    /// The inputs exist but do not carry what the operation needs
    InvalidState,
    /// A file exists but is not the JSON shape expected
    ParseError,
    /// The running platform cannot provide the requested information
    PlatformUnsupported,
    /// Underlying filesystem failure
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::NotFound => "not found",
            ErrorKind::InvalidState => "invalid state",
            ErrorKind::ParseError => "parse error",
            ErrorKind::PlatformUnsupported => "platform unsupported",
            ErrorKind::Io => "I/O error",
        };
        f.write_str(name)
    }
}

impl UserSecretsError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserSecretsError::EmptyUserSecretsId | UserSecretsError::InvalidCharacter { .. } => {
                ErrorKind::InvalidArgument
            }
            UserSecretsError::MarkerFileNotFound { .. } | UserSecretsError::FileNotFound { .. } => {
                ErrorKind::NotFound
            }
            UserSecretsError::MissingUserSecretsId { .. }
            | UserSecretsError::MissingUnitSecretsId { .. }
            | UserSecretsError::NoUserProfile
            | UserSecretsError::MissingBasePath => ErrorKind::InvalidState,
            UserSecretsError::Json { .. }
            | UserSecretsError::NotAnObject { .. }
            | UserSecretsError::DuplicateKey { .. } => ErrorKind::ParseError,
            UserSecretsError::EntryUnitUnavailable => ErrorKind::PlatformUnsupported,
            UserSecretsError::Io(_) => ErrorKind::Io,
        }
    }
}

/// A type alias for `Result<T, UserSecretsError>`
///
/// This provides a convenient shorthand for functions that return
/// a result with a `UserSecretsError` as the error type.
pub type Result<T> = std::result::Result<T, UserSecretsError>;

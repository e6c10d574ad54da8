//! Program units and the runtime environment
//!
//! A [`ProgramUnit`] describes a deployable binary together with the user
//! secrets metadata attached to it: the secrets ID itself and, optionally, the
//! name of the marker file that stores the ID inside the project tree.
//!
//! Binaries attach this metadata to their entry point at build time with the
//! [`declare_entry_unit!`](crate::declare_entry_unit) macro. The running
//! process is described by a [`RuntimeEnvironment`], which is passed
//! explicitly to whatever needs it so that tests can substitute their own.

use std::io::IsTerminal;

/// Marker file name used when a program unit does not declare one.
pub const DEFAULT_MARKER_FILE_NAME: &str = "project.json";

/// Descriptor of a program unit and its user secrets metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramUnit {
    name: String,
    user_secrets_id: Option<String>,
    marker_file_name: Option<String>,
}

impl ProgramUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user_secrets_id: None,
            marker_file_name: None,
        }
    }

    /// Attaches a user secrets ID to this unit.
    pub fn with_user_secrets_id(mut self, id: impl Into<String>) -> Self {
        self.user_secrets_id = Some(id.into());
        self
    }

    /// Overrides the marker file that stores the user secrets ID.
    pub fn with_marker_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.marker_file_name = Some(file_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn user_secrets_id(&self) -> Option<&str> {
        self.user_secrets_id.as_deref()
    }

    /// Returns the declared marker file name, or [`DEFAULT_MARKER_FILE_NAME`].
    pub fn marker_file_name(&self) -> &str {
        self.marker_file_name
            .as_deref()
            .unwrap_or(DEFAULT_MARKER_FILE_NAME)
    }
}

/// Static registration record emitted by [`declare_entry_unit!`](crate::declare_entry_unit).
#[doc(hidden)]
pub struct UnitRegistration {
    pub name: &'static str,
    pub user_secrets_id: Option<&'static str>,
    pub marker_file_name: Option<&'static str>,
}

impl UnitRegistration {
    fn to_unit(&self) -> ProgramUnit {
        ProgramUnit {
            name: self.name.to_string(),
            user_secrets_id: self.user_secrets_id.map(str::to_string),
            marker_file_name: self.marker_file_name.map(str::to_string),
        }
    }
}

/// Distributed slice collecting the entry unit declared by the final binary.
#[doc(hidden)]
#[linkme::distributed_slice]
pub static ENTRY_UNITS: [UnitRegistration];

/// The process a library call is running in.
pub trait RuntimeEnvironment {
    /// The unit that contains the process entry point, if it can be determined.
    fn entry_unit(&self) -> Option<ProgramUnit>;

    /// Whether standard output is attached to a terminal that renders colours.
    fn is_terminal(&self) -> bool;
}

/// [`RuntimeEnvironment`] of the current process.
///
/// The entry unit is whatever the linked binary declared with
/// [`declare_entry_unit!`](crate::declare_entry_unit). Zero or several
/// declarations leave the entry unit undetermined.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostRuntime;

impl HostRuntime {
    pub fn current() -> Self {
        Self
    }
}

impl RuntimeEnvironment for HostRuntime {
    fn entry_unit(&self) -> Option<ProgramUnit> {
        match ENTRY_UNITS.len() {
            1 => Some(ENTRY_UNITS[0].to_unit()),
            _ => None,
        }
    }

    fn is_terminal(&self) -> bool {
        std::io::stdout().is_terminal()
    }
}

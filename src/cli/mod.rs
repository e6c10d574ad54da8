//! The `user-secret` command line tool
//!
//! Each subcommand locates the project's secrets file through the marker file
//! in the project directory, then reads or rewrites that file. Output is
//! reported through `tracing` and rendered by a [`CommandOutputProvider`].

mod output;

pub use output::{CapturedOutput, CommandOutputProvider};

use crate::path::{SecretsPathResolver, UserProfile};
use crate::store::{SecretsStore, display_value};
use crate::unit::RuntimeEnvironment;
use clap::error::ErrorKind;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use color_eyre::eyre::Result;
use serde_json::Value;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;

/// Exit code for a command that completed.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit code for a command that failed.
pub const EXIT_FAILURE: u8 = 1;
/// Exit code when no subcommand was given.
pub const EXIT_USAGE: u8 = 2;

/// Main CLI structure for the user-secret application.
#[derive(Parser)]
#[command(name = "user-secret")]
#[command(about = "Manages user secrets", long_about = None)]
#[command(version, disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Show help information
    #[allow(dead_code)]
    #[arg(short = 'h', long = "help", short_alias = '?', action = ArgAction::Help, global = true)]
    help: Option<bool>,
    /// The subcommand to execute
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands for the user-secret CLI.
#[derive(Subcommand)]
enum Commands {
    /// Sets the user secret to the specified value
    #[command(disable_help_flag = true)]
    Set {
        /// Name of the secret
        name: String,
        /// Value of the secret
        value: String,
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Removes the specified user secret
    #[command(disable_help_flag = true)]
    Remove {
        /// Name of the secret
        name: String,
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Lists all the application secrets
    #[command(disable_help_flag = true)]
    List {
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Deletes all the application secrets
    #[command(disable_help_flag = true)]
    Clear {
        #[command(flatten)]
        project: ProjectArgs,
    },
}

#[derive(Args)]
struct ProjectArgs {
    /// Path to project, default is current directory
    #[arg(short, long, value_name = "PATH")]
    project: Option<PathBuf>,
}

/// The user-secret command dispatcher.
///
/// # Example
///
/// ```no_run
/// use usersecrets::HostRuntime;
/// use usersecrets::cli::Program;
///
/// let code = Program::new(&HostRuntime::current()).run(["user-secret", "list"]);
/// std::process::exit(code.into());
/// ```
pub struct Program {
    output: CommandOutputProvider,
    resolver: SecretsPathResolver,
}

impl Program {
    /// Creates a program writing to standard output and resolving secrets in
    /// the user profile of the process environment.
    pub fn new(runtime: &dyn RuntimeEnvironment) -> Self {
        Self {
            output: CommandOutputProvider::new(runtime),
            resolver: SecretsPathResolver::from_env(),
        }
    }

    /// Sends output to `output` instead.
    pub fn with_output(mut self, output: CommandOutputProvider) -> Self {
        self.output = output;
        self
    }

    /// Resolves secrets files inside `profile` instead.
    pub fn with_user_profile(mut self, profile: UserProfile) -> Self {
        self.resolver = SecretsPathResolver::new(profile);
        self
    }

    pub fn output(&self) -> &CommandOutputProvider {
        &self.output
    }

    /// Parses `args` (program name first) and runs the selected command.
    ///
    /// Returns the process exit code: [`EXIT_SUCCESS`], [`EXIT_FAILURE`] or
    /// [`EXIT_USAGE`].
    pub fn run<I, T>(&self, args: I) -> u8
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(err) => return self.report_parse_error(err),
        };

        let mut output = self.output.clone();
        if cli.verbose {
            output.set_log_level(LevelFilter::DEBUG);
        }

        output.scope(|| match cli.command {
            Some(command) => match self.execute(command) {
                Ok(()) => EXIT_SUCCESS,
                Err(err) => {
                    error!(critical = true, "Command failed : {}", err);
                    EXIT_FAILURE
                }
            },
            // Show help information if no subcommand was specified
            None => {
                let help = Cli::command().render_help().to_string();
                if let Err(err) = output.write_raw(&help) {
                    error!("Could not write help: {}", err);
                }
                EXIT_USAGE
            }
        })
    }

    fn report_parse_error(&self, err: clap::Error) -> u8 {
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                if let Err(write_err) = self.output.write_raw(&err.render().to_string()) {
                    eprintln!("{}", write_err);
                }
                EXIT_SUCCESS
            }
            _ => self.output.scope(|| {
                let message = err.render().to_string();
                error!(critical = true, "Command failed : {}", message.trim_end());
                EXIT_FAILURE
            }),
        }
    }

    fn execute(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Set {
                name,
                value,
                project,
            } => {
                let store = self.open_store(project)?;
                store.mutate(|secrets| {
                    secrets.insert(name.clone(), Value::String(value.clone()));
                })?;
                info!("Successfully saved {} = {} to the secret store.", name, value);
            }
            Commands::Remove { name, project } => {
                let store = self.open_store(project)?;
                store.mutate(|secrets| {
                    if secrets.shift_remove(&name).is_none() {
                        warn!("Cannot find '{}' in the secret store.", name);
                    }
                })?;
            }
            Commands::List { project } => {
                let secrets = self.open_store(project)?.load()?;
                if secrets.is_empty() {
                    info!("No secrets found.");
                }
                for (name, value) in &secrets {
                    info!("{} = {}", name, display_value(value));
                }
            }
            Commands::Clear { project } => {
                self.open_store(project)?.clear()?;
            }
        }

        Ok(())
    }

    fn open_store(&self, project: ProjectArgs) -> Result<SecretsStore> {
        let project_path = match project.project {
            Some(path) => path,
            None => std::env::current_dir()?,
        };
        debug!("Project file path {}.", project_path.display());

        #[allow(deprecated)]
        let secrets_path = self.resolver.path_from_project(&project_path)?;
        debug!("Secrets file path {}.", secrets_path.display());

        Ok(SecretsStore::new(secrets_path))
    }
}

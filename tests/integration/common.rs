use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use usersecrets::cli::{CapturedOutput, CommandOutputProvider, Program};
use usersecrets::{
    DEFAULT_MARKER_FILE_NAME, HostRuntime, SecretsPathResolver, SecretsStore, UserProfile,
};

/// Test helper holding a project directory and a separate user profile
pub struct TestFixture {
    _project_dir: TempDir,
    _home_dir: TempDir,
    pub project_path: PathBuf,
    pub user_secrets_id: String,
    pub profile: UserProfile,
    pub output: CapturedOutput,
}

impl TestFixture {
    /// A project whose marker file declares a fresh user secrets ID
    pub fn new() -> Self {
        let project_dir = TempDir::new().unwrap();
        let home_dir = TempDir::new().unwrap();
        let project_path = project_dir.path().to_path_buf();

        let user_secrets_id = format!(
            "test-{}",
            project_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        );
        let marker = format!(
            r#"{{
  "name": "webapp",
  "userSecretsId": "{}"
}}"#,
            user_secrets_id
        );
        fs::write(project_path.join(DEFAULT_MARKER_FILE_NAME), marker).unwrap();

        Self {
            profile: UserProfile::with_home(home_dir.path()),
            _project_dir: project_dir,
            _home_dir: home_dir,
            project_path,
            user_secrets_id,
            output: CapturedOutput::new(),
        }
    }

    /// A program that writes into the fixture's captured output
    pub fn program(&self) -> Program {
        Program::new(&HostRuntime::current())
            .with_output(CommandOutputProvider::captured(self.output.clone()))
            .with_user_profile(self.profile.clone())
    }

    /// Runs `user-secret <args> -p <project>`
    pub fn run_in_project(&self, args: &[&str]) -> u8 {
        let mut argv = vec!["user-secret".to_string()];
        argv.extend(args.iter().map(|a| a.to_string()));
        argv.push("-p".to_string());
        argv.push(self.project_path.display().to_string());
        self.program().run(argv)
    }

    /// Runs `user-secret <args>` verbatim
    pub fn run(&self, args: &[&str]) -> u8 {
        let argv = std::iter::once("user-secret").chain(args.iter().copied());
        self.program().run(argv)
    }

    pub fn secrets_path(&self) -> PathBuf {
        SecretsPathResolver::new(self.profile.clone())
            .path_from_id(&self.user_secrets_id)
            .unwrap()
    }

    pub fn store(&self) -> SecretsStore {
        SecretsStore::new(self.secrets_path())
    }

    pub fn write_secrets(&self, content: &str) {
        let path = self.secrets_path();
        fs::create_dir_all(path.parent().unwrap_or(Path::new("."))).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn lines(&self) -> Vec<String> {
        self.output.lines()
    }
}

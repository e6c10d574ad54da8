use crate::common::TestFixture;
use std::fs;
use tempfile::TempDir;
use usersecrets::ConfigurationBuilder;
use usersecrets::cli::{EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE};

#[test]
fn test_set_command_saves_secret() {
    let fixture = TestFixture::new();

    let code = fixture.run_in_project(&["set", "Facebook:AppSecret", "value1"]);

    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(
        fixture.lines(),
        vec!["info: Successfully saved Facebook:AppSecret = value1 to the secret store."]
    );

    let configuration = ConfigurationBuilder::new()
        .set_user_profile(fixture.profile.clone())
        .add_user_secrets(&fixture.user_secrets_id)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(configuration.get("Facebook:AppSecret"), Some("value1"));
}

#[test]
fn test_set_command_overwrites_existing_value() {
    let fixture = TestFixture::new();
    fixture.store().set("Mail:Password", "old").unwrap();

    let code = fixture.run_in_project(&["set", "Mail:Password", "new value"]);

    assert_eq!(code, EXIT_SUCCESS);
    let document = fixture.store().load().unwrap();
    assert_eq!(document.len(), 1);
    assert_eq!(document["Mail:Password"], "new value");
}

#[test]
fn test_list_command_prints_each_secret() {
    let fixture = TestFixture::new();
    fixture.write_secrets(r#"{ "Zeta": "z", "Count": 3, "Alpha": "a" }"#);

    let code = fixture.run_in_project(&["list"]);

    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(
        fixture.lines(),
        vec!["info: Zeta = z", "info: Count = 3", "info: Alpha = a"]
    );
}

#[test]
fn test_list_command_without_secrets() {
    let fixture = TestFixture::new();

    let code = fixture.run_in_project(&["list"]);

    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(fixture.lines(), vec!["info: No secrets found."]);
    assert!(!fixture.secrets_path().exists());
}

#[test]
fn test_clear_command_removes_all_secrets() {
    let fixture = TestFixture::new();
    fixture.store().set("A", "1").unwrap();
    fixture.store().set("B", "2").unwrap();

    assert_eq!(fixture.run_in_project(&["clear"]), EXIT_SUCCESS);
    assert_eq!(fs::read_to_string(fixture.secrets_path()).unwrap(), "{}");

    fixture.output.clear();
    assert_eq!(fixture.run_in_project(&["list"]), EXIT_SUCCESS);
    assert_eq!(fixture.lines(), vec!["info: No secrets found."]);
}

#[test]
fn test_remove_command_deletes_secret() {
    let fixture = TestFixture::new();
    fixture.store().set("Keep", "1").unwrap();
    fixture.store().set("Drop", "2").unwrap();

    let code = fixture.run_in_project(&["remove", "Drop"]);

    assert_eq!(code, EXIT_SUCCESS);
    assert!(fixture.lines().is_empty());
    let document = fixture.store().load().unwrap();
    assert!(document.contains_key("Keep"));
    assert!(!document.contains_key("Drop"));
}

#[test]
fn test_remove_command_warns_on_missing_secret() {
    let fixture = TestFixture::new();
    fixture.store().set("Keep", "1").unwrap();
    let before = fs::read(fixture.secrets_path()).unwrap();

    let code = fixture.run_in_project(&["remove", "NoSuchKey"]);

    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(
        fixture.lines(),
        vec!["warn: Cannot find 'NoSuchKey' in the secret store."]
    );
    assert_eq!(fs::read(fixture.secrets_path()).unwrap(), before);
}

#[test]
fn test_verbose_flag_reports_paths() {
    let fixture = TestFixture::new();

    let code = fixture.run_in_project(&["list", "-v"]);

    assert_eq!(code, EXIT_SUCCESS);
    let lines = fixture.lines();
    assert_eq!(
        lines[0],
        format!("verbose: Project file path {}.", fixture.project_path.display())
    );
    assert_eq!(
        lines[1],
        format!("verbose: Secrets file path {}.", fixture.secrets_path().display())
    );
    assert_eq!(lines[2], "info: No secrets found.");
}

#[test]
fn test_default_output_hides_verbose_lines() {
    let fixture = TestFixture::new();

    fixture.run_in_project(&["list"]);

    assert!(fixture.lines().iter().all(|l| !l.starts_with("verbose:")));
}

#[test]
fn test_project_option_accepts_marker_file_path() {
    let fixture = TestFixture::new();
    let marker = fixture.project_path.join("project.json");

    let code = fixture.run(&["set", "Key", "value", "--project", &marker.display().to_string()]);

    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(fixture.store().load().unwrap()["Key"], "value");
}

#[test]
fn test_no_subcommand_shows_usage() {
    let fixture = TestFixture::new();

    let code = fixture.run(&[]);

    assert_eq!(code, EXIT_USAGE);
    let output = fixture.output.contents();
    assert!(output.contains("Usage"), "{}", output);
    assert!(output.contains("set"), "{}", output);
}

#[test]
fn test_help_flag_succeeds() {
    let fixture = TestFixture::new();

    let code = fixture.run(&["--help"]);

    assert_eq!(code, EXIT_SUCCESS);
    assert!(fixture.output.contents().contains("Usage"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let fixture = TestFixture::new();

    let code = fixture.run(&["rotate"]);

    assert_eq!(code, EXIT_FAILURE);
    assert!(fixture.output.contents().starts_with("critical: Command failed : "));
}

#[test]
fn test_malformed_secrets_file_fails() {
    let fixture = TestFixture::new();
    fixture.write_secrets("{ this is not json");

    let code = fixture.run_in_project(&["list"]);

    assert_eq!(code, EXIT_FAILURE);
    let lines = fixture.lines();
    assert_eq!(lines.len(), 1, "{:?}", lines);
    assert!(lines[0].starts_with("critical: Command failed : "), "{}", lines[0]);
}

#[test]
fn test_missing_marker_file_fails() {
    let fixture = TestFixture::new();
    let empty_project = TempDir::new().unwrap();
    let project = empty_project.path().display().to_string();

    let code = fixture.run(&["set", "Key", "value", "-p", &project]);

    assert_eq!(code, EXIT_FAILURE);
    let output = fixture.output.contents();
    assert!(output.starts_with("critical: Command failed : "), "{}", output);
    assert!(output.contains("project.json"), "{}", output);
}

#[test]
fn test_marker_file_without_id_fails() {
    let fixture = TestFixture::new();
    fs::write(fixture.project_path.join("project.json"), "{}").unwrap();

    let code = fixture.run_in_project(&["list"]);

    assert_eq!(code, EXIT_FAILURE);
    assert!(fixture.output.contents().contains("userSecretsId"));
}

use crate::common::TestFixture;
use std::fs;
use usersecrets::{ConfigurationBuilder, ErrorKind, ProgramUnit, UserSecretsError};

#[test]
fn test_user_secrets_override_json_file() {
    let fixture = TestFixture::new();
    fs::write(
        fixture.project_path.join("appsettings.json"),
        r#"{ "Facebook": { "AppId": "42", "AppSecret": "from-settings" } }"#,
    )
    .unwrap();
    fixture.store().set("Facebook:AppSecret", "from-secrets").unwrap();

    let configuration = ConfigurationBuilder::new()
        .set_base_path(&fixture.project_path)
        .set_user_profile(fixture.profile.clone())
        .add_json_file("appsettings.json", false)
        .add_user_secrets(&fixture.user_secrets_id)
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(configuration.get("Facebook:AppId"), Some("42"));
    assert_eq!(configuration.get("Facebook:AppSecret"), Some("from-secrets"));
}

#[test]
fn test_sources_after_user_secrets_win() {
    let fixture = TestFixture::new();
    fixture.store().set("Mode", "secrets").unwrap();

    let configuration = ConfigurationBuilder::new()
        .set_user_profile(fixture.profile.clone())
        .add_user_secrets(&fixture.user_secrets_id)
        .unwrap()
        .add_in_memory([("Mode", "memory")])
        .build()
        .unwrap();

    assert_eq!(configuration.get("Mode"), Some("memory"));
}

#[test]
fn test_nested_secrets_are_flattened() {
    let fixture = TestFixture::new();
    fixture.write_secrets(
        r#"{ "Database": { "Primary": { "Password": "p1" }, "Port": 5432, "Replica": null } }"#,
    );

    let configuration = ConfigurationBuilder::new()
        .set_user_profile(fixture.profile.clone())
        .add_user_secrets(&fixture.user_secrets_id)
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(configuration.get("Database:Primary:Password"), Some("p1"));
    assert_eq!(configuration.get("database:port"), Some("5432"));
    assert_eq!(configuration.get("Database:Replica"), Some(""));
}

#[test]
fn test_cli_changes_are_visible_to_configuration() {
    let fixture = TestFixture::new();
    assert_eq!(fixture.run_in_project(&["set", "Api:Key", "k1"]), 0);
    assert_eq!(fixture.run_in_project(&["set", "Api:Url", "https://example.test"]), 0);
    assert_eq!(fixture.run_in_project(&["remove", "Api:Key"]), 0);

    let configuration = ConfigurationBuilder::new()
        .set_user_profile(fixture.profile.clone())
        .add_user_secrets_for(
            &ProgramUnit::new("webapp").with_user_secrets_id(fixture.user_secrets_id.clone()),
        )
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(configuration.get("Api:Key"), None);
    assert_eq!(configuration.get("Api:Url"), Some("https://example.test"));
}

#[test]
fn test_malformed_secrets_fail_the_build() {
    let fixture = TestFixture::new();
    fixture.write_secrets("[1, 2, 3]");

    let builder = ConfigurationBuilder::new()
        .set_user_profile(fixture.profile.clone())
        .add_user_secrets(&fixture.user_secrets_id)
        .unwrap();
    let err = builder.build().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ParseError);
}

#[test]
fn test_invalid_id_is_rejected_before_building() {
    let fixture = TestFixture::new();

    let err = ConfigurationBuilder::new()
        .set_user_profile(fixture.profile.clone())
        .add_user_secrets("bad|id")
        .err()
        .unwrap();

    assert!(matches!(
        err,
        UserSecretsError::InvalidCharacter {
            character: '|',
            index: 3
        }
    ));
}

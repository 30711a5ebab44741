use super::*;

use std::fs;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_when_no_file_or_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(&dir.path().join(SETTINGS_FILE), no_env);
    assert_eq!(settings, ClientSettings::default());
}

#[test]
fn file_overrides_default_base_url() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(SETTINGS_FILE);
    fs::write(&path, "api_base_url = \"http://127.0.0.1:8080/\"\n").expect("write");

    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings.api_base_url, "http://127.0.0.1:8080");
}

#[test]
fn app_env_wins_over_legacy_env_and_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(SETTINGS_FILE);
    fs::write(&path, "api_base_url = \"http://file.test\"\n").expect("write");

    let settings = load_settings_from(&path, |name| match name {
        "CUSTOMERS_API_BASE_URL" => Some("http://legacy.test".into()),
        "APP__API_BASE_URL" => Some("http://app.test".into()),
        _ => None,
    });
    assert_eq!(settings.api_base_url, "http://app.test");
}

#[test]
fn malformed_file_and_blank_values_fall_back_to_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(SETTINGS_FILE);
    fs::write(&path, "api_base_url = [").expect("write");
    assert_eq!(
        load_settings_from(&path, no_env).api_base_url,
        DEFAULT_API_BASE_URL
    );

    let settings =
        load_settings_from(&path, |name| (name == "APP__API_BASE_URL").then(|| "  ".into()));
    assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn cli_override_is_normalized() {
    let settings =
        ClientSettings::default().with_base_url(Some(" http://localhost:9000// ".into()));
    assert_eq!(settings.api_base_url, "http://localhost:9000");
    assert_eq!(
        ClientSettings::default().with_base_url(None),
        ClientSettings::default()
    );
}

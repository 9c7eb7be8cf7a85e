//! Config file, settings overrides and the first-run greeting.

use std::fs;
use std::time::Duration;

use nebula_config::{KnownIdentities, NebulaConfig};
use nebula_engine::SettingsStore;
use nebula_types::SettingKey;

use crate::common::TestShell;

#[test]
fn config_overrides_apply_and_bad_ones_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[settings]
font_color = "cyan"
font_size = 16
cursor_blink = false
padding = "lots"

[commands]
timeout_seconds = 5
"#,
    )
    .unwrap();

    let config = NebulaConfig::load_from(&path).unwrap();
    let mut settings = SettingsStore::new();
    let overrides = config.setting_overrides();
    let errors = settings.apply_overrides(overrides.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    assert_eq!(errors.len(), 1);
    assert_eq!(settings.text(SettingKey::FontColor), Some("cyan"));
    assert_eq!(settings.int(SettingKey::FontSize), Some(16));
    assert_eq!(settings.flag(SettingKey::CursorBlink), Some(false));
    assert_eq!(settings.int(SettingKey::Padding), Some(10));
    assert_eq!(config.command_timeout(), Duration::from_secs(5));
}

#[test]
fn broken_config_is_a_typed_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[settings\nfont_size = 1").unwrap();

    let err = NebulaConfig::load_from(&path).unwrap_err();
    assert_eq!(err.path(), path.as_path());
}

#[tokio::test]
async fn first_run_then_returning_identity() {
    let dir = tempfile::tempdir().unwrap();
    let known = KnownIdentities::new(dir.path().join("known_users"));

    let returning = known.check_and_record("alice@box").unwrap();
    assert!(!returning);
    let mut t = TestShell::not_started();
    t.shell.begin("alice", returning);
    assert!(!t.shell.is_ready());
    assert!(!t.submit("echo too early").await);

    // 8ms frames, as the binary drives it.
    for _ in 0..624 {
        t.shell.tick(Duration::from_millis(8));
    }
    assert!(!t.shell.is_ready());
    assert_eq!(
        t.shell.transcript().last().map(|e| e.text()),
        Some("Continuing in 1...")
    );
    t.shell.tick(Duration::from_millis(8));
    assert!(t.shell.is_ready());
    assert!(t.shell.transcript().is_empty());
    assert!(t.submit("echo now").await);

    let returning = known.check_and_record("alice@box").unwrap();
    assert!(returning);
    assert_eq!(fs::read_to_string(known.path()).unwrap().lines().count(), 1);

    let mut t = TestShell::not_started();
    t.shell.begin("alice", returning);
    assert!(t.shell.is_ready());
    assert!(t.shell.transcript().is_empty());
}

use serial_scope::config::ScopeConfig;
use serial_scope::Channel;
use serial_test::serial;
use std::fs;

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ScopeConfig::load_from(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, ScopeConfig::default());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scope.toml");
    fs::write(
        &path,
        r#"
[engine]
max_console_entries = 250

[input]
channel = "device"

[serial]
port = "/dev/ttyACM0"
"#,
    )
    .unwrap();

    let config = ScopeConfig::load_from(&path).unwrap();
    assert_eq!(config.engine.max_console_entries, 250);
    assert_eq!(config.engine.max_console_line_length, 500);
    assert_eq!(config.engine.max_raw_buffer_length, 5000);
    assert_eq!(config.input.channel, Channel::Device);
    assert_eq!(config.serial.port.as_deref(), Some("/dev/ttyACM0"));
    assert_eq!(config.serial.baud_rate, 115_200);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scope.toml");
    fs::write(&path, "[engine]\nmax_raw_buffer_length = 100\n").unwrap();

    std::env::set_var("SERIAL_SCOPE_ENGINE__MAX_RAW_BUFFER_LENGTH", "64");
    let config = ScopeConfig::load_from(&path);
    std::env::remove_var("SERIAL_SCOPE_ENGINE__MAX_RAW_BUFFER_LENGTH");

    assert_eq!(config.unwrap().engine.max_raw_buffer_length, 64);
}

#[test]
#[serial]
fn test_unknown_channel_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scope.toml");
    fs::write(&path, "[input]\nchannel = \"radio\"\n").unwrap();
    assert!(ScopeConfig::load_from(&path).is_err());
}

#[test]
#[serial]
fn test_zero_line_length_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scope.toml");
    fs::write(&path, "[engine]\nmax_console_line_length = 0\n").unwrap();
    let config = ScopeConfig::load_from(&path).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.contains("max_console_line_length"));
}

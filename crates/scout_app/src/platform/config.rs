//! Settings layering: built-in defaults, then an optional RON file, then flags.

use std::fs;
use std::path::Path;
use std::time::Duration;

use scout_engine::ClientSettings;
use scout_logging::{scout_info, scout_warn};
use serde::{Deserialize, Serialize};

use super::cli::Cli;

/// On-disk settings. Every field is optional; missing ones keep the default.
///
/// ```ron
/// (
///     server: Some("http://jobs.internal:8000"),
///     poll_interval_secs: Some(3),
///     max_polls: Some(120),
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub server: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub max_polls: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_response_bytes: Option<u64>,
    pub max_prompt_file_bytes: Option<u64>,
    pub github_prompt: Option<String>,
}

pub fn load_settings_file(path: &Path) -> SettingsFile {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            scout_warn!("Failed to read settings from {:?}: {}; using defaults", path, err);
            return SettingsFile::default();
        }
    };

    match ron::from_str(&content) {
        Ok(settings) => {
            scout_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            scout_warn!("Failed to parse settings from {:?}: {}; using defaults", path, err);
            SettingsFile::default()
        }
    }
}

/// Builds the engine settings. Flags win over the file, the file over defaults.
pub fn resolve(file: &SettingsFile, cli: &Cli) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(server) = cli.server.clone().or_else(|| file.server.clone()) {
        settings.base_url = server;
    }
    if let Some(secs) = cli
        .poll_interval_secs
        .or(file.poll_interval_secs)
        .filter(|secs| *secs > 0)
    {
        settings.poll_interval = Duration::from_secs(secs);
    }
    if let Some(max) = cli.max_polls.or(file.max_polls).filter(|max| *max > 0) {
        settings.max_poll_attempts = Some(max);
    }
    if let Some(secs) = file.connect_timeout_secs.filter(|secs| *secs > 0) {
        settings.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.request_timeout_secs.filter(|secs| *secs > 0) {
        settings.request_timeout = Duration::from_secs(secs);
    }
    if let Some(bytes) = file.max_response_bytes.filter(|bytes| *bytes > 0) {
        settings.max_response_bytes = bytes;
    }
    if let Some(bytes) = file.max_prompt_file_bytes.filter(|bytes| *bytes > 0) {
        settings.max_prompt_file_bytes = bytes;
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["scout"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let settings = resolve(&SettingsFile::default(), &cli(&[]));
        let defaults = ClientSettings::default();

        assert_eq!(settings.base_url, defaults.base_url);
        assert_eq!(settings.poll_interval, Duration::from_secs(5));
        assert_eq!(settings.max_poll_attempts, None);
    }

    #[test]
    fn flags_override_file_values() {
        let file = SettingsFile {
            server: Some("http://from-file:8000".to_string()),
            poll_interval_secs: Some(9),
            max_polls: Some(10),
            request_timeout_secs: Some(7),
            ..SettingsFile::default()
        };
        let settings = resolve(
            &file,
            &cli(&["--server", "http://from-flag:8000", "--max-polls", "3"]),
        );

        assert_eq!(settings.base_url, "http://from-flag:8000");
        assert_eq!(settings.poll_interval, Duration::from_secs(9));
        assert_eq!(settings.max_poll_attempts, Some(3));
        assert_eq!(settings.request_timeout, Duration::from_secs(7));
    }

    #[test]
    fn zero_values_in_file_are_ignored() {
        let file = SettingsFile {
            poll_interval_secs: Some(0),
            max_polls: Some(0),
            connect_timeout_secs: Some(0),
            max_response_bytes: Some(0),
            max_prompt_file_bytes: Some(0),
            ..SettingsFile::default()
        };
        let settings = resolve(&file, &cli(&[]));
        let defaults = ClientSettings::default();

        assert_eq!(settings.poll_interval, Duration::from_secs(5));
        assert_eq!(settings.max_poll_attempts, None);
        assert_eq!(settings.connect_timeout, defaults.connect_timeout);
        assert_eq!(settings.max_response_bytes, defaults.max_response_bytes);
        assert_eq!(settings.max_prompt_file_bytes, defaults.max_prompt_file_bytes);
    }

    #[test]
    fn byte_limits_from_file_are_applied() {
        let file = SettingsFile {
            max_response_bytes: Some(2048),
            max_prompt_file_bytes: Some(512),
            ..SettingsFile::default()
        };
        let settings = resolve(&file, &cli(&[]));

        assert_eq!(settings.max_response_bytes, 2048);
        assert_eq!(settings.max_prompt_file_bytes, 512);
    }

    #[test]
    fn loads_partial_ron_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scout.ron");
        fs::write(
            &path,
            r#"(server: Some("http://jobs.internal:8000"), max_polls: Some(120))"#,
        )
        .unwrap();

        let loaded = load_settings_file(&path);

        assert_eq!(
            loaded,
            SettingsFile {
                server: Some("http://jobs.internal:8000".to_string()),
                max_polls: Some(120),
                ..SettingsFile::default()
            }
        );
    }

    #[test]
    fn unreadable_or_invalid_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            load_settings_file(&temp.path().join("missing.ron")),
            SettingsFile::default()
        );

        let path = temp.path().join("broken.ron");
        fs::write(&path, "(server: ").unwrap();
        assert_eq!(load_settings_file(&path), SettingsFile::default());
    }
}

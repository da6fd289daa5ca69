//! Configuration and logging for the dark mode watcher.
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use app_dirs2::{get_app_dir, get_app_root, AppDataType, AppInfo};
use flexi_logger::{Age, Cleanup, Criterion, FileSpec, LoggerHandle, Naming};
use log::info;
use serde::{Deserialize, Serialize};

/// Saved user defaults.
pub const CONFIG_FILE: &str = "config.data";

/// Application information.
pub const APP_INFO: AppInfo = AppInfo {
    name: "dark-mode-notify",
    author: "dark-mode-notify",
};

/// Persisted defaults for command line options.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Command run with the appearance appended instead of printing it.
    pub command: Option<String>,
    /// Only report changes, not the appearance at startup.
    pub only_changes: bool,
}

/// Path of the saved configuration.
pub fn config_path() -> anyhow::Result<PathBuf> {
    let config_dir = get_app_root(AppDataType::UserConfig, &APP_INFO).context("No app root")?;
    Ok(config_dir.join(CONFIG_FILE))
}

/// Save the configuration to the user config directory.
pub fn save_config(config: &Config) -> anyhow::Result<()> {
    save_config_to(config, &config_path()?)
}

/// Load the configuration from the user config directory.
pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(&config_path()?)
}

pub fn save_config_to(config: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.exists()) {
        std::fs::create_dir_all(dir)?;
    }

    let contents = rmp_serde::to_vec(config)?;
    std::fs::write(path, &contents)?;
    info!("Wrote to config file: {path:?}");

    Ok(())
}

pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    let content =
        std::fs::read(path).with_context(|| format!("Failed to read config {path:?}"))?;
    let config = rmp_serde::from_slice(&content)?;

    Ok(config)
}

/// Get the log directory.
pub fn log_dir() -> anyhow::Result<PathBuf> {
    get_app_dir(AppDataType::UserData, &APP_INFO, "logs")
        .context("Failed to get app logs directory")
}

/// Log to a rotated file. Stdout carries the appearance output so nothing is
/// logged there. Keep the returned handle alive for as long as logging is
/// needed.
pub fn init_logger() -> anyhow::Result<LoggerHandle> {
    let logger = flexi_logger::Logger::try_with_env_or_str("info")?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir()?)
                .basename("dark-mode-notify"),
        )
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .start()?;
    Ok(logger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = Config {
            command: Some("osascript -e".into()),
            only_changes: true,
        };

        save_config_to(&config, &path).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(&dir.path().join(CONFIG_FILE)).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config"));
    }

    #[test]
    fn corrupt_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, b"\xc1not msgpack").unwrap();

        assert!(load_config_from(&path).is_err());
    }
}

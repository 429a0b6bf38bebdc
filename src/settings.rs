use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::decode::DEFAULT_MAX_BYTES;

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");
const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8787";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub max_input_bytes: usize,
    pub server_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_BYTES,
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    input: Option<InputSettings>,
    server: Option<ServerSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct InputSettings {
    max_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSettings {
    addr: Option<String>,
}

/// Loads the built-in defaults, then `settings.toml` and
/// `settings.local.toml` from the working directory, then `extra_path`.
pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    load_settings_from(Path::new("."), extra_path)
}

pub fn load_settings_from(base_dir: &Path, extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    let defaults: SettingsFile =
        toml::from_str(DEFAULT_SETTINGS_TOML).with_context(|| "failed to parse default settings")?;
    settings.merge(defaults);

    let mut ordered_paths: Vec<PathBuf> = vec![
        base_dir.join("settings.toml"),
        base_dir.join("settings.local.toml"),
    ];
    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            let parsed: SettingsFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "merged settings layer");
            settings.merge(parsed);
        }
    }

    Ok(settings)
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(input) = incoming.input {
            if let Some(max_bytes) = input.max_bytes {
                if max_bytes > 0 {
                    self.max_input_bytes = max_bytes;
                }
            }
        }
        if let Some(server) = incoming.server {
            if let Some(addr) = server.addr {
                if !addr.trim().is_empty() {
                    self.server_addr = addr.trim().to_string();
                }
            }
        }
    }
}

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use client_core::{DEFAULT_API_BASE_URL, DEFAULT_EXPORT_URL};
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "autoservice.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub export_url: String,
    pub export_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            export_url: DEFAULT_EXPORT_URL.into(),
            export_dir: PathBuf::from("."),
        }
    }
}

pub fn load_settings(config_path: Option<&Path>) -> Settings {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file, then environment variables.
pub fn load_settings_with(
    config_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_base_url") {
                    settings.api_base_url = v.clone();
                }
                if let Some(v) = file_cfg.get("export_url") {
                    settings.export_url = v.clone();
                }
                if let Some(v) = file_cfg.get("export_dir") {
                    settings.export_dir = PathBuf::from(v);
                }
            }
            Err(err) => warn!(path = %path.display(), error = %err, "ignoring unreadable config file"),
        }
    }

    if let Some(v) = env("AUTOSERVICE_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("AUTOSERVICE_EXPORT_URL") {
        settings.export_url = v;
    }
    if let Some(v) = env("APP__EXPORT_URL") {
        settings.export_url = v;
    }

    if let Some(v) = env("AUTOSERVICE_EXPORT_DIR") {
        settings.export_dir = PathBuf::from(v);
    }
    if let Some(v) = env("APP__EXPORT_DIR") {
        settings.export_dir = PathBuf::from(v);
    }

    settings
}

impl Settings {
    pub fn with_overrides(mut self, api_url: Option<String>, export_url: Option<String>) -> Self {
        if let Some(v) = api_url {
            self.api_base_url = v;
        }
        if let Some(v) = export_url {
            self.export_url = v;
        }
        self
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

use std::{collections::HashMap, fs, path::Path};

use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "https://customerrest.herokuapp.com";
pub const SETTINGS_FILE: &str = "customers.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(base_url) = base_url {
            self.api_base_url = normalize_base_url(&base_url);
        }
        self
    }
}

/// Defaults, then `customers.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_base_url") {
                    settings.api_base_url = normalize_base_url(v);
                }
            }
            Err(err) => warn!("ignoring malformed settings file '{}': {err}", path.display()),
        }
    }

    if let Some(v) = env("CUSTOMERS_API_BASE_URL") {
        settings.api_base_url = normalize_base_url(&v);
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = normalize_base_url(&v);
    }

    settings
}

fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_API_BASE_URL.to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

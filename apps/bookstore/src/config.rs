use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "bookstore.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub cart_slot_key: String,
    pub catalog_path: Option<PathBuf>,
    pub confirmation_display_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/bookstore.db".into(),
            cart_slot_key: "bookCart".into(),
            catalog_path: None,
            confirmation_display_ms: 3000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub database_url: Option<String>,
    pub cart_slot_key: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub confirmation_display_ms: Option<u64>,
}

impl Settings {
    pub fn confirmation_display(&self) -> Duration {
        Duration::from_millis(self.confirmation_display_ms)
    }

    pub fn apply_file(&mut self, file: FileSettings) {
        if let Some(v) = file.database_url {
            self.database_url = v;
        }
        if let Some(v) = file.cart_slot_key {
            self.cart_slot_key = v;
        }
        if let Some(v) = file.catalog_path {
            self.catalog_path = Some(v);
        }
        if let Some(v) = file.confirmation_display_ms {
            self.confirmation_display_ms = v;
        }
    }

    /// Applies `BOOKSTORE__*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("BOOKSTORE__DATABASE_URL") {
            self.database_url = v;
        }
        if let Some(v) = lookup("BOOKSTORE__CART_SLOT_KEY") {
            self.cart_slot_key = v;
        }
        if let Some(v) = lookup("BOOKSTORE__CATALOG_PATH") {
            self.catalog_path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("BOOKSTORE__CONFIRMATION_DISPLAY_MS") {
            match v.parse::<u64>() {
                Ok(parsed) => self.confirmation_display_ms = parsed,
                Err(_) => tracing::warn!(
                    "ignoring BOOKSTORE__CONFIRMATION_DISPLAY_MS={v}: not a whole number of milliseconds"
                ),
            }
        }
    }
}

/// Defaults, then the config file, then environment.
///
/// An explicitly named config file must exist; the default `bookstore.toml`
/// is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
            settings.apply_file(file);
        }
        Err(error) if required => {
            return Err(error)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
        Err(_) => {}
    }

    settings.apply_env(|name| std::env::var(name).ok());
    Ok(settings)
}

/// Turns a bare file path into a `sqlite://` url. `Storage::new` creates
/// the parent directory when it opens the file.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    let path = raw_database_url
        .strip_prefix("sqlite:")
        .unwrap_or(raw_database_url)
        .replace('\\', "/");
    format!("sqlite://{path}")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

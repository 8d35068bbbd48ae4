//! Shared config utilities for loading/saving JSON config files and
//! resolving the API token from a field or an environment variable,
//! plus the crate's own `ReflectConfig`.

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Generic load for any Serde config type with a `Default` implementation.
/// Falls back to `T::default()` if the file is missing or unparsable.
pub fn load_json_config<T: DeserializeOwned + Default>(path: &Path, label: &str) -> T {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<T>(&content) {
            Ok(config) => {
                tracing::info!("[{}] Loaded config from {}", label, path.display());
                config
            }
            Err(e) => {
                tracing::warn!(
                    "[{}] Failed to parse config {}: {}, using defaults",
                    label,
                    path.display(),
                    e
                );
                T::default()
            }
        },
        Err(_) => {
            tracing::info!(
                "[{}] No config file at {}, using defaults",
                label,
                path.display()
            );
            T::default()
        }
    }
}

/// Generic save for any Serde config type.
pub fn save_json_config<T: Serialize>(path: &Path, config: &T, label: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    tracing::info!("[{}] Saved config to {}", label, path.display());
    Ok(())
}

/// Resolve a secret: check the direct field first,
/// then fall back to reading the environment variable named in `env`.
pub fn resolve_secret(value: &Option<String>, env: &Option<String>) -> Option<String> {
    if let Some(ref key) = value {
        if !key.is_empty() {
            return Some(key.clone());
        }
    }
    if let Some(ref env_var) = env {
        if let Ok(key) = std::env::var(env_var) {
            if !key.is_empty() {
                return Some(key);
            }
        }
    }
    None
}

// ── Reflect config ─────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_token_env")]
    pub token_env: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn resolve_token(&self) -> Option<String> {
        resolve_secret(&self.token, &self.token_env)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_token_env() -> Option<String> {
    Some("REFLECT_API_TOKEN".to_string())
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionsConfig {
    #[serde(default = "default_max_secondary")]
    pub max_secondary_selections: usize,
}

fn default_max_secondary() -> usize {
    crate::emotions::secondary::DEFAULT_MAX_SELECTIONS
}

impl Default for EmotionsConfig {
    fn default() -> Self {
        Self {
            max_secondary_selections: default_max_secondary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_page_size() -> u32 {
    10
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_search_debounce_ms(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSaveConfig {
    /// Quiet period after the last edit before a save is attempted.
    #[serde(default = "default_autosave_ms")]
    pub debounce_ms: u64,
    /// Minimum spacing between two successful saves.
    #[serde(default = "default_autosave_ms")]
    pub min_interval_ms: u64,
    #[serde(default = "default_saved_display_ms")]
    pub saved_display_ms: u64,
    #[serde(default = "default_error_display_ms")]
    pub error_display_ms: u64,
}

fn default_autosave_ms() -> u64 {
    2000
}

fn default_saved_display_ms() -> u64 {
    2000
}

fn default_error_display_ms() -> u64 {
    3000
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_autosave_ms(),
            min_interval_ms: default_autosave_ms(),
            saved_display_ms: default_saved_display_ms(),
            error_display_ms: default_error_display_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReflectConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub emotions: EmotionsConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub autosave: AutoSaveConfig,
}

/// `<data dir>/reflect/config.json`, or `./reflect/config.json` when the
/// platform has no data directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reflect")
        .join("config.json")
}

pub fn load_config(path: &Path) -> ReflectConfig {
    load_json_config(path, "Config")
}

pub fn save_config(path: &Path, config: &ReflectConfig) -> anyhow::Result<()> {
    save_json_config(path, config, "Config")
}

//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`Settings::default()`]
//! 2. If `~/.taskmaster/settings.json` exists, deep-merge user values over
//!    defaults
//! 3. Apply `TASKMASTER_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::{BackendKind, Settings};

/// Resolve the path to the settings file (`~/.taskmaster/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".taskmaster").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<Settings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<Settings> {
    let defaults = serde_json::to_value(Settings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: Settings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Unrecognized values are ignored with a debug log rather than failing
/// startup.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Some(v) = read_env_string("TASKMASTER_BACKEND") {
        match v.to_ascii_lowercase().as_str() {
            "local" => settings.backend = BackendKind::Local,
            "remote" => settings.backend = BackendKind::Remote,
            other => debug!(value = other, "ignoring invalid TASKMASTER_BACKEND"),
        }
    }
    if let Some(v) = read_env_string("TASKMASTER_TIMEZONE") {
        settings.timezone = v;
    }
    if let Some(v) = read_env_string("TASKMASTER_DB") {
        settings.local.db_path = v;
    }
    if let Some(v) = read_env_string("TASKMASTER_USER") {
        settings.local.user = v;
    }
    if let Some(v) = read_env_string("TASKMASTER_URL") {
        settings.remote.url = v;
    }
    if let Some(v) = read_env_string("TASKMASTER_ANON_KEY") {
        settings.remote.anon_key = v;
    }
}

fn read_env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

//! Settings type definitions.
//!
//! All types use camelCase field names in JSON and implement [`Default`]
//! with production values. `#[serde(default)]` allows partial files —
//! missing fields fall back to their defaults during deserialization.

use serde::{Deserialize, Serialize};

/// Which backing store variant the app runs against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// On-device SQLite key-value storage.
    #[default]
    Local,
    /// Hosted relational API over authenticated HTTPS.
    Remote,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Remote => "remote",
        })
    }
}

/// Root settings type.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Active backing store variant.
    pub backend: BackendKind,
    /// IANA timezone used to interpret due dates the user types in.
    pub timezone: String,
    /// Local backend settings.
    pub local: LocalSettings,
    /// Remote backend settings.
    pub remote: RemoteSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Local,
            // The zone the original app's fixed +4h shift approximated.
            timezone: "America/La_Paz".to_string(),
            local: LocalSettings::default(),
            remote: RemoteSettings::default(),
        }
    }
}

/// Settings for the local SQLite variant.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalSettings {
    /// Database path, relative to `~/.taskmaster` unless absolute.
    pub db_path: String,
    /// User id that scopes the local collection.
    pub user: String,
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            db_path: "tasks.db".to_string(),
            user: "local".to_string(),
        }
    }
}

/// Settings for the remote hosted variant.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteSettings {
    /// Base URL of the hosted service, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Public (anon) API key sent with every request.
    pub anon_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_local_la_paz() {
        let settings = Settings::default();
        assert_eq!(settings.backend, BackendKind::Local);
        assert_eq!(settings.timezone, "America/La_Paz");
        assert_eq!(settings.local.db_path, "tasks.db");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"backend": "remote", "remote": {"url": "https://x.test"}}"#)
                .unwrap();
        assert_eq!(settings.backend, BackendKind::Remote);
        assert_eq!(settings.remote.url, "https://x.test");
        assert_eq!(settings.remote.anon_key, "");
        assert_eq!(settings.timezone, "America/La_Paz");
    }

    #[test]
    fn camel_case_wire_names() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert!(json["local"].get("dbPath").is_some());
        assert!(json["remote"].get("anonKey").is_some());
    }
}

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// User-configurable settings, stored inside the journal file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalSettings {
    /// The currency in which P&L and asset values are recorded (e.g., "USD").
    pub default_currency: String,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            default_currency: "USD".to_string(),
        }
    }
}

/// Offline cache configuration.
///
/// Partition names carry the version, so bumping `version` makes the next
/// activation drop every partition left behind by the previous release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub version: String,

    pub static_prefix: String,

    pub runtime_prefix: String,

    /// Resources fetched into the static partition at install time.
    pub manifest: Vec<String>,

    /// Paths starting with this prefix are always fetched from the network.
    pub api_prefix: String,

    /// App shell served when a navigation fails offline.
    pub root_document: String,

    /// Optional origin (e.g., "https://journal.example.com") prepended to
    /// manifest entries and the root document when building cache keys.
    pub origin: Option<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            version: "v1".to_string(),
            static_prefix: "trading-journal-static".to_string(),
            runtime_prefix: "trading-journal-runtime".to_string(),
            manifest: vec![
                "/".to_string(),
                "/manifest.json".to_string(),
                "/icon-192.png".to_string(),
                "/icon-512.png".to_string(),
            ],
            api_prefix: "/api/".to_string(),
            root_document: "/".to_string(),
            origin: None,
        }
    }
}

impl CacheSettings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: CacheSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.version.trim().is_empty() {
            return Err(CoreError::Config("cache version must not be empty".into()));
        }
        if self.static_partition() == self.runtime_partition() {
            return Err(CoreError::Config(
                "static and runtime partitions must have distinct names".into(),
            ));
        }
        if !self.api_prefix.starts_with('/') {
            return Err(CoreError::Config(format!(
                "api prefix must be an absolute path, got {:?}",
                self.api_prefix
            )));
        }
        Ok(())
    }

    pub fn static_partition(&self) -> String {
        format!("{}-{}", self.static_prefix, self.version)
    }

    pub fn runtime_partition(&self) -> String {
        format!("{}-{}", self.runtime_prefix, self.version)
    }

    /// Resolve a manifest path against the configured origin.
    pub fn resolve(&self, path: &str) -> String {
        match &self.origin {
            Some(origin) if path.starts_with('/') => {
                format!("{}{}", origin.trim_end_matches('/'), path)
            }
            _ => path.to_string(),
        }
    }
}

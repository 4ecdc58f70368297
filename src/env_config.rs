/// Environment configuration model and settings operations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage key for the configuration document in chrome.storage.sync
pub const STORAGE_KEY: &str = "envs";

/// Built-in environments, in display order. These are always present and
/// cannot be removed; custom environments render after them, sorted by name.
pub const BUILTIN_ENVS: [&str; 5] = ["localhost", "dev", "qa", "stage", "prod"];

/// Base URLs of one environment. An empty string means "not configured":
/// link types that need that base are not offered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EnvBase {
    pub author: String,
    pub publish: String,
}

impl EnvBase {
    pub fn new(author: &str, publish: &str) -> EnvBase {
        EnvBase {
            author: author.to_string(),
            publish: publish.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.author.is_empty() && self.publish.is_empty()
    }
}

/// The full environment-name → base-URLs mapping. Serializes to the flat
/// document shape used for sync storage, export, and import:
/// `{ "dev": { "author": "...", "publish": "..." }, ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSet {
    envs: HashMap<String, EnvBase>,
}

impl ConfigSet {
    /// First-run configuration: all built-ins present, nothing configured.
    pub fn new() -> Self {
        ConfigSet {
            envs: BUILTIN_ENVS
                .iter()
                .map(|name| (name.to_string(), EnvBase::default()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&EnvBase> {
        self.envs.get(name)
    }

    pub fn set(&mut self, name: &str, base: EnvBase) {
        self.envs.insert(name.to_string(), base);
    }

    pub fn is_builtin(name: &str) -> bool {
        BUILTIN_ENVS.contains(&name)
    }

    /// Environment names in rendering order: built-ins first in their fixed
    /// order, then custom names sorted. Detection also walks this order, so
    /// prefix matching is deterministic rather than map-iteration-dependent.
    pub fn display_order(&self) -> Vec<String> {
        let mut names: Vec<String> = BUILTIN_ENVS
            .iter()
            .filter(|name| self.envs.contains_key(**name))
            .map(|name| name.to_string())
            .collect();

        let mut custom: Vec<String> = self
            .envs
            .keys()
            .filter(|name| !Self::is_builtin(name))
            .cloned()
            .collect();
        custom.sort();

        names.extend(custom);
        names
    }

    /// Add a new empty environment. No-op for empty or duplicate names.
    pub fn add_env(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.envs.contains_key(name) {
            return false;
        }
        self.envs.insert(name.to_string(), EnvBase::default());
        true
    }

    /// Remove a custom environment. Built-ins are permanent.
    pub fn remove_env(&mut self, name: &str) -> bool {
        if Self::is_builtin(name) {
            return false;
        }
        self.envs.remove(name).is_some()
    }

    /// Strip one trailing slash off every base URL; applied before save so
    /// path concatenation never produces a double slash.
    pub fn normalized(&self) -> ConfigSet {
        ConfigSet {
            envs: self
                .envs
                .iter()
                .map(|(name, base)| {
                    (
                        name.clone(),
                        EnvBase::new(
                            base.author.strip_suffix('/').unwrap_or(&base.author),
                            base.publish.strip_suffix('/').unwrap_or(&base.publish),
                        ),
                    )
                })
                .collect(),
        }
    }

    /// Export document: the storage shape, two-space indented.
    pub fn export_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Export failed: {}", e))
    }

    /// Parse and validate an import document. Every entry must be an object
    /// carrying both an "author" and a "publish" string (empty allowed); the
    /// error names the first offending environment so the caller can surface
    /// it without touching the stored configuration.
    pub fn parse_import(text: &str) -> Result<ConfigSet, String> {
        let doc: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| format!("Not a valid JSON document: {}", e))?;

        let obj = doc
            .as_object()
            .ok_or_else(|| "Import document must be a JSON object".to_string())?;

        let mut envs = HashMap::new();
        for (name, entry) in obj {
            let entry = entry
                .as_object()
                .ok_or_else(|| format!("Environment \"{}\" is not an object", name))?;

            let author = entry
                .get("author")
                .and_then(|v| v.as_str())
                .ok_or_else(|| format!("Environment \"{}\" is missing an \"author\" URL", name))?;
            let publish = entry
                .get("publish")
                .and_then(|v| v.as_str())
                .ok_or_else(|| format!("Environment \"{}\" is missing a \"publish\" URL", name))?;

            envs.insert(name.clone(), EnvBase::new(author, publish));
        }

        Ok(ConfigSet { envs })
    }
}

impl Default for ConfigSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Name of the downloadable export file for a given calendar date
/// (YYYY-MM-DD).
pub fn export_filename(date: &str) -> String {
    format!("aem-env-config-{}.json", date)
}

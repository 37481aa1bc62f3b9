//! # Reel Configuration
//!
//! A minimal configuration system based on a string key/value store.
//! Services never read process state themselves: the binary builds a
//! [`ReelConfig`] at startup, takes a [`ReelConfigSnapshot`] and hands
//! typed settings derived from it to each service.
//!
//! ## Setting and reading values
//! ```rust
//! use reel_core::ReelConfig;
//! let mut config = ReelConfig::new();
//!
//! config.set("storage.profile_bucket", "profiles");
//! config.set("feed.asset_concurrency", "8");
//!
//! let snapshot = config.snapshot();
//! assert_eq!(snapshot.get("storage.profile_bucket"), Some("profiles"));
//! assert_eq!(snapshot.get_usize("feed.asset_concurrency"), Some(8));
//! ```
//!
//! ## Environment overrides
//! `load_env("REEL__")` maps `REEL__STORAGE__PROFILE_BUCKET=profiles`
//! onto the key `storage.profile_bucket`.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ReelConfig {
    values: HashMap<String, String>,
}

impl ReelConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Overlay every environment variable starting with `prefix`.
    ///
    /// Returns the number of keys that were set.
    pub fn load_env(&mut self, prefix: &str) -> usize {
        self.load_vars(prefix, std::env::vars())
    }

    fn load_vars<I>(&mut self, prefix: &str, vars: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut loaded = 0;
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                if stripped.is_empty() {
                    continue;
                }
                let normalized = stripped.to_lowercase().replace("__", ".");
                self.set(normalized, value);
                loaded += 1;
            }
        }
        loaded
    }

    pub fn snapshot(&self) -> ReelConfigSnapshot {
        ReelConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReelConfigSnapshot {
    map: HashMap<String, String>,
}

impl ReelConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse::<usize>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.trim().parse::<bool>().ok())
    }
}

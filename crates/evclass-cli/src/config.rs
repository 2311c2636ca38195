//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use evclass_core::{OrderPolicy, SessionOptions};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default JSON Lines series file, used when `--series` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_path: Option<PathBuf>,

    /// How to treat a selection whose end precedes its start.
    #[serde(default)]
    pub order_policy: OrderPolicy,

    /// Refuse to select identities absent from the series file.
    pub require_known_identity: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("series_path", &self.series_path)
            .field("order_policy", &self.order_policy)
            .field("require_known_identity", &self.require_known_identity)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let options = SessionOptions::default();
        Self {
            series_path: None,
            order_policy: options.order,
            require_known_identity: options.require_known_identity,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (EVCLASS_*)
        figment = figment.merge(Env::prefixed("EVCLASS_"));

        figment.extract()
    }

    /// Session switches derived from this configuration.
    pub const fn session_options(&self) -> SessionOptions {
        SessionOptions {
            order: self.order_policy,
            require_known_identity: self.require_known_identity,
        }
    }
}

/// Returns the platform-specific config directory for evclass.
///
/// On Linux: `~/.config/evclass`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("evclass"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_evclass() {
        if let Some(path) = dirs_config_path() {
            assert_eq!(path.file_name().unwrap(), "evclass");
        }
    }

    #[test]
    fn test_default_config_matches_session_defaults() {
        let config = Config::default();
        assert!(config.series_path.is_none());
        assert_eq!(config.session_options(), SessionOptions::default());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "series_path = \"/data/tracks.jsonl\"\norder_policy = \"reject\"\nrequire_known_identity = false\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.series_path, Some(PathBuf::from("/data/tracks.jsonl")));
        assert_eq!(config.order_policy, OrderPolicy::Reject);
        assert!(!config.require_known_identity);
    }
}

//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Version baked in from the crate manifest at build time.
pub const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version reported when neither the package nor `VERSION` provides one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP listen port (`PORT`).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Version override (`VERSION`). Only consulted when the package carries no version.
    #[serde(default)]
    pub version: Option<String>,

    /// Deployment environment name (`APP_ENV`).
    #[serde(default = "default_environment")]
    pub app_env: String,
}

fn default_port() -> u16 {
    3000
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            version: None,
            app_env: default_environment(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of variables.
    ///
    /// Empty values count as unset, so `PORT=` falls back to the default port.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars.into_iter().filter(|(_, value)| !value.is_empty()))
    }

    /// Resolved application version.
    pub fn version(&self) -> String {
        resolve_version(Some(PACKAGE_VERSION), self.version.as_deref())
    }

    /// Deployment environment name.
    pub fn environment(&self) -> &str {
        &self.app_env
    }
}

/// Resolve the reported version: package metadata, then the `VERSION`
/// variable, then [`DEFAULT_VERSION`]. Blank candidates are skipped.
pub fn resolve_version(packaged: Option<&str>, from_env: Option<&str>) -> String {
    [packaged, from_env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(DEFAULT_VERSION)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = tokio_test::assert_ok!(Config::from_vars(Vec::new()));

        assert_eq!(config.port, 3000);
        assert_eq!(config.environment(), "development");
        assert_eq!(config.version, None);
    }

    #[test]
    fn reads_port_and_environment() {
        let config =
            Config::from_vars(vars(&[("PORT", "8080"), ("APP_ENV", "production")])).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.environment(), "production");
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = Config::from_vars(vars(&[("PORT", ""), ("APP_ENV", "")])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.environment(), "development");
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(Config::from_vars(vars(&[("PORT", "not-a-port")])).is_err());
        assert!(Config::from_vars(vars(&[("PORT", "70000")])).is_err());
    }

    #[test]
    fn unrelated_variables_are_ignored() {
        let config = Config::from_vars(vars(&[("HOME", "/root"), ("PATH", "/usr/bin")])).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn package_version_wins() {
        assert_eq!(resolve_version(Some("2.3.4"), Some("9.9.9")), "2.3.4");
    }

    #[test]
    fn env_version_used_without_package_version() {
        assert_eq!(resolve_version(None, Some("9.9.9")), "9.9.9");
        assert_eq!(resolve_version(Some(""), Some("9.9.9")), "9.9.9");
    }

    #[test]
    fn default_version_is_last_resort() {
        assert_eq!(resolve_version(None, None), DEFAULT_VERSION);
        assert_eq!(resolve_version(Some("  "), Some("")), DEFAULT_VERSION);
    }

    #[test]
    fn config_version_prefers_package_metadata() {
        let config = Config::from_vars(vars(&[("VERSION", "0.0.1-env")])).unwrap();
        assert_eq!(config.version(), PACKAGE_VERSION);
    }
}

//! Configuration management for the highlight service

use serde::Deserialize;
use std::env;

use crate::highlights::StyleClassMap;
use crate::html::InjectorConfig;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub injector: InjectorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: &'static str, message: String },
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from a variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let server = ServerConfig {
            host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
            port: lookup("SERVER_PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.server.port),
        };

        let mut injector = defaults.injector;
        if let Some(run) = lookup("HIGHLIGHT_MIN_DUPLICATE_RUN") {
            injector.repair.min_duplicate_run =
                run.trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        var: "HIGHLIGHT_MIN_DUPLICATE_RUN",
                        message: e.to_string(),
                    })?;
        }
        if let Some(classes) = lookup("HIGHLIGHT_STYLE_CLASSES") {
            let styles = StyleClassMap::parse(&classes).map_err(|message| {
                ConfigError::InvalidValue {
                    var: "HIGHLIGHT_STYLE_CLASSES",
                    message,
                }
            })?;
            if styles.is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: "HIGHLIGHT_STYLE_CLASSES",
                    message: "no style classes given".to_string(),
                });
            }
            injector.style_classes = styles;
        }

        Ok(Config { server, injector })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.injector, InjectorConfig::default());
        assert_eq!(config.injector.repair.min_duplicate_run, 8);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "8080"),
            ("HIGHLIGHT_MIN_DUPLICATE_RUN", "0"),
            ("HIGHLIGHT_STYLE_CLASSES", "0=mark,1=mark-note"),
        ]))
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.injector.repair.min_duplicate_run, 0);
        assert_eq!(config.injector.style_classes.class_for(1), Some("mark-note"));
        assert_eq!(config.injector.style_classes.class_for(2), None);
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[("HIGHLIGHT_MIN_DUPLICATE_RUN", "many")]))
            .unwrap_err();
        assert!(err.to_string().contains("HIGHLIGHT_MIN_DUPLICATE_RUN"));

        assert!(Config::from_lookup(lookup(&[("HIGHLIGHT_STYLE_CLASSES", "yellow")])).is_err());
        assert!(Config::from_lookup(lookup(&[("HIGHLIGHT_STYLE_CLASSES", " , ")])).is_err());
    }

    #[test]
    fn test_deserialize_injector_config() {
        let config: Config = serde_json::from_str(
            r#"{ "injector": { "styleClasses": { "0": "hl" }, "repair": { "minDuplicateRun": 12 } } }"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.injector.style_classes.class_for(0), Some("hl"));
        assert_eq!(config.injector.repair.min_duplicate_run, 12);
    }
}

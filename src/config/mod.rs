#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{ForwarderError, Result};
use crate::utils::validation::{validate_application_name, validate_log_level, Validate};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const ENV_CONFIG_FILE: &str = "FORWARDER_CONFIG";
pub const ENV_APPLICATION: &str = "FORWARDER_APPLICATION";
pub const ENV_LOG_LEVEL: &str = "FORWARDER_LOG_LEVEL";

pub const DEFAULT_APPLICATION: &str = crate::app::echo::NAME;

fn default_application() -> String {
    DEFAULT_APPLICATION.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwarderConfig {
    /// Registry name of the application requests are forwarded to
    #[serde(default = "default_application")]
    pub application: String,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            application: default_application(),
            log_level: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    forwarder: ForwarderConfig,
}

impl ForwarderConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ForwarderError::ConfigError {
            message: format!("Cannot read config file {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.forwarder)
    }

    /// Reads `FORWARDER_CONFIG` (optional TOML file), then lets the other
    /// `FORWARDER_*` variables override it.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG_FILE).filter(|p| !p.trim().is_empty()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(application) = lookup(ENV_APPLICATION) {
            config.application = application;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.log_level = Some(level);
        }

        Ok(config)
    }

    /// Log level known before any config file is read, for reporting config errors.
    pub fn early_log_level<F>(lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(ENV_LOG_LEVEL).filter(|level| !level.trim().is_empty())
    }
}

impl Validate for ForwarderConfig {
    fn validate(&self) -> Result<()> {
        // 只驗證名稱格式；未註冊的應用程式屬於執行期載入失敗
        validate_application_name("application", &self.application)?;

        if let Some(level) = &self.log_level {
            validate_log_level("log_level", level)?;
        }

        tracing::debug!("Forwarder configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = ForwarderConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ForwarderConfig::default());
        assert_eq!(config.application, "echo");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides() {
        let config = ForwarderConfig::from_lookup(lookup_from(&[
            (ENV_APPLICATION, "phonebook"),
            (ENV_LOG_LEVEL, "debug"),
        ]))
        .unwrap();
        assert_eq!(config.application, "phonebook");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_toml_missing_table_uses_defaults() {
        let config = ForwarderConfig::from_toml_str("").unwrap();
        assert_eq!(config, ForwarderConfig::default());
    }

    #[test]
    fn test_toml_rejects_wrong_types() {
        let err = ForwarderConfig::from_toml_str("[forwarder]\napplication = 3\n").unwrap_err();
        assert!(matches!(err, ForwarderError::TomlError(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let err = ForwarderConfig::from_lookup(lookup_from(&[(
            ENV_CONFIG_FILE,
            "/definitely/not/here.toml",
        )]))
        .unwrap_err();
        assert!(matches!(err, ForwarderError::ConfigError { .. }));
    }

    #[test]
    fn test_early_log_level_ignores_broken_config_file() {
        let lookup = lookup_from(&[
            (ENV_CONFIG_FILE, "/definitely/not/here.toml"),
            (ENV_LOG_LEVEL, "debug"),
        ]);
        assert!(ForwarderConfig::from_lookup(&lookup).is_err());
        assert_eq!(
            ForwarderConfig::early_log_level(&lookup).as_deref(),
            Some("debug")
        );
        assert_eq!(
            ForwarderConfig::early_log_level(lookup_from(&[(ENV_LOG_LEVEL, " ")])),
            None
        );
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let config = ForwarderConfig {
            application: "echo".to_string(),
            log_level: Some("chatty".to_string()),
        };
        assert!(config.validate().is_err());
    }
}

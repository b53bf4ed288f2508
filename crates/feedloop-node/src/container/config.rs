//! # Node Configuration
//!
//! Loaded from an optional TOML file, then overridden by `FL_*` environment
//! variables, then validated. Every section falls back to its defaults.
//!
//! ```toml
//! [admission.public]
//! limit = 60
//! window = "1m"
//!
//! [admission.authenticated]
//! limit = 300
//! window = "1m"
//!
//! [membership]
//! invite_ttl = "7d"
//! ```

use fl_01_admission::AdmissionConfig;
use fl_03_membership::MembershipConfig;
use serde::{Deserialize, Serialize};
use shared_types::humantime_serde::parse_duration;
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Admission limits per route family.
    pub admission: AdmissionPolicies,
    /// Invitation settings.
    pub membership: MembershipConfig,
}

/// One admission policy per protected route family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionPolicies {
    /// Unauthenticated endpoints, keyed by client IP.
    pub public: AdmissionConfig,
    /// Signed-in endpoints, keyed by user.
    pub authenticated: AdmissionConfig,
    /// SDK ingestion, keyed by project.
    pub sdk: AdmissionConfig,
}

impl Default for AdmissionPolicies {
    fn default() -> Self {
        Self {
            public: AdmissionConfig::public(),
            authenticated: AdmissionConfig::authenticated(),
            sdk: AdmissionConfig::sdk(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },

    #[error("invalid {section} config: {message}")]
    Invalid {
        section: &'static str,
        message: String,
    },
}

impl NodeConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// File (if any) + process environment + validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `FL_*` overrides.
    ///
    /// # Environment Variables
    ///
    /// - `FL_ADMISSION_ENABLED`: `false`/`0` disables every policy
    /// - `FL_PUBLIC_LIMIT`, `FL_AUTHENTICATED_LIMIT`, `FL_SDK_LIMIT`
    /// - `FL_INVITE_TTL`: duration such as `72h`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("FL_ADMISSION_ENABLED") {
            let enabled = parse_bool("FL_ADMISSION_ENABLED", &value)?;
            self.admission.public.enabled = enabled;
            self.admission.authenticated.enabled = enabled;
            self.admission.sdk.enabled = enabled;
        }

        let limits = [
            ("FL_PUBLIC_LIMIT", &mut self.admission.public),
            ("FL_AUTHENTICATED_LIMIT", &mut self.admission.authenticated),
            ("FL_SDK_LIMIT", &mut self.admission.sdk),
        ];
        for (var, policy) in limits {
            if let Some(value) = lookup(var) {
                policy.limit = value.trim().parse().map_err(|_| ConfigError::Env {
                    var,
                    message: format!("expected a positive integer, got {value:?}"),
                })?;
            }
        }

        if let Some(value) = lookup("FL_INVITE_TTL") {
            self.membership.invite_ttl =
                parse_duration(value.trim()).map_err(|e| ConfigError::Env {
                    var: "FL_INVITE_TTL",
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let policies = [
            ("admission.public", &self.admission.public),
            ("admission.authenticated", &self.admission.authenticated),
            ("admission.sdk", &self.admission.sdk),
        ];
        for (section, policy) in policies {
            policy.validate().map_err(|e| ConfigError::Invalid {
                section,
                message: e.to_string(),
            })?;
        }
        self.membership
            .validate()
            .map_err(|e| ConfigError::Invalid {
                section: "membership",
                message: e.to_string(),
            })
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::Env {
            var,
            message: format!("expected a boolean, got {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = NodeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.admission.public.limit, 60);
        assert_eq!(config.admission.authenticated.limit, 300);
        assert_eq!(config.admission.sdk.limit, 120);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = NodeConfig::from_toml_str(
            r#"
            [admission.public]
            limit = 10
            window = "30s"

            [membership]
            invite_ttl = "2d"
            "#,
        )
        .unwrap();

        assert_eq!(config.admission.public.limit, 10);
        assert_eq!(config.admission.public.window, Duration::from_secs(30));
        assert!(config.admission.public.enabled);
        assert_eq!(config.admission.sdk, AdmissionConfig::sdk());
        assert_eq!(config.membership.invite_ttl, Duration::from_secs(172_800));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            NodeConfig::from_toml_str("[admission.public]\nlimit = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = NodeConfig::default();
        config
            .apply_env_overrides(env(&[
                ("FL_ADMISSION_ENABLED", "false"),
                ("FL_SDK_LIMIT", "500"),
                ("FL_INVITE_TTL", "72h"),
            ]))
            .unwrap();

        assert!(!config.admission.public.enabled);
        assert!(!config.admission.authenticated.enabled);
        assert_eq!(config.admission.sdk.limit, 500);
        assert_eq!(config.membership.invite_ttl, Duration::from_secs(259_200));
    }

    #[test]
    fn test_bad_env_values() {
        let mut config = NodeConfig::default();
        assert!(matches!(
            config.apply_env_overrides(env(&[("FL_PUBLIC_LIMIT", "lots")])),
            Err(ConfigError::Env {
                var: "FL_PUBLIC_LIMIT",
                ..
            })
        ));
        assert!(config
            .apply_env_overrides(env(&[("FL_ADMISSION_ENABLED", "maybe")]))
            .is_err());
    }

    #[test]
    fn test_validate_names_section() {
        let mut config = NodeConfig::default();
        config.admission.authenticated.limit = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("admission.authenticated"));
    }
}

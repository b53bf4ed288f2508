//! Membership configuration.

use serde::{Deserialize, Serialize};
use shared_types::humantime_serde;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipConfig {
    /// How long an invite stays acceptable
    #[serde(with = "humantime_serde")]
    pub invite_ttl: Duration,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            invite_ttl: Duration::from_secs(7 * 86_400),
        }
    }
}

impl MembershipConfig {
    pub fn invite_ttl_ms(&self) -> u64 {
        self.invite_ttl.as_millis() as u64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.invite_ttl.is_zero() {
            return Err(ConfigError::InvalidInviteTtl(
                "invite_ttl cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid invite ttl: {0}")]
    InvalidInviteTtl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_seven_days() {
        let config = MembershipConfig::default();
        assert_eq!(config.invite_ttl_ms(), 604_800_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_from_json() {
        let config: MembershipConfig = serde_json::from_str(r#"{"invite_ttl":"2d"}"#).unwrap();
        assert_eq!(config.invite_ttl, Duration::from_secs(172_800));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = MembershipConfig {
            invite_ttl: Duration::ZERO,
        };
        assert!(config.validate().is_err());
    }
}

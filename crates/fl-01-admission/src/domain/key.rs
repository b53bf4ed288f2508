//! Request key derivation.
//!
//! Exactly one key is derived per request. Namespaces are prefixed so a user
//! id can never collide with an IP address or an SDK project.

use shared_types::{CallerIdentity, ProjectId, Subject, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// The key a request is counted against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestKey {
    User(UserId),
    Sdk(ProjectId),
    /// Client address; `None` when nothing could be determined.
    Ip(Option<IpAddr>),
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKey::User(id) => write!(f, "user:{id}"),
            RequestKey::Sdk(id) => write!(f, "sdk:{id}"),
            RequestKey::Ip(Some(ip)) => write!(f, "ip:{ip}"),
            RequestKey::Ip(None) => write!(f, "ip:unknown"),
        }
    }
}

/// How a protected route family keys its quota.
///
/// The same strategy must be used for every route in a family, otherwise the
/// quotas are not comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    /// Always the client address.
    Ip,
    /// Signed-in user or SDK project when resolved, else the client address.
    #[default]
    Identity,
    /// SDK project when resolved, else the client address.
    Sdk,
}

/// Derive the key for one request.
pub fn derive_key(
    strategy: KeyStrategy,
    identity: Option<&CallerIdentity>,
    client_ip: Option<IpAddr>,
) -> RequestKey {
    let subject = identity.map(|id| id.subject);
    match (strategy, subject) {
        (KeyStrategy::Identity, Some(Subject::User(user))) => RequestKey::User(user),
        (KeyStrategy::Identity | KeyStrategy::Sdk, Some(Subject::Sdk(project))) => {
            RequestKey::Sdk(project)
        }
        _ => RequestKey::Ip(client_ip),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use uuid::Uuid;

    fn ip() -> Option<IpAddr> {
        Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)))
    }

    #[test]
    fn test_key_namespaces() {
        let id = Uuid::nil();
        assert_eq!(
            RequestKey::User(id).to_string(),
            "user:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            RequestKey::Sdk(id).to_string(),
            "sdk:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(RequestKey::Ip(ip()).to_string(), "ip:10.0.0.1");
        assert_eq!(RequestKey::Ip(None).to_string(), "ip:unknown");
    }

    #[test]
    fn test_identity_strategy_prefers_identity() {
        let user = Uuid::new_v4();
        let caller = CallerIdentity::user(user);
        assert_eq!(
            derive_key(KeyStrategy::Identity, Some(&caller), ip()),
            RequestKey::User(user)
        );

        let project = Uuid::new_v4();
        let sdk = CallerIdentity::sdk(project);
        assert_eq!(
            derive_key(KeyStrategy::Identity, Some(&sdk), ip()),
            RequestKey::Sdk(project)
        );
    }

    #[test]
    fn test_identity_strategy_falls_back_to_ip() {
        let anon = CallerIdentity::anonymous();
        assert_eq!(
            derive_key(KeyStrategy::Identity, Some(&anon), ip()),
            RequestKey::Ip(ip())
        );
        assert_eq!(
            derive_key(KeyStrategy::Identity, None, None),
            RequestKey::Ip(None)
        );
    }

    #[test]
    fn test_ip_strategy_ignores_identity() {
        let caller = CallerIdentity::user(Uuid::new_v4());
        assert_eq!(
            derive_key(KeyStrategy::Ip, Some(&caller), ip()),
            RequestKey::Ip(ip())
        );
    }

    #[test]
    fn test_sdk_strategy_ignores_users() {
        let caller = CallerIdentity::user(Uuid::new_v4());
        assert_eq!(
            derive_key(KeyStrategy::Sdk, Some(&caller), ip()),
            RequestKey::Ip(ip())
        );

        let project = Uuid::new_v4();
        assert_eq!(
            derive_key(KeyStrategy::Sdk, Some(&CallerIdentity::sdk(project)), ip()),
            RequestKey::Sdk(project)
        );
    }
}

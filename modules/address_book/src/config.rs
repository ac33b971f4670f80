use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the address_book module (`modules.address_book`).
///
/// Without a `modules.address_book` section the server runs on
/// [`AddressBookConfig::default`], which rate-limits at 1 request per 20
/// seconds. A section that omits `rate_limit` disables rate limiting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AddressBookConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_min_page_size")]
    pub min_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for AddressBookConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            min_page_size: default_min_page_size(),
            max_page_size: default_max_page_size(),
            auth: AuthConfig::default(),
            rate_limit: Some(RateLimitConfig::default()),
        }
    }
}

impl AddressBookConfig {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            default_page_size: self.default_page_size,
            min_page_size: self.min_page_size,
            max_page_size: self.max_page_size,
            ..ServiceConfig::default()
        }
    }
}

/// Bearer token verification settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
}

impl AuthConfig {
    /// True while tokens are verified with the built-in shared secret.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == default_jwt_secret()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            audience: None,
            issuer: None,
        }
    }
}

/// `requests` per `per_seconds`, per route and client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    pub requests: u32,
    pub per_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests: 1,
            per_seconds: 20,
        }
    }
}

fn default_page_size() -> u64 {
    10
}

fn default_min_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    500
}

fn default_jwt_secret() -> String {
    "secret_jwt".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_limit_requests() {
        let cfg = AddressBookConfig::default();
        assert_eq!(cfg.default_page_size, 10);
        assert_eq!(cfg.auth.jwt_secret, "secret_jwt");
        assert_eq!(cfg.rate_limit, Some(RateLimitConfig::default()));
    }

    #[test]
    fn default_secret_is_detected() {
        assert!(AuthConfig::default().uses_default_secret());
        let custom = AuthConfig {
            jwt_secret: "s3cr3t".to_owned(),
            ..AuthConfig::default()
        };
        assert!(!custom.uses_default_secret());
    }

    #[test]
    fn section_without_rate_limit_disables_it() {
        let cfg: AddressBookConfig =
            serde_json::from_str(r#"{"auth": {"jwt_secret": "s3cr3t", "issuer": "auth"}}"#)
                .unwrap();
        assert!(cfg.rate_limit.is_none());
        assert_eq!(cfg.auth.jwt_secret, "s3cr3t");
        assert_eq!(cfg.auth.issuer.as_deref(), Some("auth"));
        assert_eq!(cfg.max_page_size, 500);
    }

    #[test]
    fn service_config_carries_page_bounds() {
        let cfg: AddressBookConfig = serde_json::from_str(
            r#"{"default_page_size": 20, "max_page_size": 100, "rate_limit": {"requests": 5, "per_seconds": 1}}"#,
        )
        .unwrap();
        let svc = cfg.service_config();
        assert_eq!(svc.default_page_size, 20);
        assert_eq!(svc.min_page_size, 10);
        assert_eq!(svc.max_page_size, 100);
        assert_eq!(cfg.rate_limit.map(|r| r.requests), Some(5));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<AddressBookConfig, _> = serde_json::from_str(r#"{"page_size": 3}"#);
        assert!(res.is_err());
    }
}

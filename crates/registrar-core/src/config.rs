//! Configuration types for the registrar adapter
//!
//! This module defines all configuration structures used throughout the crate.

use crate::types::{AddressMailing, Contact};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address the HTTP surface listens on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Registrar API configuration
    #[serde(default)]
    pub registrar: RegistrarConfig,

    /// Inputs of the debug endpoints
    #[serde(default)]
    pub debug: DebugConfig,
}

impl ServiceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            registrar: RegistrarConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::ServiceError> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(crate::ServiceError::invalid_argument(format!(
                "Listen address is not a socket address: {}",
                self.listen_addr
            )));
        }

        self.registrar.validate()?;
        self.debug.validate()?;

        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Registrar API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct RegistrarConfig {
    /// Provider type name used to look up the factory (e.g. "godaddy")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Base URL of the registrar API, without a trailing slash
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// API key (optional)
    #[serde(default)]
    pub api_key: Option<String>,

    /// API secret (optional)
    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub api_secret: Option<String>,

    /// Timeout applied to each outbound request (in seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Maximum number of suggestions requested per query
    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: u32,
}

// Custom Debug implementation that hides the API secret
impl fmt::Debug for RegistrarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrarConfig")
            .field("provider", &self.provider)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<REDACTED>"))
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("suggest_limit", &self.suggest_limit)
            .finish()
    }
}

impl RegistrarConfig {
    /// Validate the registrar configuration
    pub fn validate(&self) -> Result<(), crate::ServiceError> {
        if self.provider.is_empty() {
            return Err(crate::ServiceError::invalid_argument(
                "Registrar provider cannot be empty",
            ));
        }
        if !self.api_base.starts_with("https://") && !self.api_base.starts_with("http://") {
            return Err(crate::ServiceError::invalid_argument(format!(
                "Registrar API base must use HTTP or HTTPS scheme. Got: {}",
                self.api_base
            )));
        }
        if self.api_key.is_some() != self.api_secret.is_some() {
            return Err(crate::ServiceError::invalid_argument(
                "Registrar API key and secret must be set together",
            ));
        }
        if !(1..=300).contains(&self.http_timeout_secs) {
            return Err(crate::ServiceError::invalid_argument(format!(
                "HTTP timeout must be between 1 and 300 seconds. Got: {}",
                self.http_timeout_secs
            )));
        }
        if !(1..=100).contains(&self.suggest_limit) {
            return Err(crate::ServiceError::invalid_argument(format!(
                "Suggestion limit must be between 1 and 100. Got: {}",
                self.suggest_limit
            )));
        }
        Ok(())
    }

    /// Value of the `Authorization` header, empty when no credentials are set
    pub fn authorization(&self) -> String {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) => format!("sso-key {}:{}", key, secret),
            _ => String::new(),
        }
    }

    /// Per-request timeout
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_base: default_api_base(),
            api_key: None,
            api_secret: None,
            http_timeout_secs: default_http_timeout_secs(),
            suggest_limit: default_suggest_limit(),
        }
    }
}

/// Inputs of the debug endpoints (`/domain-availability`, `/purchase-domain`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Domain checked when no `domain` query parameter is given
    #[serde(default = "default_availability_domain")]
    pub availability_domain: String,

    /// Domain purchased when no `domain` query parameter is given
    #[serde(default = "default_purchase_domain")]
    pub purchase_domain: String,

    /// Contact used for every role of a debug purchase
    #[serde(default = "default_contact")]
    pub contact: Contact,

    /// Agreement keys consented to by a debug purchase
    #[serde(default = "default_agreement_keys")]
    pub agreement_keys: Vec<String>,
}

impl DebugConfig {
    /// Validate the debug configuration
    pub fn validate(&self) -> Result<(), crate::ServiceError> {
        if self.availability_domain.is_empty() || self.purchase_domain.is_empty() {
            return Err(crate::ServiceError::invalid_argument(
                "Debug domains cannot be empty",
            ));
        }
        Ok(())
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            availability_domain: default_availability_domain(),
            purchase_domain: default_purchase_domain(),
            contact: default_contact(),
            agreement_keys: default_agreement_keys(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:11001".to_string()
}

fn default_provider() -> String {
    "godaddy".to_string()
}

fn default_api_base() -> String {
    "https://api.ote-godaddy.com".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_suggest_limit() -> u32 {
    10
}

fn default_availability_domain() -> String {
    "slacknotification.biz".to_string()
}

fn default_purchase_domain() -> String {
    "crystalisland.io".to_string()
}

fn default_contact() -> Contact {
    Contact {
        address_mailing: AddressMailing {
            address1: "123".to_string(),
            city: "Saskatoon".to_string(),
            country: "CA".to_string(),
            postal_code: "S7S1N5".to_string(),
            state: "SK".to_string(),
        },
        email: "registrar-test@example.com".to_string(),
        name_first: "Test".to_string(),
        name_last: "Registrant".to_string(),
        phone: "+1.3065550100".to_string(),
    }
}

fn default_agreement_keys() -> Vec<String> {
    vec!["DNRA".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn authorization_requires_both_parts() {
        let mut config = RegistrarConfig::default();
        assert_eq!(config.authorization(), "");

        config.api_key = Some("key".to_string());
        assert!(config.validate().is_err());

        config.api_secret = Some("secret".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.authorization(), "sso-key key:secret");
    }

    #[test]
    fn secret_not_exposed_in_debug() {
        let config = RegistrarConfig {
            api_key: Some("key".to_string()),
            api_secret: Some("hunter2".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let config = RegistrarConfig {
            http_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RegistrarConfig {
            suggest_limit: 1000,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServiceConfig {
            listen_addr: "nowhere".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ServiceConfig =
            serde_json::from_str(r#"{"registrar": {"api_base": "http://localhost:8080"}}"#).unwrap();
        assert_eq!(config.registrar.api_base, "http://localhost:8080");
        assert_eq!(config.registrar.suggest_limit, 10);
        assert_eq!(config.debug.agreement_keys, vec!["DNRA".to_string()]);
    }
}

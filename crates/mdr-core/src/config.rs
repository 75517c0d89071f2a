//! Repository configuration
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! base_uri = "http://www.assero.co.uk"
//! lock_timeout_secs = 300
//! released_statuses = ["Standard"]
//!
//! [owner]
//! number = "123456789"
//! scheme = "DUNS"
//! scope = { id = "NS-ACME", short_name = "ACME", name = "ACME Pharma" }
//!
//! [domains]
//! VS = "Vital Signs"
//! ```
//!
//! A `[domains]` table replaces the built-in SDTM table rather than
//! extending it.

use crate::domains::DEFAULT_DOMAINS;
use crate::errors::{MdrError, Result};
use crate::model::{RegistrationAuthority, RegistrationStatus};
use crate::rules::validation::{self, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Longest accepted edit-lock timeout: one week
pub const MAX_LOCK_TIMEOUT_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdrConfig {
    /// Prefix of every instance namespace
    pub base_uri: String,
    /// Edit locks older than this (since issue or last refresh) are invalid
    pub lock_timeout_secs: u64,
    /// Statuses treated as released: listed by `list`, versioned on edit
    pub released_statuses: Vec<RegistrationStatus>,
    /// Authority that owns newly created versions
    pub owner: RegistrationAuthority,
    /// SDTM domain prefix to domain name
    pub domains: BTreeMap<String, String>,
}

impl Default for MdrConfig {
    fn default() -> Self {
        Self {
            base_uri: "http://www.assero.co.uk".to_string(),
            lock_timeout_secs: 300,
            released_statuses: vec![RegistrationStatus::Standard],
            owner: RegistrationAuthority::default(),
            domains: DEFAULT_DOMAINS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl MdrConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: MdrConfig = toml::from_str(text).map_err(|e| MdrError::Config {
            reason: e.to_string(),
        })?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MdrError::Config {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn is_released(&self, status: RegistrationStatus) -> bool {
        self.released_statuses.contains(&status)
    }

    pub fn domain_name(&self, prefix: &str) -> Option<&str> {
        self.domains.get(prefix).map(String::as_str)
    }

    pub fn lock_timeout(&self) -> chrono::Duration {
        let secs = i64::try_from(self.lock_timeout_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        chrono::Duration::seconds(secs)
    }

    fn check(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if self.lock_timeout_secs == 0 {
            errors.add("lock_timeout_secs", "must be greater than zero");
        } else if self.lock_timeout_secs > MAX_LOCK_TIMEOUT_SECS {
            errors.add(
                "lock_timeout_secs",
                format!("must not exceed {} seconds", MAX_LOCK_TIMEOUT_SECS),
            );
        }
        if !(self.base_uri.starts_with("http://") || self.base_uri.starts_with("https://")) {
            errors.add("base_uri", "must be an http(s) URI");
        }
        validation::valid_short_name("owner_scope", &self.owner.scope.short_name, &mut errors);
        validation::valid_authority_number("owner_number", &self.owner.number, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(MdrError::Config {
                reason: errors.full_messages().join("; "),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = MdrConfig::from_toml_str("").unwrap();
        assert_eq!(config, MdrConfig::default());
        assert_eq!(config.domain_name("VS"), Some("Vital Signs"));
        assert!(config.is_released(RegistrationStatus::Standard));
        assert!(!config.is_released(RegistrationStatus::Candidate));
    }

    #[test]
    fn test_domains_table_replaces_defaults() {
        let config = MdrConfig::from_toml_str(
            r#"
            lock_timeout_secs = 60
            released_statuses = ["Qualified", "Standard"]

            [owner]
            number = "987654321"
            scope = { id = "NS-BETA", short_name = "BETA" }

            [domains]
            XX = "Experimental"
            "#,
        )
        .unwrap();

        assert_eq!(config.lock_timeout_secs, 60);
        assert!(config.is_released(RegistrationStatus::Qualified));
        assert_eq!(config.owner.scheme, "DUNS");
        assert_eq!(config.owner.scope.short_name, "BETA");
        assert_eq!(config.domain_name("XX"), Some("Experimental"));
        assert_eq!(config.domain_name("VS"), None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = MdrConfig::from_toml_str("lock_timeout_secs = 0\nbase_uri = \"ftp://x\"").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Lock timeout secs must be greater than zero"));
        assert!(text.contains("Base uri must be an http(s) URI"));
    }

    #[test]
    fn test_timeout_above_one_week_is_rejected() {
        let err = MdrConfig::from_toml_str("lock_timeout_secs = 9223372036854775807").unwrap_err();
        assert!(err.to_string().contains("Lock timeout secs must not exceed 604800 seconds"));

        let config = MdrConfig::from_toml_str("lock_timeout_secs = 604800").unwrap();
        assert_eq!(config.lock_timeout(), chrono::Duration::days(7));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MdrConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, MdrError::Config { .. }));
    }
}

//! Registration status and authority

use crate::model::identifier::Scope;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO 11179 registration status, ordered by maturity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum RegistrationStatus {
    #[default]
    Incomplete,
    Candidate,
    Recorded,
    Qualified,
    Standard,
    Retired,
    Superseded,
}

impl RegistrationStatus {
    pub const ALL: [RegistrationStatus; 7] = [
        RegistrationStatus::Incomplete,
        RegistrationStatus::Candidate,
        RegistrationStatus::Recorded,
        RegistrationStatus::Qualified,
        RegistrationStatus::Standard,
        RegistrationStatus::Retired,
        RegistrationStatus::Superseded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Incomplete => "Incomplete",
            RegistrationStatus::Candidate => "Candidate",
            RegistrationStatus::Recorded => "Recorded",
            RegistrationStatus::Qualified => "Qualified",
            RegistrationStatus::Standard => "Standard",
            RegistrationStatus::Retired => "Retired",
            RegistrationStatus::Superseded => "Superseded",
        }
    }

    /// Retired and superseded items are closed to further editing
    pub fn is_editable(&self) -> bool {
        !matches!(
            self,
            RegistrationStatus::Retired | RegistrationStatus::Superseded
        )
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegistrationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown registration status '{}'", s))
    }
}

/// Organisation that registers items under its scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationAuthority {
    /// Organisation number, nine digits for DUNS
    pub number: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    pub scope: Scope,
}

fn default_scheme() -> String {
    "DUNS".to_string()
}

impl Default for RegistrationAuthority {
    fn default() -> Self {
        Self {
            number: "123456789".to_string(),
            scheme: default_scheme(),
            scope: Scope::new("NS-ACME", "ACME", "ACME Pharma"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistrationState {
    pub status: RegistrationStatus,
    pub authority: RegistrationAuthority,
    #[serde(default)]
    pub administrative_note: String,
    #[serde(default)]
    pub unresolved_issue: String,
    #[serde(default)]
    pub effective_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub until_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current: bool,
}

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::models::student::{Gender, ProfileImage};

/// Upper bound the issuing system places on a CNIC.
pub const CNIC_MAX_LEN: usize = 15;

/// Whether `cnic` is acceptable as a lookup key. Format is not checked.
pub fn is_valid_cnic(cnic: &str) -> bool {
    !cnic.is_empty() && cnic.chars().count() <= CNIC_MAX_LEN
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Blocked,
    Left,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordStatus::Active => "active",
            RecordStatus::Blocked => "blocked",
            RecordStatus::Left => "left",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(RecordStatus::Active),
            "blocked" => Ok(RecordStatus::Blocked),
            "left" => Ok(RecordStatus::Left),
            _ => Err(anyhow::anyhow!("Unknown status: {s}")),
        }
    }
}

/// A parent as the registration service knows it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParentRecord {
    pub cnic: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub relation: String,
    pub occupation: String,
    pub qualification: String,
    pub status: RecordStatus,
    pub child_ids: Vec<String>,
}

/// Untrusted shape of a lookup response body. Every field is optional so
/// that missing data is reported by `validate` instead of a serde error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteParent {
    pub cnic: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub relation: Option<String>,
    pub occupation: Option<String>,
    pub qualification: Option<String>,
    pub status: Option<String>,
    pub child_ids: Option<Vec<String>>,
}

impl RemoteParent {
    /// Checks the remote body against the record schema for the CNIC that
    /// was asked for.
    pub fn validate(self, requested: &str) -> Result<ParentRecord, LookupError> {
        let cnic = match self.cnic {
            Some(cnic) if cnic != requested => {
                return Err(LookupError::Malformed(format!(
                    "asked for {requested}, got {cnic}"
                )))
            }
            _ => requested.to_string(),
        };

        let full_name = self
            .full_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| LookupError::Malformed("missing fullName".into()))?;

        let status = match self.status.as_deref() {
            None | Some("") => RecordStatus::Active,
            Some(raw) => raw
                .parse()
                .map_err(|e: anyhow::Error| LookupError::Malformed(e.to_string()))?,
        };

        let mut seen = HashSet::new();
        let child_ids = self
            .child_ids
            .unwrap_or_default()
            .into_iter()
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();

        Ok(ParentRecord {
            cnic,
            full_name,
            phone_number: non_empty(self.phone_number),
            email: non_empty(self.email),
            address: non_empty(self.address),
            relation: self.relation.unwrap_or_default(),
            occupation: self.occupation.unwrap_or_default(),
            qualification: self.qualification.unwrap_or_default(),
            status,
            child_ids,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parent section of the registration form, as currently entered.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ParentDraft {
    pub cnic: String,
    pub full_name: String,
    pub username: String,
    pub password: String,
    pub phone_number: String,
    pub email: String,
    pub gender: Gender,
    pub dob: Option<NaiveDate>,
    pub profile_image: Option<ProfileImage>,
    pub address: String,
    pub qualification: String,
    pub status: RecordStatus,
    pub relation: String,
    pub occupation: String,
    pub child_ids: Vec<String>,
    /// Set when the draft was filled from an existing record.
    #[serde(skip)]
    pub linked: bool,
}

impl ParentDraft {
    pub fn with_cnic(cnic: impl Into<String>) -> Self {
        Self {
            cnic: cnic.into(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for ParentDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentDraft")
            .field("cnic", &self.cnic)
            .field("full_name", &self.full_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("phone_number", &self.phone_number)
            .field("email", &self.email)
            .field("address", &self.address)
            .field("relation", &self.relation)
            .field("status", &self.status)
            .field("child_ids", &self.child_ids)
            .field("linked", &self.linked)
            .finish_non_exhaustive()
    }
}

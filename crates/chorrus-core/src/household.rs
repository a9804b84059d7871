use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::time::Timestamp;
use crate::user::User;
use crate::validation::validate_name;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub id: Uuid,
    pub name: String,
    pub admin_id: Uuid,
    pub invite_code: String,
    pub created_at: Timestamp,
    /// Only populated by `GET /households/{id}`.
    #[serde(default)]
    pub members: Vec<User>,
}

impl Household {
    pub fn is_admin(&self, user_id: Uuid) -> bool {
        self.admin_id == user_id
    }
}

/// Response of `POST /households/{id}/invites`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    pub invite_code: String,
    pub invite_url: String,
}

/// Body of `POST /households/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHousehold {
    pub name: String,
}

impl NewHousehold {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("household name", &self.name)
    }
}

/// Body of `PUT /households/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdUpdate {
    pub name: String,
}

impl HouseholdUpdate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("household name", &self.name)
    }
}

/// Body of `POST /households/join`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinHousehold {
    pub invite_code: InviteCode,
}

/// Household invite code, trimmed and upper-cased.
///
/// Normalization is idempotent: parsing an already normalized code yields the
/// same code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InviteCode(String);

impl InviteCode {
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(CoreError::invalid_invite_code("code is empty"));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(CoreError::invalid_invite_code(format!(
                "'{normalized}' contains whitespace"
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for InviteCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for InviteCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<InviteCode> for String {
    fn from(code: InviteCode) -> Self {
        code.0
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chore::Chore;
use crate::error::{CoreError, Result};

/// Client-side view over a household's chores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoreFilter {
    All,
    #[default]
    Pending,
    Completed,
}

impl ChoreFilter {
    /// The `include_completed` flag to request for this view.
    pub fn include_completed(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn matches(&self, chore: &Chore) -> bool {
        match self {
            Self::All => true,
            Self::Pending => chore.has_pending_assignment(),
            Self::Completed => chore.is_fully_completed(),
        }
    }

    pub fn apply(&self, chores: Vec<Chore>) -> Vec<Chore> {
        chores.into_iter().filter(|c| self.matches(c)).collect()
    }
}

impl fmt::Display for ChoreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Pending => f.write_str("pending"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

impl FromStr for ChoreFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(CoreError::InvalidFilter(other.to_string())),
        }
    }
}

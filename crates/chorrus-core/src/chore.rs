use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::time::{DueDate, Timestamp};
use crate::user::User;
use crate::validation::validate_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurrenceInterval {
    Daily,
    Weekly,
    BiWeekly,
}

impl RecurrenceInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::BiWeekly => "bi-weekly",
        }
    }
}

impl fmt::Display for RecurrenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceInterval {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "bi-weekly" | "biweekly" => Ok(Self::BiWeekly),
            other => Err(CoreError::InvalidRecurrence(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Pending,
    Completed,
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreAssignment {
    pub id: Uuid,
    pub chore_id: Uuid,
    pub user_id: Uuid,
    pub status: AssignmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl ChoreAssignment {
    pub fn is_completed(&self) -> bool {
        self.status == AssignmentStatus::Completed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: Uuid,
    pub household_id: Uuid,
    pub created_by_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: DueDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_interval: Option<RecurrenceInterval>,
    pub created_at: Timestamp,
    /// Absent from create/update responses.
    #[serde(default)]
    pub assignments: Vec<ChoreAssignment>,
}

impl Chore {
    pub fn has_pending_assignment(&self) -> bool {
        self.assignments.iter().any(|a| !a.is_completed())
    }

    /// True when every assignment is completed. A chore with no assignments
    /// counts as completed.
    pub fn is_fully_completed(&self) -> bool {
        self.assignments.iter().all(ChoreAssignment::is_completed)
    }
}

/// Body of `POST /chores/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChore {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: DueDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_interval: Option<RecurrenceInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user_ids: Option<Vec<Uuid>>,
}

impl NewChore {
    pub fn new(title: impl Into<String>, due_date: DueDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date,
            is_recurring: false,
            recurrence_interval: None,
            assigned_user_ids: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the chore recurring at the given interval.
    #[must_use]
    pub fn recurring(mut self, interval: RecurrenceInterval) -> Self {
        self.is_recurring = true;
        self.recurrence_interval = Some(interval);
        self
    }

    #[must_use]
    pub fn assigned_to(mut self, user_ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.assigned_user_ids = Some(user_ids.into_iter().collect());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("title", &self.title)
    }
}

/// Body of `PUT /chores/{id}`. Unset fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoreUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DueDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_interval: Option<RecurrenceInterval>,
}

impl ChoreUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_name("title", title)?;
        }
        Ok(())
    }
}

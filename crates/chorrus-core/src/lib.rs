//! Domain model shared by the Chorrus client crates.
//!
//! Field names follow the backend's snake_case wire format directly, so the
//! serde derives are the whole mapping layer. Optional request fields are
//! skipped when unset rather than sent as `null`.

pub mod chore;
pub mod error;
pub mod filter;
pub mod household;
pub mod time;
pub mod user;
pub mod validation;

pub use chore::{AssignmentStatus, Chore, ChoreAssignment, ChoreUpdate, NewChore, RecurrenceInterval};
pub use error::{CoreError, Result};
pub use filter::ChoreFilter;
pub use household::{Household, HouseholdUpdate, Invite, InviteCode, JoinHousehold, NewHousehold};
pub use self::time::{DueDate, Timestamp, today_utc};
pub use user::User;

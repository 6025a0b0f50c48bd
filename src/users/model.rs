use std::fmt;

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Textual layout for `last_activity` values, always rendered as the UTC
/// instant. The store keeps timestamps timezone-naive, so this is the only
/// faithful textual form.
pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second] +0000 UTC");

/// Lifecycle code persisted in the `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    #[serde(rename = "A")]
    Active,
    #[serde(rename = "I")]
    Inactive,
    #[serde(rename = "D")]
    Deleted,
}

impl UserStatus {
    /// One-letter code stored in the database.
    pub const fn code(self) -> &'static str {
        match self {
            UserStatus::Active => "A",
            UserStatus::Inactive => "I",
            UserStatus::Deleted => "D",
        }
    }

    /// Display label for the code.
    pub const fn label(self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
            UserStatus::Deleted => "Deleted",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A" => Some(UserStatus::Active),
            "I" => Some(UserStatus::Inactive),
            "D" => Some(UserStatus::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String, // partition key
    #[serde(skip_serializing)]
    pub password: String, // hashed externally, not exposed in JSON
    pub name: String,       // clustering key, immutable once written
    pub status: UserStatus, // lifecycle code
    pub last_activity: OffsetDateTime,
    pub auth_token: String,
    pub google_token: String,
    pub facebook_token: String,
}

impl User {
    /// Identifier used for point lookups (the partition key).
    pub fn id(&self) -> &str {
        &self.email
    }

    /// The activity instant shifted to UTC, the form every write uses.
    pub fn last_activity_utc(&self) -> OffsetDateTime {
        self.last_activity.to_offset(UtcOffset::UTC)
    }
}

/// Render a timestamp in the store's textual form.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, time::error::Format> {
    at.to_offset(UtcOffset::UTC).format(TIMESTAMP_FORMAT)
}

/// Parse the store's textual form back into a UTC instant.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(text, TIMESTAMP_FORMAT).map(PrimitiveDateTime::assume_utc)
}

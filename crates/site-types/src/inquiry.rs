use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Inquiry identifier: milliseconds since the UNIX epoch at submission,
/// bumped past the previous id on collision.
pub type InquiryId = u64;

/// Review status. The only transition is `Unread -> Read`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    Unread,
    Read,
}

impl InquiryStatus {
    pub fn is_unread(&self) -> bool {
        matches!(self, Self::Unread)
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unread => f.write_str("unread"),
            Self::Read => f.write_str("read"),
        }
    }
}

/// A visitor-submitted contact request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Inquiry {
    pub id: InquiryId,
    pub name: String,
    pub email: String,
    /// Investor type label as chosen on the contact form.
    #[serde(rename = "type")]
    pub inquiry_type: String,
    pub message: String,
    /// Submission day; never changes after creation.
    pub date: NaiveDate,
    pub status: InquiryStatus,
}

impl Inquiry {
    /// Move to `Read`. Returns `true` if the status changed.
    pub fn mark_read(&mut self) -> bool {
        let changed = self.status.is_unread();
        self.status = InquiryStatus::Read;
        changed
    }
}

/// Contact form contents before validation and id assignment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InquiryDraft {
    pub name: String,
    pub email: String,
    pub inquiry_type: String,
    pub message: String,
}

impl InquiryDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        inquiry_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            inquiry_type: inquiry_type.into(),
            message: message.into(),
        }
    }
}

/// Inbox filter used by the admin console tabs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InquiryFilter {
    #[default]
    All,
    Unread,
}

impl InquiryFilter {
    pub fn matches(&self, inquiry: &Inquiry) -> bool {
        match self {
            Self::All => true,
            Self::Unread => inquiry.status.is_unread(),
        }
    }
}

impl FromStr for InquiryFilter {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "unread" => Ok(Self::Unread),
            _ => Err(TypeError::UnknownFilter(s.to_string())),
        }
    }
}

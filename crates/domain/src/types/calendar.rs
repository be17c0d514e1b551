//! Calendar records and provider access levels

use serde::{Deserialize, Serialize};

/// A calendar as exposed to callers.
///
/// Rebuilt from the store on every query; never cached across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub id: String,
    pub name: String,
    pub is_read_only: bool,
}

impl Calendar {
    pub fn new(id: impl Into<String>, name: impl Into<String>, is_read_only: bool) -> Self {
        Self { id: id.into(), name: name.into(), is_read_only }
    }
}

/// How much the owning account may do with a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessLevel {
    None,
    FreeBusy,
    Read,
    Respond,
    Override,
    Contributor,
    Editor,
    Owner,
    Root,
    Unknown(i32),
}

impl AccessLevel {
    /// Provider integer value for this level.
    pub const fn value(self) -> i32 {
        match self {
            Self::None => 0,
            Self::FreeBusy => 100,
            Self::Read => 200,
            Self::Respond => 300,
            Self::Override => 400,
            Self::Contributor => 500,
            Self::Editor => 600,
            Self::Owner => 700,
            Self::Root => 800,
            Self::Unknown(value) => value,
        }
    }

    /// Only contributors and above may write events.
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::Contributor | Self::Editor | Self::Owner | Self::Root)
    }
}

impl From<i32> for AccessLevel {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::None,
            100 => Self::FreeBusy,
            200 => Self::Read,
            300 => Self::Respond,
            400 => Self::Override,
            500 => Self::Contributor,
            600 => Self::Editor,
            700 => Self::Owner,
            800 => Self::Root,
            other => Self::Unknown(other),
        }
    }
}

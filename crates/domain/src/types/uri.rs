//! Provider content URIs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{CALENDARS_CONTENT_URI, EVENTS_CONTENT_URI};

/// A `content://` URI addressing a provider collection or a single row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentUri(String);

impl ContentUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn calendars() -> Self {
        Self::new(CALENDARS_CONTENT_URI)
    }

    pub fn events() -> Self {
        Self::new(EVENTS_CONTENT_URI)
    }

    /// URI of a single row inside this collection.
    #[must_use]
    pub fn with_appended_id(&self, id: i64) -> Self {
        Self(format!("{}/{id}", self.0.trim_end_matches('/')))
    }

    /// Final non-empty path segment, if any.
    pub fn last_path_segment(&self) -> Option<&str> {
        let path = self.0.split_once("://").map_or(self.0.as_str(), |(_, rest)| rest);
        // The authority is not a path segment.
        let (_, path) = path.split_once('/')?;
        path.rsplit('/').find(|segment| !segment.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

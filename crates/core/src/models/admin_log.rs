//! Admin audit log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AdminLogId, LogSeverity, UserId};

/// One admin audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLog {
    pub id: AdminLogId,
    pub admin_id: UserId,
    pub admin_name: String,
    pub action: String,
    pub target: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub severity: LogSeverity,
}

/// Append-only audit log, newest first, bounded to [`LogBook::CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogBook(Vec<AdminLog>);

impl LogBook {
    /// Maximum number of retained entries.
    pub const CAPACITY: usize = 100;

    /// Build from stored entries, dropping anything beyond capacity.
    #[must_use]
    pub fn from_entries(mut entries: Vec<AdminLog>) -> Self {
        entries.truncate(Self::CAPACITY);
        Self(entries)
    }

    /// Prepend an entry, evicting the oldest once full.
    pub fn push(&mut self, entry: AdminLog) {
        self.0.insert(0, entry);
        self.0.truncate(Self::CAPACITY);
    }

    #[must_use]
    pub fn entries(&self) -> &[AdminLog] {
        &self.0
    }

    #[must_use]
    pub fn latest(&self) -> Option<&AdminLog> {
        self.0.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

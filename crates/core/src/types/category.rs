//! Product categories.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::status::ParseError;

/// The five fixed catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Audio,
    Power,
    Connectivity,
    Protection,
    Input,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 5] = [
        Self::Audio,
        Self::Power,
        Self::Connectivity,
        Self::Protection,
        Self::Input,
    ];

    /// The display name, identical to the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "Audio",
            Self::Power => "Power",
            Self::Connectivity => "Connectivity",
            Self::Protection => "Protection",
            Self::Input => "Input",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::new("category", s))
    }
}

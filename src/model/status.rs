/// Trend status definitions
///
/// The listing shows each trend as either still active or already over;
/// the raw cell text is free-form, so parsing degrades to `Unknown`.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a trend as reported by the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStatus {
    /// Trend is currently active
    Active,

    /// Trend has ended ("Lasted N hours" in the listing)
    Lasted,

    /// Status cell was missing or unrecognized
    Unknown,
}

impl TrendStatus {
    /// Parses a status from the listing's cell text
    ///
    /// Matching is case-insensitive and prefix-based because the listing
    /// appends duration text ("Lasted 4 hours"). Unrecognized or empty
    /// text maps to `Unknown` rather than failing the row.
    pub fn parse(text: &str) -> Self {
        let lower = text.trim().to_lowercase();
        if lower.starts_with("active") {
            Self::Active
        } else if lower.starts_with("lasted") {
            Self::Lasted
        } else {
            Self::Unknown
        }
    }

    /// Returns the canonical label for this status
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Lasted => "lasted",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TrendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

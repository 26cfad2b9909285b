//! Match status normalisation.

use std::fmt;

/// Lifecycle of a fixture as stored in `matches.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Final,
    Postponed,
    Cancelled,
}

const IN_PROGRESS_MARKERS: &[&str] = &["1H", "HT", "2H", "ET", "BT", "PT", "LIVE", "INPLAY"];

impl MatchStatus {
    /// Map a raw upstream status code. Unknown codes fall back to scheduled.
    ///
    /// Exact codes are matched before the live markers: `AET` and `COMPLETED`
    /// contain `ET` but are finished matches.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        let code = raw.map(str::trim).unwrap_or_default().to_ascii_uppercase();
        match code.as_str() {
            "" | "NS" | "TBD" | "PST" => Self::Scheduled,
            "FT" | "AET" | "AW" | "FINISHED" | "COMPLETE" | "COMPLETED" => Self::Final,
            "POST" | "PPD" => Self::Postponed,
            "CANC" | "ABD" | "INTR" | "SUSP" => Self::Cancelled,
            c if IN_PROGRESS_MARKERS.iter().any(|m| c.contains(m)) => Self::InProgress,
            _ => Self::Scheduled,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Final => "final",
            Self::Postponed => "postponed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

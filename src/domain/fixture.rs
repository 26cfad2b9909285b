//! One match seen from a single team's side.

use std::cmp::Ordering;

use serde::Serialize;

/// Whether the team played at home or away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Home => "H",
            Self::Away => "A",
        }
    }
}

/// Result for the team; `Pending` until both scores are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
    Pending,
}

impl Outcome {
    #[must_use]
    pub fn from_scores(scored: Option<i32>, conceded: Option<i32>) -> Self {
        match (scored, conceded) {
            (Some(scored), Some(conceded)) => match scored.cmp(&conceded) {
                Ordering::Greater => Self::Win,
                Ordering::Equal => Self::Draw,
                Ordering::Less => Self::Loss,
            },
            _ => Self::Pending,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Win => "W",
            Self::Draw => "D",
            Self::Loss => "L",
            Self::Pending => "?",
        }
    }
}

/// Side, own score, opponent score and outcome for `team_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamView {
    pub side: Side,
    pub scored: Option<i32>,
    pub conceded: Option<i32>,
    pub outcome: Outcome,
}

impl TeamView {
    /// Any team other than the home team is treated as the away side.
    #[must_use]
    pub fn of(
        team_id: i64,
        home_team_id: i64,
        home_score: Option<i32>,
        away_score: Option<i32>,
    ) -> Self {
        let (side, scored, conceded) = if team_id == home_team_id {
            (Side::Home, home_score, away_score)
        } else {
            (Side::Away, away_score, home_score)
        };
        Self {
            side,
            scored,
            conceded,
            outcome: Outcome::from_scores(scored, conceded),
        }
    }
}

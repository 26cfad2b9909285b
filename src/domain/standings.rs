//! Season standings aggregated from completed matches.

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Competition points for a win.
pub const WIN_POINTS: i32 = 4;
/// Competition points for a draw.
pub const DRAW_POINTS: i32 = 2;
/// A defeat by at most this many points earns a losing bonus point.
pub const LOSING_BONUS_MARGIN: i32 = 7;

/// A completed match: both teams and both scores known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub league_id: i64,
    pub season_id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_score: i32,
    pub away_score: i32,
}

/// Key of one standings row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TeamSeasonKey {
    pub league_id: i64,
    pub season_id: i64,
    pub team_id: i64,
}

/// Accumulated record of one team in one league season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamSeasonStats {
    pub key: TeamSeasonKey,
    pub games_played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub points_for: i32,
    pub points_against: i32,
    pub competition_points: i32,
    pub losing_bonus_points: i32,
    /// Always zero: match rows carry no try counts.
    pub try_bonus_points: i32,
}

impl TeamSeasonStats {
    #[must_use]
    pub const fn new(key: TeamSeasonKey) -> Self {
        Self {
            key,
            games_played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            points_for: 0,
            points_against: 0,
            competition_points: 0,
            losing_bonus_points: 0,
            try_bonus_points: 0,
        }
    }

    #[must_use]
    pub const fn points_diff(&self) -> i32 {
        self.points_for.saturating_sub(self.points_against)
    }

    // Scores are upstream values; totals saturate rather than overflow.
    fn record(&mut self, scored: i32, conceded: i32) {
        self.games_played += 1;
        self.points_for = self.points_for.saturating_add(scored);
        self.points_against = self.points_against.saturating_add(conceded);
        match scored.cmp(&conceded) {
            Ordering::Greater => {
                self.wins += 1;
                self.competition_points += WIN_POINTS;
            }
            Ordering::Equal => {
                self.draws += 1;
                self.competition_points += DRAW_POINTS;
            }
            Ordering::Less => {
                self.losses += 1;
                if conceded.saturating_sub(scored) <= LOSING_BONUS_MARGIN {
                    self.losing_bonus_points += 1;
                    self.competition_points += 1;
                }
            }
        }
    }
}

/// Aggregate results into one row per (league, season, team), ordered by key.
#[must_use]
pub fn aggregate<'a, I>(results: I) -> Vec<TeamSeasonStats>
where
    I: IntoIterator<Item = &'a MatchResult>,
{
    let mut rows: BTreeMap<TeamSeasonKey, TeamSeasonStats> = BTreeMap::new();

    for m in results {
        let home = TeamSeasonKey {
            league_id: m.league_id,
            season_id: m.season_id,
            team_id: m.home_team_id,
        };
        let away = TeamSeasonKey {
            team_id: m.away_team_id,
            ..home
        };

        rows.entry(home)
            .or_insert_with(|| TeamSeasonStats::new(home))
            .record(m.home_score, m.away_score);
        rows.entry(away)
            .or_insert_with(|| TeamSeasonStats::new(away))
            .record(m.away_score, m.home_score);
    }

    rows.into_values().collect()
}

//! Source-agnostic rugby domain logic: mapping rules and standings.

pub mod catalog;
pub mod fixture;
pub mod kickoff;
pub mod match_status;
pub mod naming;
pub mod standings;

pub use catalog::{CatalogLeague, LeagueCategory};
pub use fixture::{Outcome, Side, TeamView};
pub use match_status::MatchStatus;
pub use standings::{MatchResult, TeamSeasonKey, TeamSeasonStats};

//! Curated TheSportsDB league catalog.

use std::fmt;

/// Grouping of catalog leagues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum LeagueCategory {
    /// Domestic and club competitions.
    Division1,
    /// International tournaments and cups.
    International,
}

impl LeagueCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Division1 => "division1",
            Self::International => "international",
        }
    }
}

impl fmt::Display for LeagueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry: TSDB league id and a human label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLeague {
    pub tsdb_league_id: &'static str,
    pub label: &'static str,
    pub category: LeagueCategory,
}

const fn entry(
    tsdb_league_id: &'static str,
    label: &'static str,
    category: LeagueCategory,
) -> CatalogLeague {
    CatalogLeague {
        tsdb_league_id,
        label,
        category,
    }
}

use LeagueCategory::{Division1, International};

/// TSDB id of the United Rugby Championship.
pub const URC_LEAGUE_ID: &str = "4446";

pub const CATALOG: &[CatalogLeague] = &[
    entry("5370", "Commonwealth Games 7s Rugby", Division1),
    entry("5069", "Currie Cup", Division1),
    entry("5166", "English Premier 15s", Division1),
    entry("5167", "Japan Rugby League One", Division1),
    entry("5070", "Major League Rugby", Division1),
    entry("5168", "Romanian SuperLiga", Division1),
    entry("5480", "Rugby Union Club Friendlies", Division1),
    entry("5479", "Rugby Union International Friendlies", Division1),
    entry("5170", "Spanish División de Honor", Division1),
    entry("5169", "Super Liga Americana", Division1),
    entry("5701", "Super Rugby Aus", Division1),
    entry("5165", "URBA Top 13", Division1),
    entry(URC_LEAGUE_ID, "United Rugby Championship", Division1),
    entry("4984", "Autumn Nations Cup", International),
    entry("5512", "British and Irish Lions Tours", International),
    entry("5695", "English Prem Rugby Cup", International),
    entry("5418", "European Rugby Challenge Cup", International),
    entry("4550", "European Rugby Champions Cup", International),
    entry("5037", "Olympics 7s Rugby", International),
    entry("4985", "Pacific Nations Cup", International),
    entry("4986", "Rugby Championship", International),
    entry("4983", "Rugby Europe Championship", International),
    entry("4574", "Rugby World Cup", International),
    entry("4714", "Six Nations Championship", International),
    entry("5082", "Six Nations Under 20s Championship", International),
    entry("5563", "Six Nations Women", International),
    entry("5682", "Womens Rugby World Cup", International),
];

/// Catalog entries, optionally restricted to one category.
pub fn leagues(only: Option<LeagueCategory>) -> impl Iterator<Item = &'static CatalogLeague> {
    CATALOG
        .iter()
        .filter(move |l| only.map_or(true, |c| l.category == c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn category_sizes() {
        assert_eq!(leagues(Some(Division1)).count(), 13);
        assert_eq!(leagues(Some(International)).count(), 14);
        assert_eq!(leagues(None).count(), CATALOG.len());
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = CATALOG.iter().map(|l| l.tsdb_league_id).collect();
        assert_eq!(ids.len(), CATALOG.len());
    }
}

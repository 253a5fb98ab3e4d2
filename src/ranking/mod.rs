pub mod relevance;

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{Game, TimeBucket, Weight};

pub use relevance::relevance_score;

/// How a result list is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Weighted query relevance; leaves order untouched when the query is empty
    #[default]
    Relevance,
    /// Average rating, best first
    Rating,
    /// Popularity rank, most popular first
    Rank,
    /// Publication year, newest first
    Year,
    /// Minimum play time, shortest first
    Time,
    /// Name, case-insensitive A-Z
    Name,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(SortMode::Relevance),
            "rating" => Ok(SortMode::Rating),
            "rank" => Ok(SortMode::Rank),
            "year" => Ok(SortMode::Year),
            "time" => Ok(SortMode::Time),
            "name" => Ok(SortMode::Name),
            other => Err(format!("unknown sort mode: {}", other)),
        }
    }
}

/// Structured filters applied alongside the free-text query
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Target player count
    pub players: Option<u32>,
    /// Selected play-time bucket
    pub time: Option<TimeBucket>,
    /// Selected complexity class
    pub weight: Option<Weight>,
    pub sort: SortMode,
}

/// Sentinel for games without a popularity rank; sorts them last
const UNRANKED: u32 = 999_999;

/// Order a game list against a query and filters.
///
/// Total and deterministic: the input is never mutated, ties keep their
/// relative order (all sorts are stable), and absent numeric fields fall
/// back to the documented sentinels instead of panicking.
pub fn rank(games: &[Game], query: &str, filters: &Filters) -> Vec<Game> {
    let mut ordered: Vec<Game> = games.to_vec();
    match filters.sort {
        SortMode::Relevance => {
            if query.trim().is_empty() {
                return ordered;
            }
            let mut keyed: Vec<(f64, Game)> = ordered
                .drain(..)
                .map(|game| (relevance_score(&game, query, filters), game))
                .collect();
            keyed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
            keyed.into_iter().map(|(_, game)| game).collect()
        }
        SortMode::Rating => {
            ordered.sort_by(|a, b| {
                let (ra, rb) = (a.rating.unwrap_or(0.0), b.rating.unwrap_or(0.0));
                rb.partial_cmp(&ra).unwrap_or(Ordering::Equal)
            });
            ordered
        }
        SortMode::Rank => {
            ordered.sort_by_key(|game| game.rank().unwrap_or(UNRANKED));
            ordered
        }
        SortMode::Year => {
            ordered.sort_by_key(|game| std::cmp::Reverse(game.year.unwrap_or(0)));
            ordered
        }
        SortMode::Time => {
            // Zero minimum play time sorts first, same as the catalog feed
            ordered.sort_by_key(|game| game.time.min);
            ordered
        }
        SortMode::Name => {
            ordered.sort_by(|a, b| compare_names(&a.name, &b.name));
            ordered
        }
    }
}

/// Case-insensitive lexical comparison with a raw-name tiebreak
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameStats;

    fn game(id: &str, name: &str) -> Game {
        Game::new(id, name)
    }

    fn names(games: &[Game]) -> Vec<&str> {
        games.iter().map(|g| g.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_relevance_keeps_order() {
        let games = vec![game("b", "Brass"), game("a", "Azul"), game("c", "Catan")];
        let ranked = rank(&games, "", &Filters::default());
        assert_eq!(names(&ranked), vec!["Brass", "Azul", "Catan"]);

        let ranked = rank(&games, "   ", &Filters::default());
        assert_eq!(names(&ranked), vec!["Brass", "Azul", "Catan"]);
    }

    #[test]
    fn test_relevance_name_tiers() {
        let games = vec![
            game("1", "Settlers of Catan"),
            game("2", "Catan: Seafarers"),
            game("3", "Catan"),
        ];
        let ranked = rank(&games, "catan", &Filters::default());
        assert_eq!(
            names(&ranked),
            vec!["Catan", "Catan: Seafarers", "Settlers of Catan"]
        );
    }

    #[test]
    fn test_rating_sort_missing_is_zero() {
        let mut a = game("a", "A");
        a.rating = Some(7.0);
        let b = game("b", "B");
        let mut c = game("c", "C");
        c.rating = Some(8.5);

        let filters = Filters {
            sort: SortMode::Rating,
            ..Default::default()
        };
        let ranked = rank(&[a, b, c], "", &filters);
        assert_eq!(names(&ranked), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_rank_sort_missing_goes_last() {
        let mut a = game("a", "A");
        a.stats = Some(GameStats {
            rank: Some(300),
            ..Default::default()
        });
        let b = game("b", "B");
        let mut c = game("c", "C");
        c.stats = Some(GameStats {
            rank: Some(12),
            ..Default::default()
        });

        let filters = Filters {
            sort: SortMode::Rank,
            ..Default::default()
        };
        let ranked = rank(&[a, b, c], "", &filters);
        assert_eq!(names(&ranked), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_year_sort_newest_first_missing_last() {
        let mut a = game("a", "A");
        a.year = Some(2004);
        let b = game("b", "B");
        let mut c = game("c", "C");
        c.year = Some(2020);

        let filters = Filters {
            sort: SortMode::Year,
            ..Default::default()
        };
        let ranked = rank(&[a, b, c], "", &filters);
        assert_eq!(names(&ranked), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_time_sort_zero_first() {
        let mut a = game("a", "A");
        a.time = crate::core::Interval::new(45, 60);
        let b = game("b", "B"); // no listed play time
        let mut c = game("c", "C");
        c.time = crate::core::Interval::new(30, 45);

        let filters = Filters {
            sort: SortMode::Time,
            ..Default::default()
        };
        let ranked = rank(&[a, b, c], "", &filters);
        assert_eq!(names(&ranked), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_name_sort_case_insensitive() {
        let games = vec![game("1", "carcassonne"), game("2", "Azul"), game("3", "Brass")];
        let filters = Filters {
            sort: SortMode::Name,
            ..Default::default()
        };
        let ranked = rank(&games, "", &filters);
        assert_eq!(names(&ranked), vec!["Azul", "Brass", "carcassonne"]);
    }

    #[test]
    fn test_ties_are_stable() {
        let games = vec![game("1", "First"), game("2", "Second"), game("3", "Third")];
        let filters = Filters {
            sort: SortMode::Rating,
            ..Default::default()
        };
        // All ratings absent: everything ties at 0 and keeps input order
        let ranked = rank(&games, "", &filters);
        assert_eq!(names(&ranked), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(&[], "catan", &Filters::default()).is_empty());
    }

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!("rating".parse::<SortMode>().unwrap(), SortMode::Rating);
        assert_eq!("NAME".parse::<SortMode>().unwrap(), SortMode::Name);
        assert!("shuffle".parse::<SortMode>().is_err());
    }
}

use crate::core::Game;
use crate::ranking::Filters;

// Name-match tiers; first matching condition wins, no accumulation
const NAME_EXACT: f64 = 100.0;
const NAME_PREFIX: f64 = 70.0;
const NAME_SUBSTRING: f64 = 40.0;

/// Bonus when the requested player count sits inside the game's range
const PLAYER_FIT: f64 = 25.0;

/// Time-bucket bonuses: game range fully inside the bucket vs partial overlap
const BUCKET_CONTAINED: f64 = 20.0;
const BUCKET_PARTIAL: f64 = 12.0;

const WEIGHT_MATCH: f64 = 10.0;

/// Weighted relevance of one game against a query and filters.
///
/// Pure and total: an empty (or whitespace) query scores 0, absent fields
/// contribute their documented defaults. Scores are only meaningful
/// relative to each other under the same query/filters.
pub fn relevance_score(game: &Game, query: &str, filters: &Filters) -> f64 {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return 0.0;
    }

    let mut score = 0.0;

    let name = game.name.to_lowercase();
    if name == q {
        score += NAME_EXACT;
    } else if name.starts_with(&q) {
        score += NAME_PREFIX;
    } else if name.contains(&q) {
        score += NAME_SUBSTRING;
    }

    if let Some(players) = filters.players {
        if game.players.contains(players) {
            score += PLAYER_FIT;
        } else {
            // Decaying near-miss bonus, floored at 0 once the gap is wide
            let distance = game.players.distance_to(players) as f64;
            score += (12.0 - 6.0 * (1.0 + distance).log2()).max(0.0);
        }
    }

    if let Some(bucket) = filters.time {
        let bounds = bucket.interval();
        if game.time.overlaps(&bounds) {
            score += if game.time.contained_in(&bounds) {
                BUCKET_CONTAINED
            } else {
                BUCKET_PARTIAL
            };
        }
    }

    if let Some(weight) = filters.weight {
        if game.weight == weight {
            score += WEIGHT_MATCH;
        }
    }

    if let Some(rank) = game.rank() {
        if rank <= 100 {
            score += 20.0;
        } else if rank <= 500 {
            score += 12.0;
        } else if rank <= 1000 {
            score += 6.0;
        }
    }

    if let Some(rating) = game.rating {
        score += ((rating - 5.0) * 6.0).max(0.0);
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameStats, Interval, TimeBucket, Weight};

    fn filters() -> Filters {
        Filters::default()
    }

    #[test]
    fn test_empty_query_scores_zero() {
        let mut game = Game::new("catan", "Catan");
        game.rating = Some(9.0);
        assert_eq!(relevance_score(&game, "", &filters()), 0.0);
        assert_eq!(relevance_score(&game, "  ", &filters()), 0.0);
    }

    #[test]
    fn test_name_tiers_are_exclusive() {
        let exact = Game::new("1", "Catan");
        let prefix = Game::new("2", "Catan: Seafarers");
        let substring = Game::new("3", "Settlers of Catan");
        let miss = Game::new("4", "Azul");

        assert_eq!(relevance_score(&exact, "catan", &filters()), 100.0);
        assert_eq!(relevance_score(&prefix, "catan", &filters()), 70.0);
        assert_eq!(relevance_score(&substring, "catan", &filters()), 40.0);
        assert_eq!(relevance_score(&miss, "catan", &filters()), 0.0);
    }

    #[test]
    fn test_player_fit_bonus() {
        let mut game = Game::new("1", "Azul");
        game.players = Interval::new(2, 4);

        let fit = Filters {
            players: Some(3),
            ..Default::default()
        };
        assert_eq!(relevance_score(&game, "azul", &fit), 100.0 + 25.0);
    }

    #[test]
    fn test_player_distance_decay() {
        let mut game = Game::new("1", "Azul");
        game.players = Interval::new(2, 4);

        // One off the range: 12 - 6*log2(2) = 6
        let near = Filters {
            players: Some(5),
            ..Default::default()
        };
        let score = relevance_score(&game, "azul", &near) - 100.0;
        assert!((score - 6.0).abs() < 1e-9);

        // Far off the range: bonus floors at 0, never negative
        let far = Filters {
            players: Some(20),
            ..Default::default()
        };
        assert_eq!(relevance_score(&game, "azul", &far), 100.0);
    }

    #[test]
    fn test_time_bucket_containment_vs_partial() {
        let mut contained = Game::new("1", "Azul");
        contained.time = Interval::new(30, 45);
        let mut partial = Game::new("2", "Wingspan");
        partial.time = Interval::new(45, 75);
        let mut disjoint = Game::new("3", "Gloomhaven");
        disjoint.time = Interval::new(90, 140);

        let f = Filters {
            time: TimeBucket::find("30-60"),
            ..Default::default()
        };
        assert_eq!(relevance_score(&contained, "azul", &f), 100.0 + 20.0);
        assert_eq!(relevance_score(&partial, "wingspan", &f), 100.0 + 12.0);
        assert_eq!(relevance_score(&disjoint, "gloomhaven", &f), 100.0);
    }

    #[test]
    fn test_weight_match() {
        let mut game = Game::new("1", "Brass");
        game.weight = Weight::Heavy;

        let matching = Filters {
            weight: Some(Weight::Heavy),
            ..Default::default()
        };
        let other = Filters {
            weight: Some(Weight::Light),
            ..Default::default()
        };
        assert_eq!(relevance_score(&game, "brass", &matching), 110.0);
        assert_eq!(relevance_score(&game, "brass", &other), 100.0);
    }

    #[test]
    fn test_rank_tiers() {
        let mut game = Game::new("1", "Brass");
        for (rank, bonus) in [(50, 20.0), (100, 20.0), (500, 12.0), (1000, 6.0), (5000, 0.0)] {
            game.stats = Some(GameStats {
                rank: Some(rank),
                ..Default::default()
            });
            assert_eq!(relevance_score(&game, "brass", &filters()), 100.0 + bonus);
        }

        game.stats = None;
        assert_eq!(relevance_score(&game, "brass", &filters()), 100.0);
    }

    #[test]
    fn test_rating_bonus_floors_at_zero() {
        let mut game = Game::new("1", "Brass");
        game.rating = Some(8.0);
        assert_eq!(relevance_score(&game, "brass", &filters()), 100.0 + 18.0);

        game.rating = Some(3.0);
        assert_eq!(relevance_score(&game, "brass", &filters()), 100.0);
    }
}

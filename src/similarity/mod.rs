use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::core::Game;

// Composite weights, fixed and summing to 1.0
const TAG_WEIGHT: f64 = 0.50;
const PLAYERS_WEIGHT: f64 = 0.20;
const TIME_WEIGHT: f64 = 0.15;
const WEIGHT_CLASS_WEIGHT: f64 = 0.10;
const RATING_WEIGHT: f64 = 0.05;

/// Widens player ranges so a min==max range never collapses to zero length
const PLAYER_RANGE_EPSILON: f64 = 1e-4;

/// Neutral rating proximity when either game has no rating
const RATING_NEUTRAL: f64 = 0.5;

/// At most this many shared tags are kept for display
const COMMON_TAG_CAP: usize = 4;

/// One candidate annotated with its match against a base game.
///
/// Ephemeral: recomputed on every base-game change, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredResult {
    pub game: Game,
    /// Composite match score in [0, 1]
    pub score: f64,
    /// Human-readable match reasons, display only
    pub reasons: Vec<String>,
    /// Shared tags in base-game order, capped for display
    pub common_tags: Vec<String>,
}

/// Jaccard index of two tag sets; 0 when both are empty
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.len() + set_b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Ratio of interval overlap to interval union; 0 for a zero-length union
pub fn interval_overlap_ratio(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    let overlap = (a_max.min(b_max) - a_min.max(b_min)).max(0.0);
    let union = a_max.max(b_max) - a_min.min(b_min);
    if union == 0.0 {
        0.0
    } else {
        overlap / union
    }
}

/// Score how similar a candidate is to a base game.
///
/// Deterministic weighted composite of tag overlap, player/time range
/// overlap, weight-class proximity and rating proximity. The tag math is
/// symmetric; reasons and common tags are reported from the base game's
/// perspective.
pub fn score_similarity(base: &Game, candidate: &Game) -> ScoredResult {
    let tag_score = jaccard(&base.tags, &candidate.tags);
    let players_score = interval_overlap_ratio(
        base.players.min as f64,
        base.players.max as f64 + PLAYER_RANGE_EPSILON,
        candidate.players.min as f64,
        candidate.players.max as f64 + PLAYER_RANGE_EPSILON,
    );
    let time_score = interval_overlap_ratio(
        base.time.min as f64,
        base.time.max as f64,
        candidate.time.min as f64,
        candidate.time.max as f64,
    );
    let delta = (f64::from(base.weight.ordinal()) - f64::from(candidate.weight.ordinal())).abs();
    let weight_score = 1.0 - (delta / 2.0).min(1.0);
    let rating_score = match (base.rating, candidate.rating) {
        (Some(a), Some(b)) => 1.0 - ((a - b).abs() / 5.0).min(1.0),
        _ => RATING_NEUTRAL,
    };

    let score = (TAG_WEIGHT * tag_score
        + PLAYERS_WEIGHT * players_score
        + TIME_WEIGHT * time_score
        + WEIGHT_CLASS_WEIGHT * weight_score
        + RATING_WEIGHT * rating_score)
        .clamp(0.0, 1.0);

    let mut common_tags: Vec<String> = base
        .tags
        .iter()
        .filter(|tag| candidate.tags.contains(tag))
        .cloned()
        .collect();

    let mut reasons = Vec::new();
    if !common_tags.is_empty() {
        let n = common_tags.len();
        reasons.push(format!("shares {} tag{}", n, if n > 1 { "s" } else { "" }));
    }
    if players_score > 0.0 {
        reasons.push("overlapping player counts".to_string());
    }
    if time_score > 0.0 {
        reasons.push("similar playtime".to_string());
    }
    if weight_score == 1.0 {
        reasons.push("same weight".to_string());
    } else if weight_score >= 0.5 {
        reasons.push("similar weight".to_string());
    }

    common_tags.truncate(COMMON_TAG_CAP);

    ScoredResult {
        game: candidate.clone(),
        score,
        reasons,
        common_tags,
    }
}

/// Score a base game against a candidate pool, best matches first.
///
/// The base game itself is excluded by id; ties keep candidate input order.
pub fn rank_similar(base: &Game, pool: &[Game]) -> Vec<ScoredResult> {
    let mut scored: Vec<ScoredResult> = pool
        .iter()
        .filter(|candidate| candidate.id != base.id)
        .map(|candidate| score_similarity(base, candidate))
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored
}

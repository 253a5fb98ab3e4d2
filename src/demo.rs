//! Built-in demo catalog.
//!
//! A small curated game set used by the binaries, tests and benches when no
//! remote catalog endpoint is configured.

use crate::core::{Game, GameStats, Interval, Weight};

#[allow(clippy::too_many_arguments)]
fn game(
    id: &str,
    name: &str,
    year: i32,
    rating: f64,
    players: (u32, u32),
    time: (u32, u32),
    weight: Weight,
    tags: &[&str],
    rank: Option<u32>,
) -> Game {
    Game {
        id: id.to_string(),
        name: name.to_string(),
        image: format!("https://picsum.photos/seed/{}/800/600", id),
        year: Some(year),
        rating: Some(rating),
        players: Interval::new(players.0, players.1),
        time: Interval::new(time.0, time.1),
        weight,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        stats: rank.map(|r| GameStats {
            rank: Some(r),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// The demo game set
pub fn demo_catalog() -> Vec<Game> {
    vec![
        game(
            "catan",
            "Catan",
            1995,
            7.2,
            (3, 4),
            (60, 90),
            Weight::Medium,
            &["trading", "resource-management", "family", "strategy"],
            Some(429),
        ),
        game(
            "gloomhaven",
            "Gloomhaven",
            2017,
            8.7,
            (1, 4),
            (90, 140),
            Weight::Heavy,
            &["campaign", "co-op", "dungeon-crawl", "hand-management"],
            Some(3),
        ),
        game(
            "azul",
            "Azul",
            2017,
            7.8,
            (2, 4),
            (30, 45),
            Weight::Light,
            &["abstract", "pattern-building", "family"],
            Some(70),
        ),
        game(
            "wingspan",
            "Wingspan",
            2019,
            8.0,
            (1, 5),
            (45, 75),
            Weight::Medium,
            &["engine-building", "set-collection", "solo"],
            Some(28),
        ),
        game(
            "terraforming-mars",
            "Terraforming Mars",
            2016,
            8.4,
            (1, 5),
            (120, 180),
            Weight::Heavy,
            &["engine-building", "card-drafting", "science", "solo"],
            Some(7),
        ),
        game(
            "ticket-to-ride",
            "Ticket to Ride",
            2004,
            7.4,
            (2, 5),
            (45, 60),
            Weight::Light,
            &["route-building", "set-collection", "family"],
            Some(224),
        ),
        game(
            "root",
            "Root",
            2018,
            8.1,
            (2, 4),
            (60, 120),
            Weight::Heavy,
            &["asymmetric", "area-control", "strategy"],
            Some(32),
        ),
        game(
            "7wonders",
            "7 Wonders",
            2010,
            7.7,
            (2, 7),
            (30, 45),
            Weight::Medium,
            &["card-drafting", "simultaneous", "civilization"],
            Some(96),
        ),
        game(
            "pandemic",
            "Pandemic",
            2008,
            7.6,
            (2, 4),
            (45, 60),
            Weight::Medium,
            &["co-op", "hand-management", "disease"],
            Some(130),
        ),
        game(
            "brass",
            "Brass: Birmingham",
            2018,
            8.8,
            (2, 4),
            (90, 150),
            Weight::Heavy,
            &["economic", "network", "card-hand-management"],
            Some(1),
        ),
        game(
            "carcassonne",
            "Carcassonne",
            2000,
            7.4,
            (2, 5),
            (30, 45),
            Weight::Light,
            &["tile-laying", "area-control", "family"],
            Some(212),
        ),
        game(
            "dune",
            "Dune: Imperium",
            2020,
            8.4,
            (1, 4),
            (60, 120),
            Weight::Medium,
            &["deck-building", "worker-placement", "solo"],
            Some(12),
        ),
    ]
}

/// Sorted distinct tags across a game set
pub fn all_tags(games: &[Game]) -> Vec<String> {
    let mut tags: Vec<String> = games
        .iter()
        .flat_map(|g| g.tags.iter().cloned())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

use clap::{Parser, Subcommand};
use std::sync::Arc;

use meeple_engine::{
    cache::MemoryPageCache,
    demo,
    providers::{CatalogProvider, HttpCatalogProvider, StaticCatalogProvider},
    similarity, SearchOrchestrator, SearchRequest, SearchSnapshot, SortMode, Weight,
};

#[derive(Parser)]
#[command(name = "discovery-cli")]
#[command(about = "Board-game discovery CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Remote catalog API base (e.g. http://localhost:8090/api/bgg);
    /// uses the built-in demo catalog when unset
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        /// Search query
        query: String,

        /// Target player count
        #[arg(short, long)]
        players: Option<u32>,

        /// Complexity class (light, medium, heavy)
        #[arg(short, long)]
        weight: Option<Weight>,

        /// Play-time bucket id (u30, 30-60, 60-90, 90+)
        #[arg(short, long)]
        time: Option<String>,

        /// Filter by tag (repeatable)
        #[arg(long)]
        tag: Vec<String>,

        /// Sort mode
        #[arg(short, long, default_value = "relevance")]
        sort: SortMode,
    },

    /// Show the trending listing
    Trending,

    /// Find games similar to a base game
    Similar {
        /// Base game id
        id: String,

        /// Maximum matches to show
        #[arg(short, long, default_value = "5")]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let provider = build_provider(&cli.base_url)?;

    match cli.command {
        Commands::Search {
            query,
            players,
            weight,
            time,
            tag,
            sort,
        } => {
            println!("🔍 Searching for: {}", query);

            let orchestrator = SearchOrchestrator::new(provider);
            let mut updates = orchestrator.subscribe();

            orchestrator.set_players(players);
            orchestrator.set_weight(weight);
            orchestrator.set_time_bucket(time.as_deref());
            for t in &tag {
                orchestrator.toggle_tag(t);
            }
            orchestrator.set_sort(sort);
            orchestrator.set_query(query);

            let snapshot = settled(&mut updates).await;
            report(&snapshot);
        }

        Commands::Trending => {
            println!("🔥 Trending games");

            let orchestrator = SearchOrchestrator::new(provider);
            let mut updates = orchestrator.subscribe();
            orchestrator.start();

            let snapshot = settled(&mut updates).await;
            report(&snapshot);
        }

        Commands::Similar { id, count } => {
            let games = match &cli.base_url {
                Some(_) => provider.fetch(&SearchRequest::default()).await?.results,
                None => demo::demo_catalog(),
            };

            let base = games
                .iter()
                .find(|g| g.id == id)
                .ok_or_else(|| anyhow::anyhow!("unknown game id: {}", id))?;

            println!("🎲 Games similar to {}:", base.display_name());

            for scored in similarity::rank_similar(base, &games).into_iter().take(count) {
                println!(
                    "   {:>3.0}% {} ({})",
                    scored.score * 100.0,
                    scored.game.name,
                    scored.reasons.join(", ")
                );
                if !scored.common_tags.is_empty() {
                    println!("        shared tags: {}", scored.common_tags.join(", "));
                }
            }
        }
    }

    Ok(())
}

fn build_provider(base_url: &Option<String>) -> anyhow::Result<Arc<dyn CatalogProvider>> {
    Ok(match base_url {
        Some(url) => {
            let cache = Arc::new(MemoryPageCache::default());
            Arc::new(HttpCatalogProvider::new(url.clone())?.with_cache(cache))
        }
        None => Arc::new(StaticCatalogProvider::new(demo::demo_catalog())),
    })
}

/// Wait until the flow settles (no request pending or in flight)
async fn settled(updates: &mut tokio::sync::watch::Receiver<SearchSnapshot>) -> SearchSnapshot {
    loop {
        {
            let snapshot = updates.borrow_and_update();
            if !snapshot.loading {
                return snapshot.clone();
            }
        }
        if updates.changed().await.is_err() {
            return updates.borrow().clone();
        }
    }
}

fn report(snapshot: &SearchSnapshot) {
    if let Some(error) = &snapshot.error {
        println!("❌ {}", error);
        return;
    }

    println!(
        "\n✅ {} shown of {} total (page {})",
        snapshot.results.len(),
        snapshot.total,
        snapshot.page
    );

    for game in snapshot.ranked() {
        let rating = game
            .rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "   {} • {}-{} players • {}-{}m • {} • rated {}",
            game.display_name(),
            game.players.min,
            game.players.max,
            game.time.min,
            game.time.max,
            game.weight,
            rating
        );
    }
}

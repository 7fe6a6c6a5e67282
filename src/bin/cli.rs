use clap::{Parser, Subcommand};
use std::sync::Arc;

use tomesphere_discovery_engine::{
    search::detect_mood, Book, DiscoveryEngine, Mood, SearchFilters, SortBy, SortOrder,
    SqliteDataService,
};

#[derive(Parser)]
#[command(name = "discovery-cli")]
#[command(about = "TomeSphere discovery engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Local catalog snapshot path
    #[arg(short, long, default_value = "tomesphere.db")]
    db: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        /// Search query
        query: String,

        /// Restrict to a genre
        #[arg(short, long)]
        genre: Option<String>,

        /// Sort key (relevance, title, author, year)
        #[arg(short, long, default_value = "relevance")]
        sort: String,

        /// Sort order (asc, desc)
        #[arg(short, long, default_value = "desc")]
        order: String,
    },

    /// Personalized recommendations for a user
    Recommend {
        /// User id
        user: String,

        /// Use the hybrid ranker (preference + co-occurrence + content)
        #[arg(long)]
        hybrid: bool,

        /// Maximum picks
        #[arg(short, long, default_value = "6")]
        limit: usize,
    },

    /// Most-liked books in the last 30 days
    Trending {
        /// Maximum books
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Books similar to a reference book
    Related {
        /// Reference book id
        book_id: String,
    },

    /// Autocomplete suggestions
    Suggest {
        /// Partial query
        query: String,
    },

    /// Browse by mood ("stressed", or free text with --detect)
    Mood {
        /// Mood name or free text
        input: String,

        /// Detect the mood from free text instead of parsing a name
        #[arg(long)]
        detect: bool,
    },

    /// Seed the local snapshot from a JSON array of books
    Seed {
        /// Path to a JSON file
        file: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let service = Arc::new(SqliteDataService::new(&cli.db)?);
    let engine = DiscoveryEngine::new(service.clone());

    match cli.command {
        Commands::Search {
            query,
            genre,
            sort,
            order,
        } => {
            let mut filters = SearchFilters::query(query);
            if let Some(genre) = genre {
                filters.genres = vec![genre];
            }
            filters.sort_by = SortBy::parse(&sort);
            filters.sort_order = SortOrder::parse(&order);

            let outcome = engine.search(&filters).await?;

            println!("{} results ({:.2}ms)", outcome.total, outcome.latency_ms);
            for hit in &outcome.results {
                println!("  [{:>4}] {}", hit.score, hit.book.display_name());
            }
            if !outcome.facets.genres.is_empty() {
                println!("\nGenres:");
                for facet in &outcome.facets.genres {
                    println!("  {} ({})", facet.value, facet.count);
                }
            }
        }

        Commands::Recommend { user, hybrid, limit } => {
            if hybrid {
                let set = engine.hybrid_recommendations(&user, limit).await;
                print_header(set.fallback, set.latency_ms);
                for pick in &set.picks {
                    println!(
                        "  [{:>4}] {} ({:?})",
                        pick.score,
                        pick.book.display_name(),
                        pick.sources
                    );
                }
            } else {
                let set = engine.recommendations(&user).await;
                print_header(set.fallback, set.latency_ms);
                for book in set.books.iter().take(limit) {
                    println!("  {}", book.display_name());
                }
            }
        }

        Commands::Trending { limit } => {
            let set = engine.trending(limit).await;
            print_header(set.fallback, set.latency_ms);
            for (i, book) in set.books.iter().enumerate() {
                println!("  {}. {}", i + 1, book.display_name());
            }
        }

        Commands::Related { book_id } => {
            let related = engine.related(&book_id).await;
            if related.is_empty() {
                println!("No related books for {book_id}");
            }
            for book in &related {
                println!("  {}", book.display_name());
            }
        }

        Commands::Suggest { query } => {
            for suggestion in engine.suggest(&query).await {
                println!("  {:?}: {}", suggestion.kind, suggestion.text);
            }
        }

        Commands::Mood { input, detect } => {
            let mood = if detect {
                detect_mood(&input)
            } else {
                Mood::parse(&input).unwrap_or(Mood::Curious)
            };
            println!("Mood: {mood:?}");
            for book in engine.books_for_mood(mood).await {
                println!("  {}", book.display_name());
            }
        }

        Commands::Seed { file } => {
            let json = std::fs::read_to_string(&file)?;
            let books: Vec<Book> = serde_json::from_str(&json)?;
            let count = books.len();
            for book in &books {
                service.add_book(book)?;
            }
            println!("Seeded {count} books into {}", cli.db);
        }
    }

    Ok(())
}

fn print_header(fallback: bool, latency_ms: f64) {
    if fallback {
        println!("Featured fallback ({latency_ms:.2}ms):");
    } else {
        println!("Picks ({latency_ms:.2}ms):");
    }
}

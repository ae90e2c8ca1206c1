use anyhow::{Context, Result, anyhow};
use clap::{ArgGroup, Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, Genre, ReleaseYear};
use metadata_client::{MetadataFetcher, OfflineFetcher, TmdbClient, TmdbConfig};
use pipeline::FilterSelection;
use server::{
    Feedback, Recommendation, RecommendationRequest, RecommendationResponse,
    RecommendationService, ServiceConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// ReelRecs - Similar-movie recommender
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Recommends movies similar to one you pick, with TMDB details", long_about = None)]
struct Cli {
    /// Directory holding movie_list.dat and similarity.bin
    #[arg(short, long, default_value = "data/model")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the genres available as filters
    Genres,

    /// List the release years available as filters
    Years,

    /// List catalog titles, optionally narrowed by genre and year
    Titles {
        #[arg(long)]
        genre: Option<Genre>,

        /// Four-digit year or "Unknown"
        #[arg(long)]
        year: Option<ReleaseYear>,
    },

    /// Fuzzy-search catalog titles
    Search {
        #[arg(long)]
        query: String,

        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Recommend movies similar to a title
    #[command(group(ArgGroup::new("movie").required(true).args(["title", "query"])))]
    Recommend {
        /// Exact catalog title
        #[arg(long)]
        title: Option<String>,

        /// Free text resolved to the closest title
        #[arg(long)]
        query: Option<String>,

        #[arg(long)]
        genre: Option<Genre>,

        #[arg(long)]
        year: Option<ReleaseYear>,

        /// Number of recommendations (defaults to RECS_RECOMMENDATION_COUNT)
        #[arg(long)]
        limit: Option<usize>,

        /// Skip TMDB and show placeholder details
        #[arg(long)]
        offline: bool,
    },

    /// Rate the recommendations (0-10)
    Feedback {
        #[arg(long)]
        rating: u8,

        #[arg(long)]
        comment: Option<String>,
    },

    /// Time ranking over random titles
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading model artifacts from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_files(&cli.data_dir).context("Failed to load model artifacts")?,
    );
    let (movies, dimension) = data_index.counts();
    println!(
        "{} Loaded {} movies ({}x{} similarity matrix) in {:?}",
        "✓".green(),
        movies,
        dimension,
        dimension,
        start.elapsed()
    );

    let config = ServiceConfig::from_env()?;
    let offline = matches!(cli.command, Commands::Recommend { offline: true, .. });
    let needs_metadata = matches!(cli.command, Commands::Recommend { .. });
    let fetcher = build_fetcher(needs_metadata && !offline)?;
    let service = RecommendationService::new(data_index, fetcher, config);

    match cli.command {
        Commands::Genres => handle_genres(&service),
        Commands::Years => handle_years(&service),
        Commands::Titles { genre, year } => {
            handle_titles(&service, FilterSelection::new(genre, year))?
        }
        Commands::Search { query, limit } => handle_search(&service, &query, limit),
        Commands::Recommend {
            title,
            query,
            genre,
            year,
            limit,
            ..
        } => {
            let title = match (title, query) {
                (Some(title), _) => title,
                (None, Some(query)) => {
                    let best = service.resolve_query(&query)?;
                    println!("{} Best match: {}", "✓".green(), best.title.bold());
                    best.title
                }
                (None, None) => return Err(anyhow!("Either --title or --query is required")),
            };
            let mut request =
                RecommendationRequest::new(title).with_filters(FilterSelection::new(genre, year));
            request.limit = limit;
            handle_recommend(&service, request).await?
        }
        Commands::Feedback { rating, comment } => handle_feedback(&service, rating, comment)?,
        Commands::Benchmark { requests } => handle_benchmark(&service, requests).await?,
    }

    Ok(())
}

/// TMDB when details are wanted, otherwise placeholders only
fn build_fetcher(online: bool) -> Result<Arc<dyn MetadataFetcher>> {
    if !online {
        return Ok(Arc::new(OfflineFetcher::default()));
    }
    let config = TmdbConfig::from_env()
        .context("Set TMDB_API_KEY (or pass --offline) to fetch movie details")?;
    let client = TmdbClient::new(config).context("Failed to build TMDB client")?;
    Ok(Arc::new(client))
}

fn handle_genres(service: &RecommendationService) {
    println!("{}", "Genres:".bold().blue());
    for genre in service.genres() {
        println!("  {}", genre);
    }
}

fn handle_years(service: &RecommendationService) {
    println!("{}", "Release years:".bold().blue());
    for year in service.release_years() {
        println!("  {}", year);
    }
}

fn handle_titles(service: &RecommendationService, filters: FilterSelection) -> Result<()> {
    let titles = service.titles(&filters)?;
    println!(
        "{}",
        format!("{} titles ({}):", titles.len(), filters).bold().blue()
    );
    for title in titles {
        println!("  {}", title);
    }
    Ok(())
}

fn handle_search(service: &RecommendationService, query: &str, limit: usize) {
    let matches = service.search(query, limit);
    if matches.is_empty() {
        println!("{}", format!("No titles match '{}'", query).yellow());
        return;
    }
    println!("{}", format!("Search results for '{}':", query).bold().blue());
    for (rank, found) in matches.iter().enumerate() {
        println!(
            "{}. {} [{}]",
            (rank + 1).to_string().green(),
            found.title,
            found.score
        );
    }
}

async fn handle_recommend(
    service: &RecommendationService,
    request: RecommendationRequest,
) -> Result<()> {
    let response = service.get_recommendations(request).await?;
    print_recommendations(&response, service.config().overview_excerpt_chars);
    Ok(())
}

fn handle_feedback(service: &RecommendationService, rating: u8, comment: Option<String>) -> Result<()> {
    let ack = service.submit_feedback(Feedback { rating, comment })?;
    println!("{} {}", "✓".green(), ack.message);
    Ok(())
}

/// Ranking-only latency over random catalog titles
async fn handle_benchmark(service: &RecommendationService, requests: usize) -> Result<()> {
    let titles = service.titles(&FilterSelection::default())?;
    if titles.is_empty() || requests == 0 {
        return Err(anyhow!("Benchmark needs a non-empty catalog and at least one request"));
    }
    let count = service.config().recommendation_count;
    info!("Running {} ranking requests over {} titles", requests, titles.len());

    let start = Instant::now();
    let mut handles = Vec::with_capacity(requests);
    for _ in 0..requests {
        let title = titles[rand::random_range(0..titles.len())].clone();
        let recommender = service.recommender().clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let started = Instant::now();
            recommender.recommend(&title, count)?;
            Ok::<_, anyhow::Error>(started.elapsed())
        }));
    }

    let mut timings = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = start.elapsed();

    timings.sort();
    let percentile = |p: f64| -> Duration {
        let rank = ((timings.len() as f64 * p) as usize).min(timings.len() - 1);
        timings[rank]
    };
    let total: Duration = timings.iter().sum();
    let throughput = requests as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {}", requests);
    println!("Wall time: {:?}", wall_time);
    println!("Average latency: {:?}", total / requests as u32);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn print_recommendations(response: &RecommendationResponse, excerpt_chars: usize) {
    for warning in &response.warnings {
        println!("{} {}", "!".yellow().bold(), warning.to_string().yellow());
    }

    println!(
        "{}",
        format!("Movies similar to {}:", response.title).bold().blue()
    );
    for (rank, rec) in response.recommendations.iter().enumerate() {
        print_card(rank + 1, rec, excerpt_chars);
    }

    if response.degraded_count() > 0 {
        println!(
            "{}",
            format!(
                "{} of {} movies are shown without TMDB details",
                response.degraded_count(),
                response.recommendations.len()
            )
            .dimmed()
        );
    }
}

fn print_card(rank: usize, rec: &Recommendation, excerpt_chars: usize) {
    let rating = if rec.rating == metadata_client::NOT_AVAILABLE {
        rec.rating.clone()
    } else {
        format!("{}/10", rec.rating)
    };

    println!(
        "{}. {} {}",
        rank.to_string().green(),
        rec.title.bold(),
        format!("(similarity {:.3})", rec.score).dimmed()
    );
    if !rec.genres.is_empty() {
        println!("   Genres:   {}", rec.genres.italic());
    }
    println!("   Released: {}", rec.release_date);
    println!("   Rating:   {}", rating);
    println!("   TMDB:     {}", rec.detail_link.cyan());
    println!("   Poster:   {}", rec.poster_url);
    println!("   {}", rec.overview_excerpt(excerpt_chars));
}

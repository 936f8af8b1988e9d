mod ingest;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use vidsense_analysis::{Analyzer, ScoringClient};
use vidsense_core::AppConfig;
use vidsense_store::StoreClient;

#[derive(Debug, Parser)]
#[command(name = "vidsense-cli")]
#[command(about = "Video comment store and sentiment analysis command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the ids of indexed videos.
    List {
        #[arg(long, default_value_t = 1000)]
        limit: usize,
    },
    /// Print the number of indexed videos.
    Count,
    /// Print one video document.
    Get { video_id: String },
    /// Delete one video document.
    Delete { video_id: String },
    /// Index every document in a JSON file (one document or an array).
    Ingest { path: PathBuf },
    /// Score the comments of one video.
    Analyze {
        video_id: String,
        /// Retries on transient failures (defaults to VIDSENSE_ANALYZE_MAX_RETRIES).
        #[arg(long)]
        retries: Option<u32>,
    },
    /// Score every comment containing a keyword.
    AnalyzeKeyword {
        keyword: String,
        #[arg(long)]
        retries: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = vidsense_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let store = StoreClient::new(
        &config.elasticsearch_url,
        &config.elasticsearch_index,
        config.store_timeout_secs,
    )?;

    match cli.command {
        Commands::List { limit } => {
            let ids = store.list_ids(limit).await?;
            print_json(&ids)
        }
        Commands::Count => {
            let count = store.count_all().await?;
            print_json(&json!({ "count": count }))
        }
        Commands::Get { video_id } => {
            let document = store
                .get_by_id(&video_id)
                .await
                .with_context(|| format!("failed to fetch video {video_id}"))?;
            print_json(&document)
        }
        Commands::Delete { video_id } => {
            store
                .delete_by_id(&video_id)
                .await
                .with_context(|| format!("failed to delete video {video_id}"))?;
            print_json(&json!({ "videoId": video_id, "deleted": true }))
        }
        Commands::Ingest { path } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let documents = ingest::parse_documents(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            let report = ingest::ingest(&store, documents).await;
            print_json(&report)
        }
        Commands::Analyze { video_id, retries } => {
            let analyzer = build_analyzer(&config, store, retries)?;
            let analysis = analyzer
                .analyze_by_id(&video_id)
                .await
                .with_context(|| format!("analysis of video {video_id} failed"))?;
            print_json(&analysis)
        }
        Commands::AnalyzeKeyword { keyword, retries } => {
            let analyzer = build_analyzer(&config, store, retries)?;
            let analysis = analyzer
                .analyze_by_keyword(&keyword)
                .await
                .with_context(|| format!("analysis of keyword {keyword:?} failed"))?;
            print_json(&analysis)
        }
    }
}

fn build_analyzer(
    config: &AppConfig,
    store: StoreClient,
    retries: Option<u32>,
) -> anyhow::Result<Analyzer> {
    let scorer = ScoringClient::new(&config.scoring_url, config.scoring_timeout_secs)?;
    Ok(Analyzer::new(store, scorer)
        .with_search_max_results(config.search_max_results)
        .with_deadline(config.analyze_deadline_secs.map(Duration::from_secs))
        .with_retry(
            retries.unwrap_or(config.analyze_max_retries),
            config.retry_backoff_base_ms,
        ))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

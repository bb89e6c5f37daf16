//! Lemma-Search main entry point
//!
//! This is the command-line interface for the Lemma-Search site search engine.

use anyhow::Context;
use clap::{Parser, Subcommand};
use lemma_search::config::{load_config_with_hash, Config};
use lemma_search::output::print_statistics;
use lemma_search::search::{SearchQuery, DEFAULT_LIMIT};
use lemma_search::SearchEngine;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lemma-Search: a per-site lexical search engine
///
/// Lemma-Search crawls the configured sites, indexes the lemmas of every
/// page and answers free-text queries ranked by relevance.
#[derive(Parser, Debug)]
#[command(name = "lemma-search")]
#[command(version)]
#[command(about = "A per-site lexical search engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl and index every configured site (Ctrl-C stops the crawl)
    Crawl,

    /// Fetch and re-index a single page of a configured site
    IndexPage {
        /// Absolute URL of the page
        url: String,
    },

    /// Search the index
    Search {
        /// Free-text query
        query: String,

        /// Only search the site with this root URL
        #[arg(long)]
        site: Option<String>,

        /// Number of results to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Maximum number of results to show
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Show index statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let engine = open_engine(config)?;

    match cli.command {
        Command::Crawl => handle_crawl(&engine).await,
        Command::IndexPage { url } => handle_index_page(&engine, &url).await,
        Command::Search {
            query,
            site,
            offset,
            limit,
        } => {
            let mut query = SearchQuery::new(query).with_page(offset, limit);
            query.site = site;
            handle_search(&engine, &query)
        }
        Command::Stats => handle_stats(&engine),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lemma_search=info,warn"),
            1 => EnvFilter::new("lemma_search=debug,info"),
            2 => EnvFilter::new("lemma_search=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn open_engine(config: Config) -> anyhow::Result<SearchEngine> {
    let database = config.storage.database_path.clone();
    SearchEngine::new(config).with_context(|| format!("Failed to open database {}", database))
}

/// Runs a crawl session, stopping it on Ctrl-C
async fn handle_crawl(engine: &SearchEngine) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} site(s): {}",
        engine.config().sites.len(),
        engine
            .config()
            .sites
            .iter()
            .map(|site| site.url.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let Some(mut session) = engine.start_crawl_session() else {
        anyhow::bail!("A crawl session is already running");
    };

    tokio::select! {
        finished = &mut session => {
            finished??;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            tracing::info!("Interrupt received, stopping crawl...");
            engine.stop_crawl_session();
            session.await??;
        }
    }

    tracing::info!("Crawl finished");
    handle_stats(engine)
}

async fn handle_index_page(engine: &SearchEngine, url: &str) -> anyhow::Result<()> {
    let page = engine
        .index_single_page(url)
        .await
        .with_context(|| format!("Failed to index {}", url))?;

    println!("✓ Indexed {} (HTTP {})", page.path, page.code);
    Ok(())
}

fn handle_search(engine: &SearchEngine, query: &SearchQuery) -> anyhow::Result<()> {
    let response = engine.search(query)?;

    println!(
        "=== {} result(s) for \"{}\" ===\n",
        response.total, query.text
    );

    for (position, result) in response.results.iter().enumerate() {
        println!(
            "{}. {} [{:.3}]",
            query.offset + position + 1,
            if result.title.is_empty() {
                &result.uri
            } else {
                &result.title
            },
            result.relevance
        );
        println!("   {}{} ({})", result.site, result.uri, result.site_name);
        if !result.snippet.is_empty() {
            println!("   {}", result.snippet);
        }
        println!();
    }

    Ok(())
}

fn handle_stats(engine: &SearchEngine) -> anyhow::Result<()> {
    println!("Database: {}\n", engine.config().storage.database_path);
    let stats = engine.statistics()?;
    print_statistics(&stats);
    Ok(())
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use octagon_client::fetcher::DEFAULT_TIMEOUT;
use octagon_client::{CsvSink, JsonSink, ReqwestFetcher, ScraperParser};
use octagon_core::crawl::{DEFAULT_BASE_URL, DEFAULT_TEST_CAP};
use octagon_core::detail::extract_record;
use octagon_core::fetch::{RetryConfig, RetryingFetcher};
use octagon_core::traits::Parser as _;
use octagon_core::{CrawlConfig, CrawlSummary, Crawler, FetchResult, RecordSink};

#[derive(Parser)]
#[command(name = "octagon", version, about = "UFC fighter statistics crawler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the alphabetical fighter listing and write every fighter to one file
    Crawl {
        /// Fighter listing URL
        #[arg(long, env = "OCTAGON_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Directory for the output file (created if missing)
        #[arg(long, env = "OCTAGON_OUTPUT_DIR", default_value = "ufc_data")]
        output_dir: PathBuf,

        /// Output file name
        #[arg(long, env = "OCTAGON_OUTPUT_FILE", default_value = "ufc_fighters.csv")]
        output_file: String,

        /// Output format
        #[arg(long, value_enum, env = "OCTAGON_FORMAT", default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        /// Index keys to walk, one per character, in order
        #[arg(long, env = "OCTAGON_KEYS", default_value = "abcdefghijklmnopqrstuvwxyz")]
        keys: String,

        /// Attempts per URL before giving up on it
        #[arg(long, env = "OCTAGON_MAX_RETRIES", default_value_t = 3)]
        max_retries: u32,

        /// Delay after every successful request, in milliseconds
        #[arg(long, env = "OCTAGON_DELAY_MS", default_value_t = 1000)]
        delay_ms: u64,

        /// HTTP request timeout, in seconds
        #[arg(long, env = "OCTAGON_TIMEOUT", default_value_t = DEFAULT_TIMEOUT.as_secs())]
        timeout: u64,

        /// Stop after the first few fighters
        #[arg(long, env = "OCTAGON_TEST_MODE", default_value_t = false)]
        test_mode: bool,

        /// Records collected before test mode stops the crawl
        #[arg(long, env = "OCTAGON_TEST_CAP", default_value_t = DEFAULT_TEST_CAP)]
        test_cap: usize,

        /// Give up on a key after this many listing pages
        #[arg(long, env = "OCTAGON_MAX_PAGES")]
        max_pages: Option<u32>,
    },

    /// Scrape a single fighter detail page and print it as JSON
    Fighter {
        /// Fighter detail page URL
        #[arg(short, long)]
        url: String,

        /// Attempts before giving up
        #[arg(long, env = "OCTAGON_MAX_RETRIES", default_value_t = 3)]
        max_retries: u32,

        /// HTTP request timeout, in seconds
        #[arg(long, env = "OCTAGON_TIMEOUT", default_value_t = DEFAULT_TIMEOUT.as_secs())]
        timeout: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("octagon=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            base_url,
            output_dir,
            output_file,
            format,
            keys,
            max_retries,
            delay_ms,
            timeout,
            test_mode,
            test_cap,
            max_pages,
        } => {
            let config = CrawlConfig::default()
                .with_base_url(base_url)
                .with_keys(split_keys(&keys))
                .with_retries(max_retries)
                .with_delay(Duration::from_millis(delay_ms))
                .with_test_mode(test_mode)
                .with_test_cap(test_cap)
                .with_max_pages_per_key(max_pages);
            let path = output_dir.join(output_file);
            cmd_crawl(config, Duration::from_secs(timeout), format, path).await?;
        }
        Commands::Fighter {
            url,
            max_retries,
            timeout,
        } => {
            cmd_fighter(&url, max_retries, Duration::from_secs(timeout)).await?;
        }
    }

    Ok(())
}

/// One index key per non-whitespace character, lower-cased.
fn split_keys(keys: &str) -> Vec<String> {
    keys.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| c.to_lowercase().to_string())
        .collect()
}

async fn cmd_crawl(
    config: CrawlConfig,
    timeout: Duration,
    format: OutputFormat,
    path: PathBuf,
) -> Result<()> {
    tracing::info!("Starting UFC fighters data scraping...");
    if config.test_mode {
        tracing::info!(cap = config.test_cap, "Test mode enabled");
    }

    let fetcher = ReqwestFetcher::with_timeout(timeout).context("Failed to create HTTP client")?;
    let crawler =
        Crawler::new(fetcher, ScraperParser, config).context("Invalid crawl configuration")?;

    let summary = match format {
        OutputFormat::Csv => run_into(&crawler, &CsvSink::new(&path)).await?,
        OutputFormat::Json => run_into(&crawler, &JsonSink::new(&path)).await?,
    };

    tracing::info!(
        records = summary.records,
        detail_failures = summary.detail_failures,
        capped = summary.capped,
        "UFC fighters data scraping completed."
    );
    Ok(())
}

async fn run_into<S: RecordSink>(
    crawler: &Crawler<ReqwestFetcher, ScraperParser>,
    sink: &S,
) -> Result<CrawlSummary> {
    crawler
        .run(sink)
        .await
        .with_context(|| format!("Failed to write {}", sink.location()))
}

async fn cmd_fighter(url: &str, max_retries: u32, timeout: Duration) -> Result<()> {
    let fetcher = RetryingFetcher::new(
        ReqwestFetcher::with_timeout(timeout).context("Failed to create HTTP client")?,
        RetryConfig::new(max_retries, Duration::ZERO),
    );

    let html = match fetcher.fetch(url).await {
        FetchResult::Success(html) => html,
        FetchResult::Failure(reason) => anyhow::bail!("Could not fetch {url}: {reason}"),
    };

    let doc = ScraperParser.parse(&html);
    let record = extract_record(&doc).context("Failed to extract fighter record")?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

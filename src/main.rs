// src/main.rs
mod utils;
mod sources;
mod extractors;
mod pipeline;
mod storage;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use pipeline::{ReviewPipeline, DEFAULT_MAX_PAGES};
use sources::client::{HttpFetcher, PageFetcher};
use sources::models::DateRange;
use sources::Source;
use storage::StorageManager;
use utils::AppError;

/// SaaS Review Scraper
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Company name (slug preferred)
    #[arg(long)]
    company: Option<String>,

    /// Review source
    #[arg(long, value_enum)]
    source: Option<Source>,

    /// Start date (YYYY-MM-DD)
    #[arg(long = "start_date", alias = "start-date")]
    start_date: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long = "end_date", alias = "end-date")]
    end_date: Option<String>,

    /// Number of listing pages to request
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES, value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: u32,

    /// Directory the JSON output is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Debug mode - save every fetched page under <output_dir>/debug and log skipped blocks
    #[arg(short, long)]
    debug: bool,
}

/// A fully validated scrape request.
#[derive(Debug)]
struct ScrapeRequest {
    company: String,
    source: Source,
    range: DateRange,
    max_pages: u32,
    output_dir: PathBuf,
    debug: bool,
}

impl ScrapeRequest {
    /// `Ok(None)` when any required option is missing or blank; dates are validated before anything else runs.
    fn from_args(args: Args) -> Result<Option<Self>, AppError> {
        let (Some(company), Some(source), Some(start_date), Some(end_date)) = (
            non_blank(args.company),
            args.source,
            non_blank(args.start_date),
            non_blank(args.end_date),
        ) else {
            return Ok(None);
        };

        let start = parse_date(&start_date)?;
        let end = parse_date(&end_date)?;
        if start > end {
            tracing::warn!("start_date {} is after end_date {}; no reviews can match", start, end);
        }

        Ok(Some(Self {
            company,
            source,
            range: DateRange::new(start, end),
            max_pages: args.max_pages,
            output_dir: args.output_dir,
            debug: args.debug,
        }))
    }
}

#[derive(Debug)]
struct RunSummary {
    count: usize,
    path: PathBuf,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn parse_date(input: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|source| AppError::DateFormat {
        input: input.to_string(),
        source,
    })
}

/// Scrapes the requested source and writes the output file.
async fn run<F: PageFetcher>(request: &ScrapeRequest, fetcher: &F) -> Result<RunSummary, AppError> {
    let storage = StorageManager::new(&request.output_dir)?;

    let mut pipeline = ReviewPipeline::new(fetcher, request.max_pages);
    if request.debug {
        pipeline = pipeline.with_debug_storage(&storage);
    }

    let reviews = pipeline
        .scrape(request.source, &request.company, &request.range)
        .await;

    let path = storage.save_reviews(&request.company, request.source, &reviews)?;
    Ok(RunSummary { count: reviews.len(), path })
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (RUST_LOG overrides the --debug default)
    utils::logging::setup_logging(args.debug);
    tracing::debug!("Starting with args: {:?}", args);

    let Some(request) = ScrapeRequest::from_args(args)? else {
        println!("No CLI arguments provided. Showing help and exiting gracefully.\n");
        Args::command().print_help()?;
        return Ok(());
    };

    // 3. Scrape and save
    let fetcher = HttpFetcher::new()?;
    let summary = run(&request, &fetcher).await?;

    println!("Scraped {} reviews. Saved to {}", summary.count, summary.path.display());
    Ok(())
}

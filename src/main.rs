// src/main.rs
mod batch;
mod config;
mod extractors;
mod filings;
mod sections;
mod storage;
mod utils;

use std::path::PathBuf;

use clap::Parser;

use batch::BatchRunner;
use config::RunConfig;
use filings::DocumentLocator;
use sections::SectionCatalog;
use storage::{RunMetadata, StorageManager};
use utils::AppError;

/// Extracts item ranges (e.g. Item 1A to Item 1B) from downloaded filings into one CSV table
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Filing type folder to read, e.g. 10-K
    #[arg(long, default_value = "10-K")]
    doc_type: String,

    /// Root of the downloaded filings (<base>/<doc type>/<year>/<filer>/<filing>/)
    #[arg(short, long, default_value = "./data/")]
    base_path: PathBuf,

    /// Year folder to read, as named by the downloader (e.g. 19)
    #[arg(short, long, default_value = "19")]
    year: String,

    /// Maximum number of filings to process
    #[arg(short, long, default_value_t = 100)]
    amount: usize,

    /// Section range as START:END; repeat for several (default: Item 1A:Item 1B and Item 7:Item 7A)
    #[arg(short, long = "range", value_parser = config::parse_range_arg)]
    ranges: Vec<(String, String)>,

    /// Output directory for the result table
    #[arg(short, long, default_value = "./scrape_results")]
    output_dir: PathBuf,

    /// Result table file name (default: <year>-<doc type>-sections.csv)
    #[arg(long)]
    output_file: Option<String>,

    /// Number of filings processed concurrently
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(args.verbose);
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Validate configuration before touching any filing
    let catalog = SectionCatalog::ten_k();
    let config = RunConfig::new(
        &catalog,
        &args.doc_type,
        &args.year,
        args.base_path,
        args.amount,
        &args.ranges,
        args.output_dir,
        args.output_file,
        args.workers,
    )?;
    for range in &config.ranges {
        tracing::info!("Configured range: {}", range);
    }

    // 4. Initialize storage
    let storage = StorageManager::new(&config.output_dir)?;

    // 5. Run the batch
    let runner = BatchRunner::new(
        DocumentLocator::new(&config.base_path),
        config.selector.clone(),
        &config.ranges,
    )?
    .with_workers(config.workers)
    .with_progress(|progress| {
        tracing::info!("Scraping {} - {}/{}.", progress.path.display(), progress.position, progress.total);
    });
    let table = runner.run(config.amount).await;

    if table.is_empty() {
        tracing::warn!(
            "No {} filings found for year {} under {}",
            config.selector.doc_type,
            config.selector.year,
            config.base_path.display()
        );
    }

    // 6. Persist results
    let table_path = storage.save_table(&table, &config.output_file)?;
    let metadata = RunMetadata::from_table(
        &table,
        &config.selector.doc_type,
        &config.selector.year,
        config.amount,
        &table_path,
    );
    storage.save_run_metadata(&metadata, &config.metadata_file())?;

    tracing::info!("Processing finished. {} filings written to {}", table.len(), table_path.display());
    Ok(())
}

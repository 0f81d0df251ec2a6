use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use odds_archive_scraper::{crawl, Args, CsvStore, HttpFetcher, Result, YearOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --log-level when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let years = args.years()?;
    let config = args.site_config();
    let fetcher = HttpFetcher::new(&config)?;
    let store = CsvStore::new(&args.output_dir);

    info!(
        "Scraping {} archive {}..={} into {}",
        config.country,
        years.start(),
        years.end(),
        args.output_dir.display()
    );

    let reports = crawl(&fetcher, &store, &config, years).await;

    for report in &reports {
        match &report.outcome {
            YearOutcome::Skipped => info!("{}: skipped", report.year),
            YearOutcome::Written(count) => info!("{}: {} records", report.year, count),
            YearOutcome::Failed(e) => warn!("{}: failed ({})", report.year, e),
        }
    }

    Ok(())
}

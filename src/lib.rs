pub mod archive_handler;
pub mod blocks;
pub mod config;
pub mod error;
pub mod game_handler;
pub mod output;
pub mod utils;

use std::ops::RangeInclusive;

use indexmap::IndexMap;
use tracing::{debug, error, info, warn};

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================
pub use archive_handler::{parse_archive, parse_archive_html, resolve_game_links, CountMismatch, GameLinks, ResolvedLinks};
pub use blocks::{locate_labeled_tables, LabeledTables};
pub use config::{Args, SiteConfig};
pub use error::{Result, ScrapeError};
pub use game_handler::{parse_game_html, process_game, BookmakerOdds, GameOdds, Odds, OddsRow};
pub use output::{flatten_odds, CompetitionOdds, CsvStore, OddsRecord, RecordStore};
pub use utils::{parse_sub_document, HttpFetcher, PageFetcher};

// ============================================================================
// SEASON PROCESSING
// ============================================================================

/// What happened to one year of a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearOutcome {
    /// Output already present, nothing fetched
    Skipped,
    /// Number of records written
    Written(usize),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearReport {
    pub year: i32,
    pub outcome: YearOutcome,
}

/// Resolves every game of a season into its odds.
///
/// A game page that cannot be fetched or parsed is logged and left out; only
/// a failure on the archive page itself fails the season.
pub async fn collect_season_odds<F: PageFetcher>(
    fetcher: &F,
    config: &SiteConfig,
    year: i32,
) -> Result<CompetitionOdds> {
    let links = parse_archive(fetcher, config, year).await?;
    info!(
        "{}: {} competitions, {} games",
        year,
        links.competitions.len(),
        links.game_count()
    );

    let mut odds = CompetitionOdds::new();
    for (competition, games) in links.competitions {
        let mut competition_odds = IndexMap::new();

        for (game, url) in games {
            debug!("Fetching {} ({})", game, url);
            match process_game(fetcher, &url, config).await {
                Ok(game_odds) => {
                    competition_odds.insert(game, game_odds);
                }
                Err(e) => warn!("Skipping game '{}' in {}: {}", game, competition, e),
            }
        }

        odds.insert(competition, competition_odds);
    }

    Ok(odds)
}

/// Scrapes one season and persists its records
pub async fn process_year<F: PageFetcher, S: RecordStore>(
    fetcher: &F,
    store: &S,
    config: &SiteConfig,
    year: i32,
) -> Result<usize> {
    let odds = collect_season_odds(fetcher, config, year).await?;
    store.write(year, flatten_odds(odds, year))
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// Crawls each year in order, skipping years already stored.
/// A failed year is reported and does not stop the remaining ones.
pub async fn crawl<F: PageFetcher, S: RecordStore>(
    fetcher: &F,
    store: &S,
    config: &SiteConfig,
    years: RangeInclusive<i32>,
) -> Vec<YearReport> {
    let mut reports = Vec::new();

    for year in years {
        let outcome = if store.exists(year) {
            info!("{} already scraped, skipping", year);
            YearOutcome::Skipped
        } else {
            info!("Scraping {}", year);
            match process_year(fetcher, store, config, year).await {
                Ok(count) => YearOutcome::Written(count),
                Err(e) => {
                    error!("Failed to scrape {}: {}", year, e);
                    YearOutcome::Failed(e.to_string())
                }
            }
        };
        reports.push(YearReport { year, outcome });
    }

    reports
}

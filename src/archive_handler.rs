use indexmap::IndexMap;
use scraper::Html;
use tracing::{debug, warn};

use crate::blocks::{locate_labeled_tables, LabeledTables};
use crate::config::SiteConfig;
use crate::error::Result;
use crate::utils::{parse_sub_document, selector, stripped_text, PageFetcher};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Game name to absolute game page URL, in page order
pub type GameLinks = IndexMap<String, String>;

/// A competition whose stored game count differs from the links it contained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMismatch {
    pub label: String,
    pub processed: usize,
    pub stored: usize,
}

/// Every competition of an archive page with its game links
#[derive(Debug, Default)]
pub struct ResolvedLinks {
    pub competitions: IndexMap<String, GameLinks>,
    pub mismatches: Vec<CountMismatch>,
}

impl ResolvedLinks {
    /// Total games across all competitions
    pub fn game_count(&self) -> usize {
        self.competitions.values().map(|games| games.len()).sum()
    }
}

// ============================================================================
// LINK TABLE RESOLUTION
// ============================================================================

/// Extracts the game links of each competition table.
///
/// Repeated link text inside one competition is re-keyed with the playoff
/// suffix. When the stored count still differs from the number of links seen,
/// a [`CountMismatch`] is recorded and a warning logged; resolution continues.
pub fn resolve_game_links(tables: &LabeledTables, config: &SiteConfig) -> Result<ResolvedLinks> {
    let game_table_selector = selector(&config.game_table_selector)?;
    let link_selector = selector("a[href]")?;

    let mut resolved = ResolvedLinks::default();

    for (label, fragment) in tables {
        let document = parse_sub_document(fragment);
        let mut games = GameLinks::new();
        let mut processed = 0;

        for table in document.select(&game_table_selector) {
            for link in table.select(&link_selector) {
                let Some(href) = link.value().attr("href") else {
                    continue;
                };

                let mut text = stripped_text(link);
                if games.contains_key(&text) {
                    text.push_str(&config.playoff_suffix);
                }
                games.insert(text, config.absolute_url(href));
                processed += 1;
            }
        }

        if processed != games.len() {
            warn!(
                "{} with inconsistency. Collected {} games, but saved only {}.",
                label,
                processed,
                games.len()
            );
            resolved.mismatches.push(CountMismatch {
                label: label.clone(),
                processed,
                stored: games.len(),
            });
        }

        debug!("{}: {} games", label, games.len());
        resolved.competitions.insert(label.clone(), games);
    }

    Ok(resolved)
}

/// Parses an archive page into competitions and their game links
pub fn parse_archive_html(html: &str, config: &SiteConfig) -> Result<ResolvedLinks> {
    let document = Html::parse_document(html);
    let tables = locate_labeled_tables(&document, config, Some(&config.archive_label_strip))?;
    resolve_game_links(&tables, config)
}

/// Fetches and parses the archive page of one season
pub async fn parse_archive<F: PageFetcher>(
    fetcher: &F,
    config: &SiteConfig,
    year: i32,
) -> Result<ResolvedLinks> {
    let url = config.archive_url(year);
    debug!("Fetching archive {}", url);
    let html = fetcher.fetch(&url).await?;
    parse_archive_html(&html, config)
}

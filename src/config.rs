use chrono::Datelike;
use clap::Parser;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::error::{Result, ScrapeError};

pub const DEFAULT_ORIGIN: &str = "https://checkbestodds.com";
pub const DEFAULT_COUNTRY: &str = "brazil";
pub const BEST_ODDS: &str = "Best odds";
pub const PLAYOFF_SUFFIX: &str = " (playoff)";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/50.0.2661.75 Safari/537.36";

// ============================================================================
// SITE CONFIGURATION
// ============================================================================

/// Fixed markers and constants describing the odds archive site layout
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Prepended to every relative href
    pub origin: String,
    /// Archive country slug, e.g. "brazil"
    pub country: String,
    pub header_selector: String,
    pub game_table_selector: String,
    pub odds_table_selector: String,
    /// Inner span carrying the machine-sortable odds value
    pub sortable_value_selector: String,
    /// Bookmaker name of the aggregate row
    pub aggregate_row: String,
    /// Removed from competition labels on the archive page
    pub archive_label_strip: String,
    pub playoff_suffix: String,
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            origin: DEFAULT_ORIGIN.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            header_selector: "div.tblehead".to_string(),
            game_table_selector: "table.tble".to_string(),
            odds_table_selector: "table.tble.sort6".to_string(),
            sortable_value_selector: "span.toSort.noDsp".to_string(),
            aggregate_row: BEST_ODDS.to_string(),
            archive_label_strip: BEST_ODDS.to_string(),
            playoff_suffix: PLAYOFF_SUFFIX.to_string(),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl SiteConfig {
    /// Archive page listing every competition of a season
    pub fn archive_url(&self, year: i32) -> String {
        format!(
            "{}/football-odds/archive-{}/{}",
            self.origin.trim_end_matches('/'),
            self.country,
            year
        )
    }

    /// Turns a site-relative href into an absolute URL
    pub fn absolute_url(&self, href: &str) -> String {
        format!("{}{}", self.origin.trim_end_matches('/'), href)
    }
}

// ============================================================================
// COMMAND LINE
// ============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// First season to scrape
    #[arg(long, default_value_t = 2023)]
    pub start_year: i32,

    /// Last season to scrape, inclusive (defaults to the current year)
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Archive country slug
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    pub country: String,

    /// Site origin used for archive pages and game links
    #[arg(long, env = "ODDS_ORIGIN", default_value = DEFAULT_ORIGIN)]
    pub origin: String,

    /// Directory holding one CSV per year
    #[arg(long, default_value = "odds")]
    pub output_dir: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn years(&self) -> Result<RangeInclusive<i32>> {
        let end = self.end_year.unwrap_or_else(|| chrono::Local::now().year());
        if self.start_year > end {
            return Err(ScrapeError::YearRange { start: self.start_year, end });
        }
        Ok(self.start_year..=end)
    }

    pub fn site_config(&self) -> SiteConfig {
        SiteConfig {
            origin: self.origin.clone(),
            country: self.country.clone(),
            ..SiteConfig::default()
        }
    }
}
